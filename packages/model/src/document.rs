//! Builder document tree.
//!
//! A document is either a full Section → Column → Block hierarchy or a
//! simplified flat block list where each block carries a left/right pane tag.
//! The flat list is a single master order; the panes are a filter over it,
//! never two physically separate lists. Ownership is strict parent-owns-child:
//! no entity ever appears under two parents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::responsive::{ResponsiveSettings, ResponsiveValue};

/// Root of an editable checkout page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(flatten)]
    pub body: Body,
}

impl Document {
    pub fn full(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Body::Full { sections: vec![] },
        }
    }

    pub fn simplified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Body::Simplified { blocks: vec![] },
        }
    }
}

/// The mutable portion of a document. History snapshots clone this whole
/// value; the two modes share the same history/selection machinery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Body {
    Full { sections: Vec<Section> },
    Simplified { blocks: Vec<Block> },
}

/// Horizontal pane tag for simplified-mode blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    #[default]
    Left,
    Right,
}

impl Pane {
    pub fn toggled(self) -> Pane {
        match self {
            Pane::Left => Pane::Right,
            Pane::Right => Pane::Left,
        }
    }
}

/// Full-mode row of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: ResponsiveSettings,
    /// Per-breakpoint show/hide. Absent means visible everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ResponsiveValue<bool>>,
}

/// Full-mode column owning an ordered run of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    /// Grid span out of 12, per breakpoint.
    pub span: ResponsiveValue<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<ResponsiveValue<u8>>,
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: ResponsiveSettings,
}

/// CSS-ish style properties attached to a block.
pub type StyleSettings = BTreeMap<String, String>;

/// A content block. `visible: false` changes render treatment only — the
/// block stays in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(flatten)]
    pub data: BlockData,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: StyleSettings,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Pane tag, meaningful in simplified mode only.
    #[serde(default)]
    pub column: Pane,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<AnimationConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<InteractionConfig>,
}

fn default_visible() -> bool {
    true
}

impl Block {
    pub fn new(id: String, data: BlockData) -> Self {
        Self {
            id,
            data,
            styles: StyleSettings::new(),
            visible: true,
            column: Pane::default(),
            animations: vec![],
            interactions: vec![],
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.data.block_type()
    }
}

/// Block type tag, the key into the template registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Header,
    Text,
    Image,
    Button,
    ProductPanel,
    Testimonial,
    PaymentForm,
    Divider,
}

impl BlockType {
    pub const ALL: [BlockType; 8] = [
        BlockType::Header,
        BlockType::Text,
        BlockType::Image,
        BlockType::Button,
        BlockType::ProductPanel,
        BlockType::Testimonial,
        BlockType::PaymentForm,
        BlockType::Divider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Button => "button",
            BlockType::ProductPanel => "productPanel",
            BlockType::Testimonial => "testimonial",
            BlockType::PaymentForm => "paymentForm",
            BlockType::Divider => "divider",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific block payload, tagged by block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum BlockData {
    Header {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },
    Text {
        content: String,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
    Button {
        label: String,
        url: String,
    },
    ProductPanel {
        heading: String,
        #[serde(default)]
        show_price: bool,
        #[serde(default)]
        show_quantity: bool,
    },
    Testimonial {
        quote: String,
        author: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        avatar: Option<String>,
    },
    PaymentForm {
        button_label: String,
        #[serde(default)]
        show_billing_address: bool,
    },
    Divider {
        #[serde(default)]
        thickness: u8,
    },
}

impl BlockData {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockData::Header { .. } => BlockType::Header,
            BlockData::Text { .. } => BlockType::Text,
            BlockData::Image { .. } => BlockType::Image,
            BlockData::Button { .. } => BlockType::Button,
            BlockData::ProductPanel { .. } => BlockType::ProductPanel,
            BlockData::Testimonial { .. } => BlockType::Testimonial,
            BlockData::PaymentForm { .. } => BlockType::PaymentForm,
            BlockData::Divider { .. } => BlockType::Divider,
        }
    }
}

/// Entrance animation attached to a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub effect: String,
    #[serde(default)]
    pub duration_ms: u32,
    #[serde(default)]
    pub delay_ms: u32,
}

/// Host-interpreted interaction binding (e.g. click → scroll-to).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub trigger: String,
    pub action: String,
}

/// Where a block sits: flat master-order index, or a column plus index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockAddress {
    Flat { index: usize },
    InColumn { column_id: String, index: usize },
}

impl Body {
    /// Ids of every entity in the tree (sections, columns, blocks).
    pub fn entity_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        match self {
            Body::Full { sections } => {
                for section in sections {
                    ids.push(section.id.as_str());
                    for column in &section.columns {
                        ids.push(column.id.as_str());
                        for block in &column.blocks {
                            ids.push(block.id.as_str());
                        }
                    }
                }
            }
            Body::Simplified { blocks } => {
                for block in blocks {
                    ids.push(block.id.as_str());
                }
            }
        }
        ids
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entity_ids().iter().any(|e| *e == id)
    }

    /// All blocks in traversal order.
    pub fn iter_blocks(&self) -> Box<dyn Iterator<Item = &Block> + '_> {
        match self {
            Body::Full { sections } => Box::new(
                sections
                    .iter()
                    .flat_map(|s| s.columns.iter())
                    .flat_map(|c| c.blocks.iter()),
            ),
            Body::Simplified { blocks } => Box::new(blocks.iter()),
        }
    }

    pub fn iter_blocks_mut(&mut self) -> Box<dyn Iterator<Item = &mut Block> + '_> {
        match self {
            Body::Full { sections } => Box::new(
                sections
                    .iter_mut()
                    .flat_map(|s| s.columns.iter_mut())
                    .flat_map(|c| c.blocks.iter_mut()),
            ),
            Body::Simplified { blocks } => Box::new(blocks.iter_mut()),
        }
    }

    pub fn find_block(&self, id: &str) -> Option<&Block> {
        self.iter_blocks().find(|b| b.id == id)
    }

    pub fn find_block_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.iter_blocks_mut().find(|b| b.id == id)
    }

    pub fn find_section(&self, id: &str) -> Option<&Section> {
        match self {
            Body::Full { sections } => sections.iter().find(|s| s.id == id),
            Body::Simplified { .. } => None,
        }
    }

    pub fn find_section_mut(&mut self, id: &str) -> Option<&mut Section> {
        match self {
            Body::Full { sections } => sections.iter_mut().find(|s| s.id == id),
            Body::Simplified { .. } => None,
        }
    }

    pub fn find_column(&self, id: &str) -> Option<&Column> {
        match self {
            Body::Full { sections } => sections
                .iter()
                .flat_map(|s| s.columns.iter())
                .find(|c| c.id == id),
            Body::Simplified { .. } => None,
        }
    }

    pub fn find_column_mut(&mut self, id: &str) -> Option<&mut Column> {
        match self {
            Body::Full { sections } => sections
                .iter_mut()
                .flat_map(|s| s.columns.iter_mut())
                .find(|c| c.id == id),
            Body::Simplified { .. } => None,
        }
    }

    /// Address of a block within its owning container.
    pub fn address_of(&self, id: &str) -> Option<BlockAddress> {
        match self {
            Body::Full { sections } => {
                for section in sections {
                    for column in &section.columns {
                        if let Some(index) = column.blocks.iter().position(|b| b.id == id) {
                            return Some(BlockAddress::InColumn {
                                column_id: column.id.clone(),
                                index,
                            });
                        }
                    }
                }
                None
            }
            Body::Simplified { blocks } => blocks
                .iter()
                .position(|b| b.id == id)
                .map(|index| BlockAddress::Flat { index }),
        }
    }

    /// Detach a block from its parent, returning it and where it was.
    pub fn remove_block(&mut self, id: &str) -> Option<(Block, BlockAddress)> {
        let address = self.address_of(id)?;
        let block = match &address {
            BlockAddress::Flat { index } => match self {
                Body::Simplified { blocks } => blocks.remove(*index),
                Body::Full { .. } => unreachable!("flat address in full mode"),
            },
            BlockAddress::InColumn { column_id, index } => {
                let column = self.find_column_mut(column_id)?;
                column.blocks.remove(*index)
            }
        };
        Some((block, address))
    }

    /// Attach a block at an address. The index is clamped to the container
    /// length. Returns false (leaving the body untouched) if the addressed
    /// container no longer exists or belongs to the other mode.
    pub fn insert_block_at(&mut self, address: &BlockAddress, block: Block) -> bool {
        match address {
            BlockAddress::Flat { index } => match self {
                Body::Simplified { blocks } => {
                    let at = (*index).min(blocks.len());
                    blocks.insert(at, block);
                    true
                }
                Body::Full { .. } => false,
            },
            BlockAddress::InColumn { column_id, index } => {
                match self.find_column_mut(column_id) {
                    Some(column) => {
                        let at = (*index).min(column.blocks.len());
                        column.blocks.insert(at, block);
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str) -> Block {
        Block::new(
            id.to_string(),
            BlockData::Text {
                content: "hi".to_string(),
            },
        )
    }

    fn full_body() -> Body {
        Body::Full {
            sections: vec![Section {
                id: "s1".to_string(),
                name: "Hero".to_string(),
                columns: vec![
                    Column {
                        id: "c1".to_string(),
                        span: ResponsiveValue::of(6),
                        offset: None,
                        blocks: vec![block("b1"), block("b2")],
                        settings: ResponsiveSettings::new(),
                    },
                    Column {
                        id: "c2".to_string(),
                        span: ResponsiveValue::of(6),
                        offset: None,
                        blocks: vec![block("b3")],
                        settings: ResponsiveSettings::new(),
                    },
                ],
                settings: ResponsiveSettings::new(),
                visibility: None,
            }],
        }
    }

    #[test]
    fn test_entity_ids_cover_all_levels() {
        let body = full_body();
        let ids = body.entity_ids();
        assert_eq!(ids, vec!["s1", "c1", "b1", "b2", "c2", "b3"]);
    }

    #[test]
    fn test_address_and_remove_roundtrip() {
        let mut body = full_body();
        let (removed, address) = body.remove_block("b2").unwrap();
        assert_eq!(removed.id, "b2");
        assert_eq!(
            address,
            BlockAddress::InColumn {
                column_id: "c1".to_string(),
                index: 1
            }
        );
        assert!(!body.contains_id("b2"));

        assert!(body.insert_block_at(&address, removed));
        assert_eq!(
            body.find_column("c1").unwrap().blocks[1].id,
            "b2".to_string()
        );
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut body = Body::Simplified {
            blocks: vec![block("b1")],
        };
        let address = BlockAddress::Flat { index: 99 };
        assert!(body.insert_block_at(&address, block("b2")));
        match &body {
            Body::Simplified { blocks } => assert_eq!(blocks[1].id, "b2"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_insert_into_missing_column_fails() {
        let mut body = full_body();
        let address = BlockAddress::InColumn {
            column_id: "nope".to_string(),
            index: 0,
        };
        assert!(!body.insert_block_at(&address, block("bx")));
    }

    #[test]
    fn test_block_serialization_shape() {
        let b = block("b1");
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["data"]["content"], "hi");
        assert_eq!(json["visible"], true);
        assert_eq!(json["column"], "left");
    }

    #[test]
    fn test_block_deserialization_defaults() {
        let json = serde_json::json!({
            "id": "b9",
            "type": "divider",
            "data": {}
        });
        let b: Block = serde_json::from_value(json).unwrap();
        assert!(b.visible);
        assert_eq!(b.column, Pane::Left);
        assert_eq!(b.block_type(), BlockType::Divider);
    }
}
