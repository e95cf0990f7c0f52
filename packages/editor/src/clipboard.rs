//! Single-slot clipboard.
//!
//! `copy` captures a deep copy of the selected subtree, keeping the original
//! ids and remembering where it came from. Ids are regenerated only at paste
//! time, for the root and every descendant, so repeated pastes of the same
//! slot each produce a distinct subtree.

use checkout_builder_model::{Block, BlockAddress, Column, IdGenerator, Section};

/// One copied subtree plus where it was copied from.
#[derive(Debug, Clone)]
pub enum ClipboardItem {
    Block {
        block: Block,
        source: BlockAddress,
    },
    Column {
        column: Column,
        section_id: String,
        index: usize,
    },
    Section {
        section: Section,
        index: usize,
    },
}

/// Single-slot clipboard; a copy overwrites any previous slot.
#[derive(Debug, Default)]
pub struct Clipboard {
    slot: Option<ClipboardItem>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, item: ClipboardItem) {
        self.slot = Some(item);
    }

    pub fn peek(&self) -> Option<&ClipboardItem> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Give a copied block a fresh id. Returns the new root id.
pub fn regenerate_block_ids(block: &mut Block, ids: &mut IdGenerator) -> String {
    block.id = ids.next_id();
    block.id.clone()
}

/// Fresh ids for a copied column and every block it owns, preserving block
/// order. Returns the new root id.
pub fn regenerate_column_ids(column: &mut Column, ids: &mut IdGenerator) -> String {
    column.id = ids.next_id();
    for block in &mut column.blocks {
        regenerate_block_ids(block, ids);
    }
    column.id.clone()
}

/// Fresh ids for a copied section and its whole subtree. Returns the new
/// root id.
pub fn regenerate_section_ids(section: &mut Section, ids: &mut IdGenerator) -> String {
    section.id = ids.next_id();
    for column in &mut section.columns {
        regenerate_column_ids(column, ids);
    }
    section.id.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_builder_model::{BlockData, ResponsiveSettings, ResponsiveValue};

    fn column_with_blocks() -> Column {
        Column {
            id: "c1".to_string(),
            span: ResponsiveValue::of(6),
            offset: None,
            blocks: vec![
                Block::new(
                    "b1".to_string(),
                    BlockData::Text {
                        content: "one".to_string(),
                    },
                ),
                Block::new(
                    "b2".to_string(),
                    BlockData::Text {
                        content: "two".to_string(),
                    },
                ),
            ],
            settings: ResponsiveSettings::new(),
        }
    }

    #[test]
    fn test_copy_overwrites_slot() {
        let mut clipboard = Clipboard::new();
        let block = Block::new(
            "b1".to_string(),
            BlockData::Text {
                content: String::new(),
            },
        );
        clipboard.put(ClipboardItem::Block {
            block: block.clone(),
            source: BlockAddress::Flat { index: 0 },
        });
        clipboard.put(ClipboardItem::Block {
            block: Block::new("b2".to_string(), block.data.clone()),
            source: BlockAddress::Flat { index: 1 },
        });

        match clipboard.peek() {
            Some(ClipboardItem::Block { block, .. }) => assert_eq!(block.id, "b2"),
            _ => panic!("expected block slot"),
        }
    }

    #[test]
    fn test_regenerate_preserves_structure() {
        let mut ids = IdGenerator::new("page");
        let mut column = column_with_blocks();
        let contents_before: Vec<BlockData> = column.blocks.iter().map(|b| b.data.clone()).collect();

        let root = regenerate_column_ids(&mut column, &mut ids);

        assert_eq!(root, column.id);
        assert_ne!(column.id, "c1");
        let contents_after: Vec<BlockData> = column.blocks.iter().map(|b| b.data.clone()).collect();
        assert_eq!(contents_before, contents_after);

        let mut all_ids: Vec<&str> = column.blocks.iter().map(|b| b.id.as_str()).collect();
        all_ids.push(column.id.as_str());
        let mut deduped = all_ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(all_ids.len(), deduped.len());
        assert!(!all_ids.contains(&"b1"));
        assert!(!all_ids.contains(&"b2"));
    }

    #[test]
    fn test_repeated_regeneration_gives_distinct_ids() {
        let mut ids = IdGenerator::new("page");
        let original = column_with_blocks();

        let mut first = original.clone();
        let mut second = original.clone();
        regenerate_column_ids(&mut first, &mut ids);
        regenerate_column_ids(&mut second, &mut ids);

        assert_ne!(first.id, second.id);
        assert_ne!(first.blocks[0].id, second.blocks[0].id);
    }
}
