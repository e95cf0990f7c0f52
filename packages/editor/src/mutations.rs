//! # Document Mutations
//!
//! High-level semantic operations on builder documents.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents one user-visible edit
//! 2. **Validated**: Structural constraints are checked before any change
//! 3. **Atomic**: A failed apply leaves the document exactly as it was
//! 4. **No-op aware**: Applies report whether the document actually changed,
//!    so identity moves and bounds hits never push history
//!
//! ## Mutation Semantics
//!
//! ### Move / drag
//! - Remove-then-insert within the owning container
//! - Cross-container drags reassign the container first, then reposition
//! - Bounds hits are no-ops (not cyclic)
//!
//! ### Delete
//! - Removes the entity and all descendants
//! - Selection cleanup happens in the session, same transaction
//!
//! ### Reorder (simplified mode)
//! - Operates on the single flat master order; the left/right panes are a
//!   filter over that order, so retagging a pane never repositions a block

use serde::{Deserialize, Serialize};
use thiserror::Error;

use checkout_builder_model::{
    Block, BlockAddress, BlockData, BlockType, Body, Column, IdGenerator, Pane,
    ResponsiveSettings, ResponsiveValue, Section, StyleSettings, TemplateRegistry,
};

/// Where `AddBlock` appends: the flat document (simplified mode) or a
/// specific column (full mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertTarget {
    Document,
    Column(String),
}

/// Sibling-swap direction for `MoveBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Semantic mutations (intent-preserving operations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    /// Append a new block built from the registry default for `block_type`.
    /// Unknown type: no-op.
    AddBlock {
        target: InsertTarget,
        block_type: BlockType,
    },

    /// Replace the data payload and/or shallow-merge style properties.
    UpdateBlock {
        id: String,
        data: Option<BlockData>,
        styles: Option<StyleSettings>,
    },

    /// Remove a block.
    DeleteBlock { id: String },

    /// Remove a column and its blocks (full mode).
    DeleteColumn { id: String },

    /// Remove a section and its whole subtree (full mode).
    DeleteSection { id: String },

    /// Insert a structural copy immediately after the original, fresh ids
    /// throughout the copy.
    DuplicateBlock { id: String },

    /// Swap with the immediate sibling in the same container.
    MoveBlock {
        id: String,
        direction: MoveDirection,
    },

    /// Remove-then-insert within the flat master order (simplified mode).
    ReorderBlocks { from: usize, to: usize },

    /// Flip a block's pane tag (simplified mode). Master order unchanged.
    ToggleBlockColumn { id: String },

    /// Set a block's pane tag (simplified mode, container drop zones).
    /// Master order unchanged.
    AssignBlockColumn { id: String, pane: Pane },

    /// Flip render visibility. Never removes the block from the tree.
    ToggleBlockVisibility { id: String },

    /// Drag reconciliation: reassign container if it differs, then move to
    /// the target block's index.
    MoveBlockTo { id: String, over_id: String },

    /// Move a block to the end of another column (full-mode drop zone).
    MoveBlockToColumn { id: String, column_id: String },

    /// Append a section (full mode).
    AddSection { section: Section },

    /// Update section fields; `settings` shallow-merges.
    UpdateSection {
        id: String,
        name: Option<String>,
        settings: Option<ResponsiveSettings>,
        visibility: Option<ResponsiveValue<bool>>,
    },

    /// Update column fields; `settings` shallow-merges.
    UpdateColumn {
        id: String,
        span: Option<ResponsiveValue<u8>>,
        offset: Option<ResponsiveValue<u8>>,
        settings: Option<ResponsiveSettings>,
    },

    /// Append an already-built block to a column (full mode).
    AddBlockToColumn { column_id: String, block: Block },

    /// Clipboard insertion. The block arrives with freshly generated ids.
    PasteBlock {
        block: Block,
        address: BlockAddress,
    },

    /// Clipboard insertion of a column into a section (full mode).
    PasteColumn {
        column: Column,
        section_id: String,
        index: usize,
    },

    /// Clipboard insertion of a section (full mode).
    PasteSection { section: Section, index: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Operation requires simplified mode")]
    RequiresSimplifiedMode,

    #[error("Operation requires full mode")]
    RequiresFullMode,
}

/// Whether an apply changed the document. `Unchanged` applies never push a
/// history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Unchanged,
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Applied::Changed)
    }
}

impl Mutation {
    /// Apply this mutation to a document body.
    ///
    /// Checks run before any modification, so an `Err` means the body was not
    /// touched.
    pub fn apply(
        &self,
        body: &mut Body,
        registry: &TemplateRegistry,
        ids: &mut IdGenerator,
    ) -> Result<Applied, MutationError> {
        match self {
            Mutation::AddBlock { target, block_type } => {
                Self::apply_add_block(body, registry, ids, target, *block_type)
            }
            Mutation::UpdateBlock { id, data, styles } => {
                Self::apply_update_block(body, id, data.as_ref(), styles.as_ref())
            }
            Mutation::DeleteBlock { id } => Self::apply_delete_block(body, id),
            Mutation::DeleteColumn { id } => Self::apply_delete_column(body, id),
            Mutation::DeleteSection { id } => Self::apply_delete_section(body, id),
            Mutation::DuplicateBlock { id } => Self::apply_duplicate_block(body, ids, id),
            Mutation::MoveBlock { id, direction } => Self::apply_move_block(body, id, *direction),
            Mutation::ReorderBlocks { from, to } => Self::apply_reorder(body, *from, *to),
            Mutation::ToggleBlockColumn { id } => {
                let pane = Self::require_flat_block(body, id)?.column.toggled();
                Self::apply_assign_column(body, id, pane)
            }
            Mutation::AssignBlockColumn { id, pane } => Self::apply_assign_column(body, id, *pane),
            Mutation::ToggleBlockVisibility { id } => {
                let block = body
                    .find_block_mut(id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
                block.visible = !block.visible;
                Ok(Applied::Changed)
            }
            Mutation::MoveBlockTo { id, over_id } => Self::apply_move_to(body, id, over_id),
            Mutation::MoveBlockToColumn { id, column_id } => {
                Self::apply_move_to_column(body, id, column_id)
            }
            Mutation::AddSection { section } => Self::apply_add_section(body, section),
            Mutation::UpdateSection {
                id,
                name,
                settings,
                visibility,
            } => Self::apply_update_section(body, id, name, settings, visibility),
            Mutation::UpdateColumn {
                id,
                span,
                offset,
                settings,
            } => Self::apply_update_column(body, id, span, offset, settings),
            Mutation::AddBlockToColumn { column_id, block } => {
                let column = body
                    .find_column_mut(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                column.blocks.push(block.clone());
                Ok(Applied::Changed)
            }
            Mutation::PasteBlock { block, address } => {
                if body.insert_block_at(address, block.clone()) {
                    Ok(Applied::Changed)
                } else {
                    Err(MutationError::ColumnNotFound(match address {
                        BlockAddress::InColumn { column_id, .. } => column_id.clone(),
                        BlockAddress::Flat { .. } => "<flat>".to_string(),
                    }))
                }
            }
            Mutation::PasteColumn {
                column,
                section_id,
                index,
            } => {
                let section = body
                    .find_section_mut(section_id)
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.clone()))?;
                let at = (*index).min(section.columns.len());
                section.columns.insert(at, column.clone());
                Ok(Applied::Changed)
            }
            Mutation::PasteSection { section, index } => match body {
                Body::Full { sections } => {
                    let at = (*index).min(sections.len());
                    sections.insert(at, section.clone());
                    Ok(Applied::Changed)
                }
                Body::Simplified { .. } => Err(MutationError::RequiresFullMode),
            },
        }
    }

    fn apply_add_block(
        body: &mut Body,
        registry: &TemplateRegistry,
        ids: &mut IdGenerator,
        target: &InsertTarget,
        block_type: BlockType,
    ) -> Result<Applied, MutationError> {
        // Unknown type is a silent no-op, not an error: the host block picker
        // may lag behind a trimmed registry.
        let Some(data) = registry.default_data(block_type) else {
            return Ok(Applied::Unchanged);
        };
        let block = Block::new(ids.next_id(), data);

        match target {
            InsertTarget::Document => match body {
                Body::Simplified { blocks } => {
                    blocks.push(block);
                    Ok(Applied::Changed)
                }
                Body::Full { .. } => Err(MutationError::RequiresSimplifiedMode),
            },
            InsertTarget::Column(column_id) => {
                let column = body
                    .find_column_mut(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                column.blocks.push(block);
                Ok(Applied::Changed)
            }
        }
    }

    fn apply_update_block(
        body: &mut Body,
        id: &str,
        data: Option<&BlockData>,
        styles: Option<&StyleSettings>,
    ) -> Result<Applied, MutationError> {
        let block = body
            .find_block_mut(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))?;

        if data.is_none() && styles.is_none() {
            return Ok(Applied::Unchanged);
        }
        if let Some(data) = data {
            block.data = data.clone();
        }
        if let Some(styles) = styles {
            for (property, value) in styles {
                block.styles.insert(property.clone(), value.clone());
            }
        }
        Ok(Applied::Changed)
    }

    fn apply_delete_block(body: &mut Body, id: &str) -> Result<Applied, MutationError> {
        body.remove_block(id)
            .map(|_| Applied::Changed)
            .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))
    }

    fn apply_delete_column(body: &mut Body, id: &str) -> Result<Applied, MutationError> {
        match body {
            Body::Full { sections } => {
                for section in sections.iter_mut() {
                    if let Some(pos) = section.columns.iter().position(|c| c.id == id) {
                        section.columns.remove(pos);
                        return Ok(Applied::Changed);
                    }
                }
                Err(MutationError::ColumnNotFound(id.to_string()))
            }
            Body::Simplified { .. } => Err(MutationError::RequiresFullMode),
        }
    }

    fn apply_delete_section(body: &mut Body, id: &str) -> Result<Applied, MutationError> {
        match body {
            Body::Full { sections } => {
                if let Some(pos) = sections.iter().position(|s| s.id == id) {
                    sections.remove(pos);
                    Ok(Applied::Changed)
                } else {
                    Err(MutationError::SectionNotFound(id.to_string()))
                }
            }
            Body::Simplified { .. } => Err(MutationError::RequiresFullMode),
        }
    }

    fn apply_duplicate_block(
        body: &mut Body,
        ids: &mut IdGenerator,
        id: &str,
    ) -> Result<Applied, MutationError> {
        let address = body
            .address_of(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))?;
        let mut copy = body
            .find_block(id)
            .expect("address_of found the block")
            .clone();
        copy.id = ids.next_id();

        let after = match address {
            BlockAddress::Flat { index } => BlockAddress::Flat { index: index + 1 },
            BlockAddress::InColumn { column_id, index } => BlockAddress::InColumn {
                column_id,
                index: index + 1,
            },
        };
        body.insert_block_at(&after, copy);
        Ok(Applied::Changed)
    }

    fn apply_move_block(
        body: &mut Body,
        id: &str,
        direction: MoveDirection,
    ) -> Result<Applied, MutationError> {
        match body {
            Body::Simplified { blocks } => {
                let pos = blocks
                    .iter()
                    .position(|b| b.id == id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))?;
                let pane = blocks[pos].column;
                // The visual column is the pane filter over the master order,
                // so the sibling is the nearest block with the same tag.
                let sibling = match direction {
                    MoveDirection::Up => blocks[..pos]
                        .iter()
                        .rposition(|b| b.column == pane),
                    MoveDirection::Down => blocks[pos + 1..]
                        .iter()
                        .position(|b| b.column == pane)
                        .map(|offset| pos + 1 + offset),
                };
                match sibling {
                    Some(other) => {
                        blocks.swap(pos, other);
                        Ok(Applied::Changed)
                    }
                    None => Ok(Applied::Unchanged),
                }
            }
            Body::Full { .. } => {
                let address = body
                    .address_of(id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))?;
                let BlockAddress::InColumn { column_id, index } = address else {
                    return Err(MutationError::BlockNotFound(id.to_string()));
                };
                let column = body
                    .find_column_mut(&column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                match direction {
                    MoveDirection::Up if index > 0 => {
                        column.blocks.swap(index, index - 1);
                        Ok(Applied::Changed)
                    }
                    MoveDirection::Down if index + 1 < column.blocks.len() => {
                        column.blocks.swap(index, index + 1);
                        Ok(Applied::Changed)
                    }
                    _ => Ok(Applied::Unchanged),
                }
            }
        }
    }

    fn apply_reorder(body: &mut Body, from: usize, to: usize) -> Result<Applied, MutationError> {
        match body {
            Body::Simplified { blocks } => {
                if from == to || from >= blocks.len() {
                    return Ok(Applied::Unchanged);
                }
                let block = blocks.remove(from);
                let at = to.min(blocks.len());
                blocks.insert(at, block);
                Ok(Applied::Changed)
            }
            Body::Full { .. } => Err(MutationError::RequiresSimplifiedMode),
        }
    }

    fn require_flat_block<'a>(body: &'a Body, id: &str) -> Result<&'a Block, MutationError> {
        match body {
            Body::Simplified { blocks } => blocks
                .iter()
                .find(|b| b.id == id)
                .ok_or_else(|| MutationError::BlockNotFound(id.to_string())),
            Body::Full { .. } => Err(MutationError::RequiresSimplifiedMode),
        }
    }

    fn apply_assign_column(body: &mut Body, id: &str, pane: Pane) -> Result<Applied, MutationError> {
        match body {
            Body::Simplified { blocks } => {
                let block = blocks
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))?;
                if block.column == pane {
                    return Ok(Applied::Unchanged);
                }
                block.column = pane;
                Ok(Applied::Changed)
            }
            Body::Full { .. } => Err(MutationError::RequiresSimplifiedMode),
        }
    }

    fn apply_move_to(body: &mut Body, id: &str, over_id: &str) -> Result<Applied, MutationError> {
        if id == over_id {
            return Ok(Applied::Unchanged);
        }
        if body.address_of(over_id).is_none() {
            return Err(MutationError::BlockNotFound(over_id.to_string()));
        }

        let (mut block, _) = body
            .remove_block(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))?;

        // Target index is computed after removal so the insert lands
        // immediately before the target block.
        let over = body
            .address_of(over_id)
            .expect("target checked before removal");
        match &over {
            BlockAddress::Flat { .. } => {
                let pane = body
                    .find_block(over_id)
                    .map(|b| b.column)
                    .unwrap_or(block.column);
                block.column = pane;
            }
            BlockAddress::InColumn { .. } => {}
        }
        body.insert_block_at(&over, block);
        Ok(Applied::Changed)
    }

    fn apply_move_to_column(
        body: &mut Body,
        id: &str,
        column_id: &str,
    ) -> Result<Applied, MutationError> {
        if body.find_column(column_id).is_none() {
            return Err(MutationError::ColumnNotFound(column_id.to_string()));
        }
        match body.address_of(id) {
            Some(BlockAddress::InColumn {
                column_id: current, ..
            }) if current == column_id => Ok(Applied::Unchanged),
            Some(_) => {
                let (block, _) = body.remove_block(id).expect("address_of found the block");
                let column = body
                    .find_column_mut(column_id)
                    .expect("target column checked before removal");
                column.blocks.push(block);
                Ok(Applied::Changed)
            }
            None => Err(MutationError::BlockNotFound(id.to_string())),
        }
    }

    fn apply_add_section(body: &mut Body, section: &Section) -> Result<Applied, MutationError> {
        match body {
            Body::Full { sections } => {
                sections.push(section.clone());
                Ok(Applied::Changed)
            }
            Body::Simplified { .. } => Err(MutationError::RequiresFullMode),
        }
    }

    fn apply_update_section(
        body: &mut Body,
        id: &str,
        name: &Option<String>,
        settings: &Option<ResponsiveSettings>,
        visibility: &Option<ResponsiveValue<bool>>,
    ) -> Result<Applied, MutationError> {
        let section = body
            .find_section_mut(id)
            .ok_or_else(|| MutationError::SectionNotFound(id.to_string()))?;

        if name.is_none() && settings.is_none() && visibility.is_none() {
            return Ok(Applied::Unchanged);
        }
        if let Some(name) = name {
            section.name = name.clone();
        }
        if let Some(settings) = settings {
            for (property, value) in settings {
                section.settings.insert(property.clone(), value.clone());
            }
        }
        if let Some(visibility) = visibility {
            section.visibility = Some(visibility.clone());
        }
        Ok(Applied::Changed)
    }

    fn apply_update_column(
        body: &mut Body,
        id: &str,
        span: &Option<ResponsiveValue<u8>>,
        offset: &Option<ResponsiveValue<u8>>,
        settings: &Option<ResponsiveSettings>,
    ) -> Result<Applied, MutationError> {
        let column = body
            .find_column_mut(id)
            .ok_or_else(|| MutationError::ColumnNotFound(id.to_string()))?;

        if span.is_none() && offset.is_none() && settings.is_none() {
            return Ok(Applied::Unchanged);
        }
        if let Some(span) = span {
            column.span = span.clone();
        }
        if let Some(offset) = offset {
            column.offset = Some(offset.clone());
        }
        if let Some(settings) = settings {
            for (property, value) in settings {
                column.settings.insert(property.clone(), value.clone());
            }
        }
        Ok(Applied::Changed)
    }
}
