//! # Builder Session
//!
//! One editing session over one document. The session is an explicit,
//! constructed object passed by reference to every caller (property panels,
//! keyboard handler, drag handler) — no ambient global state — which keeps
//! the engine instantiable and testable outside any UI framework.
//!
//! Every document change funnels through [`BuilderSession::apply`]:
//! snapshot-then-apply, atomic, synchronous. Selection is pruned in the same
//! transaction that deletes an entity. Recoverable mutation errors (stale
//! ids from UI callbacks after a delete, empty undo stacks, unresolved drop
//! targets) become silent no-ops here; an interactive editor must never
//! crash mid-gesture.

use tracing::debug;

use checkout_builder_model::{
    load_document, BlockAddress, BlockType, Body, Document, IdGenerator, TemplateRegistry,
};

use crate::clipboard::{
    regenerate_block_ids, regenerate_column_ids, regenerate_section_ids, Clipboard, ClipboardItem,
};
use crate::drag::{reconcile, DragState, DragTarget};
use crate::errors::EditorError;
use crate::mutations::{Applied, InsertTarget, Mutation};
use crate::selection::{SelectedKind, Selection};
use crate::undo_stack::UndoStack;

/// Editing session: document, history, selection, clipboard, drag state.
pub struct BuilderSession {
    document: Document,
    registry: TemplateRegistry,
    ids: IdGenerator,
    history: UndoStack,
    selection: Selection,
    clipboard: Clipboard,
    drag: DragState,
    /// Increments on every applied document change (including undo/redo).
    version: u64,
    /// Set on change, cleared by the host once a save succeeds.
    dirty: bool,
}

impl BuilderSession {
    pub fn new(document: Document, registry: TemplateRegistry) -> Self {
        Self::with_history_depth(document, registry, 100)
    }

    /// `max_levels = 0` leaves history unbounded.
    pub fn with_history_depth(
        document: Document,
        registry: TemplateRegistry,
        max_levels: usize,
    ) -> Self {
        let mut ids = IdGenerator::new(&document.name);
        {
            let existing = document.body.entity_ids();
            ids.skip_past(existing.iter().copied());
        }

        Self {
            document,
            registry,
            ids,
            history: UndoStack::with_max_levels(max_levels),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            drag: DragState::new(),
            version: 0,
            dirty: false,
        }
    }

    /// Build a session from a persisted payload (current or legacy shape).
    pub fn from_payload(
        payload: serde_json::Value,
        registry: TemplateRegistry,
    ) -> Result<Self, EditorError> {
        let document = load_document(payload, &registry)?;
        Ok(Self::new(document, registry))
    }

    // ----- mutation surface -------------------------------------------------

    /// Snapshot-then-apply. The pre-mutation body goes onto the undo stack
    /// only when the document actually changed; errors and no-ops leave the
    /// document, history, and version untouched.
    pub fn apply(&mut self, mutation: Mutation) -> Applied {
        let snapshot = self.document.body.clone();
        match mutation.apply(&mut self.document.body, &self.registry, &mut self.ids) {
            Ok(Applied::Changed) => {
                self.history.record(snapshot);
                self.version += 1;
                self.dirty = true;
                self.selection.prune(&self.document.body);
                Applied::Changed
            }
            Ok(Applied::Unchanged) => Applied::Unchanged,
            Err(err) => {
                debug!(%err, "mutation ignored");
                // Applies check before touching the body, but restoring the
                // snapshot keeps the atomicity guarantee independent of that.
                self.document.body = snapshot;
                Applied::Unchanged
            }
        }
    }

    /// Convenience for the block picker.
    pub fn add_block(&mut self, target: InsertTarget, block_type: BlockType) -> Applied {
        self.apply(Mutation::AddBlock { target, block_type })
    }

    // ----- history ----------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        if self.history.undo(&mut self.document.body) {
            self.version += 1;
            self.dirty = true;
            self.selection.prune(&self.document.body);
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history.redo(&mut self.document.body) {
            self.version += 1;
            self.dirty = true;
            self.selection.prune(&self.document.body);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ----- selection --------------------------------------------------------

    /// Select an entity. No-op when the id does not exist at that level.
    pub fn select(&mut self, id: &str, kind: SelectedKind) {
        let exists = match kind {
            SelectedKind::Block => self.document.body.find_block(id).is_some(),
            SelectedKind::Column => self.document.body.find_column(id).is_some(),
            SelectedKind::Section => self.document.body.find_section(id).is_some(),
        };
        if exists {
            self.selection.select(id, kind);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Delete whatever is selected (keyboard Delete binding).
    pub fn delete_selected(&mut self) -> Applied {
        let Some((id, kind)) = self
            .selection
            .single()
            .map(|(id, kind)| (id.to_string(), kind))
        else {
            return Applied::Unchanged;
        };
        let mutation = match kind {
            SelectedKind::Block => Mutation::DeleteBlock { id },
            SelectedKind::Column => Mutation::DeleteColumn { id },
            SelectedKind::Section => Mutation::DeleteSection { id },
        };
        self.apply(mutation)
    }

    // ----- clipboard --------------------------------------------------------

    /// Copy the selected subtree into the clipboard slot. Returns false when
    /// nothing (or nothing copyable) is selected.
    pub fn copy(&mut self) -> bool {
        let Some((id, kind)) = self.selection.single() else {
            return false;
        };
        let item = match kind {
            SelectedKind::Block => {
                let Some(block) = self.document.body.find_block(id) else {
                    return false;
                };
                let Some(source) = self.document.body.address_of(id) else {
                    return false;
                };
                ClipboardItem::Block {
                    block: block.clone(),
                    source,
                }
            }
            SelectedKind::Column => {
                let Some((section_id, index)) = column_position(&self.document.body, id) else {
                    return false;
                };
                let Some(column) = self.document.body.find_column(id) else {
                    return false;
                };
                ClipboardItem::Column {
                    column: column.clone(),
                    section_id,
                    index,
                }
            }
            SelectedKind::Section => {
                let Body::Full { sections } = &self.document.body else {
                    return false;
                };
                let Some(index) = sections.iter().position(|s| s.id == id) else {
                    return false;
                };
                ClipboardItem::Section {
                    section: sections[index].clone(),
                    index,
                }
            }
        };
        self.clipboard.put(item);
        true
    }

    /// Paste the clipboard slot: fresh ids throughout the copy, inserted
    /// immediately after the original position when it still exists, else at
    /// the end of its original container. Selects the pasted root. The slot
    /// survives so a host can paste repeatedly.
    pub fn paste(&mut self) -> Applied {
        let Some(item) = self.clipboard.peek().cloned() else {
            return Applied::Unchanged;
        };

        match item {
            ClipboardItem::Block { block, source } => {
                let original_id = block.id.clone();
                let mut fresh = block;
                let new_id = regenerate_block_ids(&mut fresh, &mut self.ids);

                let address = match self.document.body.address_of(&original_id) {
                    Some(BlockAddress::Flat { index }) => BlockAddress::Flat { index: index + 1 },
                    Some(BlockAddress::InColumn { column_id, index }) => BlockAddress::InColumn {
                        column_id,
                        index: index + 1,
                    },
                    None => match &source {
                        BlockAddress::Flat { .. } => match &self.document.body {
                            Body::Simplified { blocks } => BlockAddress::Flat {
                                index: blocks.len(),
                            },
                            Body::Full { .. } => return Applied::Unchanged,
                        },
                        BlockAddress::InColumn { column_id, .. } => {
                            match self.document.body.find_column(column_id) {
                                Some(column) => BlockAddress::InColumn {
                                    column_id: column_id.clone(),
                                    index: column.blocks.len(),
                                },
                                None => return Applied::Unchanged,
                            }
                        }
                    },
                };

                let applied = self.apply(Mutation::PasteBlock {
                    block: fresh,
                    address,
                });
                if applied.is_changed() {
                    self.selection.select(new_id, SelectedKind::Block);
                }
                applied
            }
            ClipboardItem::Column {
                column,
                section_id: source_section,
                index: _,
            } => {
                let original_id = column.id.clone();
                let (section_id, index) = match column_position(&self.document.body, &original_id)
                {
                    Some((section_id, index)) => (section_id, index + 1),
                    None => match self.document.body.find_section(&source_section) {
                        Some(section) => (source_section, section.columns.len()),
                        None => return Applied::Unchanged,
                    },
                };

                let mut fresh = column;
                let new_id = regenerate_column_ids(&mut fresh, &mut self.ids);
                let applied = self.apply(Mutation::PasteColumn {
                    column: fresh,
                    section_id,
                    index,
                });
                if applied.is_changed() {
                    self.selection.select(new_id, SelectedKind::Column);
                }
                applied
            }
            ClipboardItem::Section { section, index: _ } => {
                let original_id = section.id.clone();
                let index = match &self.document.body {
                    Body::Full { sections } => sections
                        .iter()
                        .position(|s| s.id == original_id)
                        .map(|i| i + 1)
                        .unwrap_or(sections.len()),
                    Body::Simplified { .. } => return Applied::Unchanged,
                };

                let mut fresh = section;
                let new_id = regenerate_section_ids(&mut fresh, &mut self.ids);
                let applied = self.apply(Mutation::PasteSection {
                    section: fresh,
                    index,
                });
                if applied.is_changed() {
                    self.selection.select(new_id, SelectedKind::Section);
                }
                applied
            }
        }
    }

    pub fn has_clipboard(&self) -> bool {
        !self.clipboard.is_empty()
    }

    // ----- drag -------------------------------------------------------------

    pub fn drag_start(&mut self, active_id: &str) {
        self.drag.start(active_id);
    }

    /// Informational only — highlighting lives in the host renderer.
    pub fn drag_over(&mut self, _over: Option<&DragTarget>) {}

    /// Resolve a drop. Dropping outside any target, or onto itself, clears
    /// the gesture and changes nothing.
    pub fn drag_end(&mut self, active_id: &str, over: Option<DragTarget>) -> Applied {
        self.drag.clear();
        match reconcile(active_id, over.as_ref()) {
            Some(mutation) => self.apply(mutation),
            None => Applied::Unchanged,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ----- host save contract ----------------------------------------------

    /// The current document snapshot, read on demand by the host autosave.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Persistable JSON form of the current document.
    pub fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.document)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the host after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }
}

/// Section owning a column, plus the column's index in it.
fn column_position(body: &Body, column_id: &str) -> Option<(String, usize)> {
    match body {
        Body::Full { sections } => sections.iter().find_map(|section| {
            section
                .columns
                .iter()
                .position(|c| c.id == column_id)
                .map(|index| (section.id.clone(), index))
        }),
        Body::Simplified { .. } => None,
    }
}
