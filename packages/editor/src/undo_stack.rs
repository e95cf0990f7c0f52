//! # Undo/Redo Stack
//!
//! Snapshot history for the builder document.
//!
//! ## Design
//!
//! - Each document-changing mutation records the *pre-mutation* body
//! - Undo swaps the live body with the most recent past snapshot
//! - Redo swaps it back
//! - Recording after an undo discards the redo branch
//! - Snapshots are full clones; nothing ever mutates a stored snapshot
//!
//! Selection and drag state are ephemeral and never part of a snapshot.

use checkout_builder_model::Body;

/// Undo/redo stack of document body snapshots.
#[derive(Debug)]
pub struct UndoStack {
    /// Older → newer pre-mutation snapshots.
    past: Vec<Body>,
    /// Nearer → farther undone states (most recent last).
    future: Vec<Body>,
    /// Maximum number of undo levels (0 = unbounded).
    max_levels: usize,
}

impl UndoStack {
    /// Default depth of 100 levels.
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_levels,
        }
    }

    /// Record the pre-mutation body. Clears the redo branch.
    pub fn record(&mut self, snapshot: Body) {
        self.past.push(snapshot);
        if self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.remove(0);
        }
        self.future.clear();
    }

    /// Swap the live body with the most recent past snapshot.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, live: &mut Body) -> bool {
        match self.past.pop() {
            Some(snapshot) => {
                self.future.push(std::mem::replace(live, snapshot));
                true
            }
            None => false,
        }
    }

    /// Swap the live body with the most recently undone snapshot.
    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self, live: &mut Body) -> bool {
        match self.future.pop() {
            Some(snapshot) => {
                self.past.push(std::mem::replace(live, snapshot));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_builder_model::{Block, BlockData};

    fn body_with(ids: &[&str]) -> Body {
        Body::Simplified {
            blocks: ids
                .iter()
                .map(|id| {
                    Block::new(
                        id.to_string(),
                        BlockData::Text {
                            content: String::new(),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_stack_noops() {
        let mut stack = UndoStack::new();
        let mut live = body_with(&["a"]);

        assert!(!stack.undo(&mut live));
        assert!(!stack.redo(&mut live));
        assert_eq!(live, body_with(&["a"]));
    }

    #[test]
    fn test_undo_redo_inverse_law() {
        let mut stack = UndoStack::new();
        let before = body_with(&["a"]);
        let after = body_with(&["a", "b"]);

        let mut live = after.clone();
        stack.record(before.clone());

        assert!(stack.undo(&mut live));
        assert_eq!(live, before);

        assert!(stack.redo(&mut live));
        assert_eq!(live, after);
    }

    #[test]
    fn test_record_discards_redo_branch() {
        let mut stack = UndoStack::new();
        let mut live = body_with(&["a", "b"]);

        stack.record(body_with(&["a"]));
        stack.undo(&mut live);
        assert!(stack.can_redo());

        // A fresh edit after undo forfeits the undone future.
        stack.record(live.clone());
        assert!(!stack.can_redo());
        assert!(!stack.redo(&mut live));
    }

    #[test]
    fn test_max_levels_evicts_oldest() {
        let mut stack = UndoStack::with_max_levels(2);
        stack.record(body_with(&["one"]));
        stack.record(body_with(&["two"]));
        stack.record(body_with(&["three"]));

        assert_eq!(stack.undo_levels(), 2);

        let mut live = body_with(&["live"]);
        stack.undo(&mut live);
        stack.undo(&mut live);
        // The "one" snapshot was evicted.
        assert!(!stack.can_undo());
        assert_eq!(live, body_with(&["two"]));
    }

    #[test]
    fn test_snapshots_immutable_under_live_edits() {
        let mut stack = UndoStack::new();
        let before = body_with(&["a"]);
        let mut live = before.clone();

        stack.record(live.clone());
        if let Body::Simplified { blocks } = &mut live {
            blocks.push(Block::new(
                "b".to_string(),
                BlockData::Text {
                    content: String::new(),
                },
            ));
        }

        stack.undo(&mut live);
        assert_eq!(live, before);
    }
}
