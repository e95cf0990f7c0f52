//! Drag reconciliation.
//!
//! The host resolves pointer geometry (nearest-center collision detection)
//! and hands the reconciler resolved targets only. `drag_over` is purely
//! visual; the model changes exactly once, at `drag_end`, through the
//! mutation API — so a whole gesture is one history entry.

use serde::{Deserialize, Serialize};

use checkout_builder_model::Pane;

use crate::mutations::Mutation;

/// A resolved drop target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DragTarget {
    /// Designated pane drop zone (simplified mode).
    Zone(Pane),
    /// Designated column drop zone (full mode).
    Column(String),
    /// Another block at the same level.
    Block(String),
}

/// Transient drag-gesture state. Never part of history.
#[derive(Debug, Default)]
pub struct DragState {
    active: Option<String>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, active_id: impl Into<String>) {
        self.active = Some(active_id.into());
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Translate a drag-end into a mutation. `None` means the gesture resolves
/// to nothing (dropped outside any target, or onto itself).
pub fn reconcile(active_id: &str, over: Option<&DragTarget>) -> Option<Mutation> {
    match over? {
        DragTarget::Zone(pane) => Some(Mutation::AssignBlockColumn {
            id: active_id.to_string(),
            pane: *pane,
        }),
        DragTarget::Column(column_id) => Some(Mutation::MoveBlockToColumn {
            id: active_id.to_string(),
            column_id: column_id.clone(),
        }),
        DragTarget::Block(over_id) if over_id != active_id => Some(Mutation::MoveBlockTo {
            id: active_id.to_string(),
            over_id: over_id.clone(),
        }),
        DragTarget::Block(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_outside_is_noop() {
        assert_eq!(reconcile("b1", None), None);
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let target = DragTarget::Block("b1".to_string());
        assert_eq!(reconcile("b1", Some(&target)), None);
    }

    #[test]
    fn test_zone_target_assigns_pane() {
        let target = DragTarget::Zone(Pane::Right);
        assert_eq!(
            reconcile("b1", Some(&target)),
            Some(Mutation::AssignBlockColumn {
                id: "b1".to_string(),
                pane: Pane::Right,
            })
        );
    }

    #[test]
    fn test_block_target_moves_over() {
        let target = DragTarget::Block("b2".to_string());
        assert_eq!(
            reconcile("b1", Some(&target)),
            Some(Mutation::MoveBlockTo {
                id: "b1".to_string(),
                over_id: "b2".to_string(),
            })
        );
    }
}
