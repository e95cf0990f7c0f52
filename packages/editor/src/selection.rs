//! Selection tracking.
//!
//! Single-selection model: selecting always replaces the prior selection, and
//! at most one entity kind is active at a time. A selection must only ever
//! reference entities currently in the document; the session prunes it in the
//! same transaction that deletes an entity (and after undo/redo).

use serde::{Deserialize, Serialize};

use checkout_builder_model::Body;

/// Which level of the tree is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectedKind {
    Section,
    Column,
    Block,
}

/// The active selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<String>,
    kind: Option<SelectedKind>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single entity.
    pub fn select(&mut self, id: impl Into<String>, kind: SelectedKind) {
        self.ids = vec![id.into()];
        self.kind = Some(kind);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.kind = None;
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The selected id, when exactly one entity is selected.
    pub fn single(&self) -> Option<(&str, SelectedKind)> {
        match (self.ids.as_slice(), self.kind) {
            ([id], Some(kind)) => Some((id.as_str(), kind)),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<SelectedKind> {
        self.kind
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Drop ids that no longer exist in the document. Clears the kind when
    /// nothing is left.
    pub fn prune(&mut self, body: &Body) {
        self.ids.retain(|id| body.contains_id(id));
        if self.ids.is_empty() {
            self.kind = None;
        }
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
    fn test_select_replaces_prior_selection() {
        let mut selection = Selection::new();
        selection.select("a", SelectedKind::Block);
        selection.select("s1", SelectedKind::Section);

        assert_eq!(selection.single(), Some(("s1", SelectedKind::Section)));
        assert!(!selection.contains("a"));
    }

    #[test]
    fn test_prune_clears_dangling_ids() {
        let mut selection = Selection::new();
        selection.select("ghost", SelectedKind::Block);

        selection.prune(&body_with(&["a", "b"]));
        assert!(selection.is_empty());
        assert_eq!(selection.kind(), None);
    }

    #[test]
    fn test_prune_keeps_live_ids() {
        let mut selection = Selection::new();
        selection.select("a", SelectedKind::Block);

        selection.prune(&body_with(&["a", "b"]));
        assert_eq!(selection.single(), Some(("a", SelectedKind::Block)));
    }
}
