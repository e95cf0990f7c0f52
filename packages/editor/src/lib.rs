//! # Checkout Builder Editor
//!
//! Document editing engine for the checkout page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host UI: drag events, property edits, keys  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: BuilderSession                      │
//! │  - Mutations (snapshot-then-apply, atomic)  │
//! │  - Undo/redo stacks of body snapshots       │
//! │  - Selection pruned on delete/undo/redo     │
//! │  - Single-slot clipboard, id regeneration   │
//! │  - Drag reconciliation → one history entry  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: document tree + responsive values    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is source of truth**: the renderer re-reads it after edits
//! 2. **Everything through the mutation API**: drags, pastes, and keyboard
//!    deletes all inherit snapshot history automatically
//! 3. **Silent no-ops over throwing**: stale ids, empty stacks, and invalid
//!    drop targets never crash an editing gesture
//! 4. **No globals**: a session is constructed and passed by reference
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_builder_editor::{BuilderSession, InsertTarget, Mutation};
//! use checkout_builder_model::{BlockType, Document, TemplateRegistry};
//!
//! let mut session = BuilderSession::new(
//!     Document::simplified("checkout"),
//!     TemplateRegistry::standard(),
//! );
//!
//! session.add_block(InsertTarget::Document, BlockType::Header);
//! session.undo();
//! session.redo();
//!
//! // Host autosave reads the snapshot on a debounce.
//! if session.is_dirty() {
//!     let payload = session.to_payload()?;
//!     // ... persist, then:
//!     session.mark_saved();
//! }
//! ```

mod clipboard;
mod drag;
mod errors;
mod mutations;
mod selection;
mod session;
mod undo_stack;

pub use clipboard::{Clipboard, ClipboardItem};
pub use drag::{reconcile, DragState, DragTarget};
pub use errors::EditorError;
pub use mutations::{Applied, InsertTarget, MoveDirection, Mutation, MutationError};
pub use selection::{SelectedKind, Selection};
pub use session::BuilderSession;
pub use undo_stack::UndoStack;

// Re-export common model types for convenience
pub use checkout_builder_model::{
    Block, BlockData, BlockType, Body, Breakpoint, Document, Pane, ResponsiveValue,
    TemplateRegistry,
};
