//! # Checkout Builder Model
//!
//! Data model for the checkout page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: document tree + responsive values    │
//! │  - Section → Column → Block hierarchy       │
//! │  - Simplified flat block list (pane tags)   │
//! │  - Breakpoint-scoped property resolution    │
//! │  - Template registry + load/normalize path  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations + history + session       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod document;
pub mod error;
pub mod id_generator;
pub mod load;
pub mod registry;
pub mod responsive;

pub use document::{
    AnimationConfig, Block, BlockAddress, BlockData, BlockType, Body, Column, Document,
    InteractionConfig, Pane, Section, StyleSettings,
};
pub use error::LoadError;
pub use id_generator::{get_page_seed, IdGenerator};
pub use load::load_document;
pub use registry::{BlockTemplate, TemplateRegistry};
pub use responsive::{Breakpoint, ResponsiveSettings, ResponsiveValue};
