//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Load error: {0}")]
    Load(#[from] checkout_builder_model::LoadError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),
}
