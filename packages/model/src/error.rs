//! Error types for the model crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("payload is not a document object")]
    NotAnObject,

    #[error("payload has neither sections nor blocks")]
    UnrecognizedShape,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
