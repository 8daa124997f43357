//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the label pipeline.
///
/// Pagination, chunking and region assignment never fail; these variants
/// only cover queue admission, template geometry and output.
#[derive(Debug, Error)]
pub enum LabelError {
    /// A recipient is missing a field required before it may be queued.
    #[error("record is missing required field `{field}`")]
    IncompleteRecord { field: &'static str },

    /// The layout engine rejected a template tree.
    #[error("template layout failed: {0}")]
    Layout(String),

    /// A print job, config or layout could not be (de)serialised.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF output failed.
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, LabelError>;
