/// Convenience result type used across svgsheet.
pub type SheetResult<T> = Result<T, SheetError>;

/// Fatal errors: anything returned as `SheetError` aborts the whole run.
///
/// Per-item rendering failures are not represented here; see
/// [`RenderError`](crate::RenderError).
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    /// No source items were supplied, so there is nothing to lay out.
    #[error("no items to render")]
    EmptyInput,

    /// The configuration cannot produce a valid cell layout.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid caller-provided options (threading, paths, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// The output canvas could not be allocated.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SheetError {
    /// Build a [`SheetError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SheetError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SheetError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
