use thiserror::Error;

/// Errors surfaced while setting up size observation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResizeError {
    /// The native observation primitive could not be constructed
    #[error("resize observation is not supported in this environment: {0}")]
    Unsupported(String),
}

pub type ResizeResult<T> = Result<T, ResizeError>;
