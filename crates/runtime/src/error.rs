use thiserror::Error;

/// Errors raised while driving the terminal
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Reading events from or drawing to the terminal failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
