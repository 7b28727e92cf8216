use thiserror::Error;

/// Errors raised while interpreting caller input in the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid sort field '{0}', expected one of name|email|age|address|createdAt")]
    InvalidSortField(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
