//! Errors raised while constructing or manipulating core types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid group identifier: {0}")]
    InvalidIdentifier(String),

    #[error("operation not permitted: {0}")]
    NotPermitted(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
