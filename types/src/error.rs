//! Errors raised while building shared types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("unknown member class: {0}")]
    UnknownClass(String),

    #[error("member name must not be empty")]
    EmptyName,
}
