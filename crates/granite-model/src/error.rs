use thiserror::Error;

use crate::record::ValueKind;

/// Errors raised while building type schemas.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("type '{type_name}' declares property '{property}' more than once")]
    DuplicateProperty { type_name: String, property: String },

    #[error("type '{type_name}' declares parameter '{param}' more than once")]
    DuplicateParam { type_name: String, param: String },

    #[error("default for parameter '{param}' of type '{type_name}' does not fit kind {kind:?}")]
    DefaultKindMismatch {
        type_name: String,
        param: String,
        kind: ValueKind,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
