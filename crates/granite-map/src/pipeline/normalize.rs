//! Source normalization: every supported source becomes a flat record.

use granite_model::{Record, Value, kind_name};
use serde::Serialize;

use crate::error::{MapError, Result};

/// Reduces mapping sources to records.
pub struct SourceNormalizer;

impl SourceNormalizer {
    /// A generic record (JSON object) passes through. Anything else —
    /// scalar, array, null — is an unsupported source and fails with its
    /// runtime kind name.
    pub fn normalize(source: &Value) -> Result<Record> {
        match source {
            Value::Object(map) => Ok(map.clone()),
            other => Err(MapError::UnsupportedSource {
                kind: kind_name(other).to_string(),
            }),
        }
    }

    /// Introspection path for plain structs: serialize the public fields
    /// into a record. Non-struct-like sources fail the same way scalars do.
    pub fn normalize_serialize<S: Serialize>(source: &S) -> Result<Record> {
        let value = serde_json::to_value(source).map_err(|e| MapError::UnsupportedSource {
            kind: format!("unserializable ({e})"),
        })?;
        Self::normalize(&value)
    }
}
