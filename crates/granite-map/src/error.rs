//! Error types for configuration and mapping operations.
//!
//! Seal-time problems are [`ConfigError`]s and surface once, before first
//! use. Everything raised during an actual `map` call is a [`MapError`].

use thiserror::Error;

/// Configuration problems detected while sealing a type mapping.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `for_member` target does not exist on the destination schema.
    #[error("destination type '{type_name}' has no property '{property}'")]
    UnknownProperty { type_name: String, property: String },

    /// A named transformer reference does not resolve.
    #[error("transformer '{target}::{member}' is not registered")]
    UnknownTransformer { target: String, member: String },

    /// A property carries both a mapping rule and an ignore flag.
    #[error("property '{property}' is both mapped and ignored")]
    MappedAndIgnored { property: String },

    /// Mutation attempted after the mapping was sealed.
    #[error("mapping {source_type} -> {dest_type} is sealed")]
    Sealed {
        source_type: String,
        dest_type: String,
    },
}

/// Runtime mapping failures.
#[derive(Debug, Error)]
pub enum MapError {
    /// The destination type id does not resolve to a constructible type.
    #[error("destination type not found: {0}")]
    DestinationTypeNotFound(String),

    /// The source value cannot be reduced to a record.
    #[error("unsupported source type: {kind}")]
    UnsupportedSource { kind: String },

    /// A transformer failed for one destination property.
    #[error("transformation failed for property '{property}'")]
    Transformation {
        property: String,
        #[source]
        source: anyhow::Error,
    },

    /// Catch-all with type-pair context; wraps the original cause.
    #[error("mapping {source_type} -> {dest_type} failed")]
    Mapping {
        source_type: String,
        dest_type: String,
        #[source]
        source: anyhow::Error,
    },

    /// A configuration error surfaced through the engine.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, MapError>;
