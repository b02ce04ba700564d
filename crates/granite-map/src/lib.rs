//! Convention-driven record-to-object mapping.
//!
//! The engine turns loosely shaped source records into typed destination
//! instances. Property pairing comes from three sources in strict
//! precedence: explicit configuration (fluent profiles and direct
//! mappings), declarative metadata, and convention-based name inference
//! over a pluggable set of naming conventions. Resolved configurations are
//! cached per type pair, with in-memory, shared, and persistent cache
//! implementations.

#![deny(unsafe_code)]

pub mod builder;
pub mod cache;
pub mod convention;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod profile;
pub mod similarity;
pub mod transformer;

pub use builder::ConfigurationBuilder;
pub use cache::{
    CacheStats, Configuration, InMemoryCache, MappingCache, PairKey, PersistentFileCache,
    SharedCache,
};
pub use convention::mapper::{ConventionMapper, DiscoveredMappings, DiscoveredMatch};
pub use convention::{ConventionRegistry, NamingConvention};
pub use engine::{EngineOptions, Mapped, MappingEngine};
pub use error::{ConfigError, MapError, Result};
pub use metadata::{MetadataExtractor, MetadataTable, NullExtractor};
pub use pipeline::{ObjectFactory, PopulateWarning, SourceNormalizer};
pub use profile::{MappingProfile, PropertyRule, TypeMapping};
pub use transformer::{NamedRef, Transformer, TransformerRegistry};
