//! The mapping engine façade.
//!
//! Orchestrates normalization, configuration resolution, transformation,
//! and construction, translating failures into [`MapError`] with type-pair
//! context.

use std::sync::Arc;

use anyhow::anyhow;
use granite_model::{RECORD_TYPE, TypeRegistry, Value, kind_name};
use serde::Serialize;

use crate::builder::ConfigurationBuilder;
use crate::cache::{InMemoryCache, MappingCache};
use crate::convention::NamingConvention;
use crate::error::{ConfigError, MapError, Result};
use crate::metadata::MetadataExtractor;
use crate::pipeline::{DataTransformer, ObjectFactory, PopulateWarning, SourceNormalizer};
use crate::profile::{MappingProfile, TypeMapping};
use crate::transformer::TransformerRegistry;

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Whether convention inference runs for unresolved properties.
    pub conventions_enabled: bool,
    /// Acceptance threshold for discovered convention matches.
    pub convention_threshold: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            conventions_enabled: true,
            convention_threshold: crate::convention::mapper::DEFAULT_THRESHOLD,
        }
    }
}

/// A mapping result: the constructed value plus any non-fatal population
/// warnings collected along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped {
    pub value: Value,
    pub warnings: Vec<PopulateWarning>,
}

/// Façade over the whole mapping pipeline.
pub struct MappingEngine {
    types: Arc<TypeRegistry>,
    transformers: TransformerRegistry,
    builder: ConfigurationBuilder,
}

impl MappingEngine {
    /// Engine with a private in-memory configuration cache.
    #[must_use]
    pub fn new(types: TypeRegistry) -> Self {
        Self::with_cache(types, Box::new(InMemoryCache::new()))
    }

    /// Engine over a caller-selected cache (shared or persistent).
    #[must_use]
    pub fn with_cache(types: TypeRegistry, cache: Box<dyn MappingCache>) -> Self {
        let types = Arc::new(types);
        let builder = ConfigurationBuilder::with_cache(Arc::clone(&types), cache);
        Self {
            types,
            transformers: TransformerRegistry::new(),
            builder,
        }
    }

    /// Applies option toggles. Convention inference can be turned off and
    /// back on; either change invalidates cached configurations.
    pub fn set_options(&mut self, options: EngineOptions) {
        self.builder
            .set_conventions_enabled(options.conventions_enabled);
        self.builder
            .set_convention_threshold(options.convention_threshold);
    }

    /// Registers and seals a profile. Seal failures surface before first
    /// use.
    pub fn add_profile(&mut self, mut profile: MappingProfile) -> std::result::Result<(), ConfigError> {
        profile.seal_all(&self.types, &self.transformers)?;
        self.builder.add_profile(profile);
        Ok(())
    }

    /// Registers and seals a direct type mapping.
    pub fn add_mapping(&mut self, mut mapping: TypeMapping) -> std::result::Result<(), ConfigError> {
        mapping.seal(&self.types, &self.transformers)?;
        self.builder.add_mapping(mapping);
        Ok(())
    }

    /// Replaces the declarative-metadata extractor.
    pub fn set_extractor(&mut self, extractor: Box<dyn MetadataExtractor>) {
        self.builder.set_extractor(extractor);
    }

    /// Registers a named transformer reachable as `target::member`.
    pub fn register_transformer(
        &mut self,
        target: impl Into<String>,
        member: impl Into<String>,
        f: impl Fn(&Value, &granite_model::Record) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) {
        self.transformers.register(target, member, f);
    }

    /// Registers a custom naming convention.
    pub fn register_convention(&mut self, convention: impl NamingConvention + 'static) {
        self.builder.register_convention(convention);
    }

    /// Eagerly materializes configuration for every declared type pair.
    pub fn warm_up(&mut self) -> Result<usize> {
        self.builder.warm_up()
    }

    /// Maps a generic record source to a new destination instance.
    pub fn map(&mut self, source: &Value, dest_type: &str) -> Result<Mapped> {
        self.map_as(RECORD_TYPE, source, dest_type)
    }

    /// Maps a source under an explicit source type id, so explicit
    /// mappings registered for that pair apply.
    pub fn map_as(&mut self, source_type: &str, source: &Value, dest_type: &str) -> Result<Mapped> {
        if !self.types.contains(dest_type) {
            return Err(MapError::DestinationTypeNotFound(dest_type.to_string()));
        }
        let record = SourceNormalizer::normalize(source)?;
        let source_props: Vec<String> = record.keys().cloned().collect();
        let config = self
            .builder
            .configuration_for(source_type, &source_props, dest_type)?;
        let transformed = DataTransformer::new(&self.transformers).transform(&record, &config)?;
        let (value, warnings) = ObjectFactory::create(transformed, dest_type, &self.types)?;
        Ok(Mapped { value, warnings })
    }

    /// Maps a plain struct source; its short type name is the source type
    /// id.
    pub fn map_from<S: Serialize>(&mut self, source: &S, dest_type: &str) -> Result<Mapped> {
        let record = SourceNormalizer::normalize_serialize(source)?;
        self.map_as(short_type_name::<S>(), &Value::Object(record), dest_type)
    }

    /// Maps onto an existing instance, populating its fields in place.
    /// Returns the collected non-fatal population warnings.
    pub fn map_to(
        &mut self,
        source: &Value,
        existing: &mut Value,
        dest_type: &str,
    ) -> Result<Vec<PopulateWarning>> {
        if !self.types.contains(dest_type) {
            return Err(MapError::DestinationTypeNotFound(dest_type.to_string()));
        }
        let record = SourceNormalizer::normalize(source)?;
        let source_props: Vec<String> = record.keys().cloned().collect();
        let config = self
            .builder
            .configuration_for(RECORD_TYPE, &source_props, dest_type)?;
        let transformed = DataTransformer::new(&self.transformers).transform(&record, &config)?;

        let Value::Object(fields) = existing else {
            return Err(MapError::Mapping {
                source_type: RECORD_TYPE.to_string(),
                dest_type: dest_type.to_string(),
                source: anyhow!(
                    "existing instance is {}, expected an object",
                    kind_name(existing)
                ),
            });
        };
        Ok(ObjectFactory::populate(
            fields,
            transformed,
            self.types.get(dest_type),
        ))
    }

    /// Maps a list of sources; fails on the first failing element.
    pub fn map_array(&mut self, sources: &[Value], dest_type: &str) -> Result<Vec<Mapped>> {
        sources
            .iter()
            .map(|source| self.map(source, dest_type))
            .collect()
    }

    /// Derives, seals, and returns the naive reverse mapping for a type
    /// pair: every forward rename without a transformer becomes the
    /// inverse `map_from`.
    pub fn reverse_map(&mut self, source_type: &str, dest_type: &str) -> Result<TypeMapping> {
        let source_props = self
            .types
            .get(source_type)
            .map(|s| s.property_names())
            .unwrap_or_default();
        let mut reverse = TypeMapping::new(dest_type, source_type);
        self.builder
            .reverse_configuration(source_type, &source_props, dest_type, &mut reverse)?;
        reverse.seal(&self.types, &self.transformers)?;
        Ok(reverse)
    }

    /// The type registry backing this engine.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }
}

fn short_type_name<S: ?Sized>() -> &'static str {
    let full = std::any::type_name::<S>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_strips_path() {
        struct Account;
        let _ = Account;
        assert_eq!(short_type_name::<Account>(), "Account");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
