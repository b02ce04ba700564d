//! Precedence resolution and configuration caching.
//!
//! For each destination property the builder resolves one rule from three
//! competing sources: explicit configuration (direct mappings, then
//! profiles in registration order) beats declarative metadata, which beats
//! the same-name default. Convention discovery then overwrites entries that
//! are still self-named. Resolved configurations are cached per type pair.

use std::sync::Arc;

use granite_model::{RECORD_TYPE, TypeRegistry};

use crate::cache::{Configuration, InMemoryCache, MappingCache, PairKey};
use crate::convention::NamingConvention;
use crate::convention::mapper::ConventionMapper;
use crate::error::{MapError, Result};
use crate::metadata::{MetadataExtractor, NullExtractor};
use crate::profile::{MappingProfile, PropertyRule, TypeMapping};

pub struct ConfigurationBuilder {
    types: Arc<TypeRegistry>,
    extractor: Box<dyn MetadataExtractor>,
    profiles: Vec<MappingProfile>,
    direct: Vec<TypeMapping>,
    conventions: ConventionMapper,
    conventions_enabled: bool,
    cache: Box<dyn MappingCache>,
}

impl ConfigurationBuilder {
    /// Builder with an in-memory cache and conventions enabled.
    #[must_use]
    pub fn new(types: Arc<TypeRegistry>) -> Self {
        Self::with_cache(types, Box::new(InMemoryCache::new()))
    }

    /// Builder over a caller-provided cache.
    #[must_use]
    pub fn with_cache(types: Arc<TypeRegistry>, cache: Box<dyn MappingCache>) -> Self {
        Self {
            types,
            extractor: Box::new(NullExtractor),
            profiles: Vec::new(),
            direct: Vec::new(),
            conventions: ConventionMapper::default(),
            conventions_enabled: true,
            cache,
        }
    }

    /// Replaces the declarative-metadata extractor.
    pub fn set_extractor(&mut self, extractor: Box<dyn MetadataExtractor>) {
        self.extractor = extractor;
    }

    /// Registers a profile. Profiles are consulted in registration order;
    /// first match wins.
    pub fn add_profile(&mut self, profile: MappingProfile) {
        self.profiles.push(profile);
    }

    /// Registers a direct type mapping, consulted before any profile.
    pub fn add_mapping(&mut self, mapping: TypeMapping) {
        self.direct.push(mapping);
    }

    /// Enables or disables convention inference. Cached configurations
    /// bake the discovery result in, so toggling invalidates the cache.
    pub fn set_conventions_enabled(&mut self, enabled: bool) {
        if self.conventions_enabled != enabled {
            self.conventions_enabled = enabled;
            self.cache.clear();
        }
    }

    /// Disables convention inference.
    pub fn disable_conventions(&mut self) {
        self.set_conventions_enabled(false);
    }

    /// Sets the discovery acceptance threshold, invalidating cached
    /// configurations when it changes.
    pub fn set_convention_threshold(&mut self, threshold: f64) {
        if (self.conventions.threshold() - threshold).abs() > f64::EPSILON {
            self.conventions.set_threshold(threshold);
            self.cache.clear();
        }
    }

    /// Registers a custom naming convention and invalidates cached
    /// configurations.
    pub fn register_convention(&mut self, convention: impl NamingConvention + 'static) {
        self.conventions.register_convention(convention);
        self.cache.clear();
    }

    /// Resolves (or fetches from cache) the configuration for a type pair.
    ///
    /// `source_props` are the property names of the normalized source
    /// record, used for convention discovery and for generic-record
    /// destinations.
    ///
    /// The result is cached per `(source_type, dest_type)` pair, generic
    /// record sources included: the first record's key set determines the
    /// discovered matches for that pair until the cache is cleared.
    pub fn configuration_for(
        &mut self,
        source_type: &str,
        source_props: &[String],
        dest_type: &str,
    ) -> Result<Arc<Configuration>> {
        let key = PairKey::new(source_type, dest_type);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(
                source_type,
                dest_type,
                "configuration cache hit"
            );
            return Ok(cached);
        }

        let dest_props = self.dest_props(source_type, dest_type, source_props)?;
        let mut config = Configuration::new();
        for prop in &dest_props {
            let rule = self
                .explicit_rule(source_type, dest_type, prop)
                .or_else(|| self.metadata_rule(dest_type, prop))
                .unwrap_or_else(|| PropertyRule::from_source(prop.clone()));
            config.insert(prop.clone(), rule);
        }

        if self.conventions_enabled {
            let discovered =
                self.conventions
                    .discover(source_type, source_props, dest_type, &dest_props);
            for (prop, found) in discovered.iter() {
                let Some(rule) = config.get_mut(prop) else {
                    continue;
                };
                // Only entries still reading from their own name are open
                // to convention inference.
                if !rule.ignore && rule.source.as_deref() == Some(prop.as_str()) {
                    rule.source = Some(found.source.clone());
                }
            }
        }

        tracing::debug!(
            source_type,
            dest_type,
            properties = config.len(),
            "resolved mapping configuration"
        );
        let config = Arc::new(config);
        self.cache.put(key, Arc::clone(&config));
        Ok(config)
    }

    /// Derives a naive reverse mapping from the forward configuration.
    ///
    /// Every forward entry whose source key differs from its destination
    /// key and that carries no transformer contributes the inverse
    /// `map_from` on `reverse`. Conditions and transformers do not invert.
    pub fn reverse_configuration(
        &mut self,
        source_type: &str,
        source_props: &[String],
        dest_type: &str,
        reverse: &mut TypeMapping,
    ) -> Result<()> {
        let forward = self.configuration_for(source_type, source_props, dest_type)?;
        for (dest_prop, rule) in forward.iter() {
            let Some(source_key) = rule.source.as_deref() else {
                continue;
            };
            if source_key == dest_prop || rule.transformer.is_some() {
                continue;
            }
            reverse
                .for_member(source_key)?
                .map_from(dest_prop.clone());
        }
        Ok(())
    }

    /// Eagerly materializes configuration for every declared type pair.
    /// Returns the number of pairs warmed.
    pub fn warm_up(&mut self) -> Result<usize> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for mapping in &self.direct {
            pairs.push((
                mapping.source_type().to_string(),
                mapping.dest_type().to_string(),
            ));
        }
        for profile in &self.profiles {
            for (source, dest) in profile.pairs() {
                pairs.push((source.to_string(), dest.to_string()));
            }
        }
        pairs.sort();
        pairs.dedup();

        let mut warmed = 0;
        for (source_type, dest_type) in pairs {
            let source_props = self
                .types
                .get(&source_type)
                .map(|s| s.property_names())
                .unwrap_or_default();
            self.configuration_for(&source_type, &source_props, &dest_type)?;
            warmed += 1;
        }
        tracing::info!(pairs = warmed, "warmed configuration cache");
        Ok(warmed)
    }

    fn dest_props(
        &self,
        source_type: &str,
        dest_type: &str,
        source_props: &[String],
    ) -> Result<Vec<String>> {
        if dest_type == RECORD_TYPE {
            // Generic record destinations mirror the source keys, plus any
            // members explicitly configured for the pair (renamed output
            // keys have no source-side counterpart).
            let mut props = source_props.to_vec();
            for name in self.explicit_members(source_type, dest_type) {
                if !props.contains(&name) {
                    props.push(name);
                }
            }
            return Ok(props);
        }
        let schema = self
            .types
            .get(dest_type)
            .ok_or_else(|| MapError::DestinationTypeNotFound(dest_type.to_string()))?;
        Ok(schema.property_names())
    }

    fn explicit_members(&self, source_type: &str, dest_type: &str) -> Vec<String> {
        let mut names = Vec::new();
        for mapping in &self.direct {
            if mapping.source_type() == source_type && mapping.dest_type() == dest_type {
                names.extend(mapping.members().keys().cloned());
            }
        }
        for profile in &self.profiles {
            if let Some(mapping) = profile.mapping_for(source_type, dest_type) {
                names.extend(mapping.members().keys().cloned());
            }
        }
        names
    }

    fn explicit_rule(
        &self,
        source_type: &str,
        dest_type: &str,
        prop: &str,
    ) -> Option<PropertyRule> {
        for mapping in &self.direct {
            if mapping.source_type() == source_type
                && mapping.dest_type() == dest_type
                && let Some(rule) = mapping.rule(prop)
            {
                return Some(rule.clone());
            }
        }
        for profile in &self.profiles {
            if let Some(mapping) = profile.mapping_for(source_type, dest_type)
                && let Some(rule) = mapping.rule(prop)
            {
                return Some(rule.clone());
            }
        }
        None
    }

    fn metadata_rule(&self, dest_type: &str, prop: &str) -> Option<PropertyRule> {
        let schema = self.types.get(dest_type)?;
        self.extractor.rules_for(schema).remove(prop)
    }
}
