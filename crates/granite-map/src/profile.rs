//! Explicit configuration DSL: per-property rules, sealed type mappings,
//! and profiles owning many of them.
//!
//! A [`TypeMapping`] is mutable only until [`TypeMapping::seal`] validates
//! it against the destination schema; after that every mutation attempt is
//! a [`ConfigError::Sealed`]. Profiles are built once at configuration time
//! and sealed before first use.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use granite_model::{RECORD_TYPE, Record, TypeRegistry, Value};

use crate::error::ConfigError;
use crate::transformer::{Transformer, TransformerRegistry};

/// Predicate over the full source record.
pub type Condition = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Resolved rule for one destination property.
///
/// This is also the exact shape the declarative-metadata extractor yields,
/// and the unit the configuration cache stores.
#[derive(Clone, Default)]
pub struct PropertyRule {
    /// Source key; dot-paths address nested record fields. `None` means the
    /// destination property's own name.
    pub source: Option<String>,
    /// Optional transformer applied to the resolved value.
    pub transformer: Option<Transformer>,
    /// Optional gate; a false result skips the property (defaults aside).
    pub condition: Option<Condition>,
    /// Configured default value.
    pub default: Option<Value>,
    /// Whether a default is configured, even a null one.
    pub has_default: bool,
    /// Ignored properties are never produced.
    pub ignore: bool,
}

impl PropertyRule {
    /// The plain rule mapping a property from its own name.
    #[must_use]
    pub fn same_name() -> Self {
        Self::default()
    }

    /// A rule reading from the given source key.
    #[must_use]
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Source key to read for the named destination property.
    #[must_use]
    pub fn source_key<'a>(&'a self, dest_property: &'a str) -> &'a str {
        self.source.as_deref().unwrap_or(dest_property)
    }
}

impl fmt::Debug for PropertyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRule")
            .field("source", &self.source)
            .field("transformer", &self.transformer)
            .field("condition", &self.condition.as_ref().map(|_| "<fn>"))
            .field("default", &self.default)
            .field("has_default", &self.has_default)
            .field("ignore", &self.ignore)
            .finish()
    }
}

/// Builder handle over one member rule of an unsealed type mapping.
#[derive(Debug)]
pub struct MemberBuilder<'a> {
    rule: &'a mut PropertyRule,
}

impl MemberBuilder<'_> {
    /// Reads the property from `source` (dot-paths allowed).
    pub fn map_from(self, source: impl Into<String>) -> Self {
        self.rule.source = Some(source.into());
        self
    }

    /// Applies a transformer to the resolved value.
    pub fn transform(self, transformer: Transformer) -> Self {
        self.rule.transformer = Some(transformer);
        self
    }

    /// Gates the property on a predicate over the full source record.
    pub fn when(self, condition: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.rule.condition = Some(Arc::new(condition));
        self
    }

    /// Configures a default used when the condition fails or the
    /// transformed value is null.
    pub fn default_value(self, value: Value) -> Self {
        self.rule.default = Some(value);
        self.rule.has_default = true;
        self
    }

    /// Excludes the property from mapping output.
    pub fn ignore(self) -> Self {
        self.rule.ignore = true;
        self
    }
}

/// Explicit mapping configuration for one `(source, destination)` type pair.
#[derive(Debug, Clone)]
pub struct TypeMapping {
    source_type: String,
    dest_type: String,
    sealed: bool,
    members: BTreeMap<String, PropertyRule>,
}

impl TypeMapping {
    #[must_use]
    pub fn new(source_type: impl Into<String>, dest_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            dest_type: dest_type.into(),
            sealed: false,
            members: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    #[must_use]
    pub fn dest_type(&self) -> &str {
        &self.dest_type
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Opens a builder for the named destination property.
    pub fn for_member(&mut self, name: impl Into<String>) -> Result<MemberBuilder<'_>, ConfigError> {
        if self.sealed {
            return Err(ConfigError::Sealed {
                source_type: self.source_type.clone(),
                dest_type: self.dest_type.clone(),
            });
        }
        let rule = self.members.entry(name.into()).or_default();
        Ok(MemberBuilder { rule })
    }

    /// Configured rule for a destination property.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&PropertyRule> {
        self.members.get(name)
    }

    /// All configured members.
    #[must_use]
    pub fn members(&self) -> &BTreeMap<String, PropertyRule> {
        &self.members
    }

    /// Validates the mapping and marks it immutable. Idempotent.
    ///
    /// Checks that every member exists on the destination schema (generic
    /// record destinations accept anything), that named transformers
    /// resolve, and that no member is both mapped and ignored.
    pub fn seal(
        &mut self,
        types: &TypeRegistry,
        transformers: &TransformerRegistry,
    ) -> Result<(), ConfigError> {
        if self.sealed {
            return Ok(());
        }
        let schema = (self.dest_type != RECORD_TYPE)
            .then(|| types.get(&self.dest_type))
            .flatten();
        for (name, rule) in &self.members {
            if let Some(schema) = schema
                && !schema.has_property(name)
            {
                return Err(ConfigError::UnknownProperty {
                    type_name: self.dest_type.clone(),
                    property: name.clone(),
                });
            }
            if let Some(named) = rule.transformer.as_ref().and_then(Transformer::as_named)
                && !transformers.resolves(named)
            {
                return Err(ConfigError::UnknownTransformer {
                    target: named.target.clone(),
                    member: named.member.clone(),
                });
            }
            if rule.ignore && (rule.source.is_some() || rule.transformer.is_some()) {
                return Err(ConfigError::MappedAndIgnored {
                    property: name.clone(),
                });
            }
        }
        self.sealed = true;
        Ok(())
    }
}

/// A named collection of type mappings, configured once and sealed.
#[derive(Debug, Clone, Default)]
pub struct MappingProfile {
    name: String,
    mappings: Vec<TypeMapping>,
}

impl MappingProfile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mappings: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opens a new type-pair mapping for configuration.
    pub fn create_map(
        &mut self,
        source_type: impl Into<String>,
        dest_type: impl Into<String>,
    ) -> &mut TypeMapping {
        self.mappings
            .push(TypeMapping::new(source_type, dest_type));
        self.mappings.last_mut().expect("just pushed")
    }

    /// Seals every mapping in the profile. Fail-fast on the first invalid
    /// one.
    pub fn seal_all(
        &mut self,
        types: &TypeRegistry,
        transformers: &TransformerRegistry,
    ) -> Result<(), ConfigError> {
        for mapping in &mut self.mappings {
            mapping.seal(types, transformers)?;
        }
        Ok(())
    }

    /// The mapping for a type pair, if the profile declares one.
    #[must_use]
    pub fn mapping_for(&self, source_type: &str, dest_type: &str) -> Option<&TypeMapping> {
        self.mappings
            .iter()
            .find(|m| m.source_type() == source_type && m.dest_type() == dest_type)
    }

    /// All declared type pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.mappings
            .iter()
            .map(|m| (m.source_type(), m.dest_type()))
            .collect()
    }
}
