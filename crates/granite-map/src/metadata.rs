//! Declarative per-property metadata.
//!
//! The original system read this from language annotations; here it is an
//! explicit table built at startup and injected behind the
//! [`MetadataExtractor`] trait, keeping the engine decoupled from where the
//! rules come from.

use std::collections::BTreeMap;

use granite_model::TypeSchema;

use crate::profile::PropertyRule;

/// Supplies declarative per-property rules for a destination type.
pub trait MetadataExtractor: Send + Sync {
    /// Rules keyed by destination property name. Absent properties fall
    /// through to convention inference or the same-name default.
    fn rules_for(&self, schema: &TypeSchema) -> BTreeMap<String, PropertyRule>;
}

/// Extractor yielding nothing; the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExtractor;

impl MetadataExtractor for NullExtractor {
    fn rules_for(&self, _schema: &TypeSchema) -> BTreeMap<String, PropertyRule> {
        BTreeMap::new()
    }
}

/// Explicit per-type, per-property rule table.
#[derive(Debug, Default)]
pub struct MetadataTable {
    rules: BTreeMap<String, BTreeMap<String, PropertyRule>>,
}

impl MetadataTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule for one property of one type, replacing any
    /// previous rule.
    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        property: impl Into<String>,
        rule: PropertyRule,
    ) -> &mut Self {
        self.rules
            .entry(type_name.into())
            .or_default()
            .insert(property.into(), rule);
        self
    }

    /// Whether any rule is registered for the type.
    #[must_use]
    pub fn has_type(&self, type_name: &str) -> bool {
        self.rules.contains_key(type_name)
    }
}

impl MetadataExtractor for MetadataTable {
    fn rules_for(&self, schema: &TypeSchema) -> BTreeMap<String, PropertyRule> {
        self.rules.get(schema.name()).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use granite_model::ValueKind;

    use super::*;

    #[test]
    fn table_yields_rules_per_type() {
        let schema = TypeSchema::builder("User")
            .property("id", ValueKind::Int)
            .build()
            .expect("valid schema");

        let mut table = MetadataTable::new();
        table.insert("User", "id", PropertyRule::from_source("user_id"));

        let rules = table.rules_for(&schema);
        assert_eq!(
            rules.get("id").and_then(|r| r.source.as_deref()),
            Some("user_id")
        );
        assert!(table.has_type("User"));
        assert!(!table.has_type("Order"));
    }

    #[test]
    fn null_extractor_is_empty() {
        let schema = TypeSchema::builder("User")
            .build()
            .expect("valid schema");
        assert!(NullExtractor.rules_for(&schema).is_empty());
    }
}
