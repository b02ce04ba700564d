//! Registry of destination type schemas.

use std::collections::BTreeMap;

use crate::schema::TypeSchema;

/// Sentinel type id for generic record sources and destinations. Always
/// resolvable; never registered.
pub const RECORD_TYPE: &str = "record";

/// Process-lifetime registry mapping type ids to schemas.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeSchema>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its own name, replacing any previous one.
    pub fn register(&mut self, schema: TypeSchema) {
        self.types.insert(schema.name().to_string(), schema);
    }

    /// Looks up a schema by type id. The [`RECORD_TYPE`] sentinel has no
    /// schema and returns `None`; use [`Self::contains`] for resolvability.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeSchema> {
        self.types.get(name)
    }

    /// Whether the type id resolves to a constructible destination.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        name == RECORD_TYPE || self.types.contains_key(name)
    }

    /// Registered type ids in sorted order.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::record::ValueKind;

    use super::*;

    #[test]
    fn record_sentinel_always_resolves() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(RECORD_TYPE));
        assert!(registry.get(RECORD_TYPE).is_none());
        assert!(!registry.contains("User"));
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeSchema::builder("User")
                .property("id", ValueKind::Int)
                .build()
                .expect("valid schema"),
        );
        assert!(registry.contains("User"));
        assert_eq!(registry.get("User").map(TypeSchema::name), Some("User"));
        assert_eq!(registry.type_names(), vec!["User"]);
    }
}
