//! Destination type schemas.
//!
//! A [`TypeSchema`] describes one constructible type: its public properties,
//! its constructor parameters, and an optional hydrator closure that takes
//! over construction entirely (the canonical hydration capability). Schemas
//! are built once via [`TypeSchema::builder`] and registered for the life of
//! the process.

use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::record::{Record, Value, ValueKind};

/// Custom constructor for a hydration-capable type. Receives the fully
/// transformed record and returns the finished instance.
pub type Hydrator = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// One public instance property of a destination type.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    /// Property name as exposed to mapping configuration.
    pub name: String,
    /// Declared kind; `Any` places no constraint on written values.
    pub kind: ValueKind,
    /// Read-only properties are never written during population.
    pub read_only: bool,
}

/// One constructor parameter of a destination type.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name; matched against transformed record keys.
    pub name: String,
    /// Declared kind, used for the zero-value fallback.
    pub kind: ValueKind,
    /// Nullable parameters fall back to null instead of a zero value.
    pub nullable: bool,
    /// Declared default, consulted before nullability.
    pub default: Option<Value>,
}

/// Description of a constructible destination (or source) type.
#[derive(Clone)]
pub struct TypeSchema {
    name: String,
    properties: Vec<PropertySpec>,
    params: Vec<ParamSpec>,
    hydrator: Option<Hydrator>,
}

impl fmt::Debug for TypeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSchema")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("params", &self.params)
            .field("hydrator", &self.hydrator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl TypeSchema {
    /// Starts building a schema for the named type.
    pub fn builder(name: impl Into<String>) -> TypeSchemaBuilder {
        TypeSchemaBuilder {
            name: name.into(),
            properties: Vec::new(),
            params: Vec::new(),
            hydrator: None,
        }
    }

    /// Type name; doubles as the registry key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared properties, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    /// All constructor parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// The hydrator closure, when the type is hydration-capable.
    #[must_use]
    pub fn hydrator(&self) -> Option<&Hydrator> {
        self.hydrator.as_ref()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Whether the schema declares the named property.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Property names in declaration order.
    #[must_use]
    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}

/// Builder for [`TypeSchema`].
pub struct TypeSchemaBuilder {
    name: String,
    properties: Vec<PropertySpec>,
    params: Vec<ParamSpec>,
    hydrator: Option<Hydrator>,
}

impl TypeSchemaBuilder {
    /// Adds a writable property.
    #[must_use]
    pub fn property(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.push_property(name.into(), kind, false)
    }

    /// Adds a read-only property. It participates in mapping resolution but
    /// is skipped (with a warning) during population.
    #[must_use]
    pub fn read_only_property(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.push_property(name.into(), kind, true)
    }

    fn push_property(mut self, name: String, kind: ValueKind, read_only: bool) -> Self {
        self.properties.push(PropertySpec {
            name,
            kind,
            read_only,
        });
        self
    }

    /// Adds a required constructor parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
        });
        self
    }

    /// Adds a nullable constructor parameter.
    #[must_use]
    pub fn nullable_param(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            nullable: true,
            default: None,
        });
        self
    }

    /// Adds a constructor parameter with a declared default.
    #[must_use]
    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        default: Value,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            nullable: false,
            default: Some(default),
        });
        self
    }

    /// Installs a hydrator; construction delegates to it entirely.
    #[must_use]
    pub fn hydrator(mut self, hydrator: impl Fn(&Record) -> Value + Send + Sync + 'static) -> Self {
        self.hydrator = Some(Arc::new(hydrator));
        self
    }

    /// Validates and finishes the schema.
    ///
    /// Rejects duplicate property or parameter names and defaults whose
    /// value contradicts the declared parameter kind.
    pub fn build(self) -> Result<TypeSchema, ModelError> {
        for (idx, property) in self.properties.iter().enumerate() {
            if self.properties[..idx].iter().any(|p| p.name == property.name) {
                return Err(ModelError::DuplicateProperty {
                    type_name: self.name,
                    property: property.name.clone(),
                });
            }
        }
        for (idx, param) in self.params.iter().enumerate() {
            if self.params[..idx].iter().any(|p| p.name == param.name) {
                return Err(ModelError::DuplicateParam {
                    type_name: self.name,
                    param: param.name.clone(),
                });
            }
            if let Some(default) = &param.default
                && !param.kind.accepts(default)
            {
                return Err(ModelError::DefaultKindMismatch {
                    type_name: self.name,
                    param: param.name.clone(),
                    kind: param.kind,
                });
            }
        }
        Ok(TypeSchema {
            name: self.name,
            properties: self.properties,
            params: self.params,
            hydrator: self.hydrator,
        })
    }
}
