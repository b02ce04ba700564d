//! Per-property value transformers.
//!
//! Transformers come in three closed shapes: a bare closure, an object
//! implementing [`ValueTransform`], and a named reference resolved against a
//! [`TransformerRegistry`] at dispatch time. The data transformer holds the
//! single dispatch site.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use granite_model::{Record, Value};
use serde::{Deserialize, Serialize};

/// Closure transformer: receives the resolved value and the full source
/// record.
pub type TransformFn = Arc<dyn Fn(&Value, &Record) -> anyhow::Result<Value> + Send + Sync>;

/// Object transformer capability.
pub trait ValueTransform: Send + Sync {
    fn transform(&self, value: &Value, record: &Record) -> anyhow::Result<Value>;
}

/// Reference to a registered transformer, the static-call analog. This is
/// the only transformer shape that survives serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub target: String,
    pub member: String,
}

/// A transformer in one of its three shapes.
#[derive(Clone)]
pub enum Transformer {
    /// Bare closure.
    Func(TransformFn),
    /// Capability object.
    Object(Arc<dyn ValueTransform>),
    /// Registry reference, resolved at dispatch time.
    Named(NamedRef),
}

impl Transformer {
    /// Wraps a closure.
    pub fn func(f: impl Fn(&Value, &Record) -> anyhow::Result<Value> + Send + Sync + 'static) -> Self {
        Self::Func(Arc::new(f))
    }

    /// Wraps a capability object.
    pub fn object(o: impl ValueTransform + 'static) -> Self {
        Self::Object(Arc::new(o))
    }

    /// References a registered transformer by target and member name.
    pub fn named(target: impl Into<String>, member: impl Into<String>) -> Self {
        Self::Named(NamedRef {
            target: target.into(),
            member: member.into(),
        })
    }

    /// The named reference, when this transformer is one.
    #[must_use]
    pub fn as_named(&self) -> Option<&NamedRef> {
        match self {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Func(_) => f.write_str("Transformer::Func(<fn>)"),
            Self::Object(_) => f.write_str("Transformer::Object(<dyn>)"),
            Self::Named(named) => write!(f, "Transformer::Named({}::{})", named.target, named.member),
        }
    }
}

/// Registry of named transformer functions keyed by `(target, member)`.
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    entries: BTreeMap<(String, String), TransformFn>,
}

impl TransformerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under `target::member`, replacing any previous
    /// registration.
    pub fn register(
        &mut self,
        target: impl Into<String>,
        member: impl Into<String>,
        f: impl Fn(&Value, &Record) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) {
        self.entries
            .insert((target.into(), member.into()), Arc::new(f));
    }

    /// Looks up a registered function.
    #[must_use]
    pub fn get(&self, target: &str, member: &str) -> Option<&TransformFn> {
        self.entries
            .get(&(target.to_string(), member.to_string()))
    }

    /// Whether a named reference resolves.
    #[must_use]
    pub fn resolves(&self, named: &NamedRef) -> bool {
        self.get(&named.target, &named.member).is_some()
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_round_trip() {
        let mut registry = TransformerRegistry::new();
        registry.register("strings", "upper", |value, _| {
            Ok(Value::from(
                value.as_str().unwrap_or_default().to_uppercase(),
            ))
        });

        let named = NamedRef {
            target: "strings".to_string(),
            member: "upper".to_string(),
        };
        assert!(registry.resolves(&named));
        let f = registry.get("strings", "upper").expect("registered");
        let out = f(&Value::from("ann"), &Record::new()).expect("transform");
        assert_eq!(out, Value::from("ANN"));
    }

    #[test]
    fn named_ref_serializes() {
        let named = NamedRef {
            target: "strings".to_string(),
            member: "upper".to_string(),
        };
        let json = serde_json::to_string(&named).expect("serialize");
        let back: NamedRef = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(named, back);
    }
}
