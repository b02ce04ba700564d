//! The configuration interpreter: evaluates per-property rules against a
//! normalized source record.

use granite_model::{Record, Value, dot_get};

use crate::cache::Configuration;
use crate::error::{MapError, Result};
use crate::transformer::{Transformer, TransformerRegistry};

/// Applies a resolved configuration to a source record, producing the data
/// the object factory consumes.
pub struct DataTransformer<'a> {
    transformers: &'a TransformerRegistry,
}

impl<'a> DataTransformer<'a> {
    #[must_use]
    pub fn new(transformers: &'a TransformerRegistry) -> Self {
        Self { transformers }
    }

    /// Interprets the configuration in stored order.
    ///
    /// Ignored properties are skipped. A false condition skips the property
    /// unless a default is configured, in which case the default is used
    /// outright. Source values resolve via dot-path traversal when the key
    /// contains a separator; anything missing resolves to null. After the
    /// transformer runs, a null result with a configured default becomes
    /// the default.
    pub fn transform(&self, record: &Record, config: &Configuration) -> Result<Record> {
        let mut out = Record::new();
        for (prop, rule) in config {
            if rule.ignore {
                continue;
            }
            if let Some(condition) = &rule.condition
                && !condition(record)
            {
                if rule.has_default {
                    out.insert(prop.clone(), rule.default.clone().unwrap_or(Value::Null));
                }
                continue;
            }

            let source_key = rule.source_key(prop);
            let raw = resolve_source(record, source_key);
            let mut value = self.apply(rule.transformer.as_ref(), raw, record, prop)?;
            if value.is_null() && rule.has_default {
                value = rule.default.clone().unwrap_or(Value::Null);
            }
            out.insert(prop.clone(), value);
        }
        Ok(out)
    }

    /// The single transformer dispatch site.
    fn apply(
        &self,
        transformer: Option<&Transformer>,
        value: Value,
        record: &Record,
        prop: &str,
    ) -> Result<Value> {
        let Some(transformer) = transformer else {
            return Ok(value);
        };
        let result = match transformer {
            Transformer::Func(f) => f(&value, record),
            Transformer::Object(o) => o.transform(&value, record),
            Transformer::Named(named) => {
                match self.transformers.get(&named.target, &named.member) {
                    Some(f) => f(&value, record),
                    None => {
                        tracing::warn!(
                            target = named.target.as_str(),
                            member = named.member.as_str(),
                            property = prop,
                            "named transformer unresolved; passing value through"
                        );
                        return Ok(value);
                    }
                }
            }
        };
        result.map_err(|source| MapError::Transformation {
            property: prop.to_string(),
            source,
        })
    }
}

fn resolve_source(record: &Record, key: &str) -> Value {
    if key.contains('.') {
        dot_get(record, key).cloned().unwrap_or(Value::Null)
    } else {
        record.get(key).cloned().unwrap_or(Value::Null)
    }
}
