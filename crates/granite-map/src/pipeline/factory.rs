//! Destination construction and population.

use granite_model::{RECORD_TYPE, Record, TypeRegistry, TypeSchema, Value, kind_name};

use crate::error::{MapError, Result};

/// One non-fatal field-write problem collected during construction or
/// population. Population is best-effort by design; these make the losses
/// visible instead of swallowing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateWarning {
    /// Destination property that was skipped.
    pub property: String,
    /// Why the write did not happen.
    pub reason: String,
}

/// Builds and populates destination instances from transformed data.
pub struct ObjectFactory;

impl ObjectFactory {
    /// Constructs an instance of `dest_type` from transformed data.
    ///
    /// A generic record target is produced directly. A hydration-capable
    /// type delegates entirely to its hydrator. Otherwise construction
    /// matches constructor parameters by name (consuming matched keys),
    /// falling back per parameter to its declared default, then null when
    /// nullable, then the kind's zero value; leftover data entries are
    /// written onto fields afterwards.
    pub fn create(
        data: Record,
        dest_type: &str,
        types: &TypeRegistry,
    ) -> Result<(Value, Vec<PopulateWarning>)> {
        if dest_type == RECORD_TYPE {
            return Ok((Value::Object(data), Vec::new()));
        }
        let schema = types
            .get(dest_type)
            .ok_or_else(|| MapError::DestinationTypeNotFound(dest_type.to_string()))?;
        if let Some(hydrator) = schema.hydrator() {
            return Ok((hydrator(&data), Vec::new()));
        }

        let mut data = data;
        let mut fields = Record::new();
        for param in schema.params() {
            let value = match data.remove(&param.name) {
                Some(found) => found,
                None => match &param.default {
                    Some(default) => default.clone(),
                    None if param.nullable => Value::Null,
                    None => param.kind.zero(),
                },
            };
            fields.insert(param.name.clone(), value);
        }

        let mut warnings = Vec::new();
        write_fields(&mut fields, data, schema, &mut warnings);
        Ok((Value::Object(fields), warnings))
    }

    /// Applies the leftover-field-write step to an existing instance.
    ///
    /// Read-only properties are skipped with a warning, as are values that
    /// contradict a declared property kind; unknown keys become dynamic
    /// fields.
    pub fn populate(
        instance: &mut Record,
        data: Record,
        schema: Option<&TypeSchema>,
    ) -> Vec<PopulateWarning> {
        let mut warnings = Vec::new();
        match schema {
            Some(schema) => write_fields(instance, data, schema, &mut warnings),
            None => instance.extend(data),
        }
        warnings
    }
}

fn write_fields(
    fields: &mut Record,
    data: Record,
    schema: &TypeSchema,
    warnings: &mut Vec<PopulateWarning>,
) {
    for (key, value) in data {
        match schema.property(&key) {
            Some(prop) if prop.read_only => {
                warnings.push(PopulateWarning {
                    property: key,
                    reason: "read-only property".to_string(),
                });
            }
            Some(prop) if !prop.kind.accepts(&value) => {
                warnings.push(PopulateWarning {
                    property: key,
                    reason: format!(
                        "value kind {} does not fit declared {:?}",
                        kind_name(&value),
                        prop.kind
                    ),
                });
            }
            _ => {
                fields.insert(key, value);
            }
        }
    }
}
