pub mod error;
pub mod record;
pub mod registry;
pub mod schema;

pub use error::ModelError;
pub use record::{Record, Value, ValueKind, dot_get, kind_name};
pub use registry::{RECORD_TYPE, TypeRegistry};
pub use schema::{Hydrator, ParamSpec, PropertySpec, TypeSchema, TypeSchemaBuilder};
