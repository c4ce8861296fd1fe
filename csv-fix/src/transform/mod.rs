//! Record transformation.
//!
//! - Mapping: record schemas, derivation rules and their validation
//! - Executor: streaming CSV read-transform-write pass

pub mod executor;
pub mod mapping;

pub use executor::{transform, transform_file, transform_stream, TransformStats};
pub use mapping::{FieldMapping, RecordSchema, Rule};
