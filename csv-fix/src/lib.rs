//! # csvfix - rewrite exported catalog CSV files for database import
//!
//! Three exports (pattern catalog, channels, products) are read, remapped
//! column by column, and written next to the originals as `*_fixed.csv`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ *_rows.csv  │────▶│   Parser    │────▶│  Transform  │────▶│*_fixed.csv  │
//! │  (export)   │     │ (RFC 4180)  │     │ (mapping)   │     │  (import)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvfix::{transform, RecordType};
//!
//! let kind = RecordType::Product;
//! let mut out = Vec::new();
//! let rows = transform(input, &mut out, &kind.schema(), &kind.mapping())?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`logs`] - Console messages and diagnostics setup
//! - [`parser`] - CSV dialect and source-row access
//! - [`transform`] - Schemas, mapping rules and the streaming transformer
//! - [`schemas`] - Built-in record types
//! - [`pipeline`] - Batch run over the known export files

// Core modules
pub mod error;
pub mod logs;

// Parsing
pub mod parser;

// Transformation
pub mod schemas;
pub mod transform;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{FixError, FixResult, MappingError, MappingResult};

pub use logs::{init_tracing, ConsoleLog, LogEntry, LogLevel};

pub use schemas::RecordType;

pub use transform::{
    transform,
    transform_file,
    transform_stream,
    FieldMapping,
    RecordSchema,
    Rule,
    TransformStats,
};

pub use pipeline::{
    fix_job,
    next_steps,
    run,
    ColumnChange,
    FixConfig,
    FixJob,
    JobOutcome,
    RunReport,
};
