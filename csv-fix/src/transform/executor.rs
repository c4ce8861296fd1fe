//! Streaming record transformer
//!
//! Reads header-first CSV, derives each output row from its source row with
//! a [`FieldMapping`], and writes rows in [`RecordSchema`] order. One record
//! is held in memory at a time.

use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use super::mapping::{FieldMapping, RecordSchema, Rule};
use crate::error::{FixResult, MappingError};
use crate::parser::{self, HeaderIndex, SourceRow};

/// Outcome of one transformation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformStats {
    /// Data rows written (header excluded)
    pub rows: usize,
    /// Column names found in the input header
    pub input_headers: Vec<String>,
}

/// A rule resolved against its schema, ready to run per row
#[derive(Debug, Clone, Copy)]
enum Step<'m> {
    Copy {
        source: &'m str,
        default: &'m str,
        trim: bool,
    },
    Carry {
        source: &'m str,
    },
    /// Index of an output field computed earlier in the row
    Alias(usize),
}

/// Validate `mapping` and lay its rules out in schema order
fn plan<'m>(schema: &'m RecordSchema, mapping: &'m FieldMapping) -> FixResult<Vec<Step<'m>>> {
    mapping.validate(schema)?;

    let missing = |field: &str| MappingError::MissingRule {
        schema: schema.name.clone(),
        field: field.to_string(),
    };

    let mut steps = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        let step = match mapping.rule(field).ok_or_else(|| missing(field.as_str()))? {
            Rule::Copy { source, default } => Step::Copy { source, default, trim: false },
            Rule::CopyTrimmed { source, default } => Step::Copy { source, default, trim: true },
            Rule::CarryAs { source } => Step::Carry { source },
            Rule::Alias { field: target } => {
                Step::Alias(schema.position(target).ok_or_else(|| missing(target.as_str()))?)
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

/// Derive one output row into `out`
fn apply(steps: &[Step<'_>], row: SourceRow<'_>, out: &mut Vec<String>) {
    out.clear();
    for step in steps {
        let value = match *step {
            Step::Copy { source, default, trim } => {
                let value = row.get(source).unwrap_or(default);
                let value = if trim { value.trim() } else { value };
                value.to_string()
            }
            Step::Carry { source } => row.get(source).unwrap_or_default().to_string(),
            Step::Alias(idx) => out[idx].clone(),
        };
        out.push(value);
    }
}

/// Transform CSV from `input` to `output`, returning the number of data rows written.
///
/// The output header is `schema.fields` and is written even when the input
/// holds no data rows. Source columns are matched by name; a column a rule
/// needs but the input lacks takes the rule's default. Neither stream is
/// closed; `output` is flushed.
///
/// # Errors
/// * `SchemaMapping` if `mapping` is not total over `schema` (checked before reading)
/// * `MalformedInput` if a row's field count differs from the header or the text is not UTF-8
/// * `Io` on read or write failure
pub fn transform<R: Read, W: Write>(
    input: R,
    output: W,
    schema: &RecordSchema,
    mapping: &FieldMapping,
) -> FixResult<usize> {
    transform_stream(input, output, schema, mapping).map(|stats| stats.rows)
}

/// Same as [`transform`], also reporting the input header
pub fn transform_stream<R: Read, W: Write>(
    input: R,
    output: W,
    schema: &RecordSchema,
    mapping: &FieldMapping,
) -> FixResult<TransformStats> {
    let steps = plan(schema, mapping)?;

    let mut reader = parser::reader(input);
    let headers = HeaderIndex::read(&mut reader)?;
    debug!(schema = %schema.name, headers = ?headers.names(), "read input header");

    for column in mapping.source_columns() {
        if !headers.contains(&column) {
            debug!(schema = %schema.name, %column, "source column absent, default applies");
        }
    }

    let mut writer = parser::writer(output);
    writer.write_record(&schema.fields)?;

    let mut record = StringRecord::new();
    let mut out = Vec::with_capacity(schema.fields.len());
    let mut rows = 0;

    while reader.read_record(&mut record)? {
        apply(&steps, SourceRow::new(&headers, &record), &mut out);
        writer.write_record(&out)?;
        rows += 1;
    }

    writer.flush()?;
    debug!(schema = %schema.name, rows, "transform complete");

    Ok(TransformStats {
        rows,
        input_headers: headers.names().to_vec(),
    })
}

/// Transform the file at `input_path` into a fresh file at `output_path`.
///
/// The output is created or truncated. A failure part-way may leave a
/// truncated output behind; running again overwrites it.
pub fn transform_file(
    input_path: &Path,
    output_path: &Path,
    schema: &RecordSchema,
    mapping: &FieldMapping,
) -> FixResult<TransformStats> {
    // Fail on a bad mapping before touching the output file
    mapping.validate(schema)?;

    let mut input = File::open(input_path)?;
    let mut output = File::create(output_path)?;
    transform_stream(&mut input, &mut output, schema, mapping)
}
