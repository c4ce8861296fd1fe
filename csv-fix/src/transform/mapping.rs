//! Record schemas and field mappings
//!
//! A [`RecordSchema`] fixes the output columns and their order. A
//! [`FieldMapping`] says how each of those columns is derived from a source
//! row. Both are plain data and round-trip through JSON.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{MappingError, MappingResult};

/// Derivation rule for one output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Source field value, or `default` when the column is absent
    Copy {
        source: String,
        #[serde(default)]
        default: String,
    },

    /// Like `Copy`, with surrounding whitespace stripped
    CopyTrimmed {
        source: String,
        #[serde(default)]
        default: String,
    },

    /// Raw source value stored under the output name, empty when absent
    CarryAs { source: String },

    /// Value already computed for another output field of the same row
    Alias { field: String },
}

impl Rule {
    pub fn copy(source: impl Into<String>, default: impl Into<String>) -> Self {
        Rule::Copy { source: source.into(), default: default.into() }
    }

    pub fn copy_trimmed(source: impl Into<String>, default: impl Into<String>) -> Self {
        Rule::CopyTrimmed { source: source.into(), default: default.into() }
    }

    pub fn carry_as(source: impl Into<String>) -> Self {
        Rule::CarryAs { source: source.into() }
    }

    pub fn alias(field: impl Into<String>) -> Self {
        Rule::Alias { field: field.into() }
    }

    /// Source column read by this rule, if any
    pub fn source(&self) -> Option<&str> {
        match self {
            Rule::Copy { source, .. } | Rule::CopyTrimmed { source, .. } | Rule::CarryAs { source } => {
                Some(source.as_str())
            }
            Rule::Alias { .. } => None,
        }
    }
}

/// Ordered output columns of one record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Record type name, used in error messages
    pub name: String,
    /// Output field names, in write order
    pub fields: Vec<String>,
}

impl RecordSchema {
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }
}

/// Rules keyed by output field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub rules: BTreeMap<String, Rule>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the rule for `target`
    pub fn with_rule(mut self, target: impl Into<String>, rule: Rule) -> Self {
        self.rules.insert(target.into(), rule);
        self
    }

    /// Map every listed field with `copy(same-name, "")`
    pub fn with_copies<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            self.rules.insert(field.clone(), Rule::copy(field, ""));
        }
        self
    }

    pub fn rule(&self, target: &str) -> Option<&Rule> {
        self.rules.get(target)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Source columns read by any rule, sorted and deduplicated
    pub fn source_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .rules
            .values()
            .filter_map(Rule::source)
            .map(str::to_string)
            .collect();
        columns.sort();
        columns.dedup();
        columns
    }

    /// Check that this mapping is total over `schema`.
    ///
    /// Every schema field needs exactly one rule, no rule may target an
    /// undeclared field, and an alias must point at a field declared
    /// earlier in the schema so its value exists when the alias runs.
    pub fn validate(&self, schema: &RecordSchema) -> MappingResult<()> {
        let mut seen = HashSet::new();
        for field in &schema.fields {
            if !seen.insert(field.as_str()) {
                return Err(MappingError::DuplicateField {
                    schema: schema.name.clone(),
                    field: field.clone(),
                });
            }
        }

        for (idx, field) in schema.fields.iter().enumerate() {
            match self.rules.get(field) {
                None => {
                    return Err(MappingError::MissingRule {
                        schema: schema.name.clone(),
                        field: field.clone(),
                    })
                }
                Some(Rule::Alias { field: target }) => {
                    let computed_before = schema.fields[..idx].iter().any(|f| f == target);
                    if !computed_before {
                        return Err(MappingError::AliasNotComputed {
                            schema: schema.name.clone(),
                            field: field.clone(),
                            target: target.clone(),
                        });
                    }
                }
                Some(_) => {}
            }
        }

        if let Some(extra) = self.rules.keys().find(|k| !schema.contains(k)) {
            return Err(MappingError::UnknownTarget {
                schema: schema.name.clone(),
                field: extra.clone(),
            });
        }

        Ok(())
    }
}
