//! Built-in record types and their import schemas.
//!
//! Each export keeps its own id policy:
//!
//! | Record type     | Source `id`                     |
//! |-----------------|---------------------------------|
//! | pattern catalog | kept as `id`                    |
//! | channel         | dropped, the database assigns a UUID |
//! | product         | kept as `legacy_id`             |

use serde::{Deserialize, Serialize};

use crate::transform::{FieldMapping, RecordSchema, Rule};

/// Output columns for `cp_cartoon_patterns`
pub const PATTERN_CATALOG_FIELDS: [&str; 5] =
    ["id", "pattern_name", "image_url", "is_active", "created_at"];

/// Output columns for `channels`
pub const CHANNEL_FIELDS: [&str; 5] = [
    "channel_code",
    "channel_name",
    "last_used_prefix",
    "bank_account",
    "created_at",
];

/// Output columns for `pr_products`
pub const PRODUCT_FIELDS: [&str; 11] = [
    "product_code",
    "product_name",
    "product_type",
    "product_category",
    "storage_location",
    "rubber_code",
    "is_active",
    "image_url",
    "legacy_id",
    "created_at",
    "updated_at",
];

/// Default for a missing `is_active` column
const ACTIVE_BY_DEFAULT: &str = "true";

/// The known exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    PatternCatalog,
    Channel,
    Product,
}

impl RecordType {
    /// All record types, in processing order
    pub const ALL: [RecordType; 3] = [
        RecordType::PatternCatalog,
        RecordType::Channel,
        RecordType::Product,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RecordType::PatternCatalog => "pattern catalog",
            RecordType::Channel => "channel",
            RecordType::Product => "product",
        }
    }

    /// Destination table the fixed file is imported into
    pub fn table(&self) -> &'static str {
        match self {
            RecordType::PatternCatalog => "cp_cartoon_patterns",
            RecordType::Channel => "channels",
            RecordType::Product => "pr_products",
        }
    }

    pub fn input_file(&self) -> &'static str {
        match self {
            RecordType::PatternCatalog => "cartoon_patterns_rows.csv",
            RecordType::Channel => "channels_rows.csv",
            RecordType::Product => "products_rows.csv",
        }
    }

    pub fn output_file(&self) -> &'static str {
        match self {
            RecordType::PatternCatalog => "cartoon_patterns_rows_fixed.csv",
            RecordType::Channel => "channels_rows_fixed.csv",
            RecordType::Product => "products_rows_fixed.csv",
        }
    }

    /// Why the columns change, shown after a successful fix
    pub fn note(&self) -> &'static str {
        match self {
            RecordType::PatternCatalog => "pattern_code is no longer needed",
            RecordType::Channel => "id will be auto-generated as UUID",
            RecordType::Product => "numeric id kept as legacy_id, updated_at copied from created_at",
        }
    }

    pub fn schema(&self) -> RecordSchema {
        match self {
            RecordType::PatternCatalog => RecordSchema::new(self.name(), PATTERN_CATALOG_FIELDS),
            RecordType::Channel => RecordSchema::new(self.name(), CHANNEL_FIELDS),
            RecordType::Product => RecordSchema::new(self.name(), PRODUCT_FIELDS),
        }
    }

    pub fn mapping(&self) -> FieldMapping {
        match self {
            RecordType::PatternCatalog => pattern_catalog_mapping(),
            RecordType::Channel => channel_mapping(),
            RecordType::Product => product_mapping(),
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn pattern_catalog_mapping() -> FieldMapping {
    FieldMapping::new()
        .with_copies(["id", "image_url", "created_at"])
        .with_rule("pattern_name", Rule::copy_trimmed("pattern_name", ""))
        .with_rule("is_active", Rule::copy("is_active", ACTIVE_BY_DEFAULT))
}

fn channel_mapping() -> FieldMapping {
    FieldMapping::new().with_copies(CHANNEL_FIELDS)
}

fn product_mapping() -> FieldMapping {
    FieldMapping::new()
        .with_copies([
            "product_code",
            "product_name",
            "product_type",
            "product_category",
            "storage_location",
            "rubber_code",
            "image_url",
            "created_at",
        ])
        .with_rule("is_active", Rule::copy("is_active", ACTIVE_BY_DEFAULT))
        .with_rule("legacy_id", Rule::carry_as("id"))
        // no update timestamp in the export
        .with_rule("updated_at", Rule::alias("created_at"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform;

    fn fix(record_type: RecordType, input: &str) -> (usize, Vec<String>) {
        let mut out = Vec::new();
        let rows = transform(
            input.as_bytes(),
            &mut out,
            &record_type.schema(),
            &record_type.mapping(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        (rows, text.lines().map(str::to_string).collect())
    }

    #[test]
    fn test_builtin_mappings_validate() {
        for record_type in RecordType::ALL {
            let schema = record_type.schema();
            assert!(
                record_type.mapping().validate(&schema).is_ok(),
                "{} mapping does not cover its schema",
                record_type
            );
        }
    }

    #[test]
    fn test_header_written_for_empty_inputs() {
        for record_type in RecordType::ALL {
            for input in ["", "id,created_at\n"] {
                let (rows, lines) = fix(record_type, input);
                assert_eq!(rows, 0);
                assert_eq!(lines, vec![record_type.schema().fields.join(",")]);
            }
        }
    }

    #[test]
    fn test_pattern_catalog_row() {
        let (_, lines) = fix(
            RecordType::PatternCatalog,
            "id,pattern_code,pattern_name,image_url,created_at\n\
             42,FX-1, Fox ,https://cdn.example/fox.png,2024-03-01 10:00:00\n",
        );

        assert_eq!(lines[0], "id,pattern_name,image_url,is_active,created_at");
        assert_eq!(lines[1], "42,Fox,https://cdn.example/fox.png,true,2024-03-01 10:00:00");
    }

    #[test]
    fn test_is_active_defaults_to_true() {
        let (_, pattern) = fix(RecordType::PatternCatalog, "id\n1\n");
        assert_eq!(pattern[1], "1,,,true,");

        let (_, product) = fix(RecordType::Product, "product_code\nP1\n");
        assert_eq!(product[1], "P1,,,,,,true,,,,");
    }

    #[test]
    fn test_is_active_kept_when_present() {
        let (_, lines) = fix(RecordType::PatternCatalog, "id,is_active\n1,false\n");
        assert_eq!(lines[1], "1,,,false,");
    }

    #[test]
    fn test_channel_drops_id() {
        let (_, lines) = fix(
            RecordType::Channel,
            "id,channel_code,channel_name,last_used_prefix,bank_account,created_at\n\
             99,SHOPEE,Shopee,SP,123-4-56789-0,2024-01-01\n",
        );

        assert_eq!(lines[0], "channel_code,channel_name,last_used_prefix,bank_account,created_at");
        assert_eq!(lines[1], "SHOPEE,Shopee,SP,123-4-56789-0,2024-01-01");
        assert!(!lines.iter().any(|l| l.contains("99")));
    }

    #[test]
    fn test_product_legacy_id_and_updated_at() {
        let (_, lines) = fix(
            RecordType::Product,
            "id,product_code,created_at\n7,P1,2024-01-01\n",
        );

        let header: Vec<&str> = lines[0].split(',').collect();
        let row: Vec<&str> = lines[1].split(',').collect();
        let value = |name: &str| row[header.iter().position(|h| *h == name).unwrap()];

        assert!(!header.contains(&"id"));
        assert_eq!(value("legacy_id"), "7");
        assert_eq!(value("updated_at"), "2024-01-01");
        assert_eq!(value("created_at"), "2024-01-01");
        assert_eq!(value("product_code"), "P1");
        assert_eq!(value("is_active"), "true");
    }

    #[test]
    fn test_product_ignores_source_updated_at() {
        let (_, lines) = fix(
            RecordType::Product,
            "id,created_at,updated_at\n7,2024-01-01,2025-06-30\n",
        );
        assert!(lines[1].ends_with("7,2024-01-01,2024-01-01"));
    }

    #[test]
    fn test_row_count_matches_input() {
        let input = "id,product_code\n1,A\n2,B\n3,C\n3,C\n";
        let (rows, lines) = fix(RecordType::Product, input);
        assert_eq!(rows, 4);
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_filenames_distinct() {
        for record_type in RecordType::ALL {
            assert_ne!(record_type.input_file(), record_type.output_file());
            assert!(record_type.output_file().ends_with("_fixed.csv"));
        }
    }
}
