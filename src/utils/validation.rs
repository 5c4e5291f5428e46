//! Centralized validation of raw plant tables.

use crate::parsing::table::RawTable;

/// Columns every raw plant table must provide (matched case-insensitively)
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "province", "fuel", "capacity", "status"];

/// Columns that can stand in for a missing `name` column
pub const PLANT_NAME_COLUMN: &str = "plant name";
pub const UNIT_NAME_COLUMN: &str = "unit name";

/// Alternative spellings of each required column, in order of preference.
///
/// A header matches an alias when it is equal after spaces are read as `_`.
/// Aliases only apply when the canonical column is absent.
pub const COLUMN_ALIASES: [(&str, &[&str]); 5] = [
    ("name", &["plant_name", "plant"]),
    ("province", &["location"]),
    ("fuel", &["fuel_type"]),
    ("capacity", &["capacity_mwe", "generation_capacity"]),
    ("status", &["construction_stage", "stage"]),
];

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The input table is empty")]
    EmptyTable,

    #[error(
        "Table missing required columns: {}; required: {}; found: {}",
        missing.join(", "),
        REQUIRED_COLUMNS.join(", "),
        found.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} has no name")]
    MissingName { row: usize },
}

/// Validate a raw table and bring its header row into canonical form.
///
/// On success every header is trimmed and lowercased, and a `name` column
/// exists. When `name` is absent but both `plant name` and `unit name` are
/// present, `name` is synthesized as `"{plant name} {unit name}"`. Columns
/// still missing after that are looked up under [`COLUMN_ALIASES`].
///
/// # Errors
///
/// Returns `ValidationError::EmptyTable` when the table has no rows,
/// `ValidationError::RaggedRow` when a row width differs from the header,
/// or `ValidationError::MissingColumns` naming every required column that is
/// still missing.
pub fn validate_table(table: &mut RawTable) -> Result<(), ValidationError> {
    tracing::debug!(
        rows = table.len(),
        columns = table.headers.len(),
        "Validating table"
    );

    if table.is_empty() {
        return Err(ValidationError::EmptyTable);
    }

    let width = table.headers.len();
    if let Some((row, cells)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != width)
    {
        return Err(ValidationError::RaggedRow {
            row,
            expected: width,
            found: cells.len(),
        });
    }

    for header in &mut table.headers {
        *header = header.trim().to_lowercase();
    }

    if table.column_index("name").is_none() {
        synthesize_name_column(table);
    }
    apply_column_aliases(table);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| table.column_index(col).is_none())
        .map(|col| (*col).to_string())
        .collect();

    if !missing.is_empty() {
        let mut found = table.headers.clone();
        found.sort();
        return Err(ValidationError::MissingColumns { missing, found });
    }

    Ok(())
}

/// Rename the first alias header found for each missing required column
fn apply_column_aliases(table: &mut RawTable) {
    for (canonical, aliases) in COLUMN_ALIASES {
        if table.column_index(canonical).is_some() {
            continue;
        }
        let found = aliases.iter().find_map(|alias| {
            table
                .headers
                .iter()
                .position(|header| header.replace(' ', "_") == *alias)
        });
        if let Some(col) = found {
            tracing::debug!(column = canonical, header = %table.headers[col], "Using column alias");
            table.headers[col] = canonical.to_string();
        }
    }
}

/// Append a `name` column built from `plant name` and `unit name`, if both exist.
fn synthesize_name_column(table: &mut RawTable) {
    let (Some(plant_col), Some(unit_col)) = (
        table.column_index(PLANT_NAME_COLUMN),
        table.column_index(UNIT_NAME_COLUMN),
    ) else {
        return;
    };

    tracing::info!(
        "No 'name' column; building it from '{PLANT_NAME_COLUMN}' and '{UNIT_NAME_COLUMN}'"
    );

    for row in &mut table.rows {
        let plant = row[plant_col].as_deref();
        let unit = row[unit_col].as_deref();
        let name = match (plant, unit) {
            (None, None) => None,
            (plant, unit) => Some(
                format!("{} {}", plant.unwrap_or(""), unit.unwrap_or(""))
                    .trim()
                    .to_string(),
            ),
        };
        row.push(name);
    }
    table.headers.push("name".to_string());
}
