use crate::core::record::Record;
use crate::normalize::config::{CleanerConfig, CleanerError};
use crate::normalize::text::{parse_capacity, sort_slash_tokens, TextRules};
use crate::parsing::table::RawTable;
use crate::utils::validation::{validate_table, ValidationError};

/// Turns raw plant tables into normalized [`Record`]s
///
/// Each text column has its own compiled [`TextRules`]; names additionally
/// get drop patterns. Capacity is parsed, never cleaned as text.
#[derive(Debug, Clone)]
pub struct PlantCleaner {
    name_rules: TextRules,
    province_rules: TextRules,
    fuel_rules: TextRules,
    status_rules: TextRules,
}

impl PlantCleaner {
    /// Compile a cleaner from a config
    ///
    /// # Errors
    ///
    /// Returns `CleanerError::InvalidPattern` if any pattern fails to compile.
    pub fn new(config: &CleanerConfig) -> Result<Self, CleanerError> {
        let cleaner = Self {
            name_rules: TextRules::compile(&config.name_drops, &config.name_substitutions)?,
            province_rules: TextRules::compile(&[], &config.province_substitutions)?,
            fuel_rules: TextRules::compile(&[], &config.fuel_substitutions)?,
            status_rules: TextRules::compile(&[], &config.status_substitutions)?,
        };
        tracing::debug!(
            name_rules = cleaner.name_rules.rule_count(),
            province_rules = cleaner.province_rules.rule_count(),
            fuel_rules = cleaner.fuel_rules.rule_count(),
            status_rules = cleaner.status_rules.rule_count(),
            "Compiled cleaner"
        );
        Ok(cleaner)
    }

    /// Cleaner using the embedded default rules
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded config is invalid.
    pub fn with_defaults() -> Result<Self, CleanerError> {
        Self::new(&CleanerConfig::load_embedded()?)
    }

    /// Cleaner that only lowercases, strips diacritics and collapses whitespace
    #[must_use]
    pub fn plain() -> Self {
        Self {
            name_rules: TextRules::none(),
            province_rules: TextRules::none(),
            fuel_rules: TextRules::none(),
            status_rules: TextRules::none(),
        }
    }

    #[must_use]
    pub fn clean_name(&self, name: Option<&str>) -> Option<String> {
        self.name_rules.clean(name)
    }

    #[must_use]
    pub fn clean_province(&self, province: Option<&str>) -> Option<String> {
        self.province_rules.clean(province)
    }

    /// Clean a fuel value; multi-fuel values are token-sorted after cleaning.
    #[must_use]
    pub fn clean_fuel(&self, fuel: Option<&str>) -> Option<String> {
        self.fuel_rules.clean(fuel).map(|f| sort_slash_tokens(&f))
    }

    #[must_use]
    pub fn clean_status(&self, status: Option<&str>) -> Option<String> {
        self.status_rules.clean(status)
    }

    /// Validate a raw table and clean every row.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` from [`validate_table`], or
    /// `ValidationError::MissingName` for a row whose name is missing.
    pub fn clean_table(&self, mut table: RawTable) -> Result<Vec<Record>, ValidationError> {
        validate_table(&mut table)?;
        tracing::info!(rows = table.len(), "Cleaning table");

        // Columns are guaranteed present after validation
        let col = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| ValidationError::MissingColumns {
                    missing: vec![name.to_string()],
                    found: table.headers.clone(),
                })
        };
        let name_col = col("name")?;
        let province_col = col("province")?;
        let fuel_col = col("fuel")?;
        let capacity_col = col("capacity")?;
        let status_col = col("status")?;

        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let raw_name = table.cell(row, name_col);
            let (Some(name), Some(name_clean)) = (raw_name, self.clean_name(raw_name)) else {
                return Err(ValidationError::MissingName { row });
            };

            let record = Record {
                name: name.to_string(),
                name_clean,
                capacity_clean: parse_capacity(table.cell(row, capacity_col)),
                province_clean: self.clean_province(table.cell(row, province_col)),
                fuel_clean: self.clean_fuel(table.cell(row, fuel_col)),
                status_clean: self.clean_status(table.cell(row, status_col)),
            };
            tracing::trace!(?record, "Cleaned row {row}");
            records.push(record);
        }

        let unparsed = records.iter().filter(|r| r.capacity_clean.is_none()).count();
        if unparsed > 0 {
            tracing::debug!("{unparsed} of {} rows have no usable capacity", records.len());
        }

        Ok(records)
    }
}
