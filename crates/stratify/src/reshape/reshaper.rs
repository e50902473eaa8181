//! Wide extract → tidy per-entity table.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::label::{
    clean_numeric_text, parse_finite, split_label, transpose, RawRecord, LABEL_DELIMITER,
};
use crate::error::{Result, StratifyError, StructuralError};
use crate::input::DataTable;

/// Entities matching this are header artifacts or national aggregates.
static DEFAULT_EXCLUSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Label|United States").unwrap());

/// Reshaper configuration.
#[derive(Debug, Clone)]
pub struct ReshapeConfig {
    /// Separator between entity and metric in a label.
    pub label_delimiter: String,
    /// Metric kept as the numeric `Income` column.
    pub estimate_metric: String,
    /// Metric kept as the `MOE` column.
    pub moe_metric: String,
    /// Case-sensitive substrings that exclude an entity.
    pub excluded_entities: Vec<String>,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            label_delimiter: LABEL_DELIMITER.to_string(),
            estimate_metric: "Estimate".to_string(),
            moe_metric: "Margin of Error".to_string(),
            excluded_entities: vec!["Label".to_string(), "United States".to_string()],
        }
    }
}

/// One row of the tidy output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    #[serde(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Income")]
    pub income: f64,
    #[serde(rename = "MOE")]
    pub moe: String,
}

/// Why an entity was dropped during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterReason {
    /// No estimate cell for this entity.
    MissingEstimate,
    /// The cleaned estimate text is not a number.
    NotNumeric,
}

impl FilterReason {
    pub fn label(&self) -> &'static str {
        match self {
            FilterReason::MissingEstimate => "missing estimate",
            FilterReason::NotNumeric => "estimate is not numeric",
        }
    }
}

/// An entity dropped for a bad value. Not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredRow {
    pub entity: String,
    /// Estimate text as it appeared in the source, if any.
    pub raw_value: Option<String>,
    pub reason: FilterReason,
}

/// The tidy table plus what was left out of it.
#[derive(Debug, Clone, Default)]
pub struct CleanTable {
    /// Rows ordered by entity name.
    pub records: Vec<CleanRecord>,
    /// Entities dropped because their estimate did not parse.
    pub filtered: Vec<FilteredRow>,
    /// Entities dropped by the exclusion pattern.
    pub excluded: Vec<String>,
}

impl CleanTable {
    /// Build a table from records that are already clean (e.g. read back from disk).
    pub fn from_records(records: Vec<CleanRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CleanRecord> {
        self.records.iter()
    }

    /// All income values in row order.
    pub fn incomes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.income).collect()
    }
}

/// Reshapes a one-row wide extract into a [`CleanTable`].
pub struct Reshaper {
    config: ReshapeConfig,
    exclusion: Option<Regex>,
}

impl Reshaper {
    /// Create a reshaper with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReshapeConfig::default(),
            exclusion: Some(DEFAULT_EXCLUSION.clone()),
        }
    }

    /// Create a reshaper with custom configuration.
    pub fn with_config(config: ReshapeConfig) -> Result<Self> {
        if config.label_delimiter.is_empty() {
            return Err(StratifyError::Config(
                "label delimiter must not be empty".to_string(),
            ));
        }
        if config.excluded_entities.iter().any(|p| p.is_empty()) {
            return Err(StratifyError::Config(
                "excluded entity patterns must not be empty".to_string(),
            ));
        }

        let exclusion = if config.excluded_entities.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = config
                .excluded_entities
                .iter()
                .map(|p| regex::escape(p))
                .collect();
            let regex = Regex::new(&alternatives.join("|")).map_err(|e| {
                StratifyError::Config(format!("invalid exclusion pattern: {}", e))
            })?;
            Some(regex)
        };

        Ok(Self { config, exclusion })
    }

    pub fn config(&self) -> &ReshapeConfig {
        &self.config
    }

    /// Whether an entity name is excluded from the tidy table.
    pub fn is_excluded(&self, entity: &str) -> bool {
        self.exclusion
            .as_ref()
            .is_some_and(|regex| regex.is_match(entity))
    }

    /// Reshape a parsed wide table.
    pub fn reshape_table(&self, table: &DataTable) -> Result<CleanTable> {
        let records = transpose(table)?;
        self.reshape_records(&records)
    }

    /// Reshape already-transposed label/value pairs.
    pub fn reshape_records(&self, records: &[RawRecord]) -> Result<CleanTable> {
        let pivot = self.pivot(records)?;

        let has_metric = |metric: &str| pivot.values().any(|m| m.contains_key(metric));
        for metric in [&self.config.estimate_metric, &self.config.moe_metric] {
            if !has_metric(metric) {
                return Err(StructuralError::MissingMetric(metric.clone()).into());
            }
        }

        let mut table = CleanTable::default();

        for (entity, metrics) in pivot {
            if self.is_excluded(&entity) {
                table.excluded.push(entity);
                continue;
            }

            let estimate = metrics.get(&self.config.estimate_metric);
            let income = match estimate {
                Some(raw) => parse_finite(&clean_numeric_text(raw)),
                None => None,
            };

            let Some(income) = income else {
                let reason = if estimate.is_some() {
                    FilterReason::NotNumeric
                } else {
                    FilterReason::MissingEstimate
                };
                table.filtered.push(FilteredRow {
                    entity,
                    raw_value: estimate.cloned(),
                    reason,
                });
                continue;
            };

            let moe = metrics
                .get(&self.config.moe_metric)
                .map(|raw| clean_numeric_text(raw))
                .unwrap_or_default();

            table.records.push(CleanRecord {
                entity,
                income,
                moe,
            });
        }

        Ok(table)
    }

    /// Group values by entity, one column per metric.
    ///
    /// Entities come out sorted by name. Single-part labels that match the
    /// exclusion pattern are the extract's own row-label column and are
    /// skipped; every other label must split into exactly two parts.
    fn pivot(&self, records: &[RawRecord]) -> Result<BTreeMap<String, IndexMap<String, String>>> {
        let mut pivot: BTreeMap<String, IndexMap<String, String>> = BTreeMap::new();

        for record in records {
            let (entity, metric) = match split_label(&record.label, &self.config.label_delimiter) {
                Ok(parts) => parts,
                Err(_)
                    if !record.label.contains(self.config.label_delimiter.as_str())
                        && self.is_excluded(&record.label) =>
                {
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let metrics = pivot.entry(entity.to_string()).or_default();
            if metrics.contains_key(metric) {
                return Err(StructuralError::DuplicateEntry {
                    entity: entity.to_string(),
                    metric: metric.to_string(),
                }
                .into());
            }
            metrics.insert(metric.to_string(), record.value.clone());
        }

        Ok(pivot)
    }
}

impl Default for Reshaper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn autauga_records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("Label (Grouping)", "Median household income"),
            RawRecord::new("Autauga County, Alabama!!Estimate", "58,786"),
            RawRecord::new("Autauga County, Alabama!!Margin of Error", "±2,345"),
        ]
    }

    #[test]
    fn test_autauga_scenario() {
        let table = Reshaper::new().reshape_records(&autauga_records()).unwrap();

        assert_eq!(
            table.records,
            vec![CleanRecord {
                entity: "Autauga County, Alabama".to_string(),
                income: 58786.0,
                moe: "2345".to_string(),
            }]
        );
        assert!(table.filtered.is_empty());
    }

    #[test]
    fn test_united_states_excluded() {
        let mut records = autauga_records();
        records.push(RawRecord::new("United States!!Estimate", "75,149"));
        records.push(RawRecord::new("United States!!Margin of Error", "±145"));

        let table = Reshaper::new().reshape_records(&records).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.excluded, vec!["United States".to_string()]);
    }

    #[test]
    fn test_not_numeric_estimate_is_filtered() {
        let mut records = autauga_records();
        records.push(RawRecord::new("Loving County, Texas!!Estimate", "N/A"));
        records.push(RawRecord::new("Loving County, Texas!!Margin of Error", "**"));

        let table = Reshaper::new().reshape_records(&records).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.filtered,
            vec![FilteredRow {
                entity: "Loving County, Texas".to_string(),
                raw_value: Some("N/A".to_string()),
                reason: FilterReason::NotNumeric,
            }]
        );
    }

    #[test]
    fn test_missing_estimate_cell_is_filtered() {
        let mut records = autauga_records();
        records.push(RawRecord::new("Kalawao County, Hawaii!!Margin of Error", "±10"));

        let table = Reshaper::new().reshape_records(&records).unwrap();

        assert_eq!(table.filtered.len(), 1);
        assert_eq!(table.filtered[0].reason, FilterReason::MissingEstimate);
        assert_eq!(table.filtered[0].raw_value, None);
    }

    #[test]
    fn test_missing_moe_cell_is_empty() {
        let records = vec![
            RawRecord::new("A!!Estimate", "10"),
            RawRecord::new("B!!Estimate", "20"),
            RawRecord::new("B!!Margin of Error", "±1"),
        ];

        let table = Reshaper::new().reshape_records(&records).unwrap();

        assert_eq!(table.records[0].moe, "");
        assert_eq!(table.records[1].moe, "1");
    }

    #[test]
    fn test_malformed_label_is_fatal() {
        let mut records = autauga_records();
        records.push(RawRecord::new("Geography", "0500000US01001"));

        let err = Reshaper::new().reshape_records(&records).unwrap_err();
        assert!(matches!(
            err,
            StratifyError::Structural(StructuralError::MalformedLabel { parts: 1, .. })
        ));
    }

    #[test]
    fn test_three_part_label_is_fatal_even_when_excluded() {
        let records = vec![RawRecord::new("United States!!Estimate!!Extra", "1")];

        let err = Reshaper::new().reshape_records(&records).unwrap_err();
        assert!(matches!(
            err,
            StratifyError::Structural(StructuralError::MalformedLabel { parts: 3, .. })
        ));
    }

    #[test]
    fn test_missing_metric_is_fatal() {
        let records = vec![RawRecord::new("A!!Estimate", "10")];

        let err = Reshaper::new().reshape_records(&records).unwrap_err();
        assert!(matches!(
            err,
            StratifyError::Structural(StructuralError::MissingMetric(ref m)) if m == "Margin of Error"
        ));
    }

    #[test]
    fn test_duplicate_entry_is_fatal() {
        let records = vec![
            RawRecord::new("A!!Estimate", "10"),
            RawRecord::new("A!!Estimate", "11"),
            RawRecord::new("A!!Margin of Error", "1"),
        ];

        let err = Reshaper::new().reshape_records(&records).unwrap_err();
        assert!(matches!(
            err,
            StratifyError::Structural(StructuralError::DuplicateEntry { .. })
        ));
    }

    #[test]
    fn test_other_metrics_dropped_and_entities_sorted() {
        let records = vec![
            RawRecord::new("Zavala County, Texas!!Estimate", "29,456"),
            RawRecord::new("Zavala County, Texas!!Margin of Error", "±5,010"),
            RawRecord::new("Zavala County, Texas!!Percent", "12%"),
            RawRecord::new("Ada County, Idaho!!Estimate", "71,000"),
            RawRecord::new("Ada County, Idaho!!Margin of Error", "±1,200"),
        ];

        let table = Reshaper::new().reshape_records(&records).unwrap();

        let names: Vec<&str> = table.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(names, vec!["Ada County, Idaho", "Zavala County, Texas"]);
    }

    #[test]
    fn test_exclusion_is_case_sensitive() {
        let reshaper = Reshaper::new();
        assert!(reshaper.is_excluded("Label (Grouping)"));
        assert!(reshaper.is_excluded("Total, United States"));
        assert!(!reshaper.is_excluded("label county"));
        assert!(!reshaper.is_excluded("united states"));
    }

    #[test]
    fn test_custom_config() {
        let config = ReshapeConfig {
            label_delimiter: "|".to_string(),
            estimate_metric: "Median".to_string(),
            moe_metric: "MOE".to_string(),
            excluded_entities: vec!["Total (all)".to_string()],
        };
        let reshaper = Reshaper::with_config(config).unwrap();
        let records = vec![
            RawRecord::new("North|Median", "1,000"),
            RawRecord::new("North|MOE", "±5"),
            RawRecord::new("Total (all)|Median", "9,999"),
        ];

        let table = reshaper.reshape_records(&records).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].income, 1000.0);
        assert!(reshaper.is_excluded("Total (all)"));
        assert!(!reshaper.is_excluded("Total (al)"));
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let config = ReshapeConfig {
            label_delimiter: String::new(),
            ..ReshapeConfig::default()
        };
        assert!(matches!(
            Reshaper::with_config(config),
            Err(StratifyError::Config(_))
        ));
    }
}
