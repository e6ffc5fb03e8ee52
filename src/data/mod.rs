pub mod load;
pub mod record;

pub use load::{default_data_path, load_table, read_records, LoadError};
pub use record::{Measure, Record, FALLBACK_COLUMNS};

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Where the rows of a table came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableSource {
    Loaded,
    Fallback,
}

impl TableSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableSource::Loaded => "loaded",
            TableSource::Fallback => "fallback",
        }
    }
}

/// Result of filtering the table by division.
#[derive(Debug, Clone, PartialEq)]
pub enum DivisionMatch {
    Rows(Vec<Record>),
    NotFound { division: String },
}

/// Immutable snapshot of the ESG dataset, built once at startup.
///
/// Cloning only bumps a reference count, so every request handler gets its
/// own handle to the same rows.
#[derive(Clone, Debug)]
pub struct EsgTable {
    records: Arc<[Record]>,
    source: TableSource,
    loaded_at: DateTime<Utc>,
}

impl EsgTable {
    pub fn loaded(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
            source: TableSource::Loaded,
            loaded_at: Utc::now(),
        }
    }

    /// Zero rows, fixed five-column schema.
    pub fn fallback() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            source: TableSource::Fallback,
            loaded_at: Utc::now(),
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &FALLBACK_COLUMNS
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> TableSource {
        self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Every row, in file order.
    pub fn list_all(&self) -> &[Record] {
        self.records()
    }

    /// Rows whose division equals `name` after lowercasing both sides.
    /// A miss carries the queried name verbatim.
    pub fn list_by_division(&self, name: &str) -> DivisionMatch {
        let lowered = name.to_lowercase();
        let rows: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.division_matches(&lowered))
            .cloned()
            .collect();

        if rows.is_empty() {
            DivisionMatch::NotFound {
                division: name.to_string(),
            }
        } else {
            DivisionMatch::Rows(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i64, division: &str, carbon: i64) -> Record {
        Record {
            year,
            division: division.to_string(),
            carbon_emissions_tons: Measure::Int(carbon),
            water_usage_kl: Measure::Int(1200),
            employee_diversity_percentage: Measure::Float(35.0),
        }
    }

    fn sample() -> EsgTable {
        EsgTable::loaded(vec![
            rec(2021, "Steel", 545),
            rec(2021, "Motors", 372),
            rec(2022, "Steel", 500),
            rec(2022, "Power Systems", 760),
        ])
    }

    #[test]
    fn test_list_all_keeps_load_order() {
        let table = sample();
        let years: Vec<_> = table
            .list_all()
            .iter()
            .map(|r| (r.year, r.division.as_str()))
            .collect();
        assert_eq!(
            years,
            vec![
                (2021, "Steel"),
                (2021, "Motors"),
                (2022, "Steel"),
                (2022, "Power Systems")
            ]
        );
        assert_eq!(table.source(), TableSource::Loaded);
    }

    #[test]
    fn test_fallback_is_empty_with_fixed_columns() {
        let table = EsgTable::fallback();
        assert!(table.list_all().is_empty());
        assert_eq!(table.source(), TableSource::Fallback);
        assert_eq!(
            table.columns(),
            &[
                "Year",
                "Division",
                "CarbonEmissions_Tons",
                "WaterUsage_KL",
                "EmployeeDiversity_Percentage"
            ]
        );
    }

    #[test]
    fn test_division_filter_is_case_insensitive() {
        let table = sample();
        let upper = table.list_by_division("STEEL");
        let lower = table.list_by_division("steel");
        let exact = table.list_by_division("Steel");
        assert_eq!(upper, lower);
        assert_eq!(lower, exact);
        match exact {
            DivisionMatch::Rows(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].year, 2021);
                assert_eq!(rows[1].year, 2022);
            }
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_division_filter_miss_keeps_query_verbatim() {
        let table = sample();
        assert_eq!(
            table.list_by_division("ChemiCals"),
            DivisionMatch::NotFound {
                division: "ChemiCals".to_string()
            }
        );
        // exact match only, no prefix matching
        assert!(matches!(
            table.list_by_division("Power"),
            DivisionMatch::NotFound { .. }
        ));
    }

    #[test]
    fn test_filter_agrees_with_client_side_filtering() {
        let table = sample();
        for name in ["steel", "MOTORS", "power systems"] {
            let expected: Vec<Record> = table
                .list_all()
                .iter()
                .filter(|r| r.division.to_lowercase() == name.to_lowercase())
                .cloned()
                .collect();
            assert_eq!(table.list_by_division(name), DivisionMatch::Rows(expected));
        }
    }

    #[test]
    fn test_fallback_table_never_matches() {
        let table = EsgTable::fallback();
        assert!(matches!(
            table.list_by_division("steel"),
            DivisionMatch::NotFound { .. }
        ));
    }
}
