//! Reshape long rows into the wide table.
//!
//! ```text
//! Long (region, period, value)        Wide (indexed by region)
//! ┌───────────┬──────┬───────┐       ┌───────────┬──────┬──────┐
//! │ Andalucía │ 2020 │ 20.5  │       │ region    │ 2020 │ 2022 │
//! │ Andalucía │ 2022 │ 19.1  │  →    ├───────────┼──────┼──────┤
//! │ Aragón    │ 2020 │ 18.0  │       │ Andalucía │ 20.5 │ 19.1 │
//! └───────────┴──────┴───────┘       │ Aragón    │ 18.0 │ null │
//!                                    └───────────┴──────┴──────┘
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::config::ColumnNames;
use crate::error::PivotError;
use crate::models::{NormalizedRow, WideRow, WideTable};

/// Wide table plus bookkeeping about the reshape.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotOutcome {
    pub table: WideTable,
    /// Cells written more than once. The last source row wins, so for
    /// duplicated pairs the result depends on input order.
    pub duplicates: usize,
}

/// Pivot normalized rows: index = region, columns = sorted distinct periods.
///
/// `headers` is the parsed CSV schema; the region and period columns must
/// be part of it.
pub fn pivot(
    headers: &[String],
    columns: &ColumnNames,
    rows: &[NormalizedRow],
) -> Result<PivotOutcome, PivotError> {
    for required in [&columns.region, &columns.period] {
        if !headers.iter().any(|h| h == required) {
            return Err(PivotError::MissingColumn(required.clone()));
        }
    }

    let periods: Vec<String> = rows
        .iter()
        .map(|r| r.period.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let period_index: HashMap<&str, usize> = periods
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();

    let mut wide_rows: Vec<WideRow> = Vec::new();
    let mut row_index: HashMap<&str, usize> = HashMap::new();
    let mut written: Vec<Vec<bool>> = Vec::new();
    let mut duplicates = 0;

    for row in rows {
        let r = *row_index.entry(row.region.as_str()).or_insert_with(|| {
            wide_rows.push(WideRow {
                region: row.region.clone(),
                values: vec![None; periods.len()],
            });
            written.push(vec![false; periods.len()]);
            wide_rows.len() - 1
        });

        let c = period_index[row.period.as_str()];
        if written[r][c] {
            duplicates += 1;
        }
        written[r][c] = true;
        wide_rows[r].values[c] = row.value;
    }

    Ok(PivotOutcome {
        table: WideTable {
            index_name: columns.region.clone(),
            periods,
            rows: wide_rows,
        },
        duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        let c = ColumnNames::default();
        vec![c.region, c.total_national, c.period, c.value]
    }

    fn row(region: &str, period: &str, value: Option<f64>) -> NormalizedRow {
        NormalizedRow::new(region, period, value)
    }

    #[test]
    fn test_full_grid_shape() {
        let regions = ["Andalucía", "Aragón", "Total Nacional"];
        let periods = ["2022", "2017", "2020"];
        let mut rows = Vec::new();
        for (i, r) in regions.iter().enumerate() {
            for (j, p) in periods.iter().enumerate() {
                rows.push(row(r, p, Some((i * 10 + j) as f64)));
            }
        }

        let outcome = pivot(&headers(), &ColumnNames::default(), &rows).unwrap();
        let table = outcome.table;

        assert_eq!(table.height(), 3);
        assert_eq!(table.width(), 3);
        assert_eq!(table.periods, vec!["2017", "2020", "2022"]);
        assert_eq!(outcome.duplicates, 0);
        for source in &rows {
            assert_eq!(table.get(&source.region, &source.period), source.value);
        }
    }

    #[test]
    fn test_rows_keep_first_appearance_order() {
        let rows = vec![
            row("Murcia", "2020", Some(1.0)),
            row("Andalucía", "2020", Some(2.0)),
            row("Murcia", "2022", Some(3.0)),
        ];

        let table = pivot(&headers(), &ColumnNames::default(), &rows).unwrap().table;
        let regions: Vec<&str> = table.rows.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Murcia", "Andalucía"]);
    }

    #[test]
    fn test_absent_pair_is_missing() {
        let rows = vec![row("Murcia", "2020", Some(1.0)), row("Aragón", "2022", Some(2.0))];

        let table = pivot(&headers(), &ColumnNames::default(), &rows).unwrap().table;
        assert_eq!(table.get("Murcia", "2022"), None);
        assert_eq!(table.rows[0].values, vec![Some(1.0), None]);
    }

    #[test]
    fn test_duplicate_pairs_last_write_wins() {
        let rows = vec![row("Murcia", "2020", Some(1.0)), row("Murcia", "2020", Some(9.0))];

        let outcome = pivot(&headers(), &ColumnNames::default(), &rows).unwrap();
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.table.get("Murcia", "2020"), Some(9.0));
    }

    #[test]
    fn test_missing_schema_column() {
        let headers = vec!["Comunidades y Ciudades Autónomas".to_string(), "Total".to_string()];
        let result = pivot(&headers, &ColumnNames::default(), &[]);
        assert!(matches!(result, Err(PivotError::MissingColumn(c)) if c == "periodo"));
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        let table = pivot(&headers(), &ColumnNames::default(), &[]).unwrap().table;
        assert_eq!(table.height(), 0);
        assert_eq!(table.width(), 0);
    }
}
