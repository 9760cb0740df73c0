//! Field-level cleanup of raw rows.
//!
//! Three independent transforms per row:
//!
//! | Field  | Input              | Output          |
//! |--------|--------------------|-----------------|
//! | region | `01 Andalucía`     | `Andalucía`     |
//! | region | empty (national)   | `Total Nacional`|
//! | value  | `1.234,5`          | `1234.5`        |
//! | period | `2022 (P)`         | `2022`          |
//!
//! A field that cannot be cleaned yields a missing value; rows are never dropped.

use crate::config::TOTAL_NATIONAL_COLUMN;
use crate::models::{NormalizedRow, RawRow};

/// Provisional-data marker appended by INE to period labels.
pub const PROVISIONAL_MARKER: &str = " (P)";

/// Normalize every row. Output length always equals input length.
pub fn normalize(rows: &[RawRow]) -> Vec<NormalizedRow> {
    rows.iter().map(normalize_row).collect()
}

/// Normalize a single row.
pub fn normalize_row(row: &RawRow) -> NormalizedRow {
    NormalizedRow {
        region: resolve_region(row),
        period: row
            .period
            .as_deref()
            .map(strip_provisional)
            .unwrap_or_default(),
        value: row.value.as_deref().and_then(parse_localized_number),
    }
}

/// Second segment of a `"<code> <name>"` label, split on the first space.
///
/// Returns `None` when there is no space or the name part is blank.
pub fn split_region(raw: &str) -> Option<&str> {
    raw.splitn(2, ' ')
        .nth(1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Region label with its fallbacks, never empty.
///
/// Order: split name, national total label, the raw label itself, then the
/// national column header.
pub fn resolve_region(row: &RawRow) -> String {
    let raw = row.region_name.as_deref().map(str::trim);

    raw.and_then(split_region)
        .or_else(|| non_blank(row.total_national.as_deref()))
        .or_else(|| non_blank(raw))
        .unwrap_or(TOTAL_NATIONAL_COLUMN)
        .to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a Spanish-formatted number: `.` groups thousands, `,` marks decimals.
///
/// ```ignore
/// assert_eq!(parse_localized_number("1.234,5"), Some(1234.5));
/// assert_eq!(parse_localized_number(".."), None);
/// ```
pub fn parse_localized_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Remove every provisional marker from a period label.
pub fn strip_provisional(period: &str) -> String {
    period.replace(PROVISIONAL_MARKER, "").trim().to_string()
}

/// Number of rows whose value could not be parsed.
pub fn count_missing_values(rows: &[NormalizedRow]) -> usize {
    rows.iter().filter(|r| r.value.is_none()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_region() {
        assert_eq!(split_region("01 Andalucía"), Some("Andalucía"));
        assert_eq!(split_region("07 Castilla y León"), Some("Castilla y León"));
        assert_eq!(split_region("Andalucía"), None);
        assert_eq!(split_region("01 "), None);
    }

    #[test]
    fn test_region_falls_back_to_total_national() {
        let row = RawRow::new(None, Some("Total Nacional"), Some("2022"), Some("1"));
        assert_eq!(resolve_region(&row), "Total Nacional");

        let row = RawRow::new(Some(""), Some("Total Nacional"), None, None);
        assert_eq!(resolve_region(&row), "Total Nacional");
    }

    #[test]
    fn test_region_without_code_prefix_keeps_label() {
        let row = RawRow::new(Some("Ceuta"), None, None, None);
        assert_eq!(resolve_region(&row), "Ceuta");
    }

    #[test]
    fn test_region_never_empty() {
        let row = RawRow::default();
        assert_eq!(resolve_region(&row), TOTAL_NATIONAL_COLUMN);
    }

    #[test]
    fn test_parse_localized_number() {
        assert_eq!(parse_localized_number("1.234,5"), Some(1234.5));
        assert_eq!(parse_localized_number("0,2"), Some(0.2));
        assert_eq!(parse_localized_number("45.000,0"), Some(45000.0));
        assert_eq!(parse_localized_number("1.234.567"), Some(1234567.0));
        assert_eq!(parse_localized_number(" 12 "), Some(12.0));
        assert_eq!(parse_localized_number(""), None);
        assert_eq!(parse_localized_number(".."), None);
        assert_eq!(parse_localized_number("n/d"), None);
    }

    #[test]
    fn test_strip_provisional() {
        assert_eq!(strip_provisional("2022 (P)"), "2022");
        assert_eq!(strip_provisional("2021"), "2021");
    }

    #[test]
    fn test_normalize_keeps_every_row() {
        let rows = vec![
            RawRow::new(Some("01 Andalucía"), None, Some("2022 (P)"), Some("1.234,5")),
            RawRow::new(None, Some("Total Nacional"), Some("2022 (P)"), Some("45.000,0")),
            RawRow::new(Some("02 Aragón"), None, Some("2021"), None),
            RawRow::default(),
        ];

        let normalized = normalize(&rows);

        assert_eq!(normalized.len(), rows.len());
        assert_eq!(normalized[0], NormalizedRow::new("Andalucía", "2022", Some(1234.5)));
        assert_eq!(normalized[1], NormalizedRow::new("Total Nacional", "2022", Some(45000.0)));
        assert_eq!(normalized[2].value, None);
        assert_eq!(normalized[3].period, "");
        assert_eq!(count_missing_values(&normalized), 2);
    }
}
