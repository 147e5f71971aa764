use serde::{Deserialize, Serialize};

use crate::model::{Cell, SkipReason, Table};

/// Number of data columns every accepted load case must provide.
pub const EXPECTED_COLUMNS: usize = 4;

/// Column labels for the four data columns, in report order.
pub const COLUMN_LABELS: [&str; EXPECTED_COLUMNS] =
    ["Line#", "Bearing#", "Direction", "Loads-Kips"];

/// The unlabelled grid recovered from a payload, before column rules apply.
///
/// Rows with fewer fields than the widest row are padded with nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGrid {
    pub rows: Vec<Vec<Cell>>,
    pub width: usize,
}

impl RawGrid {
    /// Parse a record's payload. A payload with nothing but whitespace is
    /// rejected before any grid is built.
    pub fn from_payload(payload: &str) -> Result<RawGrid, SkipReason> {
        if payload.trim().is_empty() {
            return Err(SkipReason::EmptyData);
        }
        Ok(RawGrid::parse(payload))
    }

    /// Split a payload into trimmed, non-empty lines and each line into
    /// fields separated by two or more whitespace characters.
    pub fn parse(payload: &str) -> RawGrid {
        let split: Vec<Vec<&str>> = payload
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(split_by_whitespace_gaps)
            .collect();

        let width = split.iter().map(Vec::len).max().unwrap_or(0);
        let rows = split
            .into_iter()
            .map(|fields| {
                let mut row: Vec<Cell> = fields.into_iter().map(|f| Some(f.to_string())).collect();
                row.resize(width, None);
                row
            })
            .collect();

        RawGrid { rows, width }
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.width)
    }

    /// Apply the column rules and label the result for load case `name`.
    ///
    /// Extra columns beyond the fourth are dropped. Fewer than four rejects
    /// the whole case.
    pub fn into_case_table(self, name: &str) -> Result<Table, SkipReason> {
        if self.width < EXPECTED_COLUMNS {
            return Err(SkipReason::WrongColumns { found: self.width });
        }
        if self.rows.is_empty() {
            return Err(SkipReason::EmptyTable);
        }

        let mut headers = Vec::with_capacity(EXPECTED_COLUMNS + 1);
        headers.push(name.to_string());
        headers.extend(COLUMN_LABELS.iter().map(|label| format!("{name} - {label}")));

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                std::iter::once(None)
                    .chain(row.into_iter().take(EXPECTED_COLUMNS))
                    .collect()
            })
            .collect();

        Ok(Table { headers, rows })
    }
}

/// Split a line by gaps of 2+ whitespace characters.
///
/// A single space stays inside its field. Leading or trailing gaps yield an
/// empty field at that end, so an untrimmed line keeps its field positions.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut field_start = 0;
    let mut gap_start = 0;
    let mut gap_len = 0;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if gap_len == 0 {
                gap_start = i;
            }
            gap_len += 1;
        } else {
            if gap_len >= 2 {
                segments.push(&line[field_start..gap_start]);
                field_start = i;
            }
            gap_len = 0;
        }
    }

    if gap_len >= 2 {
        segments.push(&line[field_start..gap_start]);
        segments.push("");
    } else {
        segments.push(&line[field_start..]);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(name: &str, payload: &str) -> Result<Table, SkipReason> {
        RawGrid::from_payload(payload)?.into_case_table(name)
    }

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_split_by_whitespace_gaps() {
        let segments = split_by_whitespace_gaps("1     2     Vertical Down     -12.50");
        assert_eq!(segments, vec!["1", "2", "Vertical Down", "-12.50"]);
    }

    #[test]
    fn test_split_keeps_single_spaces() {
        assert_eq!(split_by_whitespace_gaps("a b c"), vec!["a b c"]);
        assert_eq!(split_by_whitespace_gaps("a \tb"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_edge_gaps() {
        assert_eq!(split_by_whitespace_gaps(""), vec![""]);
        assert_eq!(split_by_whitespace_gaps("  a"), vec!["", "a"]);
        assert_eq!(split_by_whitespace_gaps("a   "), vec!["a", ""]);
    }

    #[test]
    fn test_raw_grid_pads_short_rows() {
        let grid = RawGrid::parse("1  2  Vertical  10.0\n\n   3  4\n");
        assert_eq!(grid.shape(), (2, 4));
        assert_eq!(grid.rows[1], vec![Some("3".into()), Some("4".into()), None, None]);
    }

    #[test]
    fn test_case_table_labels_and_identifier_column() {
        let table = build("DC1", "1  1  Vertical  -10.0\n1  2  Vertical  -11.0").unwrap();
        assert_eq!(
            table.headers,
            vec![
                "DC1",
                "DC1 - Line#",
                "DC1 - Bearing#",
                "DC1 - Direction",
                "DC1 - Loads-Kips"
            ]
        );
        assert_eq!(table.shape(), (2, 5));
        assert!(table.rows.iter().all(|row| row[0].is_none()));
        assert_eq!(table.rows[1][1..], cells(&["1", "2", "Vertical", "-11.0"])[..]);
    }

    #[test]
    fn test_extra_columns_truncated() {
        let table = build("LL1", "1  2  Lateral  5.0  x  y").unwrap();
        assert_eq!(table.shape(), (1, 5));
        assert_eq!(table.rows[0][4], Some("5.0".into()));
    }

    #[test]
    fn test_three_columns_rejected() {
        assert_eq!(
            build("LL1", "1  2  5.0\n3  4  6.0"),
            Err(SkipReason::WrongColumns { found: 3 })
        );
    }

    #[test]
    fn test_blank_payload_rejected() {
        assert_eq!(build("LL1", " \n  \n"), Err(SkipReason::EmptyData));
    }

    #[test]
    fn test_empty_grid_with_enough_columns() {
        let grid = RawGrid {
            rows: vec![],
            width: 4,
        };
        assert_eq!(grid.into_case_table("X"), Err(SkipReason::EmptyTable));
    }
}
