use serde::{Deserialize, Serialize};
use std::fmt;

use crate::categorize::Category;
use crate::scanning::name::CaseName;

/// A single table cell. `None` is the null marker used for padding short
/// rows and for the record identifier column.
pub type Cell = Option<String>;

/// A rectangular grid of cells with one header per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Concatenate `other` to the right of this table.
    ///
    /// Rows are aligned by index. Whichever side is shorter is padded with
    /// nulls, so the result is always rectangular.
    pub fn append_columns(&mut self, other: &Table) {
        let height = self.height().max(other.height());
        let left_width = self.width();
        let right_width = other.width();

        self.rows.resize_with(height, || vec![None; left_width]);
        for (i, row) in self.rows.iter_mut().enumerate() {
            match other.rows.get(i) {
                Some(cells) => row.extend(cells.iter().cloned()),
                None => row.resize(row.len() + right_width, None),
            }
        }
        self.headers.extend(other.headers.iter().cloned());
    }
}

/// Why a load case never reached a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A structural marker after the case header could not be located.
    PatternNotFound(MissingMarker),
    /// The payload between the separator and the end marker is blank.
    EmptyData,
    /// Fewer fields than the four expected columns.
    WrongColumns { found: usize },
    /// Four columns but no rows.
    EmptyTable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PatternNotFound(marker) => write!(f, "pattern not found: {marker}"),
            SkipReason::EmptyData => write!(f, "empty data"),
            SkipReason::WrongColumns { found } => {
                write!(f, "wrong column count: found {found}, expected 4")
            }
            SkipReason::EmptyTable => write!(f, "table has no rows"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMarker {
    BearingLoads,
    Separator,
}

impl fmt::Display for MissingMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingMarker::BearingLoads => write!(f, "'Bearing loads:' header"),
            MissingMarker::Separator => write!(f, "dashed separator line"),
        }
    }
}

/// An accepted load case: its decoded name, the bucket it was routed to and
/// its labelled table (identifier column plus four data columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTable {
    pub name: CaseName,
    pub category: Category,
    pub table: Table,
}

impl CaseTable {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
                .collect(),
        }
    }

    #[test]
    fn append_columns_to_empty_table() {
        let mut acc = Table::default();
        acc.append_columns(&table(&["a", "b"], &[&["1", "2"]]));
        assert_eq!(acc.shape(), (1, 2));
        assert_eq!(acc.rows[0], vec![Some("1".into()), Some("2".into())]);
    }

    #[test]
    fn append_columns_pads_shorter_side() {
        let mut acc = table(&["a"], &[&["1"]]);
        acc.append_columns(&table(&["b"], &[&["x"], &["y"]]));
        assert_eq!(acc.shape(), (2, 2));
        assert_eq!(acc.rows[1], vec![None, Some("y".into())]);

        acc.append_columns(&table(&["c"], &[&["z"]]));
        assert_eq!(acc.shape(), (2, 3));
        assert_eq!(acc.rows[1][2], None);
        assert_eq!(acc.headers, vec!["a", "b", "c"]);
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(
            SkipReason::WrongColumns { found: 3 }.to_string(),
            "wrong column count: found 3, expected 4"
        );
        assert_eq!(
            SkipReason::PatternNotFound(MissingMarker::Separator).to_string(),
            "pattern not found: dashed separator line"
        );
    }
}
