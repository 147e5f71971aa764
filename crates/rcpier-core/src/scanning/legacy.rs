//! Fixed-pattern extraction, kept for reports processed by older batch jobs.
//!
//! Unsupported. Payloads are located by matching the exact whitespace layout
//! around the separator and the auto-generation trailer, so any deviation in
//! indentation loses or misattributes records. Use [`crate::extract_loads`].

use log::debug;
use serde::{Deserialize, Serialize};

use super::find_from;
use super::name::{decode_name, LOADCASE_MARKER};
use super::ScanOptions;
use crate::categorize::{Buckets, Category};
use crate::model::{CaseTable, SkipReason, Table};
use crate::report::ReportText;
use crate::table::{RawGrid, COLUMN_LABELS, EXPECTED_COLUMNS};

/// Dashed separator with its exact surrounding layout.
pub const LEGACY_START_PATTERN: &str =
    "\n         -------------------------------------------------\n";
/// Blank line plus the indented trailer that closes a case.
pub const LEGACY_END_PATTERN: &str = "\n \n      Auto generation details";

/// Why the fixed-pattern walk stopped before the last marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyStop {
    Completed,
    MissingStartPattern,
    MissingEndPattern,
    CapReached,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyExtraction {
    pub cases: Vec<CaseTable>,
    pub buckets: Buckets,
    pub rejected: Vec<(String, SkipReason)>,
    pub stop: Option<LegacyStop>,
}

/// Walk the report with the fixed start and end patterns.
///
/// Each case's data is taken from the first start pattern to the first end
/// pattern in the remaining text, then the walk resumes after that end
/// pattern. A fifth column is dropped; tables are accepted only if exactly
/// four columns remain, labelled without the case name prefix.
pub fn extract_fixed_pattern(report: &ReportText, options: &ScanOptions) -> LegacyExtraction {
    let text = report.as_str();
    let mut out = LegacyExtraction::default();
    let mut window_start = 0;
    let mut iterations = 0;

    let stop = loop {
        let Some(marker) = find_from(text, LOADCASE_MARKER, window_start) else {
            break LegacyStop::Completed;
        };
        if iterations >= options.max_iterations {
            break LegacyStop::CapReached;
        }
        iterations += 1;

        let Some(name) = decode_name(text, marker) else {
            break LegacyStop::Completed;
        };
        let Some(end) = find_from(text, LEGACY_END_PATTERN, window_start) else {
            break LegacyStop::MissingEndPattern;
        };
        let Some(start) = find_from(text, LEGACY_START_PATTERN, window_start) else {
            break LegacyStop::MissingStartPattern;
        };

        let data = text
            .get(start + LEGACY_START_PATTERN.len()..end)
            .unwrap_or("");
        match legacy_table(name.as_str(), data) {
            Ok(table) => {
                let case = CaseTable {
                    category: Category::classify(name.as_str()),
                    name,
                    table,
                };
                out.buckets = std::mem::take(&mut out.buckets).with_case(&case);
                out.cases.push(case);
            }
            Err(reason) => {
                debug!("legacy: rejected '{name}': {reason}");
                out.rejected.push((name.as_str().to_string(), reason));
            }
        }

        window_start = end + LEGACY_END_PATTERN.len();
    };

    out.stop = Some(stop);
    out
}

fn legacy_table(name: &str, data: &str) -> Result<Table, SkipReason> {
    let mut grid = RawGrid::parse(data.trim());
    if grid.width > EXPECTED_COLUMNS {
        for row in &mut grid.rows {
            row.remove(EXPECTED_COLUMNS);
        }
        grid.width -= 1;
    }
    if grid.width != EXPECTED_COLUMNS {
        return Err(SkipReason::WrongColumns { found: grid.width });
    }
    if grid.rows.is_empty() {
        return Err(SkipReason::EmptyTable);
    }

    let mut headers = vec![name.to_string()];
    headers.extend(COLUMN_LABELS.iter().map(|label| label.to_string()));
    let rows = grid
        .rows
        .into_iter()
        .map(|row| std::iter::once(None).chain(row).collect())
        .collect();

    Ok(Table { headers, rows })
}
