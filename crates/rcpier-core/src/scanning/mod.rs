pub mod legacy;
pub mod name;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::model::{MissingMarker, SkipReason};
use crate::report::ReportText;
use name::{decode_name, CaseName, LOADCASE_MARKER};

/// Header of the sub-block holding a case's tabular data.
pub const BEARING_LOADS_MARKER: &str = "Bearing loads:";
/// Dashed line between the bearing loads column header and its rows.
pub const SEPARATOR_LINE: &str = "-------------------------------------------------";
/// Trailer that follows the data section of a case.
pub const AUTO_GENERATION_MARKER: &str = "Auto generation details";

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Scanner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Upper bound on scanned records. Reaching it stops the scan and marks
    /// the result as truncated.
    pub max_iterations: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// One step of the scan: either a payload to build a table from, or a
/// record dropped because its structural markers were missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent<'a> {
    Payload {
        iteration: usize,
        name: CaseName,
        payload: &'a str,
    },
    Skipped {
        iteration: usize,
        name: CaseName,
        reason: SkipReason,
    },
}

/// Why the scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanExit {
    /// The text never contained a load case marker.
    NoMarker,
    /// No further load case markers after the last record.
    Exhausted,
    /// The iteration cap was hit with records still left to scan.
    CapReached,
}

/// Walks a report left to right, yielding one event per load case record.
///
/// The cursor only ever moves forward, and the iteration cap bounds the
/// number of events regardless of input.
pub struct Scanner<'a> {
    text: &'a str,
    options: ScanOptions,
    cursor: Option<usize>,
    iterations: usize,
    exit: Option<ScanExit>,
}

impl<'a> Scanner<'a> {
    pub fn new(report: &'a ReportText, options: ScanOptions) -> Self {
        let text = report.as_str();
        Self {
            text,
            options,
            cursor: text.find(LOADCASE_MARKER),
            iterations: 0,
            exit: None,
        }
    }

    /// Number of events yielded so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Set once the scan has finished.
    pub fn exit(&self) -> Option<ScanExit> {
        self.exit
    }

    fn finish(&mut self, exit: ScanExit) -> Option<ScanEvent<'a>> {
        self.exit = Some(exit);
        self.cursor = None;
        None
    }

    fn skip(&mut self, pos: usize, name: CaseName, marker: MissingMarker) -> ScanEvent<'a> {
        debug!("load case '{name}' at byte {pos}: {marker} not found");
        self.cursor = find_from(self.text, LOADCASE_MARKER, pos + 1);
        ScanEvent::Skipped {
            iteration: self.iterations,
            name,
            reason: SkipReason::PatternNotFound(marker),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = ScanEvent<'a>;

    fn next(&mut self) -> Option<ScanEvent<'a>> {
        if self.exit.is_some() {
            return None;
        }

        let Some(pos) = self.cursor else {
            let exit = if self.iterations == 0 {
                ScanExit::NoMarker
            } else {
                ScanExit::Exhausted
            };
            return self.finish(exit);
        };

        if self.iterations >= self.options.max_iterations {
            warn!(
                "stopped after {} iterations with load cases left to scan",
                self.options.max_iterations
            );
            return self.finish(ScanExit::CapReached);
        }

        let Some(name) = decode_name(self.text, pos) else {
            return self.finish(ScanExit::Exhausted);
        };
        self.iterations += 1;

        let Some(bearing) = find_from(self.text, BEARING_LOADS_MARKER, pos) else {
            return Some(self.skip(pos, name, MissingMarker::BearingLoads));
        };
        let Some(separator) = find_from(self.text, SEPARATOR_LINE, bearing) else {
            return Some(self.skip(pos, name, MissingMarker::Separator));
        };

        let data_start = match find_from(self.text, "\n", separator) {
            Some(newline) => newline + 1,
            None => separator + SEPARATOR_LINE.len(),
        };

        let next_case = find_from(self.text, LOADCASE_MARKER, pos + 1);
        let auto_end = find_from(self.text, AUTO_GENERATION_MARKER, data_start);
        let data_end = next_case
            .into_iter()
            .chain(auto_end)
            .min()
            .unwrap_or(self.text.len());

        // A following record can start before this record's separator when
        // this record has no bearing section of its own.
        let payload = self.text.get(data_start..data_end).unwrap_or("");

        self.cursor = if data_end >= self.text.len() {
            None
        } else {
            find_from(self.text, LOADCASE_MARKER, data_end)
        };

        Some(ScanEvent::Payload {
            iteration: self.iterations,
            name,
            payload,
        })
    }
}

/// Byte offset of `pattern` at or after `from`.
pub(crate) fn find_from(text: &str, pattern: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(pattern).map(|i| i + from)
}
