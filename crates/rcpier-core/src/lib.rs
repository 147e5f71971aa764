pub mod categorize;
pub mod decode;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod scanning;
pub mod table;

use log::{debug, info};
use serde::Serialize;

use categorize::{Buckets, Category};
use decode::{decode_report, DecodedReport};
use diagnostics::{Diagnostics, FailureAnalysis, ScanCounters};
use error::RcpierError;
use model::CaseTable;
use report::ReportText;
use scanning::{ScanEvent, ScanExit, Scanner};
use table::RawGrid;

pub use scanning::ScanOptions;

/// Result of one extraction run. Always produced, even when nothing was
/// accepted; see [`Extraction::into_result`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Accepted load cases in scan order.
    pub cases: Vec<CaseTable>,
    pub buckets: Buckets,
    pub diagnostics: Diagnostics,
}

impl Extraction {
    /// Turn a run that accepted no load case into an error carrying the
    /// full diagnostics.
    pub fn into_result(self) -> Result<Extraction, RcpierError> {
        if self.cases.is_empty() {
            Err(RcpierError::NoLoadCases(Box::new(self.diagnostics)))
        } else {
            Ok(self)
        }
    }
}

/// Main API entry point: extract and categorize every load case in a
/// report's text.
///
/// Line endings are normalized and everything after "Selected load groups"
/// is ignored. Per-record problems are counted in the diagnostics, never
/// returned as errors.
pub fn extract_loads(text: &str, options: &ScanOptions) -> Extraction {
    let report = ReportText::new(text);
    let mut scanner = Scanner::new(&report, options.clone());
    let acc = scanner
        .by_ref()
        .fold(Accumulator::default(), Accumulator::absorb);

    let exit = scanner.exit().unwrap_or(ScanExit::Exhausted);
    let failure = if acc.cases.is_empty() {
        Some(FailureAnalysis::analyze(report.as_str()))
    } else {
        None
    };

    info!(
        "processed {} load case(s) in {} iteration(s), skipped {}",
        acc.counters.processed,
        scanner.iterations(),
        acc.counters.skipped()
    );

    let diagnostics = Diagnostics {
        counters: acc.counters,
        iterations: scanner.iterations(),
        exit,
        truncated: exit == ScanExit::CapReached,
        report_truncated: report.was_truncated(),
        accepted_names: acc.cases.iter().map(|c| c.name().to_string()).collect(),
        sample_payload: acc.sample_payload,
        sample_shape: acc.sample_shape,
        encoding: None,
        lossy_decode: false,
        failure,
    };

    Extraction {
        cases: acc.cases,
        buckets: acc.buckets,
        diagnostics,
    }
}

/// Extract from an already decoded report, recording how it was decoded.
pub fn extract_report(decoded: &DecodedReport, options: &ScanOptions) -> Extraction {
    let mut extraction = extract_loads(&decoded.text, options);
    extraction.diagnostics.encoding = Some(decoded.encoding.to_string());
    extraction.diagnostics.lossy_decode = decoded.lossy;
    extraction
}

/// Decode raw report bytes and extract from them.
pub fn extract_loads_from_bytes(bytes: &[u8], options: &ScanOptions) -> Extraction {
    extract_report(&decode_report(bytes), options)
}

/// Fold state over the scanner's events.
#[derive(Default)]
struct Accumulator {
    cases: Vec<CaseTable>,
    buckets: Buckets,
    counters: ScanCounters,
    sample_payload: Option<String>,
    sample_shape: Option<(usize, usize)>,
}

impl Accumulator {
    fn absorb(mut self, event: ScanEvent<'_>) -> Self {
        let (iteration, name, payload) = match event {
            ScanEvent::Skipped { reason, .. } => {
                self.counters.record_skip(reason);
                return self;
            }
            ScanEvent::Payload {
                iteration,
                name,
                payload,
            } => (iteration, name, payload),
        };

        let first = iteration == 1;
        if first {
            self.sample_payload = Some(Diagnostics::sample(payload));
        }

        let built = RawGrid::from_payload(payload).and_then(|grid| {
            if first {
                self.sample_shape = Some(grid.shape());
            }
            grid.into_case_table(name.as_str())
        });

        match built {
            Ok(table) => {
                let category = Category::classify(name.as_str());
                debug!("load case '{name}' -> {category} ({} rows)", table.height());
                let case = CaseTable {
                    name,
                    category,
                    table,
                };
                self.counters.processed += 1;
                self.buckets = self.buckets.with_case(&case);
                self.cases.push(case);
            }
            Err(reason) => {
                debug!("load case '{name}' skipped: {reason}");
                self.counters.record_skip(reason);
            }
        }

        self
    }
}
