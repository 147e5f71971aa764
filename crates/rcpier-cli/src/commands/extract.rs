use rcpier_core::decode::load_report_file;
use rcpier_core::error::RcpierError;
use rcpier_core::export::Workbook;
use rcpier_core::ScanOptions;
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(input_file: &Path) -> Result<(), RcpierError> {
    let decoded = load_report_file(input_file)?;
    let extraction = rcpier_core::extract_report(&decoded, &ScanOptions::default());
    let diagnostics = &extraction.diagnostics;

    if diagnostics.lossy_decode {
        eprintln!(
            "  warning: undecodable bytes were dropped while reading {}",
            input_file.display()
        );
    }
    if diagnostics.truncated {
        eprintln!(
            "  warning: processing stopped after {} iterations. Some load cases may not have been processed.",
            diagnostics.iterations
        );
    }
    if diagnostics.report_truncated {
        eprintln!("  note: text after 'Selected load groups' was ignored");
    }
    if extraction.cases.is_empty() {
        output::summary::print_failure(diagnostics);
    }

    let extraction = extraction.into_result()?;
    output::summary::print(&extraction);

    match Workbook::from_buckets(&extraction.buckets) {
        Some(workbook) => {
            let path = output_path(input_file);
            workbook.write_json(&path)?;
            eprintln!(
                "Wrote {} sheet(s) to {}",
                workbook.sheets.len(),
                path.display()
            );
        }
        None => eprintln!("No data to export. Output file will not be created."),
    }

    Ok(())
}

/// `report.txt` -> `report.json`, next to the input.
fn output_path(input_file: &Path) -> PathBuf {
    let is_json = input_file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        input_file.with_extension("loads.json")
    } else {
        input_file.with_extension("json")
    }
}
