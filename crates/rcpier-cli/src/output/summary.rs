use rcpier_core::diagnostics::Diagnostics;
use rcpier_core::scanning::legacy::{LEGACY_END_PATTERN, LEGACY_START_PATTERN};
use rcpier_core::scanning::ScanExit;
use rcpier_core::Extraction;

pub fn print(extraction: &Extraction) {
    let diag = &extraction.diagnostics;

    println!("Processed {} load case(s)\n", diag.counters.processed);

    let counts: Vec<String> = extraction
        .buckets
        .case_counts()
        .into_iter()
        .map(|(category, n)| format!("{category}: {n}"))
        .collect();
    println!("  {}\n", counts.join("   "));

    for (category, table) in extraction.buckets.iter() {
        if table.is_empty() {
            println!("  {category:<3} no {category} load cases found");
        } else {
            let (rows, cols) = table.shape();
            println!("  {category:<3} {rows} row(s) x {cols} column(s)");
        }
    }
    println!();

    if diag.counters.skipped() > 0 {
        for line in counter_lines(diag) {
            println!("{line}");
        }
        println!();
    }

    println!("  Load cases: {}", diag.accepted_names.join(", "));
}

/// Debug information for a run that accepted nothing.
pub fn print_failure(diag: &Diagnostics) {
    eprintln!("No load cases were processed.\n");

    let Some(failure) = &diag.failure else {
        return;
    };

    eprintln!("File analysis:");
    eprintln!(
        "  Found 'Loadcase ID:': {}",
        yes_no(failure.has_loadcase_marker)
    );
    eprintln!(
        "  Found start pattern:  {}",
        yes_no(failure.has_start_pattern)
    );
    eprintln!(
        "  Found end pattern:    {}",
        yes_no(failure.has_end_pattern)
    );
    eprintln!(
        "  Number of 'Loadcase ID:' found: {}",
        failure.loadcase_marker_count
    );
    eprintln!("  Processing iterations completed: {}", diag.iterations);
    eprintln!("  Successfully processed: {}", diag.counters.processed);
    for line in counter_lines(diag) {
        eprintln!("{line}");
    }

    if let Some(sample) = &diag.sample_payload {
        eprintln!("\nSample extracted data from first iteration:\n{sample}");
        if let Some((rows, cols)) = diag.sample_shape {
            eprintln!("First iteration table shape: {rows} rows x {cols} columns");
        }
    }

    match diag.exit {
        ScanExit::NoMarker => {
            eprintln!("\n  No 'Loadcase ID:' was found in the file, so scanning never started")
        }
        ScanExit::CapReached => eprintln!("\n  Processing stopped at the iteration limit"),
        ScanExit::Exhausted => {
            eprintln!("\n  Scanning ended because no more 'Loadcase ID:' markers were found")
        }
    }

    if let Some(context) = &failure.first_marker_context {
        eprintln!("\nText around first 'Loadcase ID:':\n{context}");
    }
    if let Some(probe) = &failure.probe {
        match probe.shape {
            Some((rows, cols)) => {
                eprintln!("\nData between fixed patterns:\n{}", probe.sample);
                eprintln!("Test table shape: {rows} rows x {cols} columns");
            }
            None => eprintln!("\n  Data between fixed patterns is empty"),
        }
    }

    eprintln!("\nPatterns searched:");
    eprintln!("  start: {LEGACY_START_PATTERN:?}");
    eprintln!("  end:   {LEGACY_END_PATTERN:?}");
    if let Some(separator) = &failure.separator_context {
        eprintln!("Actual separator found in file: {separator:?}");
    }
    eprintln!();
}

fn counter_lines(diag: &Diagnostics) -> [String; 4] {
    let c = &diag.counters;
    [
        format!(
            "  Skipped (pattern not found):  {}",
            c.skipped_pattern_not_found
        ),
        format!("  Skipped (empty data):         {}", c.skipped_empty_data),
        format!(
            "  Skipped (wrong column count): {}",
            c.skipped_wrong_columns
        ),
        format!("  Skipped (empty table):        {}", c.skipped_empty_table),
    ]
}

fn yes_no(found: bool) -> &'static str {
    if found {
        "yes"
    } else {
        "no"
    }
}
