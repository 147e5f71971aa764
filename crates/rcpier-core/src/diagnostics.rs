use serde::{Deserialize, Serialize};

use crate::model::SkipReason;
use crate::scanning::legacy::{LEGACY_END_PATTERN, LEGACY_START_PATTERN};
use crate::scanning::name::LOADCASE_MARKER;
use crate::scanning::{find_from, ScanExit, SEPARATOR_LINE};
use crate::table::RawGrid;

/// Characters of the first payload kept for debugging.
const SAMPLE_PAYLOAD_CHARS: usize = 500;
const CONTEXT_BEFORE_MARKER: usize = 100;
const CONTEXT_AFTER_MARKER: usize = 500;
const SEPARATOR_SEARCH_CHARS: usize = 1000;
const CONTEXT_BEFORE_SEPARATOR: usize = 20;
const CONTEXT_AFTER_SEPARATOR: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCounters {
    pub processed: usize,
    pub skipped_pattern_not_found: usize,
    pub skipped_empty_data: usize,
    pub skipped_wrong_columns: usize,
    pub skipped_empty_table: usize,
}

impl ScanCounters {
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::PatternNotFound(_) => self.skipped_pattern_not_found += 1,
            SkipReason::EmptyData => self.skipped_empty_data += 1,
            SkipReason::WrongColumns { .. } => self.skipped_wrong_columns += 1,
            SkipReason::EmptyTable => self.skipped_empty_table += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped_pattern_not_found
            + self.skipped_empty_data
            + self.skipped_wrong_columns
            + self.skipped_empty_table
    }
}

/// What happened during one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub counters: ScanCounters,
    /// Records the scanner visited, accepted or not.
    pub iterations: usize,
    pub exit: ScanExit,
    /// The iteration cap stopped the scan; results are partial.
    pub truncated: bool,
    /// Text after "Selected load groups" was cut before scanning.
    #[serde(default)]
    pub report_truncated: bool,
    /// Accepted load case names, in scan order.
    pub accepted_names: Vec<String>,
    /// Start of the first record's payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_payload: Option<String>,
    /// `(rows, columns)` of the first record's grid before column rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_shape: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default)]
    pub lossy_decode: bool,
    /// Only present when no load case was accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureAnalysis>,
}

impl Diagnostics {
    pub(crate) fn sample(payload: &str) -> String {
        payload.chars().take(SAMPLE_PAYLOAD_CHARS).collect()
    }
}

/// File analysis for a run that accepted nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureAnalysis {
    pub has_loadcase_marker: bool,
    /// The fixed start pattern of the legacy extraction mode.
    pub has_start_pattern: bool,
    /// The fixed end pattern of the legacy extraction mode.
    pub has_end_pattern: bool,
    pub loadcase_marker_count: usize,
    /// Text around the first load case marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_marker_context: Option<String>,
    /// What the legacy patterns would extract after the first marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<PatternProbe>,
    /// The separator line as it actually appears near the first marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternProbe {
    pub sample: String,
    /// `None` when the text between the patterns is blank.
    pub shape: Option<(usize, usize)>,
}

impl FailureAnalysis {
    /// Inspect the normalized report text for the markers the scanner needs.
    pub fn analyze(text: &str) -> Self {
        let first_marker = text.find(LOADCASE_MARKER);

        Self {
            has_loadcase_marker: first_marker.is_some(),
            has_start_pattern: text.contains(LEGACY_START_PATTERN.trim()),
            has_end_pattern: text.contains(LEGACY_END_PATTERN.trim()),
            loadcase_marker_count: text.matches(LOADCASE_MARKER).count(),
            first_marker_context: first_marker
                .map(|pos| char_window(text, pos, CONTEXT_BEFORE_MARKER, CONTEXT_AFTER_MARKER)),
            probe: first_marker.and_then(|pos| probe_patterns(text, pos)),
            separator_context: first_marker.and_then(|pos| separator_context(text, pos)),
        }
    }
}

fn probe_patterns(text: &str, from: usize) -> Option<PatternProbe> {
    let start = find_from(text, LEGACY_START_PATTERN, from)?;
    let end = find_from(text, LEGACY_END_PATTERN, from)?;
    if end <= start {
        return None;
    }
    let data = text
        .get(start + LEGACY_START_PATTERN.len()..end)
        .unwrap_or("");
    if data.trim().is_empty() {
        return Some(PatternProbe {
            sample: String::new(),
            shape: None,
        });
    }
    Some(PatternProbe {
        sample: Diagnostics::sample(data),
        shape: Some(RawGrid::parse(data.trim()).shape()),
    })
}

fn separator_context(text: &str, marker: usize) -> Option<String> {
    let area = char_window(text, marker, 0, SEPARATOR_SEARCH_CHARS);
    let sep = area.find(SEPARATOR_LINE)?;
    Some(char_window(
        &area,
        sep,
        CONTEXT_BEFORE_SEPARATOR,
        CONTEXT_AFTER_SEPARATOR,
    ))
}

/// Up to `before` characters preceding byte `pos` and `after` characters
/// starting at it.
fn char_window(text: &str, pos: usize, before: usize, after: usize) -> String {
    let head = &text[..pos];
    let start = if before == 0 {
        pos
    } else {
        head.char_indices()
            .rev()
            .nth(before - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let tail = &text[pos..];
    let end = tail
        .char_indices()
        .nth(after)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len());
    text[start..end].to_string()
}
