use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker that opens every load case record.
pub const LOADCASE_MARKER: &str = "Loadcase ID:";

// Character offsets, measured from the first character of the marker.
const SENTINEL_OFFSET: usize = 13;
const SHORT_FORM_END: usize = 17;
const LONG_FORM_END: usize = 45;

/// A `W` at the sentinel offset switches to the long form.
const LONG_FORM_SENTINEL: char = 'W';
const NAME_FIELD: &str = "    Name: ";

/// A decoded load case name, tagged with the shape it was read from.
///
/// - `ShortForm`: the 4-character case id after the marker.
/// - `LongForm`: a 32-character window that embeds a `Name:` field; the
///   field label collapses to `-` and line breaks are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", content = "name", rename_all = "snake_case")]
pub enum CaseName {
    ShortForm(String),
    LongForm(String),
}

impl CaseName {
    pub fn as_str(&self) -> &str {
        match self {
            CaseName::ShortForm(s) | CaseName::LongForm(s) => s,
        }
    }
}

impl fmt::Display for CaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode the name of the load case whose marker starts at byte `marker_pos`.
///
/// Returns `None` when the text ends before the sentinel character.
pub fn decode_name(text: &str, marker_pos: usize) -> Option<CaseName> {
    let after_marker = text.get(marker_pos..)?;
    let sentinel = after_marker.chars().nth(SENTINEL_OFFSET)?;
    let field = after_marker.chars().skip(SENTINEL_OFFSET);

    if sentinel != LONG_FORM_SENTINEL {
        let id: String = field.take(SHORT_FORM_END - SENTINEL_OFFSET).collect();
        Some(CaseName::ShortForm(id.trim().to_string()))
    } else {
        let window: String = field.take(LONG_FORM_END - SENTINEL_OFFSET).collect();
        let name = window.replace(NAME_FIELD, "-").replace('\n', "");
        Some(CaseName::LongForm(name.trim().to_string()))
    }
}
