/// Everything from this marker on is a load group listing, not load cases.
pub const TERMINAL_MARKER: &str = "Selected load groups";

/// Report text ready for scanning: `\n` line endings only, cut at the
/// terminal marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportText {
    text: String,
    truncated: bool,
}

impl ReportText {
    pub fn new(raw: &str) -> Self {
        let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");
        let truncated = match text.find(TERMINAL_MARKER) {
            Some(idx) => {
                text.truncate(idx);
                true
            }
            None => false,
        };
        Self { text, truncated }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether text after the terminal marker was discarded.
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}
