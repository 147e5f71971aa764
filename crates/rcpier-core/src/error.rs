use crate::diagnostics::Diagnostics;

#[derive(Debug, thiserror::Error)]
pub enum RcpierError {
    #[error("no load cases were processed. Make sure the file contains 'Loadcase ID:' markers and the expected data format")]
    NoLoadCases(Box<Diagnostics>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
