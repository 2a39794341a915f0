use std::io;
use std::path::Path;

use thiserror::Error;

/// Why a counter source produced no value.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The source could not be opened or queried at all.
    #[error("{source_name} is unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    /// The source opened but its mandatory content could not be parsed.
    #[error("{source_name} could not be parsed: {detail}")]
    Malformed { source_name: String, detail: String },
}

impl SampleError {
    pub fn unavailable(path: &Path, err: &io::Error) -> Self {
        SampleError::Unavailable {
            source_name: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        SampleError::Malformed {
            source_name: path.display().to_string(),
            detail: detail.into(),
        }
    }
}
