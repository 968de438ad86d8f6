// ⚠️ Error Types - typed failures for the scoring pipeline
//
// Data-level problems are recovered close to where they happen:
// malformed lines never get this far, unknown days are skipped by the
// pipeline, and a missing source becomes an empty report.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fixed message shown when the check-in source cannot be opened.
pub const SOURCE_NOT_FOUND_MESSAGE: &str = "파일을 찾을 수 없습니다.";

/// A day label that is not one of the seven canonical weekday names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized day label: {0:?}")]
pub struct UnrecognizedDay(pub String);

/// Failures surfaced by the file-backed pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}", SOURCE_NOT_FOUND_MESSAGE)]
    SourceNotFound { path: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Classify an I/O error raised while opening or reading `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            PipelineError::SourceNotFound { path }
        } else {
            PipelineError::Io { path, source }
        }
    }

    pub fn is_source_not_found(&self) -> bool {
        matches!(self, PipelineError::SourceNotFound { .. })
    }
}
