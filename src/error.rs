//! Typed failure modes for the generation pipeline.
//!
//! Every stage returns an explicit outcome carrying one of these kinds;
//! the command layer decides which kinds abort the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors emitted by the generation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A reference section could not be produced at all. Fatal for the run:
    /// every downstream stage depends on the reference tables.
    #[error("reference source unavailable: {0}")]
    SourceUnavailable(String),

    /// A loaded or derived value failed its declared type contract. Fatal.
    #[error("schema mismatch in {table}.{column}: {message}")]
    SchemaMismatch {
        table: String,
        column: String,
        message: String,
    },

    /// An output artifact could not be opened or written. Fatal for that
    /// table only; remaining artifacts are still attempted.
    #[error("failed to write artifact {}: {source}", .path.display())]
    SerializationIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn mismatch(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PipelineError::SchemaMismatch {
            table: table.into(),
            column: column.into(),
            message: message.into(),
        }
    }
}
