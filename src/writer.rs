//! Buffered artifact writer with scoped create and flush.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Writes one output artifact. The file handle lives exactly as long as
/// the value; `finish` flushes and releases it.
pub struct ArtifactWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ArtifactWriter {
    pub fn create(path: &Path) -> Result<Self, PipelineError> {
        let file = File::create(path).map_err(|e| PipelineError::SerializationIo {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, file),
        })
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), PipelineError> {
        if let Err(e) = self.writer.write_all(line.as_bytes()) {
            return Err(self.io_error(e));
        }
        if let Err(e) = self.writer.write_all(b"\n") {
            return Err(self.io_error(e));
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), PipelineError> {
        self.writer.flush().map_err(|e| PipelineError::SerializationIo {
            path: self.path.clone(),
            source: e,
        })
    }

    fn io_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::SerializationIo {
            path: self.path.clone(),
            source,
        }
    }
}
