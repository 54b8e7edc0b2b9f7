use crate::error::MonitorError;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Append-only log file. Every record is flushed as soon as it is written so
/// an interrupted run never loses lines that were already captured.
pub struct LogSink {
    file: File,
}

impl LogSink {
    /// Open the log file in append mode, creating it if absent.
    pub async fn open(path: &Path) -> Result<Self, MonitorError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self { file })
    }

    /// Append one rendered record plus a trailing newline and flush.
    pub async fn append(&mut self, rendered: &str) -> Result<(), MonitorError> {
        self.file.write_all(rendered.as_bytes()).await?;
        self.file.write_all(b"\n").await?;
        self.file.flush().await?;

        Ok(())
    }
}
