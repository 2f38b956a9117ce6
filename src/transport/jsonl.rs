use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};

use crate::core::RawBatch;

use super::BatchSource;

/// Replays a recording with one JSON batch per line. Blank lines are skipped;
/// malformed lines are logged, counted and never handed on.
pub struct JsonLinesSource {
    name: String,
    lines: Lines<BufReader<File>>,
    line_no: usize,
    rejected: u64,
}

impl JsonLinesSource {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open batch recording {}", path.display()))?;
        debug!(path = %path.display(), "replaying batch recording");

        Ok(Self {
            name: path.display().to_string(),
            lines: BufReader::new(file).lines(),
            line_no: 0,
            rejected: 0,
        })
    }

    /// Lines refused so far
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

#[async_trait]
impl BatchSource for JsonLinesSource {
    async fn next_batch(&mut self) -> Result<Option<RawBatch>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match RawBatch::from_json_slice(line.as_bytes()) {
                Ok(batch) => return Ok(Some(batch)),
                Err(e) => {
                    self.rejected += 1;
                    warn!(source = %self.name, line = self.line_no, error = %e, "rejected batch");
                }
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
