use anyhow::Result;
use async_trait::async_trait;

use crate::core::RawBatch;

/// Anything that delivers sensor batches in arrival order.
#[async_trait]
pub trait BatchSource: Send {
    /// Next batch, or `None` once the source is exhausted.
    async fn next_batch(&mut self) -> Result<Option<RawBatch>>;

    /// Short label for logs
    fn name(&self) -> &str;
}
