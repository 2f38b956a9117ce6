use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::core::{PipelineEvent, RawBatch};
use crate::engine::Pipeline;
use crate::transport::{BatchSource, EventSink};

/// Background ingestion task. Owns the [`Pipeline`] and feeds it batches one at
/// a time in arrival order; events go to the sink without acknowledgement.
pub struct AsyncPipeline {
    tx: Option<mpsc::Sender<RawBatch>>,
    handle: Option<JoinHandle<Pipeline>>,
    sequence: AtomicU64,
}

impl AsyncPipeline {
    /// Spawns the ingestion task. Must be called inside a tokio runtime.
    pub fn start(mut pipeline: Pipeline, sink: EventSink) -> Self {
        let channel_capacity = pipeline.config().ingest.channel_capacity;
        let (tx, mut rx) = mpsc::channel::<RawBatch>(channel_capacity);

        sink.emit(PipelineEvent::status("Connected. Waiting for sensor data..."));
        info!(channel_capacity, "ingestion task started");

        let handle = tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                debug!(seq = batch.sequence_id, samples = batch.ecg.len(), "batch received");
                for event in pipeline.process_batch(batch) {
                    sink.emit(event);
                }
            }
            debug!("ingestion channel closed");
            pipeline
        });

        Self {
            tx: Some(tx),
            handle: Some(handle),
            sequence: AtomicU64::new(0),
        }
    }

    /// Queues one batch, stamping its arrival order and time. Waits while the
    /// channel is full.
    pub async fn submit(&self, batch: RawBatch) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow!("Ingestion task already stopped"))?;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        tx.send(batch.stamped(seq))
            .await
            .map_err(|_| anyhow!("Ingestion task is not running"))
    }

    /// Forwards every batch of `source` until it is exhausted. Returns the
    /// number of batches forwarded.
    pub async fn pump<S>(&self, source: &mut S) -> Result<u64>
    where
        S: BatchSource + ?Sized,
    {
        let mut forwarded = 0;
        while let Some(batch) = source.next_batch().await? {
            self.submit(batch).await?;
            forwarded += 1;
        }
        info!(source = source.name(), forwarded, "source exhausted");
        Ok(forwarded)
    }

    /// Batches submitted so far
    pub fn submitted(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Closes the channel, lets the task drain what is queued and hands the
    /// pipeline back.
    pub async fn stop(mut self) -> Result<Pipeline> {
        drop(self.tx.take());

        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("Ingestion task already stopped"))?;
        let pipeline = handle.await?;

        info!(submitted = self.submitted(), state = pipeline.state().name(), "ingestion task stopped");
        Ok(pipeline)
    }
}
