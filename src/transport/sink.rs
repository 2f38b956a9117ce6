use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::trace;

use crate::core::PipelineEvent;

/// Outbound event channel to the presentation side. Emission never blocks and
/// never fails; events sent after the receiver is gone are dropped.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<PipelineEvent>,
}

impl EventSink {
    pub fn unbounded() -> (Self, Receiver<PipelineEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: PipelineEvent) {
        if let Err(err) = self.tx.send(event) {
            trace!(event = err.0.name(), "event receiver gone, dropping");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_after_receiver_dropped_is_silent() {
        let (sink, events) = EventSink::unbounded();
        sink.emit(PipelineEvent::status("first"));
        assert_eq!(events.try_recv().unwrap().name(), "status_update");

        drop(events);
        sink.emit(PipelineEvent::status("second"));
    }
}
