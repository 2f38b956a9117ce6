pub mod decode;
pub mod error;
pub mod jsonl;
pub mod simulated;
pub mod sink;
pub mod traits;

pub use error::TransportError;
pub use jsonl::JsonLinesSource;
pub use simulated::SimulatedSensor;
pub use sink::EventSink;
pub use traits::BatchSource;
