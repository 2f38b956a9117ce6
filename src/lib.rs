pub mod buffers;
pub mod core;
pub mod engine;
pub mod observability;
pub mod registry;
pub mod signal;
pub mod transport;
