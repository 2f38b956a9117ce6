pub mod signal_buffer;

pub use signal_buffer::SignalBuffer;
