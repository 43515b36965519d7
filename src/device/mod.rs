//! Measurement device access
//!
//! The acquisition loop only sees a [`LineSource`]: something that yields
//! newline-terminated text with a per-read timeout. The serial
//! implementation sits behind a [`DeviceBackend`] so discovery and
//! connection can be replaced in tests.

pub mod discovery;
pub mod serial;
pub mod source;

pub use discovery::{select_device, DeviceBackend, DeviceInfo, SerialBackend};
pub use serial::{SerialLineSource, StreamLineSource};
pub use source::{BufferLineSource, LineSource, ReadOutcome};
