//! Data models and structures for the G2G delay recorder

pub mod config;
pub mod measurement;

// Re-export main model types
pub use config::Config;
pub use measurement::{Measurement, MeasurementSequence, Stats};
