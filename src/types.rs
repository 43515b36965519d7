//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Which way the measurement sequence is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Collect fresh readings from the device and save them
    Acquire,
    /// Read a previously saved results file
    Replay,
}

impl RunMode {
    /// Pick the mode from the replay flag
    pub fn from_replay_flag(replay: bool) -> Self {
        if replay {
            Self::Replay
        } else {
            Self::Acquire
        }
    }
}

/// How accepted measurements are echoed to the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EchoMode {
    /// One line per accepted measurement, including its value
    PerSample,
    /// A single progress line overwritten in place
    Overwrite,
}

impl EchoMode {
    /// Quiet mode overwrites a single progress line
    pub fn from_quiet_flag(quiet: bool) -> Self {
        if quiet {
            Self::Overwrite
        } else {
            Self::PerSample
        }
    }
}

/// Which stall message the operator gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallKind {
    /// First stall of the run: full troubleshooting guidance
    First,
    /// Any later stall: short reminder
    Repeated,
}
