//! Load-time errors.
//!
//! These are the only failures the emulator reports. Once a machine has been
//! constructed, stepping it cannot fail.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// One of the three control ROM byte planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Control word bits 0-7.
    Low,
    /// Control word bits 8-15.
    Mid,
    /// Control word bits 16-23.
    High,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "lsb",
            Self::Mid => "msb",
            Self::High => "hsb",
        })
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("control ROM {plane} plane is {len} bytes, need at least {needed}")]
    ControlPlaneTooShort {
        plane: Plane,
        len: usize,
        needed: usize,
    },
    #[error("flash image is {len} bytes, larger than the {capacity}-byte chip")]
    FlashImageTooLarge { len: usize, capacity: usize },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
