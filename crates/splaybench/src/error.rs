//! Error types for splaybench

use std::fmt;
use std::io;

/// Result type alias for workload operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for workload configuration and execution
#[derive(Debug)]
pub enum Error {
    /// I/O error while writing a report
    Io(io::Error),

    /// JSON encoding error
    Json(serde_json::Error),

    /// Parameter that must be positive was zero
    Zero(&'static str),

    /// Workload needs at least two array elements to form a range
    ArrayTooShort(usize),

    /// Probability outside `0.0..=1.0`
    InvalidRatio(f64),

    /// Parameter above its supported maximum
    LimitExceeded {
        /// Parameter name
        what: &'static str,
        /// Requested value
        value: u64,
        /// Largest accepted value
        max: u64,
    },

    /// Range query with `l > r` or `r` past the end of the array
    InvalidRange {
        /// Left bound (inclusive)
        l: usize,
        /// Right bound (inclusive)
        r: usize,
        /// Array length
        len: usize,
    },

    /// Point update past the end of the array
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Two strategies produced different answers for the same input
    Mismatch {
        /// Which workload value disagreed
        what: String,
        /// Answer of the baseline strategy
        expected: String,
        /// Answer of the strategy under test
        actual: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Zero(what) => write!(f, "{} must be greater than 0", what),
            Error::ArrayTooShort(len) => {
                write!(f, "Array too short: {} elements (need at least 2)", len)
            }
            Error::InvalidRatio(ratio) => {
                write!(f, "Invalid ratio: {} (expected 0.0 to 1.0)", ratio)
            }
            Error::LimitExceeded { what, value, max } => {
                write!(f, "{} too large: {} (max {})", what, value, max)
            }
            Error::InvalidRange { l, r, len } => {
                write!(f, "Invalid range [{}, {}] for array of length {}", l, r, len)
            }
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for array of length {}", index, len)
            }
            Error::Mismatch { what, expected, actual } => {
                write!(f, "Result mismatch for {}: expected {}, got {}", what, expected, actual)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
