//! Custom error types for ROI processing

use std::fmt;
use std::io;

/// ROI-specific error types
#[derive(Debug)]
pub enum RoiError {
    /// I/O error
    IoError(io::Error),
    /// Buffer allocation failed while growing a mask
    AllocationFailed(usize),
    /// Intersection requested against an empty operand mask
    EmptyOperand,
    /// Persisted mask data length does not match its bounds
    InconsistentMaskData { expected: usize, actual: usize },
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for RoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoiError::IoError(e) => write!(f, "I/O error: {}", e),
            RoiError::AllocationFailed(bytes) =>
                write!(f, "Mask buffer allocation failed ({} bytes requested)", bytes),
            RoiError::EmptyOperand =>
                write!(f, "Cannot intersect with an empty operand mask"),
            RoiError::InconsistentMaskData { expected, actual } =>
                write!(f, "Inconsistent mask data: expected {} bytes, got {}", expected, actual),
            RoiError::GenericError(msg) => write!(f, "ROI error: {}", msg),
        }
    }
}

impl std::error::Error for RoiError {}

impl From<io::Error> for RoiError {
    fn from(error: io::Error) -> Self {
        RoiError::IoError(error)
    }
}

impl From<String> for RoiError {
    fn from(msg: String) -> Self {
        RoiError::GenericError(msg)
    }
}

/// Result type for ROI operations
pub type RoiResult<T> = Result<T, RoiError>;
