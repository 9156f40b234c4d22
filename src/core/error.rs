use std::error::Error;
use std::fmt;
use std::io;

/// Custom error type for better error handling
#[derive(Debug)]
pub enum SnapError {
    IoError(io::Error),
    SchemaMismatch(String),
}

impl fmt::Display for SnapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SnapError::IoError(err) => write!(f, "I/O error: {}", err),
            SnapError::SchemaMismatch(msg) => write!(f, "Record schema mismatch: {}", msg),
        }
    }
}

impl Error for SnapError {}

impl From<io::Error> for SnapError {
    fn from(err: io::Error) -> Self {
        SnapError::IoError(err)
    }
}

/// Result type alias for cleaner code
pub type SnapResult<T> = Result<T, SnapError>;
