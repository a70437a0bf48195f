//! Error types for radar-composite services.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Primary error type for radar pipeline operations.
#[derive(Debug, Error)]
pub enum RadarError {
    // === Input Errors ===
    #[error("Invalid site identifier: {0}")]
    InvalidSite(String),

    #[error("Invalid archive key: {0}")]
    InvalidKey(String),

    // === Storage Errors ===
    #[error("Storage error: {0}")]
    Storage(String),

    // === Data Errors ===
    #[error("Failed to decode Level-II archive: {0}")]
    Decode(String),

    #[error("Volume has no usable reflectivity data: {0}")]
    EmptyVolume(String),

    // === Processing Errors ===
    #[error("Gridding failed: {0}")]
    Grid(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RadarError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            RadarError::InvalidSite(_) | RadarError::InvalidKey(_) => 400,
            RadarError::Storage(_) => 502,
            _ => 500,
        }
    }
}

impl From<std::io::Error> for RadarError {
    fn from(err: std::io::Error) -> Self {
        RadarError::Internal(err.to_string())
    }
}
