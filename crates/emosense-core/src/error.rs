//! Error types for EmoSense

use thiserror::Error;

/// Core EmoSense errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmoSenseError {
    // Input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Detection errors
    #[error("Detection failed: {0}")]
    DetectionFailure(String),

    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    // Capability errors
    #[error("Permission denied")]
    PermissionDenied,

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    // Loop errors
    #[error("Perception loop stopped")]
    LoopStopped,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for EmoSense operations
pub type EmoResult<T> = Result<T, EmoSenseError>;
