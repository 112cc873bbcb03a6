//! Collaborator interfaces
//!
//! Everything the loop talks to is passed in as an owned handle, so several
//! loops can run side by side and tests can run without a camera.

use std::sync::Arc;

use async_trait::async_trait;
use emosense_core::{DetectedFace, EmoResult, EmotionLabel, VideoFrame};

/// Networks that must be loaded before any detection runs
pub const REQUIRED_MODELS: [&str; 4] = [
    "tiny_face_detector",
    "face_landmark_68",
    "face_recognition",
    "face_expression",
];

/// Opaque face detector + expression classifier
#[async_trait]
pub trait ExpressionSource: Send + Sync {
    /// Detect all faces in `frame`, with expression scores
    async fn detect(&self, frame: &VideoFrame) -> EmoResult<Vec<DetectedFace>>;
}

/// Live video the loop samples from
pub trait VideoSource: Send + Sync {
    /// Display dimensions as `(width, height)`
    fn dimensions(&self) -> (u32, u32);

    /// The frame currently shown
    fn current_frame(&self) -> VideoFrame;
}

/// Text element showing the current emotion
///
/// `publish` is called with the perception loop locked; implementations must
/// not call back into the loop.
pub trait DisplaySink: Send + Sync {
    fn publish(&self, label: &EmotionLabel);
}

/// Plain text element (location line)
pub trait TextSink: Send + Sync {
    fn set_text(&self, text: &str);
}

/// User-facing alert for unrecoverable startup failures
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Loads the detection networks
///
/// The only way to get an [`ExpressionSource`] during setup, which keeps
/// detection from running before the models are ready.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> EmoResult<Arc<dyn ExpressionSource>>;

    fn models(&self) -> &[&'static str] {
        &REQUIRED_MODELS
    }
}

/// Camera capability
#[async_trait]
pub trait Camera: Send + Sync {
    /// Fails with `PermissionDenied` or `CameraUnavailable`
    async fn request_video_stream(&self) -> EmoResult<Arc<dyn VideoSource>>;
}
