//! Display labels

use std::fmt;

use crate::{EmoResult, EmoSenseError};

/// Text shown in the display sink. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmotionLabel(String);

impl EmotionLabel {
    pub const NO_FACE: &'static str = "No Face Detected";
    pub const LAUGHING: &'static str = "Laughing! 😄";
    pub const ANXIOUS: &'static str = "Anxious / Fearful 😟";

    pub fn new(text: impl Into<String>) -> EmoResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(EmoSenseError::InvalidInput("label is empty".to_string()));
        }
        Ok(EmotionLabel(text))
    }

    /// Sentinel published when a tick finds no face
    pub fn no_face() -> Self {
        EmotionLabel(Self::NO_FACE.to_string())
    }

    pub(crate) fn laughing() -> Self {
        EmotionLabel(Self::LAUGHING.to_string())
    }

    pub(crate) fn anxious() -> Self {
        EmotionLabel(Self::ANXIOUS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_no_face(&self) -> bool {
        self.0 == Self::NO_FACE
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmotionLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
