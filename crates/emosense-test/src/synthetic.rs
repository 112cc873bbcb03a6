//! Synthetic expression source
//!
//! Plays back a looping sequence of moods keyed on the frame index, so a
//! headless run shows the label changing without a real detector.

use async_trait::async_trait;
use emosense_core::{DetectedFace, EmoResult, Emotion, Rect, VideoFrame};
use emosense_runtime::ExpressionSource;

use crate::{dominant_scores, landmarks_68};

/// One step of the playback
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mood {
    /// Nobody in front of the camera
    Absent,
    /// One face dominated by an emotion
    Showing(Emotion, f32),
}

/// Detector stand-in that cycles through moods
pub struct SyntheticSource {
    moods: Vec<Mood>,
    frames_per_mood: u64,
}

impl SyntheticSource {
    pub fn new(moods: Vec<Mood>, frames_per_mood: u64) -> Self {
        SyntheticSource {
            moods,
            frames_per_mood: frames_per_mood.max(1),
        }
    }

    /// A short tour through every label the resolver can produce
    pub fn tour(frames_per_mood: u64) -> Self {
        Self::new(
            vec![
                Mood::Showing(Emotion::Neutral, 0.8),
                Mood::Showing(Emotion::Happy, 0.7),
                Mood::Showing(Emotion::Happy, 0.97),
                Mood::Absent,
                Mood::Showing(Emotion::Fearful, 0.6),
                Mood::Showing(Emotion::Surprised, 0.75),
                Mood::Showing(Emotion::Sad, 0.65),
                Mood::Showing(Emotion::Angry, 0.7),
                Mood::Showing(Emotion::Disgusted, 0.55),
            ],
            frames_per_mood,
        )
    }

    pub fn mood_at(&self, frame_index: u64) -> Mood {
        if self.moods.is_empty() {
            return Mood::Absent;
        }
        let step = (frame_index / self.frames_per_mood) % self.moods.len() as u64;
        self.moods[step as usize]
    }
}

#[async_trait]
impl ExpressionSource for SyntheticSource {
    async fn detect(&self, frame: &VideoFrame) -> EmoResult<Vec<DetectedFace>> {
        match self.mood_at(frame.index) {
            Mood::Absent => Ok(Vec::new()),
            Mood::Showing(emotion, confidence) => {
                let w = frame.width as f32;
                let h = frame.height as f32;
                let region = Rect::new(w * 0.3, h * 0.2, w * 0.4, h * 0.55);
                let face = DetectedFace::new(region, 0.9, dominant_scores(emotion, confidence))
                    .with_landmarks(landmarks_68(region));
                Ok(vec![face])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emosense_core::{resolve, DisplaySize};

    #[test]
    fn test_mood_cycles() {
        let source = SyntheticSource::new(vec![Mood::Absent, Mood::Showing(Emotion::Sad, 0.5)], 3);
        assert_eq!(source.mood_at(0), Mood::Absent);
        assert_eq!(source.mood_at(2), Mood::Absent);
        assert_eq!(source.mood_at(3), Mood::Showing(Emotion::Sad, 0.5));
        assert_eq!(source.mood_at(6), Mood::Absent);
    }

    #[tokio::test]
    async fn test_tour_labels() {
        let source = SyntheticSource::tour(1);
        let size = DisplaySize::new(640, 480).unwrap();

        let mut labels = Vec::new();
        for index in 0..5 {
            let faces = source.detect(&VideoFrame::blank(index, size)).await.unwrap();
            labels.push(match faces.first() {
                Some(face) => resolve(&face.expressions).unwrap().to_string(),
                None => "No Face Detected".to_string(),
            });
        }

        assert_eq!(
            labels,
            vec!["Neutral", "Happy", "Laughing! 😄", "No Face Detected", "Anxious / Fearful 😟"]
        );
    }
}
