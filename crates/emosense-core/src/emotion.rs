//! Emotions and expression scores
//!
//! The expression classifier reports one confidence per emotion for every
//! detected face. The set of emotions is closed, so scores are stored in a
//! fixed table indexed by [`Emotion`] rather than in an open-ended map.

use std::fmt;

use crate::{EmoResult, EmoSenseError};

/// Basic facial expressions reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
}

impl Emotion {
    pub const COUNT: usize = 7;

    /// Canonical order. Also the tie-break priority: earlier wins.
    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name as emitted by the classifier
    pub fn name(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Surprised => "surprised",
        }
    }

    /// Parse a classifier name
    pub fn from_name(name: &str) -> Option<Self> {
        Emotion::ALL.iter().copied().find(|e| e.name() == name)
    }

    /// Name with its first character upper-cased
    pub fn display_name(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-face confidences, one optional slot per emotion
///
/// Values are independent scores in [0.0, 1.0]; they are not required to
/// sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpressionScores {
    values: [Option<f32>; Emotion::COUNT],
}

impl ExpressionScores {
    /// Scores with no entries. Only useful to exercise validation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(name, confidence)` pairs as reported by the classifier
    pub fn from_pairs<'a, I>(pairs: I) -> EmoResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut scores = Self::empty();
        for (name, value) in pairs {
            let emotion = Emotion::from_name(name)
                .ok_or_else(|| EmoSenseError::InvalidInput(format!("unknown emotion '{name}'")))?;
            if scores.values[emotion.index()].is_some() {
                return Err(EmoSenseError::InvalidInput(format!(
                    "duplicate emotion '{name}'"
                )));
            }
            scores.set(emotion, value)?;
        }

        if scores.is_empty() {
            return Err(EmoSenseError::InvalidInput(
                "expression scores are empty".to_string(),
            ));
        }
        Ok(scores)
    }

    /// Set one confidence, rejecting values outside [0.0, 1.0]
    pub fn set(&mut self, emotion: Emotion, value: f32) -> EmoResult<()> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(EmoSenseError::InvalidInput(format!(
                "confidence for '{emotion}' out of range: {value}"
            )));
        }
        self.values[emotion.index()] = Some(value);
        Ok(())
    }

    /// Builder form of [`ExpressionScores::set`]
    pub fn with(mut self, emotion: Emotion, value: f32) -> EmoResult<Self> {
        self.set(emotion, value)?;
        Ok(self)
    }

    #[inline]
    pub fn get(&self, emotion: Emotion) -> Option<f32> {
        self.values[emotion.index()]
    }

    /// Confidence, treating a missing entry as 0.0
    #[inline]
    pub fn score(&self, emotion: Emotion) -> f32 {
        self.get(emotion).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Present entries in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL
            .iter()
            .filter_map(move |e| self.get(*e).map(|v| (*e, v)))
    }

    /// Present entries, highest confidence first (ties keep canonical order)
    pub fn ranked(&self) -> Vec<(Emotion, f32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }
}
