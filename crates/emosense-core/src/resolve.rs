//! Emotion resolver
//!
//! Turns one face's expression scores into the label shown to the user:
//! 1. Pick the emotion with the highest confidence
//! 2. Break ties by canonical order (`Emotion::ALL`, earlier wins)
//! 3. Apply the overrides, first match wins:
//!    - happy above 0.9 reads as laughing
//!    - fearful reads as anxious
//! 4. Otherwise show the capitalized emotion name

use crate::{EmoResult, EmoSenseError, Emotion, EmotionLabel, ExpressionScores};

/// Happy confidence above which the face is shown as laughing
pub const LAUGHING_THRESHOLD: f32 = 0.9;

/// Highest-scoring emotion, ties resolved by canonical order
///
/// Emotions missing from a non-empty score set count as 0.0.
pub fn dominant(scores: &ExpressionScores) -> Option<(Emotion, f32)> {
    if scores.is_empty() {
        return None;
    }
    Emotion::ALL
        .iter()
        .map(|emotion| (*emotion, scores.score(*emotion)))
        .fold(None, |best, (emotion, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((emotion, value)),
        })
}

/// Resolve scores into a display label
pub fn resolve(scores: &ExpressionScores) -> EmoResult<EmotionLabel> {
    let (emotion, value) = dominant(scores).ok_or_else(|| {
        EmoSenseError::InvalidInput("cannot resolve empty expression scores".to_string())
    })?;

    let label = match emotion {
        Emotion::Happy if value > LAUGHING_THRESHOLD => EmotionLabel::laughing(),
        Emotion::Fearful => EmotionLabel::anxious(),
        other => EmotionLabel::new(other.display_name())?,
    };
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores(pairs: &[(&str, f32)]) -> ExpressionScores {
        ExpressionScores::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_strong_happy_is_laughing() {
        let s = scores(&[("neutral", 0.02), ("happy", 0.95), ("sad", 0.01)]);
        assert_eq!(resolve(&s).unwrap().as_str(), "Laughing! 😄");
    }

    #[test]
    fn test_happy_at_threshold_is_plain() {
        let s = scores(&[("neutral", 0.1), ("happy", 0.9)]);
        assert_eq!(resolve(&s).unwrap().as_str(), "Happy");
    }

    #[test]
    fn test_fearful_is_anxious() {
        let s = scores(&[("neutral", 0.2), ("fearful", 0.5), ("sad", 0.3)]);
        assert_eq!(resolve(&s).unwrap().as_str(), "Anxious / Fearful 😟");
    }

    #[test]
    fn test_plain_label_is_capitalized() {
        let s = scores(&[("neutral", 0.4), ("sad", 0.3)]);
        assert_eq!(resolve(&s).unwrap().as_str(), "Neutral");

        let s = scores(&[("surprised", 0.8), ("angry", 0.1)]);
        assert_eq!(resolve(&s).unwrap().as_str(), "Surprised");
    }

    #[test]
    fn test_tie_prefers_canonical_order() {
        let s = scores(&[("sad", 0.5), ("happy", 0.5)]);
        assert_eq!(dominant(&s), Some((Emotion::Happy, 0.5)));

        // fearful loses a tie against an earlier emotion, so no override
        let s = scores(&[("fearful", 0.4), ("angry", 0.4)]);
        assert_eq!(resolve(&s).unwrap().as_str(), "Angry");
    }

    #[test]
    fn test_missing_emotions_score_zero() {
        // fearful at 0.0 ties the absent neutral, which comes first
        let s = scores(&[("fearful", 0.0)]);
        assert_eq!(dominant(&s), Some((Emotion::Neutral, 0.0)));
        assert_eq!(resolve(&s).unwrap().as_str(), "Neutral");

        let s = scores(&[("disgusted", 0.3)]);
        assert_eq!(resolve(&s).unwrap().as_str(), "Disgusted");
    }

    #[test]
    fn test_empty_scores_are_invalid() {
        let result = resolve(&ExpressionScores::empty());
        assert!(matches!(result, Err(EmoSenseError::InvalidInput(_))));
    }

    fn arb_scores() -> impl Strategy<Value = ExpressionScores> {
        proptest::collection::vec(proptest::option::of(0.0f32..=1.0), Emotion::COUNT)
            .prop_filter("at least one score", |v| v.iter().any(Option::is_some))
            .prop_map(|values| {
                let mut scores = ExpressionScores::empty();
                for (emotion, value) in Emotion::ALL.iter().zip(values) {
                    if let Some(v) = value {
                        scores.set(*emotion, v).unwrap();
                    }
                }
                scores
            })
    }

    proptest! {
        #[test]
        fn prop_label_never_empty(s in arb_scores()) {
            let label = resolve(&s).unwrap();
            prop_assert!(!label.as_str().is_empty());
        }

        #[test]
        fn prop_unique_maximum_wins(s in arb_scores()) {
            let max = Emotion::ALL.iter().map(|e| s.score(*e)).fold(f32::MIN, f32::max);
            let winners: Vec<_> = Emotion::ALL.iter().filter(|e| s.score(**e) == max).collect();
            prop_assume!(winners.len() == 1);

            let expected = *winners[0];
            let (emotion, _) = dominant(&s).unwrap();
            prop_assert_eq!(emotion, expected);

            let label = resolve(&s).unwrap();
            let overridden = matches!(emotion, Emotion::Fearful)
                || (emotion == Emotion::Happy && max > LAUGHING_THRESHOLD);
            if !overridden {
                prop_assert_eq!(label.as_str(), expected.display_name());
            }
        }
    }
}
