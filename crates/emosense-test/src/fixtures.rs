//! Face and score fixtures

use emosense_core::{DetectedFace, Emotion, ExpressionScores, Point, Rect};

/// Scores from `(name, confidence)` pairs; panics on malformed input
pub fn scores(pairs: &[(&str, f32)]) -> ExpressionScores {
    ExpressionScores::from_pairs(pairs.iter().copied())
        .unwrap_or_else(|e| panic!("bad fixture scores {pairs:?}: {e}"))
}

/// Scores with one dominant emotion and a small neutral remainder
pub fn dominant_scores(emotion: Emotion, confidence: f32) -> ExpressionScores {
    let mut s = ExpressionScores::empty();
    for other in Emotion::ALL {
        let value = if other == emotion {
            confidence
        } else {
            ((1.0 - confidence) / (Emotion::COUNT as f32 - 1.0)).min(confidence * 0.5)
        };
        s.set(other, value)
            .unwrap_or_else(|e| panic!("bad fixture confidence {confidence}: {e}"));
    }
    s
}

/// Face at a fixed spot in a 640x480 frame
pub fn face(expressions: ExpressionScores) -> DetectedFace {
    DetectedFace::new(Rect::new(200.0, 120.0, 160.0, 200.0), 0.92, expressions)
}

/// Face dominated by `emotion`
pub fn face_showing(emotion: Emotion, confidence: f32) -> DetectedFace {
    face(dominant_scores(emotion, confidence))
}

/// 68 landmark points spread over the face box
pub fn landmarks_68(region: Rect) -> Vec<Point> {
    (0..68)
        .map(|i| {
            let col = (i % 17) as f32 / 16.0;
            let row = (i / 17) as f32 / 3.0;
            Point::new(region.x + col * region.width, region.y + row * region.height)
        })
        .collect()
}
