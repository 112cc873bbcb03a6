//! Overlay renderer
//!
//! Stateless: the picture on the surface is a function of the arguments of
//! the last `render` call only.

use emosense_core::{DetectedFace, DisplaySize, Point};
use serde::{Deserialize, Serialize};

use crate::{Color, OverlaySurface};

/// How faces are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub box_color: Color,
    pub text_color: Color,
    pub line_width: f32,
    /// Vertical distance between caption lines
    pub line_height: f32,
    /// Expressions below this confidence get no caption
    pub min_expression_confidence: f32,
    pub draw_landmarks: bool,
    pub landmark_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        OverlayStyle {
            box_color: Color::detection(),
            text_color: Color::white(),
            line_width: 2.0,
            line_height: 16.0,
            min_expression_confidence: 0.1,
            draw_landmarks: false,
            landmark_radius: 1.0,
        }
    }
}

/// Detection confidence caption, e.g. `0.87`
pub fn confidence_caption(face: &DetectedFace) -> String {
    format!("{:.2}", face.confidence)
}

/// Expression captions above the style's threshold, strongest first
pub fn expression_captions(face: &DetectedFace, style: &OverlayStyle) -> Vec<String> {
    face.expressions
        .ranked()
        .into_iter()
        .filter(|(_, value)| *value >= style.min_expression_confidence)
        .map(|(emotion, value)| format!("{} ({:.2})", emotion, value))
        .collect()
}

/// Erase the overlay
pub fn clear(surface: &mut dyn OverlaySurface) {
    surface.clear();
}

/// Clear the surface and draw every face
///
/// `source` is the detector's native frame size; faces are scaled from it to
/// `display` before drawing.
pub fn render(
    surface: &mut dyn OverlaySurface,
    faces: &[DetectedFace],
    source: DisplaySize,
    display: DisplaySize,
    style: &OverlayStyle,
) {
    surface.clear();

    for face in faces {
        let face = face.resized(source, display);
        draw_face(surface, &face, style);
    }
}

fn draw_face(surface: &mut dyn OverlaySurface, face: &DetectedFace, style: &OverlayStyle) {
    let region = face.region;
    surface.stroke_rect(region, style.box_color, style.line_width);

    let top_left = region.top_left();
    surface.fill_text(
        &confidence_caption(face),
        Point::new(top_left.x, top_left.y - style.line_width),
        style.text_color,
    );

    let bottom_left = region.bottom_left();
    for (line, caption) in expression_captions(face, style).iter().enumerate() {
        let y = bottom_left.y + style.line_height * (line as f32 + 1.0);
        surface.fill_text(caption, Point::new(bottom_left.x, y), style.text_color);
    }

    if style.draw_landmarks {
        if let Some(landmarks) = &face.landmarks {
            for point in landmarks {
                surface.fill_point(*point, style.landmark_radius, style.box_color);
            }
        }
    }
}
