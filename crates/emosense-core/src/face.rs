//! Detected faces, frames and display geometry

use bytes::Bytes;

use crate::{EmoResult, EmoSenseError, ExpressionScores};

/// 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(&self, sx: f32, sy: f32) -> Point {
        Point::new(self.x * sx, self.y * sy)
    }
}

/// Axis-aligned bounding region: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn scale(&self, sx: f32, sy: f32) -> Rect {
        Rect::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.x, self.y + self.height)
    }
}

/// Pixel dimensions of a frame or a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    /// Both dimensions must be non-zero
    pub fn new(width: u32, height: u32) -> EmoResult<Self> {
        if width == 0 || height == 0 {
            return Err(EmoSenseError::InvalidInput(format!(
                "display size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Horizontal and vertical factors mapping `self` onto `target`
    pub fn scale_to(&self, target: DisplaySize) -> (f32, f32) {
        if self.width == 0 || self.height == 0 {
            return (1.0, 1.0);
        }
        (
            target.width as f32 / self.width as f32,
            target.height as f32 / self.height as f32,
        )
    }
}

/// One face found in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFace {
    /// Bounding region in the detector's native coordinates
    pub region: Rect,
    /// Detector confidence that this region is a face
    pub confidence: f32,
    pub expressions: ExpressionScores,
    /// Landmark points, if the landmark net ran
    pub landmarks: Option<Vec<Point>>,
}

impl DetectedFace {
    pub fn new(region: Rect, confidence: f32, expressions: ExpressionScores) -> Self {
        Self {
            region,
            confidence,
            expressions,
            landmarks: None,
        }
    }

    pub fn with_landmarks(mut self, landmarks: Vec<Point>) -> Self {
        self.landmarks = Some(landmarks);
        self
    }

    /// Map region and landmarks from `from` coordinates to `to` coordinates
    pub fn resized(&self, from: DisplaySize, to: DisplaySize) -> DetectedFace {
        let (sx, sy) = from.scale_to(to);
        DetectedFace {
            region: self.region.scale(sx, sy),
            confidence: self.confidence,
            expressions: self.expressions,
            landmarks: self
                .landmarks
                .as_ref()
                .map(|points| points.iter().map(|p| p.scale(sx, sy)).collect()),
        }
    }
}

/// Snapshot of the video at the moment a tick samples it
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Monotonic frame counter of the video source
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Bytes,
}

impl VideoFrame {
    pub fn new(index: u64, width: u32, height: u32, pixels: Bytes) -> Self {
        Self {
            index,
            width,
            height,
            pixels,
        }
    }

    /// Frame without pixel data, for sources that read the video themselves
    pub fn blank(index: u64, size: DisplaySize) -> Self {
        Self::new(index, size.width, size.height, Bytes::new())
    }

    /// Native dimensions detections are expressed in
    pub fn size(&self) -> DisplaySize {
        DisplaySize {
            width: self.width,
            height: self.height,
        }
    }
}
