//! Drawable overlay surfaces

use std::sync::Arc;

use emosense_core::{DisplaySize, Point, Rect};
use parking_lot::Mutex;

use crate::Color;

/// 2D drawable region laid over the video
///
/// The perception loop draws while holding its lock, so a surface must not
/// call back into the loop.
pub trait OverlaySurface: Send {
    /// Match the surface to the video's display dimensions
    fn resize(&mut self, size: DisplaySize);

    fn size(&self) -> Option<DisplaySize>;

    /// Erase everything drawn so far
    fn clear(&mut self);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    fn fill_text(&mut self, text: &str, at: Point, color: Color);

    fn fill_point(&mut self, at: Point, radius: f32, color: Color);
}

/// One drawing call captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(DisplaySize),
    Clear,
    Rect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    Text {
        text: String,
        at: Point,
        color: Color,
    },
    Point {
        at: Point,
        radius: f32,
        color: Color,
    },
}

#[derive(Debug, Default)]
struct Recording {
    size: Option<DisplaySize>,
    commands: Vec<DrawCommand>,
}

/// Headless surface that records every call
///
/// Clones share the same recording, so one handle can be given to the
/// renderer while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command since creation
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.inner.lock().commands.clone()
    }

    /// Commands after the most recent clear, i.e. what is visible now
    pub fn visible(&self) -> Vec<DrawCommand> {
        let recording = self.inner.lock();
        let start = recording
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map(|i| i + 1)
            .unwrap_or(0);
        recording.commands[start..]
            .iter()
            .filter(|c| !matches!(c, DrawCommand::Resize(_)))
            .cloned()
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.inner
            .lock()
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }

    /// Visible text captions
    pub fn texts(&self) -> Vec<String> {
        self.visible()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Visible rectangles
    pub fn rects(&self) -> Vec<Rect> {
        self.visible()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { rect, .. } => Some(rect),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().commands.is_empty()
    }
}

impl OverlaySurface for RecordingSurface {
    fn resize(&mut self, size: DisplaySize) {
        let mut recording = self.inner.lock();
        recording.size = Some(size);
        recording.commands.push(DrawCommand::Resize(size));
    }

    fn size(&self) -> Option<DisplaySize> {
        self.inner.lock().size
    }

    fn clear(&mut self) {
        self.inner.lock().commands.push(DrawCommand::Clear);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.inner.lock().commands.push(DrawCommand::Rect {
            rect,
            color,
            line_width,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, color: Color) {
        self.inner.lock().commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            color,
        });
    }

    fn fill_point(&mut self, at: Point, radius: f32, color: Color) {
        self.inner
            .lock()
            .commands
            .push(DrawCommand::Point { at, radius, color });
    }
}
