//! EmoSense Visual Overlay
//!
//! Draws what the detector saw on top of the video.
//!
//! # Rendering Model
//!
//! The overlay is never patched. Every tick clears the whole surface and
//! redraws all faces from scratch:
//!
//! - Clear the surface
//! - Scale each face from detector coordinates to display coordinates
//! - Draw the bounding box and detection confidence
//! - Draw the expression captions below the box
//! - Draw landmarks (optional)

pub mod color;
pub mod overlay;
pub mod surface;

pub use color::*;
pub use overlay::*;
pub use surface::*;
