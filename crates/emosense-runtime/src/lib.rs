//! EmoSense Runtime - Perception loop and session orchestration
//!
//! Every tick of the perception loop runs these stages:
//! 1. Skip if the previous detection is still in flight
//! 2. Snapshot the current video frame
//! 3. Request detections (the only suspension point)
//! 4. Resolve the first face into a label
//! 5. Publish the label
//! 6. Redraw the overlay
//!
//! The session module performs the one-shot setup around the loop: model
//! loading, camera acquisition and the geolocation/map path.

pub mod config;
pub mod location;
pub mod logging;
pub mod perception;
pub mod session;
pub mod source;

pub use config::*;
pub use location::*;
pub use logging::*;
pub use perception::*;
pub use session::*;
pub use source::*;
