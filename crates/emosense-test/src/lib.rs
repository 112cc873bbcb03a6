//! EmoSense Test Harness - Doubles and chaos for the perception loop
//!
//! This crate provides:
//! - Face and score fixtures
//! - Scripted and gated expression sources
//! - Chaos expression source (latency jitter, failures, lost faces)
//! - Synthetic expression source for demos
//! - Recording sinks and fake host capabilities (camera, geolocation, map)

pub mod chaos;
pub mod doubles;
pub mod fixtures;
pub mod synthetic;

pub use chaos::*;
pub use doubles::*;
pub use fixtures::*;
pub use synthetic::*;
