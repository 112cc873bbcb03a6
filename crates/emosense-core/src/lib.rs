//! EmoSense Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every EmoSense component:
//! - Identifiers (TickId)
//! - Emotions and per-face expression scores
//! - Detected faces, frames and display geometry
//! - Display labels and the emotion resolver

pub mod id;
pub mod emotion;
pub mod face;
pub mod label;
pub mod resolve;
pub mod error;

pub use id::*;
pub use emotion::*;
pub use face::*;
pub use label::*;
pub use resolve::*;
pub use error::*;
