//! Core types for marker-survey.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete marker decoder or video backend.

mod detection;
mod image;
mod logger;
mod quad;

pub use detection::{DetectionSet, RawCandidate};
pub use image::{Frame, GrayImage};
pub use quad::Quad;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
