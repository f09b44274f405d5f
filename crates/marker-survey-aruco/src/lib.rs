//! ArUco dictionary descriptors and the detector seam.
//!
//! This crate focuses on:
//! - the fixed set of recognized dictionaries and their default search order,
//! - detection parameters scaled to frame resolution,
//! - the [`PrimitiveDetector`] trait that wraps an external marker decoder.
//!
//! It does **not** decode marker bits. A concrete decoder is plugged in
//! through [`PrimitiveDetector`]; [`ReplayDetector`] replays candidates that
//! an external tool recorded as JSON.

pub mod builtins;
mod detector;
mod dictionary;
mod params;
mod replay;

pub use detector::PrimitiveDetector;
pub use dictionary::{parse_dictionary_name, Dictionary, DictionaryError};
pub use params::{DetectionParameters, ParameterPlanner, PlanError};
pub use replay::{ReplayDetector, ReplayError, ReplayFrame, ReplayLog};
