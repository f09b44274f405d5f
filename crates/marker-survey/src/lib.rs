//! Fiducial marker survey over video frames.
//!
//! This crate provides:
//! - re-exports of the underlying `marker-survey-*` crates,
//! - a JSON run configuration ([`SurveyConfig`]),
//! - frame sources and the frame loop ([`run_session`]),
//! - (feature `image`) image-sequence input and PNG overlays,
//! - (feature `cli`) the `marker-survey` binary.
//!
//! ## Quickstart
//!
//! ```no_run
//! use marker_survey::aruco::ReplayDetector;
//! use marker_survey::search::SearchEngine;
//! use marker_survey::{run_session, ImageSequenceSource, SessionOptions, SurveyConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = SurveyConfig::new("frames/");
//! let mode = cfg.search_mode()?;
//! let mut source = ImageSequenceSource::open(&cfg.video_path, cfg.fps)?;
//! let mut engine = SearchEngine::new(ReplayDetector::load_json("candidates.json")?);
//! let record = run_session(&mut source, &mut engine, &mode, &SessionOptions::default(), |_, _| Ok(()))?;
//! println!("markers: {}", record.summary.total_markers_detected);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `marker_survey::core`: frames, quads and detection sets.
//! - `marker_survey::aruco`: dictionaries, detection parameters, detector seam.
//! - `marker_survey::search`: suppression, dictionary search, statistics, records.

pub use marker_survey_aruco as aruco;
pub use marker_survey_core as core;
pub use marker_survey_search as search;

mod config;
mod error;
mod session;
mod source;

#[cfg(feature = "image")]
pub mod overlay;

pub use config::{DebugViewConfig, SurveyConfig};
pub use error::SurveyError;
pub use session::{run_session, SessionOptions};
pub use source::{FrameSource, MemorySource, SourceInfo};

#[cfg(feature = "image")]
pub use source::{gray_from_image, ImageSequenceSource};
