//! Marker-candidate disambiguation and dictionary search.
//!
//! Pipeline per frame:
//! - plan detection parameters from the frame resolution,
//! - run the primitive detector for each dictionary in priority order,
//! - suppress near-duplicate candidates within each dictionary,
//! - aggregate per-dictionary results into a [`FrameReport`],
//! - fold the report into running [`SessionStats`].
//!
//! Dictionaries and the detector seam live in `marker-survey-aruco`.

mod aggregate;
mod engine;
mod io;
pub mod palette;
mod stats;
mod suppress;

pub use aggregate::{aggregate, DictionarySummary, FrameReport, RejectedGroup};
pub use engine::{min_distance_px, DictionaryResult, SearchEngine, SearchError, SearchMode};
pub use io::{record_file_name, SurveyIoError, SurveyRecord, VideoInfo};
pub use stats::{FrameRecord, MarkerRecord, SessionStats, SessionSummary, SummaryCounters};
pub use suppress::suppress_duplicates;
