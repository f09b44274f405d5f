//! Replay of candidates recorded by an external decoder.
//!
//! The log is JSON:
//!
//! ```json
//! {
//!   "frames": [
//!     {
//!       "frame": 1,
//!       "dictionaries": {
//!         "DICT_6X6_250": {
//!           "accepted": [{ "id": 7, "corners": [[10, 10], [40, 10], [40, 40], [10, 40]] }],
//!           "rejected": [[[100, 100], [120, 100], [120, 120], [100, 120]]]
//!         }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Frames and dictionaries missing from the log decode to nothing.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use marker_survey_core::{DetectionSet, Frame};
use serde::{Deserialize, Serialize};

use crate::{DetectionParameters, Dictionary, PrimitiveDetector};

#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Recorded candidates for one frame, keyed by dictionary name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// 1-based frame number.
    pub frame: u64,
    #[serde(default)]
    pub dictionaries: BTreeMap<String, DetectionSet>,
}

/// On-disk replay log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReplayLog {
    #[serde(default)]
    pub frames: Vec<ReplayFrame>,
}

/// [`PrimitiveDetector`] answering from a recorded [`ReplayLog`].
#[derive(Clone, Debug, Default)]
pub struct ReplayDetector {
    frames: HashMap<u64, BTreeMap<String, DetectionSet>>,
}

impl ReplayDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed log. Later entries for the same frame and
    /// dictionary replace earlier ones.
    pub fn from_log(log: ReplayLog) -> Self {
        let mut detector = Self::new();
        for frame in log.frames {
            for (name, set) in frame.dictionaries {
                detector.insert(frame.frame, name, set);
            }
        }
        detector
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ReplayError> {
        let log: ReplayLog = serde_json::from_str(raw)?;
        Ok(Self::from_log(log))
    }

    /// Load a JSON replay log from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let detector = Self::from_json_str(&raw)?;
        log::info!(
            "loaded replay candidates for {} frames from {}",
            detector.frames.len(),
            path.as_ref().display()
        );
        Ok(detector)
    }

    /// Record the detector answer for `(frame, dictionary)`.
    pub fn insert(&mut self, frame: u64, dictionary: impl Into<String>, set: DetectionSet) {
        self.frames
            .entry(frame)
            .or_default()
            .insert(dictionary.into(), set);
    }

    /// Number of frames with at least one recorded entry.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl PrimitiveDetector for ReplayDetector {
    fn detect(
        &self,
        frame: &Frame,
        dictionary: &Dictionary,
        _params: &DetectionParameters,
    ) -> DetectionSet {
        let Some(set) = self
            .frames
            .get(&frame.number)
            .and_then(|by_dict| by_dict.get(dictionary.name))
        else {
            return DetectionSet::default();
        };

        let mut out = set.clone();
        out.accepted.retain(|c| {
            let valid = dictionary.contains_id(c.id);
            if !valid {
                log::warn!(
                    "frame {}: dropping id {} outside {} (capacity {})",
                    frame.number,
                    c.id,
                    dictionary.name,
                    dictionary.marker_count
                );
            }
            valid
        });
        out
    }
}
