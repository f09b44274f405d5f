//! Raw detector output for one (frame, dictionary) pair.

use serde::{Deserialize, Serialize};

use crate::Quad;

/// A decoded candidate: four ordered corners plus the dictionary id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub id: u32,
    pub corners: Quad,
}

/// Accepted and rejected candidates from one detector call.
///
/// Also used for the suppressed (filtered) form: same shape, possibly fewer
/// accepted entries, rejected quads untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    #[serde(default)]
    pub accepted: Vec<RawCandidate>,
    /// Quads the detector found but could not decode.
    #[serde(default)]
    pub rejected: Vec<Quad>,
}

impl DetectionSet {
    pub fn new(accepted: Vec<RawCandidate>, rejected: Vec<Quad>) -> Self {
        Self { accepted, rejected }
    }

    /// True when nothing decoded; rejected quads are not counted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Accepted ids in detection order.
    pub fn ids(&self) -> Vec<u32> {
        self.accepted.iter().map(|c| c.id).collect()
    }
}
