//! Running statistics over a detection session.

use std::collections::BTreeSet;

use marker_survey_core::Quad;
use serde::{Deserialize, Serialize};

use crate::aggregate::FrameReport;

/// One accepted marker as stored in the session log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub id: u32,
    pub dictionary: String,
    pub corners: Quad,
}

/// Markers observed in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_number: u64,
    /// Seconds from stream start, `frame_number / fps`.
    pub timestamp: f64,
    pub markers_detected: Vec<MarkerRecord>,
}

/// Session counters as serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounters {
    pub total_frames: u64,
    pub frames_with_markers: u64,
    pub total_markers_detected: u64,
    /// Every id seen during the session, ascending.
    pub marker_ids_found: Vec<u32>,
}

/// Immutable snapshot of a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames: Vec<FrameRecord>,
    pub summary: SummaryCounters,
}

/// Accumulates frame reports. Counters only ever grow.
#[derive(Clone, Debug)]
pub struct SessionStats {
    fps: f64,
    total_frames: u64,
    frames_with_markers: u64,
    total_markers: u64,
    ids: BTreeSet<u32>,
    frames: Vec<FrameRecord>,
}

impl SessionStats {
    /// `fps` converts frame numbers into timestamps; non-positive values
    /// yield zero timestamps.
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            total_frames: 0,
            frames_with_markers: 0,
            total_markers: 0,
            ids: BTreeSet::new(),
            frames: Vec::new(),
        }
    }

    pub fn observe(&mut self, frame_number: u64, report: &FrameReport) {
        self.total_frames += 1;

        let markers_detected: Vec<MarkerRecord> = report
            .markers()
            .map(|(dictionary, candidate)| MarkerRecord {
                id: candidate.id,
                dictionary: dictionary.to_string(),
                corners: candidate.corners,
            })
            .collect();

        if !markers_detected.is_empty() {
            self.frames_with_markers += 1;
            self.total_markers += markers_detected.len() as u64;
            self.ids.extend(markers_detected.iter().map(|m| m.id));
        }

        self.frames.push(FrameRecord {
            frame_number,
            timestamp: self.timestamp(frame_number),
            markers_detected,
        });
    }

    fn timestamp(&self, frame_number: u64) -> f64 {
        if self.fps > 0.0 {
            frame_number as f64 / self.fps
        } else {
            0.0
        }
    }

    #[inline]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn counters(&self) -> SummaryCounters {
        SummaryCounters {
            total_frames: self.total_frames,
            frames_with_markers: self.frames_with_markers,
            total_markers_detected: self.total_markers,
            marker_ids_found: self.ids.iter().copied().collect(),
        }
    }

    /// Snapshot of everything observed so far.
    pub fn finalize(&self) -> SessionSummary {
        SessionSummary {
            frames: self.frames.clone(),
            summary: self.counters(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::engine::DictionaryResult;
    use approx::assert_relative_eq;
    use marker_survey_aruco::builtins::builtin_dictionary;
    use marker_survey_core::{DetectionSet, RawCandidate};

    fn report(frame: u64, ids: &[u32]) -> FrameReport {
        let results = if ids.is_empty() {
            Vec::new()
        } else {
            vec![DictionaryResult {
                dictionary: builtin_dictionary("DICT_6X6_250").expect("dict"),
                order: 0,
                detections: DetectionSet::new(
                    ids.iter()
                        .map(|&id| RawCandidate {
                            id,
                            corners: Quad::square(id as f32 * 40.0, 0.0, 20.0),
                        })
                        .collect(),
                    Vec::new(),
                ),
            }]
        };
        aggregate(frame, 640, 480, results)
    }

    #[test]
    fn counts_frames_markers_and_unique_ids() {
        let mut stats = SessionStats::new(30.0);
        let frames: [&[u32]; 4] = [&[3, 1], &[], &[3], &[9, 1, 2]];
        for (k, ids) in frames.iter().enumerate() {
            let n = k as u64 + 1;
            stats.observe(n, &report(n, ids));
        }

        let summary = stats.finalize();
        assert_eq!(summary.summary.total_frames, 4);
        assert_eq!(summary.summary.frames_with_markers, 3);
        assert_eq!(summary.summary.total_markers_detected, 6);
        assert_eq!(summary.summary.marker_ids_found, vec![1, 2, 3, 9]);
        assert!(summary.summary.frames_with_markers <= summary.summary.total_frames);

        assert_eq!(summary.frames.len(), 4);
        assert!(summary.frames[1].markers_detected.is_empty());
        assert_eq!(summary.frames[3].markers_detected[0].dictionary, "DICT_6X6_250");
        assert_relative_eq!(summary.frames[2].timestamp, 0.1);
    }

    #[test]
    fn counters_are_monotonic() {
        let mut stats = SessionStats::new(25.0);
        let mut prev = stats.counters();
        for n in 1..=6u64 {
            let ids: Vec<u32> = (0..(n % 3) as u32).collect();
            stats.observe(n, &report(n, &ids));
            let now = stats.counters();
            assert!(now.total_frames > prev.total_frames);
            assert!(now.frames_with_markers >= prev.frames_with_markers);
            assert!(now.total_markers_detected >= prev.total_markers_detected);
            assert!(now.marker_ids_found.len() >= prev.marker_ids_found.len());
            prev = now;
        }
    }

    #[test]
    fn zero_fps_gives_zero_timestamps() {
        let mut stats = SessionStats::new(0.0);
        stats.observe(5, &report(5, &[1]));
        assert_eq!(stats.finalize().frames[0].timestamp, 0.0);
    }
}
