//! Per-frame aggregation of dictionary results.

use marker_survey_core::{Quad, RawCandidate};
use serde::Serialize;

use crate::engine::DictionaryResult;

/// One summary line: which ids a dictionary decoded in this frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DictionarySummary {
    pub dictionary: &'static str,
    pub order: usize,
    pub count: usize,
    pub ids: Vec<u32>,
}

/// Undecodable quads reported while trying one dictionary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedGroup {
    pub dictionary: &'static str,
    pub order: usize,
    pub quads: Vec<Quad>,
}

/// Everything known about one frame after the search.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_number: u64,
    pub width: usize,
    pub height: usize,
    /// Dictionary results in search order.
    pub results: Vec<DictionaryResult>,
    pub summaries: Vec<DictionarySummary>,
    /// Rejected quads, one group per dictionary that reported any.
    pub rejected: Vec<RejectedGroup>,
    /// Accepted markers summed over dictionaries.
    ///
    /// A marker decodable under two dictionaries is counted twice: results
    /// are only deduplicated within one dictionary.
    pub total_accepted: usize,
}

impl FrameReport {
    #[inline]
    pub fn has_markers(&self) -> bool {
        self.total_accepted > 0
    }

    pub fn total_rejected(&self) -> usize {
        self.rejected.iter().map(|g| g.quads.len()).sum()
    }

    /// Accepted markers with the dictionary that decoded them.
    pub fn markers(&self) -> impl Iterator<Item = (&'static str, &RawCandidate)> + '_ {
        self.results.iter().flat_map(|r| {
            r.detections
                .accepted
                .iter()
                .map(move |c| (r.dictionary.name, c))
        })
    }

    /// Names of the dictionaries that produced markers.
    pub fn matched_dictionaries(&self) -> Vec<&'static str> {
        self.summaries
            .iter()
            .filter(|s| s.count > 0)
            .map(|s| s.dictionary)
            .collect()
    }
}

/// Merge dictionary results for one frame into a [`FrameReport`].
pub fn aggregate(
    frame_number: u64,
    width: usize,
    height: usize,
    results: Vec<DictionaryResult>,
) -> FrameReport {
    let summaries = results
        .iter()
        .map(|r| DictionarySummary {
            dictionary: r.dictionary.name,
            order: r.order,
            count: r.detections.accepted.len(),
            ids: r.detections.ids(),
        })
        .collect::<Vec<_>>();

    let rejected = results
        .iter()
        .filter(|r| !r.detections.rejected.is_empty())
        .map(|r| RejectedGroup {
            dictionary: r.dictionary.name,
            order: r.order,
            quads: r.detections.rejected.clone(),
        })
        .collect();

    let total_accepted = summaries.iter().map(|s| s.count).sum();

    FrameReport {
        frame_number,
        width,
        height,
        results,
        summaries,
        rejected,
        total_accepted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_survey_aruco::builtins::builtin_dictionary;
    use marker_survey_core::DetectionSet;

    fn result(name: &str, order: usize, ids: &[u32], rejected: usize) -> DictionaryResult {
        DictionaryResult {
            dictionary: builtin_dictionary(name).expect("builtin dict"),
            order,
            detections: DetectionSet::new(
                ids.iter()
                    .map(|&id| RawCandidate {
                        id,
                        corners: Quad::square(id as f32 * 50.0, 0.0, 20.0),
                    })
                    .collect(),
                (0..rejected)
                    .map(|k| Quad::square(0.0, 300.0 + k as f32 * 30.0, 10.0))
                    .collect(),
            ),
        }
    }

    #[test]
    fn empty_input_yields_zero_markers() {
        let report = aggregate(3, 640, 480, Vec::new());
        assert_eq!(report.frame_number, 3);
        assert_eq!(report.total_accepted, 0);
        assert!(!report.has_markers());
        assert!(report.summaries.is_empty());
        assert_eq!(report.total_rejected(), 0);
    }

    #[test]
    fn summaries_follow_result_order() {
        let report = aggregate(
            1,
            640,
            480,
            vec![
                result("DICT_4X4_50", 0, &[3, 1], 2),
                result("DICT_6X6_250", 2, &[7], 0),
            ],
        );
        assert_eq!(report.total_accepted, 3);
        assert_eq!(report.summaries[0].ids, vec![3, 1]);
        assert_eq!(report.summaries[1].dictionary, "DICT_6X6_250");
        assert_eq!(report.summaries[1].order, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].dictionary, "DICT_4X4_50");
        assert_eq!(report.total_rejected(), 2);
        assert_eq!(
            report.matched_dictionaries(),
            vec!["DICT_4X4_50", "DICT_6X6_250"]
        );
    }

    #[test]
    fn same_marker_in_two_dictionaries_counts_twice() {
        let report = aggregate(
            1,
            640,
            480,
            vec![
                result("DICT_4X4_50", 0, &[5], 0),
                result("DICT_4X4_100", 1, &[5], 0),
            ],
        );
        assert_eq!(report.total_accepted, 2);
        let markers: Vec<_> = report.markers().map(|(d, c)| (d, c.id)).collect();
        assert_eq!(markers, vec![("DICT_4X4_50", 5), ("DICT_4X4_100", 5)]);
    }
}
