//! Within-dictionary duplicate suppression.

use marker_survey_core::DetectionSet;

/// Drop accepted candidates whose centroid lies closer than `min_distance_px`
/// to an earlier surviving candidate.
///
/// Pairs are visited `i` ascending, then `j > i`; pairs with an already
/// discarded side are skipped. The larger perimeter survives, equal
/// perimeters keep the lower index. Once `i` loses it stops acting as a
/// keeper. Single greedy pass, O(n²) in the accepted count.
///
/// Rejected quads are returned untouched.
pub fn suppress_duplicates(detections: DetectionSet, min_distance_px: f32) -> DetectionSet {
    let DetectionSet { accepted, rejected } = detections;
    if accepted.len() < 2 {
        return DetectionSet { accepted, rejected };
    }

    let centers: Vec<_> = accepted.iter().map(|c| c.corners.centroid()).collect();
    let perimeters: Vec<f32> = accepted.iter().map(|c| c.corners.perimeter()).collect();
    let mut keep = vec![true; accepted.len()];

    for i in 0..accepted.len() {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..accepted.len() {
            if !keep[j] {
                continue;
            }
            if nalgebra::distance(&centers[i], &centers[j]) >= min_distance_px {
                continue;
            }
            if perimeters[j] > perimeters[i] {
                keep[i] = false;
                break;
            }
            keep[j] = false;
        }
    }

    let before = accepted.len();
    let accepted: Vec<_> = accepted
        .into_iter()
        .zip(keep)
        .filter_map(|(candidate, kept)| kept.then_some(candidate))
        .collect();
    if accepted.len() < before {
        log::debug!(
            "suppressed {} duplicate candidates (radius {min_distance_px:.1}px)",
            before - accepted.len()
        );
    }

    DetectionSet { accepted, rejected }
}
