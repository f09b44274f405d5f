//! Dictionary search over an ordered dictionary list.

use marker_survey_aruco::{
    DetectionParameters, Dictionary, ParameterPlanner, PlanError, PrimitiveDetector,
};
use marker_survey_core::{DetectionSet, Frame};
use serde::Serialize;

use crate::aggregate::{aggregate, FrameReport};
use crate::suppress::suppress_duplicates;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by the search engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    InvalidFrame(#[from] PlanError),
}

/// Filtered detections of one dictionary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DictionaryResult {
    pub dictionary: Dictionary,
    /// Position of the dictionary in the search order; drives color choice.
    pub order: usize,
    pub detections: DetectionSet,
}

/// How a frame is matched against dictionaries.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchMode {
    /// One known dictionary, no search.
    Fixed(Dictionary),
    /// Stop at the first dictionary with any accepted marker.
    FirstMatch(Vec<Dictionary>),
    /// Try every dictionary and keep all with hits.
    Exhaustive(Vec<Dictionary>),
}

impl SearchMode {
    /// Label stored in the session record.
    pub fn label(&self) -> String {
        match self {
            SearchMode::Fixed(dict) => dict.name.to_string(),
            SearchMode::FirstMatch(_) => "search:first-match".to_string(),
            SearchMode::Exhaustive(_) => "search:exhaustive".to_string(),
        }
    }

    /// Dictionaries in search order.
    pub fn dictionaries(&self) -> &[Dictionary] {
        match self {
            SearchMode::Fixed(dict) => std::slice::from_ref(dict),
            SearchMode::FirstMatch(dicts) | SearchMode::Exhaustive(dicts) => dicts.as_slice(),
        }
    }

    pub fn fixed_dictionary(&self) -> Option<&Dictionary> {
        match self {
            SearchMode::Fixed(dict) => Some(dict),
            _ => None,
        }
    }
}

/// Centroid radius below which two candidates count as the same marker.
///
/// 2 % of the shorter frame side, never below 20 px.
pub fn min_distance_px(width: usize, height: usize) -> f32 {
    ((width.min(height) as f64 * 0.02).floor() as f32).max(20.0)
}

/// Per-frame context shared by every dictionary tried on that frame.
struct FramePlan {
    params: DetectionParameters,
    min_distance_px: f32,
}

/// Runs the primitive detector per dictionary and suppresses duplicates.
pub struct SearchEngine<D> {
    detector: D,
    planner: ParameterPlanner,
}

impl<D: PrimitiveDetector> SearchEngine<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            planner: ParameterPlanner::new(),
        }
    }

    #[inline]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Try dictionaries in order and return the first with accepted markers.
    ///
    /// Later dictionaries are never tried once one hits. `None` means every
    /// dictionary came back empty.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, dictionaries), fields(frame = frame.number))
    )]
    pub fn search_first(
        &mut self,
        frame: &Frame,
        dictionaries: &[Dictionary],
    ) -> Result<Option<DictionaryResult>, SearchError> {
        let plan = self.plan_frame(frame)?;
        for (order, dictionary) in dictionaries.iter().enumerate() {
            let result = self.detect_one(frame, dictionary, order, &plan);
            if !result.detections.is_empty() {
                log::debug!(
                    "frame {}: first match in {} ({} markers)",
                    frame.number,
                    dictionary.name,
                    result.detections.accepted.len()
                );
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Try every dictionary and keep those with accepted markers, in order.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, dictionaries), fields(frame = frame.number))
    )]
    pub fn search_all(
        &mut self,
        frame: &Frame,
        dictionaries: &[Dictionary],
    ) -> Result<Vec<DictionaryResult>, SearchError> {
        let plan = self.plan_frame(frame)?;
        Ok(dictionaries
            .iter()
            .enumerate()
            .map(|(order, dictionary)| self.detect_one(frame, dictionary, order, &plan))
            .filter(|result| !result.detections.is_empty())
            .collect())
    }

    /// Run a single known dictionary. The result is kept even when empty so
    /// rejected quads stay visible.
    pub fn detect_fixed(
        &mut self,
        frame: &Frame,
        dictionary: &Dictionary,
    ) -> Result<DictionaryResult, SearchError> {
        let plan = self.plan_frame(frame)?;
        Ok(self.detect_one(frame, dictionary, 0, &plan))
    }

    /// Search one frame according to `mode` and aggregate the outcome.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        mode: &SearchMode,
    ) -> Result<FrameReport, SearchError> {
        let results = match mode {
            SearchMode::Fixed(dictionary) => vec![self.detect_fixed(frame, dictionary)?],
            SearchMode::FirstMatch(dicts) => self.search_first(frame, dicts)?.into_iter().collect(),
            SearchMode::Exhaustive(dicts) => self.search_all(frame, dicts)?,
        };
        Ok(aggregate(frame.number, frame.width(), frame.height(), results))
    }

    fn plan_frame(&mut self, frame: &Frame) -> Result<FramePlan, SearchError> {
        let (width, height) = (frame.width(), frame.height());
        Ok(FramePlan {
            params: self.planner.plan(width, height)?,
            min_distance_px: min_distance_px(width, height),
        })
    }

    fn detect_one(
        &self,
        frame: &Frame,
        dictionary: &Dictionary,
        order: usize,
        plan: &FramePlan,
    ) -> DictionaryResult {
        let raw = self.detector.detect(frame, dictionary, &plan.params);
        log::trace!(
            "frame {} {}: {} accepted, {} rejected",
            frame.number,
            dictionary.name,
            raw.accepted.len(),
            raw.rejected.len()
        );
        DictionaryResult {
            dictionary: *dictionary,
            order,
            detections: suppress_duplicates(raw, plan.min_distance_px),
        }
    }
}
