//! Seam to the external marker decoder.

use marker_survey_core::{DetectionSet, Frame};

use crate::{DetectionParameters, Dictionary};

/// A marker decoder for a single dictionary.
///
/// Implementations must be deterministic for fixed inputs and report
/// "nothing decoded" as an empty `accepted` list, never as an error.
pub trait PrimitiveDetector {
    fn detect(
        &self,
        frame: &Frame,
        dictionary: &Dictionary,
        params: &DetectionParameters,
    ) -> DetectionSet;
}

impl<T: PrimitiveDetector + ?Sized> PrimitiveDetector for &T {
    fn detect(
        &self,
        frame: &Frame,
        dictionary: &Dictionary,
        params: &DetectionParameters,
    ) -> DetectionSet {
        (**self).detect(frame, dictionary, params)
    }
}

impl<T: PrimitiveDetector + ?Sized> PrimitiveDetector for Box<T> {
    fn detect(
        &self,
        frame: &Frame,
        dictionary: &Dictionary,
        params: &DetectionParameters,
    ) -> DetectionSet {
        (**self).detect(frame, dictionary, params)
    }
}
