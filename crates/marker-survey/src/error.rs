use marker_survey_aruco::{DictionaryError, ReplayError};
use marker_survey_search::{SearchError, SurveyIoError};

/// Errors that abort a survey run.
#[derive(thiserror::Error, Debug)]
pub enum SurveyError {
    #[error("frame source unavailable: {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error("failed to load candidate log: {0}")]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Record(#[from] SurveyIoError),

    #[cfg(feature = "image")]
    #[error("failed to write overlay: {0}")]
    Overlay(#[from] image::ImageError),
}

impl SurveyError {
    pub(crate) fn source_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
