//! JSON run configuration.

use std::fs;
use std::path::{Path, PathBuf};

use marker_survey_aruco::builtins::{builtin_dictionaries, resolve_dictionary, resolve_search_order};
use marker_survey_aruco::DictionaryError;
use marker_survey_search::{SearchMode, SurveyIoError};
use serde::{Deserialize, Serialize};

fn default_output_dir() -> String {
    "validation_results".to_string()
}

fn default_fps() -> f64 {
    30.0
}

fn default_contrast() -> f32 {
    1.0
}

fn default_blur_size() -> u32 {
    1
}

fn default_block_size() -> u32 {
    11
}

fn default_c() -> i32 {
    2
}

/// Preprocessing for the debug strip (original | grayscale | binary).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugViewConfig {
    /// Gain applied before thresholding.
    #[serde(default = "default_contrast")]
    pub contrast: f32,
    /// Offset added after the gain.
    #[serde(default)]
    pub brightness: i32,
    /// Gaussian kernel side in pixels, forced odd; 1 or less disables the blur.
    #[serde(default = "default_blur_size")]
    pub blur_size: u32,
    /// Adaptive-threshold window side in pixels; forced odd, at least 3.
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    /// Constant subtracted from the local mean.
    #[serde(default = "default_c")]
    pub c: i32,
}

impl Default for DebugViewConfig {
    fn default() -> Self {
        Self {
            contrast: default_contrast(),
            brightness: 0,
            blur_size: default_blur_size(),
            block_size: default_block_size(),
            c: default_c(),
        }
    }
}

/// Configuration for one survey run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Frame image, or directory of frame images, standing in for the video.
    pub video_path: String,
    /// Candidate log replayed as the primitive detector.
    #[serde(default)]
    pub candidates_path: Option<String>,
    /// Fixed dictionary; disables the search.
    #[serde(default)]
    pub dictionary: Option<String>,
    /// Try every dictionary instead of stopping at the first hit.
    #[serde(default)]
    pub exhaustive: bool,
    /// Custom search order; defaults to every built-in dictionary.
    #[serde(default)]
    pub search_order: Option<Vec<String>>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Write one annotated PNG per frame here.
    #[serde(default)]
    pub overlay_dir: Option<String>,
    /// Frame rate used for timestamps.
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub max_frames: Option<u64>,
    /// Render overlays as a three-panel debug strip.
    #[serde(default)]
    pub debug_view: Option<DebugViewConfig>,
}

impl SurveyConfig {
    pub fn new(video_path: impl Into<String>) -> Self {
        Self {
            video_path: video_path.into(),
            candidates_path: None,
            dictionary: None,
            exhaustive: false,
            search_order: None,
            output_dir: default_output_dir(),
            overlay_dir: None,
            fps: default_fps(),
            max_frames: None,
            debug_view: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SurveyIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SurveyIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve dictionary names into a search mode.
    ///
    /// A fixed dictionary takes precedence over `exhaustive`. Unknown names
    /// fail here, before any frame is read.
    pub fn search_mode(&self) -> Result<SearchMode, DictionaryError> {
        if let Some(name) = &self.dictionary {
            return Ok(SearchMode::Fixed(resolve_dictionary(name)?));
        }
        let order = match &self.search_order {
            Some(names) => resolve_search_order(names.as_slice())?,
            None => builtin_dictionaries(),
        };
        Ok(if self.exhaustive {
            SearchMode::Exhaustive(order)
        } else {
            SearchMode::FirstMatch(order)
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}
