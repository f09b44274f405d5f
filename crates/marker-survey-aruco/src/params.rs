//! Detection parameters derived from frame resolution.

use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned while planning detection parameters.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidFrame { width: usize, height: usize },
}

/// Thresholds handed to the primitive detector for one frame.
///
/// Values are immutable once planned; rates are fractions in `(0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionParameters {
    pub adaptive_thresh_win_size_min: u32,
    pub adaptive_thresh_win_size_max: u32,
    pub adaptive_thresh_win_size_step: u32,
    pub adaptive_thresh_constant: f32,
    /// Minimum marker perimeter as a fraction of the shorter frame side.
    pub min_marker_perimeter_rate: f32,
    /// Maximum marker perimeter as a fraction of the shorter frame side.
    pub max_marker_perimeter_rate: f32,
    pub polygonal_approx_accuracy_rate: f32,
    pub min_corner_distance_rate: f32,
    pub min_marker_distance_rate: f32,
    /// Minimum distance of any corner to the image border, in pixels.
    pub min_distance_to_border: u32,
    pub perspective_remove_pixel_per_cell: u32,
    pub perspective_remove_ignored_margin_per_cell: f32,
    pub error_correction_rate: f32,
    pub min_otsu_std_dev: f32,
}

impl DetectionParameters {
    /// Plan parameters for a `width × height` frame.
    ///
    /// The adaptive-threshold window grows with the shorter side (1 %,
    /// never below 7 px); every other threshold is fixed.
    #[cfg_attr(feature = "tracing", instrument(level = "debug"))]
    pub fn for_resolution(width: usize, height: usize) -> Result<Self, PlanError> {
        if width == 0 || height == 0 {
            return Err(PlanError::InvalidFrame { width, height });
        }
        let short_side = width.min(height) as f64;

        let base = ((short_side * 0.01).floor() as u32).max(7);
        let min_distance_to_border = ((short_side * 0.03 * 0.02).floor() as u32).max(3);

        Ok(Self {
            adaptive_thresh_win_size_min: base,
            adaptive_thresh_win_size_max: base * 3,
            adaptive_thresh_win_size_step: (base / 3).max(2),
            adaptive_thresh_constant: 7.0,
            min_marker_perimeter_rate: 0.03,
            max_marker_perimeter_rate: 0.3,
            polygonal_approx_accuracy_rate: 0.03,
            min_corner_distance_rate: 0.05,
            min_marker_distance_rate: 0.1,
            min_distance_to_border,
            perspective_remove_pixel_per_cell: 8,
            perspective_remove_ignored_margin_per_cell: 0.4,
            error_correction_rate: 0.6,
            min_otsu_std_dev: 5.0,
        })
    }

    /// All fractional thresholds, for range checks.
    pub fn rates(&self) -> [f32; 7] {
        [
            self.min_marker_perimeter_rate,
            self.max_marker_perimeter_rate,
            self.polygonal_approx_accuracy_rate,
            self.min_corner_distance_rate,
            self.min_marker_distance_rate,
            self.perspective_remove_ignored_margin_per_cell,
            self.error_correction_rate,
        ]
    }
}

/// Plans parameters once per resolution.
///
/// Frames of a video share one resolution, so the planned set is reused until
/// a frame with different dimensions arrives.
#[derive(Clone, Debug, Default)]
pub struct ParameterPlanner {
    cached: Option<((usize, usize), DetectionParameters)>,
}

impl ParameterPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&mut self, width: usize, height: usize) -> Result<DetectionParameters, PlanError> {
        if let Some((dims, params)) = self.cached {
            if dims == (width, height) {
                return Ok(params);
            }
        }
        let params = DetectionParameters::for_resolution(width, height)?;
        log::debug!(
            "planned detection parameters for {width}x{height}: window {}..{} step {}",
            params.adaptive_thresh_win_size_min,
            params.adaptive_thresh_win_size_max,
            params.adaptive_thresh_win_size_step
        );
        self.cached = Some(((width, height), params));
        Ok(params)
    }
}
