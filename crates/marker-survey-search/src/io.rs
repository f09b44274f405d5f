//! JSON persistence of session records.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::stats::{FrameRecord, SessionSummary, SummaryCounters};

#[derive(thiserror::Error, Debug)]
pub enum SurveyIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Stream metadata stored alongside the detections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub path: String,
    pub fps: f64,
    pub frame_count: u64,
    pub width: usize,
    pub height: usize,
    /// Fixed dictionary name, or `search:first-match` / `search:exhaustive`.
    pub dictionary: String,
}

/// Complete record of one run, as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub video_info: VideoInfo,
    pub frames: Vec<FrameRecord>,
    pub summary: SummaryCounters,
}

impl SurveyRecord {
    pub fn new(video_info: VideoInfo, session: SessionSummary) -> Self {
        Self {
            video_info,
            frames: session.frames,
            summary: session.summary,
        }
    }

    /// Load a record from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SurveyIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this record to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SurveyIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write into `dir` (created if needed) under a timestamped file name.
    pub fn save_to_dir(
        &self,
        dir: impl AsRef<Path>,
        now: SystemTime,
    ) -> Result<PathBuf, SurveyIoError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(record_file_name(now));
        self.write_json(&path)?;
        Ok(path)
    }
}

/// `aruco_validation_<YYYYmmdd_HHMMSS>.json`, UTC.
pub fn record_file_name(now: SystemTime) -> String {
    let secs = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let rem = secs % 86_400;
    format!(
        "aruco_validation_{year:04}{month:02}{day:02}_{:02}{:02}{:02}.json",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record() -> SurveyRecord {
        SurveyRecord {
            video_info: VideoInfo {
                path: "clip.mp4".to_string(),
                fps: 30.0,
                frame_count: 2,
                width: 640,
                height: 480,
                dictionary: "DICT_6X6_250".to_string(),
            },
            frames: Vec::new(),
            summary: SummaryCounters {
                total_frames: 2,
                frames_with_markers: 1,
                total_markers_detected: 1,
                marker_ids_found: vec![7],
            },
        }
    }

    #[test]
    fn file_name_uses_utc_timestamp() {
        assert_eq!(
            record_file_name(UNIX_EPOCH),
            "aruco_validation_19700101_000000.json"
        );
        // 2024-02-29T13:45:09Z
        let t = UNIX_EPOCH + Duration::from_secs(1_709_214_309);
        assert_eq!(record_file_name(t), "aruco_validation_20240229_134509.json");
    }

    #[test]
    fn civil_dates_cross_year_boundaries() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(-1), (1969, 12, 31));
        assert_eq!(civil_from_days(10_957), (2000, 1, 1));
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("nested/results");
        let rec = record();
        let path = rec
            .save_to_dir(&out, UNIX_EPOCH + Duration::from_secs(86_400))
            .expect("save");
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("aruco_validation_19700102_000000.json")
        );
        assert_eq!(SurveyRecord::load_json(&path).expect("load"), rec);
    }

    #[test]
    fn record_layout_matches_field_names() {
        let value = serde_json::to_value(record()).expect("json");
        assert_eq!(value["video_info"]["dictionary"], "DICT_6X6_250");
        assert_eq!(value["summary"]["marker_ids_found"][0], 7);
        assert!(value["frames"].is_array());
    }
}
