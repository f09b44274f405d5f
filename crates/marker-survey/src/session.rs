//! Frame loop: read, search, report, accumulate.

use marker_survey_aruco::PrimitiveDetector;
use marker_survey_core::Frame;
use marker_survey_search::palette::status_lines;
use marker_survey_search::{FrameReport, SearchEngine, SearchMode, SessionStats, SurveyRecord, VideoInfo};

use crate::{FrameSource, SurveyError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Loop controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

/// Process every frame of `source` and return the session record.
///
/// Frames are handled strictly in order. `on_frame` sees each finished
/// report before it is folded into the statistics; an error from it, the
/// source or the engine aborts the run.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(mode = %mode.label()))
)]
pub fn run_session<S, D, F>(
    source: &mut S,
    engine: &mut SearchEngine<D>,
    mode: &SearchMode,
    options: &SessionOptions,
    mut on_frame: F,
) -> Result<SurveyRecord, SurveyError>
where
    S: FrameSource + ?Sized,
    D: PrimitiveDetector,
    F: FnMut(&Frame, &FrameReport) -> Result<(), SurveyError>,
{
    let info = source.info();
    let fixed = mode.fixed_dictionary().map(|d| d.name);
    let mut stats = SessionStats::new(info.fps);

    log::info!(
        "surveying {} ({} frames, {}x{}) with {} over {} dictionaries",
        info.path,
        info.frame_count,
        info.width,
        info.height,
        mode.label(),
        mode.dictionaries().len()
    );

    loop {
        if options
            .max_frames
            .is_some_and(|limit| stats.total_frames() >= limit)
        {
            log::info!("frame limit reached after {} frames", stats.total_frames());
            break;
        }
        let Some(frame) = source.next_frame()? else {
            break;
        };

        let report = engine.process_frame(&frame, mode)?;
        for line in status_lines(&report, fixed) {
            log::debug!("frame {}: {}", frame.number, line.text);
        }
        on_frame(&frame, &report)?;
        stats.observe(frame.number, &report);
    }

    let video_info = VideoInfo {
        path: info.path,
        fps: info.fps,
        frame_count: info.frame_count,
        width: info.width,
        height: info.height,
        dictionary: mode.label(),
    };
    Ok(SurveyRecord::new(video_info, stats.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;
    use marker_survey_aruco::builtins::{builtin_dictionaries, builtin_dictionary};
    use marker_survey_aruco::ReplayDetector;
    use marker_survey_core::{DetectionSet, GrayImage, Quad, RawCandidate};

    fn marker(id: u32, x: f32) -> RawCandidate {
        RawCandidate {
            id,
            corners: Quad::square(x, 40.0, 60.0),
        }
    }

    fn detector() -> ReplayDetector {
        let mut d = ReplayDetector::new();
        d.insert(1, "DICT_5X5_100", DetectionSet::new(vec![marker(4, 10.0)], Vec::new()));
        d.insert(
            1,
            "DICT_6X6_250",
            DetectionSet::new(vec![marker(4, 10.0), marker(11, 200.0)], Vec::new()),
        );
        d.insert(
            3,
            "DICT_6X6_250",
            DetectionSet::new(vec![marker(20, 100.0)], vec![Quad::square(0.0, 0.0, 8.0)]),
        );
        d
    }

    fn source() -> MemorySource {
        MemorySource::new("mem", 30.0, vec![GrayImage::new(640, 480); 4])
    }

    #[test]
    fn first_match_session_counts() {
        let mode = SearchMode::FirstMatch(builtin_dictionaries());
        let mut engine = SearchEngine::new(detector());
        let record = run_session(
            &mut source(),
            &mut engine,
            &mode,
            &SessionOptions::default(),
            |_, _| Ok(()),
        )
        .expect("run");

        assert_eq!(record.video_info.dictionary, "search:first-match");
        assert_eq!(record.summary.total_frames, 4);
        assert_eq!(record.summary.frames_with_markers, 2);
        // Frame 1 stops at DICT_5X5_100, so id 11 is never seen.
        assert_eq!(record.summary.total_markers_detected, 2);
        assert_eq!(record.summary.marker_ids_found, vec![4, 20]);
        assert_eq!(record.frames[0].markers_detected[0].dictionary, "DICT_5X5_100");
    }

    #[test]
    fn exhaustive_session_double_counts_across_dictionaries() {
        let mode = SearchMode::Exhaustive(builtin_dictionaries());
        let mut engine = SearchEngine::new(detector());
        let record = run_session(
            &mut source(),
            &mut engine,
            &mode,
            &SessionOptions::default(),
            |_, _| Ok(()),
        )
        .expect("run");

        assert_eq!(record.summary.total_markers_detected, 4);
        assert_eq!(record.summary.marker_ids_found, vec![4, 11, 20]);
    }

    #[test]
    fn fixed_mode_sees_rejected_quads_and_respects_limit() {
        let dict = builtin_dictionary("DICT_6X6_250").expect("dict");
        let mode = SearchMode::Fixed(dict);
        let mut engine = SearchEngine::new(detector());
        let mut rejected = Vec::new();
        let record = run_session(
            &mut source(),
            &mut engine,
            &mode,
            &SessionOptions {
                max_frames: Some(3),
            },
            |frame, report| {
                rejected.push((frame.number, report.total_rejected()));
                Ok(())
            },
        )
        .expect("run");

        assert_eq!(record.summary.total_frames, 3);
        assert_eq!(record.video_info.dictionary, "DICT_6X6_250");
        assert_eq!(rejected, vec![(1, 0), (2, 0), (3, 1)]);
    }

    #[test]
    fn callback_error_aborts_the_run() {
        let mode = SearchMode::FirstMatch(builtin_dictionaries());
        let mut engine = SearchEngine::new(detector());
        let err = run_session(
            &mut source(),
            &mut engine,
            &mode,
            &SessionOptions::default(),
            |_, _| Err(SurveyError::source_unavailable("overlay", "disk full")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
