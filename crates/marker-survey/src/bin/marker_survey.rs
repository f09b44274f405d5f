//! marker-survey CLI: find ArUco markers in a frame sequence without
//! knowing the dictionary up front.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use marker_survey::aruco::ReplayDetector;
use marker_survey::overlay::OverlayWriter;
use marker_survey::search::SearchEngine;
use marker_survey::{
    run_session, DebugViewConfig, ImageSequenceSource, SessionOptions, SurveyConfig, SurveyError,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "marker-survey")]
#[command(about = "Detect ArUco markers in a video (frame directory), searching over dictionaries")]
#[command(version)]
struct Cli {
    /// Frame image, or directory of frame images.
    video: PathBuf,

    /// Candidate log (JSON) from an external decoder.
    #[arg(long)]
    candidates: Option<PathBuf>,

    /// Use one dictionary instead of searching, e.g. DICT_6X6_250.
    #[arg(long = "dict")]
    dictionary: Option<String>,

    /// Try every dictionary on every frame.
    #[arg(long)]
    exhaustive: bool,

    /// JSON run configuration; flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the statistics file.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write one annotated PNG per frame into this directory.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Render overlays as original | grayscale | binary strips.
    #[arg(long)]
    debug_view: bool,

    /// Frame rate used for timestamps.
    #[arg(long)]
    fps: Option<f64>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Emit tracing output as JSON (requires the `tracing` feature).
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_log: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        eprintln!("error: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> CliResult<()> {
    marker_survey::core::init_with_level(cli.log_level.into())?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> CliResult<()> {
    marker_survey::core::init_tracing(cli.log_level.into(), cli.json_log);
    let _ = tracing_log::LogTracer::init();
    log::set_max_level(cli.log_level.into());
    Ok(())
}

fn build_config(cli: &Cli) -> CliResult<SurveyConfig> {
    let video = cli.video.display().to_string();
    let mut cfg = match &cli.config {
        Some(path) => {
            let mut cfg = SurveyConfig::load_json(path)?;
            cfg.video_path = video;
            cfg
        }
        None => SurveyConfig::new(video),
    };

    if let Some(path) = &cli.candidates {
        cfg.candidates_path = Some(path.display().to_string());
    }
    if let Some(name) = &cli.dictionary {
        cfg.dictionary = Some(name.clone());
    }
    cfg.exhaustive |= cli.exhaustive;
    if let Some(dir) = &cli.output_dir {
        cfg.output_dir = dir.display().to_string();
    }
    if let Some(dir) = &cli.overlay_dir {
        cfg.overlay_dir = Some(dir.display().to_string());
    }
    if cli.debug_view && cfg.debug_view.is_none() {
        cfg.debug_view = Some(DebugViewConfig::default());
    }
    if let Some(fps) = cli.fps {
        cfg.fps = fps;
    }
    if cli.max_frames.is_some() {
        cfg.max_frames = cli.max_frames;
    }
    Ok(cfg)
}

fn run(cli: Cli) -> CliResult<()> {
    let cfg = build_config(&cli)?;

    // Unknown dictionary names fail before the source is touched.
    let mode = cfg.search_mode().map_err(SurveyError::from)?;

    let detector = match &cfg.candidates_path {
        Some(path) => ReplayDetector::load_json(path).map_err(SurveyError::from)?,
        None => {
            log::warn!("no candidate log given; every frame will report no markers");
            ReplayDetector::new()
        }
    };
    let mut engine = SearchEngine::new(detector);
    let mut source = ImageSequenceSource::open(&cfg.video_path, cfg.fps)?;

    let overlays = cfg
        .overlay_dir
        .as_ref()
        .map(|dir| OverlayWriter::new(dir, cfg.debug_view))
        .transpose()?;

    let options = SessionOptions {
        max_frames: cfg.max_frames,
    };
    let record = run_session(&mut source, &mut engine, &mode, &options, |frame, report| {
        if let Some(writer) = &overlays {
            writer.write(frame, report)?;
        }
        Ok(())
    })?;

    let path = record
        .save_to_dir(cfg.output_dir(), SystemTime::now())
        .map_err(SurveyError::from)?;
    println!("Statistics saved to: {}", path.display());

    let summary = &record.summary;
    log::info!("total frames processed: {}", summary.total_frames);
    log::info!("frames with markers: {}", summary.frames_with_markers);
    log::info!("total markers detected: {}", summary.total_markers_detected);
    log::info!("unique marker ids: {:?}", summary.marker_ids_found);
    Ok(())
}
