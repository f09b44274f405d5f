//! Frame sources feeding the survey loop.

use std::collections::VecDeque;

use marker_survey_core::{Frame, GrayImage};

use crate::SurveyError;

/// Stream metadata reported by a source before the loop starts.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    pub path: String,
    pub fps: f64,
    pub frame_count: u64,
    pub width: usize,
    pub height: usize,
}

/// Sequential frame reader. `Ok(None)` marks the end of the stream.
pub trait FrameSource {
    fn info(&self) -> SourceInfo;

    fn next_frame(&mut self) -> Result<Option<Frame>, SurveyError>;
}

/// Frames held in memory; useful for tests and embedding.
#[derive(Clone, Debug)]
pub struct MemorySource {
    info: SourceInfo,
    frames: VecDeque<GrayImage>,
    next_number: u64,
}

impl MemorySource {
    pub fn new(path: impl Into<String>, fps: f64, frames: Vec<GrayImage>) -> Self {
        let (width, height) = frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0));
        Self {
            info: SourceInfo {
                path: path.into(),
                fps,
                frame_count: frames.len() as u64,
                width,
                height,
            },
            frames: frames.into(),
            next_number: 1,
        }
    }
}

impl FrameSource for MemorySource {
    fn info(&self) -> SourceInfo {
        self.info.clone()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SurveyError> {
        let Some(image) = self.frames.pop_front() else {
            return Ok(None);
        };
        let frame = Frame::new(self.next_number, image);
        self.next_number += 1;
        Ok(Some(frame))
    }
}

#[cfg(feature = "image")]
pub use image_source::{gray_from_image, ImageSequenceSource};

#[cfg(feature = "image")]
mod image_source {
    use std::fs;
    use std::path::{Path, PathBuf};

    use marker_survey_core::{Frame, GrayImage};

    use super::{FrameSource, SourceInfo};
    use crate::SurveyError;

    const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "pgm"];

    /// Convert an `image::GrayImage` into the core buffer type.
    pub fn gray_from_image(img: ::image::GrayImage) -> GrayImage {
        let (width, height) = (img.width() as usize, img.height() as usize);
        GrayImage {
            width,
            height,
            data: img.into_raw(),
        }
    }

    fn decode(path: &Path) -> Result<GrayImage, SurveyError> {
        let img = ::image::open(path)
            .map_err(|e| SurveyError::source_unavailable(path.display().to_string(), e))?;
        Ok(gray_from_image(img.to_luma8()))
    }

    /// A single image, or a directory of images sorted by file name, read
    /// as a video.
    #[derive(Debug)]
    pub struct ImageSequenceSource {
        path: PathBuf,
        files: Vec<PathBuf>,
        fps: f64,
        width: usize,
        height: usize,
        cursor: usize,
        first: Option<GrayImage>,
    }

    impl ImageSequenceSource {
        /// Open `path` and decode the first frame to learn the resolution.
        pub fn open(path: impl AsRef<Path>, fps: f64) -> Result<Self, SurveyError> {
            let path = path.as_ref().to_path_buf();
            let shown = path.display().to_string();

            let files = if path.is_dir() {
                let mut files: Vec<PathBuf> = fs::read_dir(&path)
                    .map_err(|e| SurveyError::source_unavailable(&shown, e))?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.is_file() && has_frame_extension(p))
                    .collect();
                files.sort();
                files
            } else if path.is_file() {
                vec![path.clone()]
            } else {
                return Err(SurveyError::source_unavailable(shown, "no such file or directory"));
            };

            let Some(first_path) = files.first() else {
                return Err(SurveyError::source_unavailable(shown, "no frame images found"));
            };
            let first = decode(first_path)?;
            log::info!(
                "opened {} frames ({}x{}) from {}",
                files.len(),
                first.width,
                first.height,
                shown
            );

            Ok(Self {
                width: first.width,
                height: first.height,
                path,
                files,
                fps,
                cursor: 0,
                first: Some(first),
            })
        }
    }

    fn has_frame_extension(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }

    impl FrameSource for ImageSequenceSource {
        fn info(&self) -> SourceInfo {
            SourceInfo {
                path: self.path.display().to_string(),
                fps: self.fps,
                frame_count: self.files.len() as u64,
                width: self.width,
                height: self.height,
            }
        }

        fn next_frame(&mut self) -> Result<Option<Frame>, SurveyError> {
            let Some(file) = self.files.get(self.cursor) else {
                return Ok(None);
            };
            // A frame that no longer decodes ends the stream, like a short
            // read from a video file; frames already handed out stay valid.
            let image = match self.first.take() {
                Some(image) => image,
                None => match decode(file) {
                    Ok(image) => image,
                    Err(err) => {
                        log::warn!("end of stream at frame {}: {err}", self.cursor + 1);
                        self.cursor = self.files.len();
                        return Ok(None);
                    }
                },
            };
            self.cursor += 1;
            Ok(Some(Frame::new(self.cursor as u64, image)))
        }
    }

}
