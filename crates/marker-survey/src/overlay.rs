//! PNG overlays: detected polygons, rejected quads and the debug strip.
//!
//! Accepted markers use their dictionary's palette color, rejected quads
//! are red. The debug strip places original | adjusted grayscale |
//! adaptive-threshold binary side by side and draws the overlay on each
//! panel separately.

use std::fs;
use std::path::{Path, PathBuf};

use ::image::{imageops, DynamicImage, GrayImage as LumaImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::filter::{box_filter, gaussian_blur_f32};
use imageproc::map::map_colors;
use imageproc::rect::Rect;
use marker_survey_core::{Frame, GrayImage, Quad};
use marker_survey_search::palette::{palette_color, REJECTED_COLOR};
use marker_survey_search::{FrameReport, SurveyIoError};

use crate::{DebugViewConfig, SurveyError};

/// Copy a core gray buffer into an `image` buffer.
pub fn to_luma(gray: &GrayImage) -> LumaImage {
    LumaImage::from_fn(gray.width as u32, gray.height as u32, |x, y| {
        Luma([gray.data[y as usize * gray.width + x as usize]])
    })
}

/// `clamp(v * contrast + brightness)` per pixel.
pub fn adjust_levels(gray: &LumaImage, contrast: f32, brightness: i32) -> LumaImage {
    map_colors(gray, |Luma([v])| {
        Luma([(v as f32 * contrast + brightness as f32).round().clamp(0.0, 255.0) as u8])
    })
}

/// Gaussian blur with an odd `kernel_size`; sizes of 1 or less return a copy.
///
/// Sigma is derived from the kernel side the usual way,
/// `0.3 * ((k - 1) / 2 - 1) + 0.8`.
pub fn blur(gray: &LumaImage, kernel_size: u32) -> LumaImage {
    if kernel_size <= 1 {
        return gray.clone();
    }
    let k = (kernel_size | 1) as f32;
    let sigma = 0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8;
    gaussian_blur_f32(gray, sigma)
}

/// Binary image: 255 where a pixel exceeds its local mean minus `c`.
///
/// The mean window is `block_size` pixels wide, forced odd and at least 3.
pub fn adaptive_threshold(gray: &LumaImage, block_size: u32, c: i32) -> LumaImage {
    let radius = (block_size.max(3) | 1) / 2;
    let mean = box_filter(gray, radius, radius);
    LumaImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0] as i32;
        let m = mean.get_pixel(x, y)[0] as i32;
        Luma([if v > m - c { 255 } else { 0 }])
    })
}

/// Closed polygon, two pixels wide, optionally with a filled first corner.
fn draw_quad(img: &mut RgbImage, quad: &Quad, color: [u8; 3], mark_first: bool) {
    let color = Rgb(color);
    let pts = quad.corners.map(|p| (p.x, p.y));
    for k in 0..4 {
        let (a, b) = (pts[k], pts[(k + 1) % 4]);
        draw_line_segment_mut(img, a, b, color);
        draw_line_segment_mut(img, (a.0 + 1.0, a.1), (b.0 + 1.0, b.1), color);
        draw_line_segment_mut(img, (a.0, a.1 + 1.0), (b.0, b.1 + 1.0), color);
    }
    if mark_first {
        let (cx, cy) = quad.pixel_corners()[0];
        draw_filled_rect_mut(img, Rect::at(cx - 2, cy - 2).of_size(5, 5), color);
    }
}

fn draw_report(img: &mut RgbImage, report: &FrameReport) {
    for group in &report.rejected {
        for quad in &group.quads {
            draw_quad(img, quad, REJECTED_COLOR, false);
        }
    }
    for result in &report.results {
        let color = palette_color(result.order);
        for candidate in &result.detections.accepted {
            draw_quad(img, &candidate.corners, color, true);
        }
    }
}

fn annotated(gray: LumaImage, report: &FrameReport) -> RgbImage {
    let mut img = DynamicImage::ImageLuma8(gray).to_rgb8();
    draw_report(&mut img, report);
    img
}

/// Frame with the report drawn on top.
pub fn render_overlay(frame: &Frame, report: &FrameReport) -> RgbImage {
    annotated(to_luma(&frame.image), report)
}

/// Three panels (original | adjusted | binary), overlay drawn on each.
///
/// Each panel is annotated on its own canvas, so a quad leaving the frame
/// never spills into a neighbouring panel.
pub fn render_debug_strip(frame: &Frame, report: &FrameReport, cfg: &DebugViewConfig) -> RgbImage {
    let original = to_luma(&frame.image);
    let adjusted = blur(
        &adjust_levels(&original, cfg.contrast, cfg.brightness),
        cfg.blur_size,
    );
    let binary = adaptive_threshold(&adjusted, cfg.block_size, cfg.c);

    let (w, h) = original.dimensions();
    let mut strip = RgbImage::new(w * 3, h);
    for (panel, gray) in [original, adjusted, binary].into_iter().enumerate() {
        let annotated = annotated(gray, report);
        imageops::replace(&mut strip, &annotated, panel as i64 * w as i64, 0);
    }
    strip
}

/// Writes one PNG per frame into a directory.
#[derive(Clone, Debug)]
pub struct OverlayWriter {
    dir: PathBuf,
    debug_view: Option<DebugViewConfig>,
}

impl OverlayWriter {
    pub fn new(dir: impl AsRef<Path>, debug_view: Option<DebugViewConfig>) -> Result<Self, SurveyError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(SurveyIoError::from)?;
        Ok(Self { dir, debug_view })
    }

    pub fn write(&self, frame: &Frame, report: &FrameReport) -> Result<PathBuf, SurveyError> {
        let img = match &self.debug_view {
            Some(cfg) => render_debug_strip(frame, report, cfg),
            None => render_overlay(frame, report),
        };
        let path = self.dir.join(format!("frame_{:06}.png", frame.number));
        img.save(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_survey_aruco::builtins::builtin_dictionary;
    use marker_survey_core::{DetectionSet, RawCandidate};
    use marker_survey_search::palette::PALETTE;
    use marker_survey_search::{aggregate, DictionaryResult};

    fn report_with(accepted: Vec<RawCandidate>, rejected: Vec<Quad>) -> FrameReport {
        aggregate(
            1,
            64,
            48,
            vec![DictionaryResult {
                dictionary: builtin_dictionary("DICT_4X4_50").expect("dict"),
                order: 1,
                detections: DetectionSet::new(accepted, rejected),
            }],
        )
    }

    fn report() -> FrameReport {
        report_with(
            vec![RawCandidate {
                id: 2,
                corners: Quad::square(10.0, 10.0, 20.0),
            }],
            vec![Quad::square(40.0, 5.0, 10.0)],
        )
    }

    fn frame() -> Frame {
        Frame::new(1, GrayImage::from_raw(64, 48, vec![100; 64 * 48]).expect("buffer"))
    }

    #[test]
    fn overlay_uses_palette_and_rejected_colors() {
        let img = render_overlay(&frame(), &report());
        assert_eq!(img.get_pixel(20, 10).0, PALETTE[1]);
        assert_eq!(img.get_pixel(45, 5).0, REJECTED_COLOR);
        assert_eq!(img.get_pixel(20, 20).0, [100, 100, 100]);
    }

    #[test]
    fn debug_strip_has_three_panels() {
        let strip = render_debug_strip(&frame(), &report(), &DebugViewConfig::default());
        assert_eq!((strip.width(), strip.height()), (64 * 3, 48));
        assert_eq!(strip.get_pixel(20, 10).0, PALETTE[1]);
        assert_eq!(strip.get_pixel(64 + 20, 10).0, PALETTE[1]);
        assert_eq!(strip.get_pixel(128 + 20, 10).0, PALETTE[1]);
    }

    #[test]
    fn debug_strip_clips_each_panel() {
        // Straddles the left edge: x in [-10, 10].
        let quad = Quad::from_xy([[-10.0, 5.0], [10.0, 5.0], [10.0, 20.0], [-10.0, 20.0]]);
        let report = report_with(vec![RawCandidate { id: 1, corners: quad }], Vec::new());
        let strip = render_debug_strip(&frame(), &report, &DebugViewConfig::default());

        assert_eq!(strip.get_pixel(5, 5).0, PALETTE[1]);
        assert_eq!(strip.get_pixel(64 + 5, 5).0, PALETTE[1]);
        // Left neighbours of panels 1 and 2 stay untouched.
        assert_eq!(strip.get_pixel(54, 5).0, [100, 100, 100]);
        assert_eq!(strip.get_pixel(118, 5).0, [100, 100, 100]);
    }

    #[test]
    fn adaptive_threshold_flat_image_follows_offset() {
        let gray = LumaImage::from_pixel(8, 8, Luma([50]));
        let bin = adaptive_threshold(&gray, 3, 2);
        assert!(bin.pixels().all(|p| p[0] == 255));

        let bin = adaptive_threshold(&gray, 3, -2);
        assert!(bin.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn adaptive_threshold_separates_step_edge() {
        let gray = LumaImage::from_fn(10, 4, |x, _| Luma([if x < 5 { 20 } else { 220 }]));
        let bin = adaptive_threshold(&gray, 5, 0);
        assert_eq!(bin.get_pixel(4, 1)[0], 0);
        assert_eq!(bin.get_pixel(5, 1)[0], 255);
    }

    #[test]
    fn blur_smooths_an_impulse_and_size_one_is_identity() {
        let mut gray = LumaImage::from_pixel(9, 9, Luma([0]));
        gray.put_pixel(4, 4, Luma([255]));

        assert_eq!(blur(&gray, 1), gray);

        let blurred = blur(&gray, 5);
        assert!(blurred.get_pixel(4, 4)[0] < 255);
        assert!(blurred.get_pixel(5, 4)[0] > 0);
    }

    #[test]
    fn adjust_levels_clamps() {
        let gray = LumaImage::from_fn(3, 1, |x, _| Luma([[0, 100, 250][x as usize]]));
        let out = adjust_levels(&gray, 2.0, 10);
        assert_eq!(out.into_raw(), vec![10, 210, 255]);
    }

    #[test]
    fn writer_names_files_by_frame_number() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = OverlayWriter::new(dir.path().join("overlays"), None).expect("writer");
        let path = writer.write(&frame(), &report()).expect("write");
        assert!(path.ends_with("frame_000001.png"));
        assert!(path.is_file());
    }
}
