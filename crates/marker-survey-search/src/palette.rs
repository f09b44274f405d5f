//! Colors and status text for frame overlays.

use crate::aggregate::FrameReport;

/// RGB color.
pub type Rgb = [u8; 3];

/// Accepted-marker colors, indexed by dictionary position in the search order.
pub const PALETTE: [Rgb; 8] = [
    [0, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 0],
    [255, 128, 0],
    [0, 128, 255],
    [128, 0, 255],
    [255, 255, 255],
];

pub const REJECTED_COLOR: Rgb = [255, 0, 0];
pub const STATUS_FOUND_COLOR: Rgb = [0, 255, 0];
pub const STATUS_MISSING_COLOR: Rgb = [255, 0, 0];

/// Color for the dictionary at `index` in the search order; wraps around.
#[inline]
pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// One line of overlay text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub color: Rgb,
}

impl StatusLine {
    fn new(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Overlay text for a frame.
///
/// `fixed` names the dictionary in fixed mode; without it a miss reads
/// `Dictionary: Searching...`.
pub fn status_lines(report: &FrameReport, fixed: Option<&str>) -> Vec<StatusLine> {
    let mut lines = Vec::with_capacity(4);
    if report.has_markers() {
        let ids = report
            .markers()
            .map(|(_, c)| c.id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(StatusLine::new(
            format!("Markers Found: {}", report.total_accepted),
            STATUS_FOUND_COLOR,
        ));
        lines.push(StatusLine::new(
            format!("Dictionary: {}", report.matched_dictionaries().join(", ")),
            STATUS_FOUND_COLOR,
        ));
        lines.push(StatusLine::new(
            format!("Marker IDs: {ids}"),
            STATUS_FOUND_COLOR,
        ));
    } else {
        lines.push(StatusLine::new("No Markers Found", STATUS_MISSING_COLOR));
        lines.push(StatusLine::new(
            format!("Dictionary: {}", fixed.unwrap_or("Searching...")),
            STATUS_MISSING_COLOR,
        ));
    }
    let rejected = report.total_rejected();
    if rejected > 0 {
        lines.push(StatusLine::new(
            format!("Rejected: {rejected}"),
            STATUS_MISSING_COLOR,
        ));
    }
    lines
}
