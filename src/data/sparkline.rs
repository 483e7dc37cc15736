//! Placeholder trend sparkline.
//!
//! The points are random demo data. They are never derived from the fetched
//! status and must stay that way until a real metric source exists.

use rand::Rng;
use serde::Serialize;

/// Number of points in a sparkline.
pub const POINT_COUNT: usize = 30;
/// Inclusive lower bound of a sample value.
pub const MIN_VALUE: u32 = 10;
/// Exclusive upper bound of a sample value.
pub const MAX_VALUE: u32 = 60;
/// Width of the SVG viewBox.
pub const VIEW_WIDTH: f64 = 200.0;
/// Height of the SVG viewBox.
pub const VIEW_HEIGHT: f64 = 72.0;
/// Stroke color of the polyline.
const STROKE: &str = "#22c55e";

const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A set of sample points and their SVG rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sparkline {
    points: Vec<u32>,
}

impl Sparkline {
    /// Generate [`POINT_COUNT`] uniform samples in `[MIN_VALUE, MAX_VALUE)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let points = (0..POINT_COUNT).map(|_| rng.gen_range(MIN_VALUE..MAX_VALUE)).collect();
        Self { points }
    }

    /// Wrap existing points.
    pub fn from_points(points: Vec<u32>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    /// Viewport coordinates of each point.
    ///
    /// x is spread evenly across the viewBox width; y is inverted so higher
    /// values sit closer to the top.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        let step = VIEW_WIDTH / self.points.len().saturating_sub(1).max(1) as f64;
        self.points
            .iter()
            .enumerate()
            .map(|(i, &p)| (i as f64 * step, VIEW_HEIGHT - p as f64))
            .collect()
    }

    /// The `points` attribute of the polyline.
    pub fn polyline_points(&self) -> String {
        self.coordinates()
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Full inline SVG markup.
    pub fn to_svg(&self) -> String {
        format!(
            "<svg width=\"100%\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" preserveAspectRatio=\"none\" \
             xmlns=\"http://www.w3.org/2000/svg\">\
             <polyline fill=\"none\" stroke=\"{STROKE}\" stroke-width=\"2\" points=\"{points}\" />\
             </svg>",
            w = VIEW_WIDTH,
            h = VIEW_HEIGHT,
            points = self.polyline_points(),
        )
    }

    /// One block character per point, scaled over `[MIN_VALUE, MAX_VALUE)`.
    pub fn to_blocks(&self) -> String {
        let span = (MAX_VALUE - MIN_VALUE) as usize;
        self.points
            .iter()
            .map(|&p| {
                let offset = p.clamp(MIN_VALUE, MAX_VALUE - 1).saturating_sub(MIN_VALUE) as usize;
                SPARKLINE_CHARS[offset * SPARKLINE_CHARS.len() / span]
            })
            .collect()
    }

    /// Points as u64 for ratatui's sparkline widget.
    pub fn bars(&self) -> Vec<u64> {
        self.points.iter().map(|&p| p as u64).collect()
    }
}
