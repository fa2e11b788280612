//! Shared types for the brightquad patch-search pipeline.
//!
//! # Axis convention
//!
//! Every coordinate in this crate is `(x, y)` where `x` is the column
//! (along the image width, from the left edge) and `y` is the row (along
//! the image height, from the top edge). This matches
//! [`GrayImage::get_pixel`] and the renderer's drawing coordinates.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can hand images to the
/// pipeline without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` for the annotated output.
pub use image::RgbImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Integer pixel coordinate of a patch center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Center {
    /// Column of the center pixel.
    pub x: u32,
    /// Row of the center pixel.
    pub y: u32,
}

impl Center {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Center of the patch whose top-left corner is `(x, y)`.
    #[must_use]
    pub const fn of_patch(x: u32, y: u32, patch_size: u32) -> Self {
        let half = patch_size / 2;
        Self {
            x: x + half,
            y: y + half,
        }
    }

    /// The center as a floating-point [`Point`].
    #[must_use]
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl From<Center> for Point {
    fn from(c: Center) -> Self {
        c.to_point()
    }
}

/// A patch center together with the average intensity of its patch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCenter {
    pub center: Center,
    /// Arithmetic mean of the patch samples, in `0.0..=255.0`.
    pub average: f64,
}

/// Four vertices in polygon order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// Returns the vertices.
    #[must_use]
    pub const fn points(&self) -> &[Point; 4] {
        &self.0
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Order in which selected centers become polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VertexOrder {
    /// Vertices in selection order (descending brightness).
    ///
    /// The resulting polygon may self-intersect, in which case the
    /// shoelace area is not the enclosed area.
    #[default]
    Selection,
    /// Vertices sorted by angle around their centroid, producing a
    /// simple polygon for any four points in general position.
    Angular,
}

/// What to do when fewer than `patch_count` centers were selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shortfall {
    /// Pad the quadrilateral by repeating the last selected center.
    #[default]
    Collapse,
    /// Fail with [`PipelineError::InsufficientPatches`].
    Reject,
}

/// Outline style used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke color as RGB.
    pub color: [u8; 3],
    /// Stroke width in pixels.
    pub width: f32,
    /// Whether to anti-alias the stroke edges.
    pub anti_alias: bool,
}

impl LineStyle {
    /// Default stroke color: red.
    pub const DEFAULT_COLOR: [u8; 3] = [255, 0, 0];
    /// Default stroke width in pixels.
    pub const DEFAULT_WIDTH: f32 = 2.0;
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Self::DEFAULT_COLOR,
            width: Self::DEFAULT_WIDTH,
            anti_alias: false,
        }
    }
}

/// Configuration for the patch-search pipeline.
///
/// Defaults reproduce the classic behavior: four 5×5 patches, a 5-pixel
/// square exclusion zone, vertices in selection order, and a red 2 px
/// outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Side length of a square patch in pixels.
    pub patch_size: u32,
    /// Number of patch centers to select. The polygon is a
    /// quadrilateral, so only [`Self::DEFAULT_PATCH_COUNT`] is accepted.
    pub patch_count: usize,
    /// Two centers overlap when both axis deltas are below this value.
    pub separation: u32,
    /// Vertex order used for the area and the outline.
    pub vertex_order: VertexOrder,
    /// Behavior when fewer than `patch_count` centers qualify.
    pub shortfall: Shortfall,
    /// Outline style for the annotated image.
    pub line: LineStyle,
}

impl DetectorConfig {
    pub const DEFAULT_PATCH_SIZE: u32 = 5;
    pub const DEFAULT_PATCH_COUNT: usize = 4;
    pub const DEFAULT_SEPARATION: u32 = 5;

    /// Check parameter invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `patch_size` is zero,
    /// `patch_count` is not four, or the line width is not a positive finite
    /// number.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.patch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "patch_size must be at least 1".to_owned(),
            ));
        }
        if self.patch_count != Self::DEFAULT_PATCH_COUNT {
            return Err(PipelineError::InvalidConfig(format!(
                "patch_count must be {}, got {}",
                Self::DEFAULT_PATCH_COUNT,
                self.patch_count
            )));
        }
        if !self.line.width.is_finite() || self.line.width <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "line width must be positive, got {}",
                self.line.width
            )));
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            patch_size: Self::DEFAULT_PATCH_SIZE,
            patch_count: Self::DEFAULT_PATCH_COUNT,
            separation: Self::DEFAULT_SEPARATION,
            vertex_order: VertexOrder::default(),
            shortfall: Shortfall::default(),
            line: LineStyle::default(),
        }
    }
}

/// Result of running the full pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Selected centers in selection order.
    pub centers: Vec<Center>,
    /// Quadrilateral used for the area and the outline.
    pub quad: Quad,
    /// Shoelace area of `quad`.
    pub area: f64,
    /// Number of scored patches considered.
    pub candidates: usize,
    /// Dimensions of the source image.
    pub dimensions: Dimensions,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The image has no room for a single patch.
    #[error("image is {width}x{height}, too small for a {patch_size}x{patch_size} patch scan")]
    ImageTooSmall {
        width: u32,
        height: u32,
        patch_size: u32,
    },

    /// Not enough non-overlapping patches to form the polygon.
    #[error("found {found} non-overlapping patches, {required} required")]
    InsufficientPatches { found: usize, required: usize },

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
