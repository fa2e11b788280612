//! brightquad-pipeline: Pure patch-search pipeline (sans-IO).
//!
//! Finds the brightest non-overlapping square patches of a grayscale
//! image and measures the quadrilateral spanned by their centers:
//! decode -> scan -> select -> area -> render.
//!
//! This crate has **no I/O dependencies**. It operates on in-memory
//! byte slices and images and returns structured data. Reading and
//! writing files lives in the `brightquad` binary.

pub mod area;
pub mod grayscale;
pub mod render;
pub mod scan;
pub mod select;
pub mod types;

pub use area::{angular_order, calculate_area, quad_area};
pub use render::draw_quadrilateral;
pub use scan::{patch_average, scan_patches};
pub use select::{overlaps, select_top_patches};
pub use types::{
    Center, Detection, DetectorConfig, Dimensions, GrayImage, LineStyle, PipelineError, Point,
    Quad, RgbImage, ScoredCenter, Shortfall, VertexOrder,
};

/// Locate the patches and compute the quadrilateral for a decoded image.
///
/// # Steps
///
/// 1. Score every patch offset by average intensity
/// 2. Greedily select the brightest non-overlapping centers
/// 3. Build the quadrilateral (selection or angular order, padding a
///    shortfall if configured to)
/// 4. Shoelace area
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails validation.
/// Returns [`PipelineError::ImageTooSmall`] if no patch fits in the image.
/// Returns [`PipelineError::InsufficientPatches`] if fewer than four
/// centers were selected and `config.shortfall` is [`Shortfall::Reject`].
pub fn detect(gray: &GrayImage, config: &DetectorConfig) -> Result<Detection, PipelineError> {
    config.validate()?;
    let dimensions = Dimensions {
        width: gray.width(),
        height: gray.height(),
    };

    // 1. Scan.
    let scored = scan::scan_patches(gray, config.patch_size);
    if scored.is_empty() {
        return Err(PipelineError::ImageTooSmall {
            width: dimensions.width,
            height: dimensions.height,
            patch_size: config.patch_size,
        });
    }

    // 2. Select.
    let centers = select::select_top_patches(&scored, config.patch_count, config.separation);

    // 3. Quadrilateral.
    let quad = build_quad(&centers, config)?;

    // 4. Area.
    let area = area::quad_area(&quad);
    log::debug!(
        "selected {} of {} candidates, area {area}",
        centers.len(),
        scored.len()
    );

    Ok(Detection {
        centers,
        quad,
        area,
        candidates: scored.len(),
        dimensions,
    })
}

/// Run the full pipeline on raw image bytes.
///
/// Decodes `image_bytes` (PNG, JPEG, BMP, WebP) to grayscale, runs
/// [`detect`], and draws the outline with `config.line`. Returns the
/// detection together with the annotated RGB image.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
/// Propagates every error of [`detect`].
pub fn process(
    image_bytes: &[u8],
    config: &DetectorConfig,
) -> Result<(Detection, RgbImage), PipelineError> {
    let gray = grayscale::decode_and_grayscale(image_bytes)?;
    let detection = detect(&gray, config)?;
    let annotated = render::draw_quadrilateral(&gray, &detection.quad, &config.line);
    Ok((detection, annotated))
}

fn build_quad(centers: &[Center], config: &DetectorConfig) -> Result<Quad, PipelineError> {
    let required = DetectorConfig::DEFAULT_PATCH_COUNT;
    let mut points: Vec<Point> = centers
        .iter()
        .take(required)
        .copied()
        .map(Point::from)
        .collect();

    if points.len() < required {
        let Some(&last) = points.last() else {
            return Err(PipelineError::InsufficientPatches {
                found: 0,
                required,
            });
        };
        match config.shortfall {
            Shortfall::Reject => {
                return Err(PipelineError::InsufficientPatches {
                    found: points.len(),
                    required,
                });
            }
            Shortfall::Collapse => {
                log::warn!(
                    "only {} non-overlapping patches found, collapsing quadrilateral",
                    points.len()
                );
                points.resize(required, last);
            }
        }
    }

    let mut vertices = [Point::new(0.0, 0.0); 4];
    vertices.copy_from_slice(&points);
    Ok(Quad(match config.vertex_order {
        VertexOrder::Selection => vertices,
        VertexOrder::Angular => area::angular_order(vertices),
    }))
}
