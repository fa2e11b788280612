//! Quadrilateral area via the shoelace formula.
//!
//! Vertices are used in the order given. The absolute value makes the
//! result independent of winding direction, but a non-cyclic reordering
//! (e.g. swapping two adjacent vertices) traces a different polygon and
//! changes the area.

use crate::types::{PipelineError, Point, Quad};

/// Shoelace area of a quadrilateral in vertex order `p0 -> p1 -> p2 -> p3`.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn quad_area(quad: &Quad) -> f64 {
    let [p0, p1, p2, p3] = *quad.points();
    let doubled = p0.x * p1.y + p1.x * p2.y + p2.x * p3.y + p3.x * p0.y
        - p1.x * p0.y
        - p2.x * p1.y
        - p3.x * p2.y
        - p0.x * p3.y;
    0.5 * doubled.abs()
}

/// Area of the quadrilateral formed by exactly four points, in order.
///
/// # Errors
///
/// Returns [`PipelineError::InsufficientPatches`] unless `points` holds
/// exactly four points.
pub fn calculate_area(points: &[Point]) -> Result<f64, PipelineError> {
    let quad: [Point; 4] = points
        .try_into()
        .map_err(|_| PipelineError::InsufficientPatches {
            found: points.len(),
            required: 4,
        })?;
    Ok(quad_area(&Quad(quad)))
}

/// Reorder four vertices by ascending angle around their centroid.
///
/// Ties in angle keep their input order.
#[must_use]
pub fn angular_order(points: [Point; 4]) -> [Point; 4] {
    let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mut ordered = points;
    ordered.sort_by(|a, b| {
        let angle_a = (a.y - cy).atan2(a.x - cx);
        let angle_b = (b.y - cy).atan2(b.x - cx);
        angle_a.total_cmp(&angle_b)
    });
    ordered
}
