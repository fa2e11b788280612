//! Patch scanning: average intensity of every square patch in the image.
//!
//! A patch is identified by its top-left offset `(x, y)`. The scan visits
//! offsets `0 <= x < width - size` and `0 <= y < height - size` (upper
//! bounds exclusive), x-major, and scores each patch by its mean
//! intensity. The scan is step 2 in the pipeline, between decoding and
//! selection.

use image::GrayImage;
use imageproc::integral_image::integral_image;

use crate::types::{Center, ScoredCenter};

/// Average intensity of the `size`×`size` patch whose top-left corner is
/// `(x, y)`.
///
/// The window is clipped to the image: only samples that exist are
/// averaged. An empty window (offset outside the image, or `size == 0`)
/// averages to `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn patch_average(image: &GrayImage, x: u32, y: u32, size: u32) -> f64 {
    let (width, height) = image.dimensions();
    let x_end = x.saturating_add(size).min(width);
    let y_end = y.saturating_add(size).min(height);
    if x >= x_end || y >= y_end {
        return 0.0;
    }

    let mut sum = 0_u64;
    for py in y..y_end {
        for px in x..x_end {
            sum += u64::from(image.get_pixel(px, py).0[0]);
        }
    }
    let count = u64::from(x_end - x) * u64::from(y_end - y);
    sum as f64 / count as f64
}

/// Score every valid patch offset by its average intensity.
///
/// Returns one [`ScoredCenter`] per offset in scan order (x-major, then
/// y), `(width - size) * (height - size)` in total. The result is empty
/// when either dimension is `<= size`.
///
/// Sums come from an integral image, so each offset costs O(1)
/// regardless of `size`.
#[must_use = "returns the scored patch centers"]
#[allow(clippy::cast_precision_loss)]
pub fn scan_patches(image: &GrayImage, size: u32) -> Vec<ScoredCenter> {
    let (width, height) = image.dimensions();
    let x_limit = width.saturating_sub(size);
    let y_limit = height.saturating_sub(size);
    if size == 0 || x_limit == 0 || y_limit == 0 {
        return Vec::new();
    }

    // integral(x, y) holds the sum of all pixels strictly above and left
    // of (x, y); the first row and column are zero.
    let integral = integral_image::<_, u64>(image);
    let at = |x: u32, y: u32| integral.get_pixel(x, y).0[0];
    let count = f64::from(size) * f64::from(size);

    let capacity = usize::try_from(u64::from(x_limit) * u64::from(y_limit)).unwrap_or(0);
    let mut scored = Vec::with_capacity(capacity);
    for x in 0..x_limit {
        for y in 0..y_limit {
            let (x1, y1) = (x + size, y + size);
            let sum = at(x1, y1) + at(x, y) - at(x, y1) - at(x1, y);
            scored.push(ScoredCenter {
                center: Center::of_patch(x, y, size),
                average: sum as f64 / count,
            });
        }
    }

    log::debug!(
        "scanned {} patches of {size}x{size} in {width}x{height} image",
        scored.len()
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_image(width: u32, height: u32, bx: u32, by: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if (bx..bx + 5).contains(&x) && (by..by + 5).contains(&y) {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    #[test]
    fn uniform_image_average_equals_constant() {
        for value in [0_u8, 1, 77, 200, 255] {
            let img = GrayImage::from_pixel(12, 9, image::Luma([value]));
            for (x, y) in [(0, 0), (3, 2), (6, 3)] {
                let avg = patch_average(&img, x, y, 5);
                assert!(
                    (avg - f64::from(value)).abs() < f64::EPSILON,
                    "offset ({x}, {y}) averaged {avg}, expected {value}",
                );
            }
        }
    }

    #[test]
    fn bright_block_averages_to_max_and_background_to_zero() {
        let img = block_image(10, 10, 0, 0);
        assert!((patch_average(&img, 0, 0, 5) - 255.0).abs() < f64::EPSILON);
        assert!(patch_average(&img, 5, 5, 5).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_overlap_averages_proportionally() {
        // Shifted one column right: 4 of 5 columns are bright.
        let img = block_image(10, 10, 0, 0);
        let avg = patch_average(&img, 1, 0, 5);
        assert!((avg - 255.0 * 4.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn window_is_clipped_at_image_edge() {
        let img = GrayImage::from_pixel(6, 6, image::Luma([90]));
        // Only a 2x2 corner of the window lies inside the image.
        assert!((patch_average(&img, 4, 4, 5) - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_window_averages_to_zero() {
        let img = GrayImage::from_pixel(6, 6, image::Luma([90]));
        assert!(patch_average(&img, 6, 0, 5).abs() < f64::EPSILON);
        assert!(patch_average(&img, 0, 100, 5).abs() < f64::EPSILON);
        assert!(patch_average(&img, 0, 0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn axes_are_not_transposed() {
        // Wide image with the block near the right edge: only valid if x
        // indexes columns.
        let img = block_image(20, 8, 14, 1);
        assert!((patch_average(&img, 14, 1, 5) - 255.0).abs() < f64::EPSILON);
        assert!(patch_average(&img, 1, 14, 5).abs() < f64::EPSILON);
    }

    #[test]
    fn scan_count_excludes_upper_bound() {
        let img = GrayImage::new(10, 12);
        assert_eq!(scan_patches(&img, 5).len(), 5 * 7);
    }

    #[test]
    fn scan_is_empty_when_image_not_larger_than_patch() {
        assert!(scan_patches(&GrayImage::new(5, 5), 5).is_empty());
        assert!(scan_patches(&GrayImage::new(4, 30), 5).is_empty());
        assert!(scan_patches(&GrayImage::new(30, 5), 5).is_empty());
        assert!(scan_patches(&GrayImage::new(30, 30), 0).is_empty());
    }

    #[test]
    fn scan_order_is_x_major_with_centers_offset() {
        let scored = scan_patches(&GrayImage::new(7, 8), 5);
        let centers: Vec<Center> = scored.iter().map(|s| s.center).collect();
        assert_eq!(
            centers,
            vec![
                Center::new(2, 2),
                Center::new(2, 3),
                Center::new(2, 4),
                Center::new(3, 2),
                Center::new(3, 3),
                Center::new(3, 4),
            ]
        );
    }

    #[test]
    fn scan_agrees_with_direct_average() {
        let img = GrayImage::from_fn(13, 11, |x, y| image::Luma([((x * 31 + y * 17) % 256) as u8]));
        for s in scan_patches(&img, 5) {
            let direct = patch_average(&img, s.center.x - 2, s.center.y - 2, 5);
            assert!(
                (s.average - direct).abs() < 1e-9,
                "center {:?}: scan {} vs direct {direct}",
                s.center,
                s.average,
            );
        }
    }
}
