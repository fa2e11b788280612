//! Outline rendering: draw the quadrilateral over a color copy of the
//! grayscale image.
//!
//! The closed path `p0 -> p1 -> p2 -> p3 -> p0` is stroked with
//! `tiny-skia` into a transparent pixmap, which is then composited
//! (source-over) onto the RGB copy. Vertices sit on pixel centers, so an
//! integer center `(x, y)` is drawn through the middle of pixel `(x, y)`.

use image::buffer::ConvertBuffer;
use image::{GrayImage, RgbImage};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::types::{LineStyle, Quad};

/// Expand a grayscale image into RGB with equal channels.
#[must_use]
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    gray.convert()
}

/// Draw the closed outline of `quad` on a color copy of `gray`.
///
/// A quadrilateral that cannot be stroked (e.g. all vertices identical
/// and no area to cover) leaves the copy unannotated.
#[must_use = "returns the annotated image"]
#[allow(clippy::cast_possible_truncation)]
pub fn draw_quadrilateral(gray: &GrayImage, quad: &Quad, style: &LineStyle) -> RgbImage {
    let mut canvas = gray_to_rgb(gray);
    let (width, height) = canvas.dimensions();

    let [first, rest @ ..] = quad.points();
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32 + 0.5, first.y as f32 + 0.5);
    for p in rest {
        pb.line_to(p.x as f32 + 0.5, p.y as f32 + 0.5);
    }
    pb.close();

    let Some(path) = pb.finish() else {
        log::debug!("degenerate quadrilateral, leaving image unannotated");
        return canvas;
    };
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return canvas;
    };

    let stroke = Stroke {
        width: style.width,
        line_cap: LineCap::Square,
        line_join: LineJoin::Miter,
        ..Stroke::default()
    };
    let [r, g, b] = style.color;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = style.anti_alias;

    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);

    // Source-over with premultiplied source: out = src + dst * (1 - a).
    let data = pixmap.data();
    for (i, pixel) in canvas.pixels_mut().enumerate() {
        let off = i * 4;
        let a = data[off + 3];
        if a == 0 {
            continue;
        }
        let inv = u16::from(255 - a);
        for c in 0..3 {
            let src = u16::from(data[off + c]);
            let dst = u16::from(pixel.0[c]);
            let out = src + (dst * inv + 127) / 255;
            pixel.0[c] = u8::try_from(out).unwrap_or(u8::MAX);
        }
    }
    canvas
}
