//! Overlay compositing onto a face region.
//!
//! Sizing and placement:
//! new_w = face_w * scale
//! new_h = overlay_h * new_w / overlay_w * scale
//! x = face_x + face_w / 2 - new_w / 2
//! y = face_y + face_h / 2 - new_h / 3
//!
//! The scale factor lands on the height twice and the vertical offset uses a
//! third of the overlay height, pushing it up toward the eyes. Both are kept as
//! is because existing overlay artwork is tuned against them.
//!
//! The intermediates are computed in `f32` and only the final sizes and
//! offsets are rounded (sizes truncated, offsets floored). Older integer-only
//! code divided `overlay_h * new_w / overlay_w` before scaling and halved or
//! thirded the integer sizes, so for some overlay sizes it lands one pixel
//! away (a 300x156 overlay on a 100 px face: 42 px high here, 41 there).
//!
//! Only the part of the overlay that falls inside the background is sampled,
//! nearest-neighbour, and it is blended in the background's own pixel type.

use image::{DynamicImage, GenericImage, GenericImageView, ImageBuffer, Pixel, Primitive, Rgba};

use crate::error::CompositeError;
use crate::face::FaceObservation;

/// Overlay width relative to the face box width.
pub const DEFAULT_SCALE_FACTOR: f32 = 0.9;

/// Resampled overlay size and top-left offset in background pixels.
///
/// Offsets may be negative or beyond the background; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Compute where and how large an overlay of `overlay_dims` lands on a face.
///
/// Sizes are truncated to whole pixels, offsets floored.
pub fn placement(
    overlay_dims: (u32, u32),
    position: (f32, f32),
    face_width: f32,
    face_height: f32,
    scale_factor: f32,
) -> Result<Placement, CompositeError> {
    let (overlay_w, overlay_h) = overlay_dims;
    if overlay_w == 0 || overlay_h == 0 {
        return Err(CompositeError::DegenerateOverlay {
            width: overlay_w,
            height: overlay_h,
        });
    }

    let values = [position.0, position.1, face_width, face_height, scale_factor];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CompositeError::InvalidGeometry(format!(
            "non-finite value in position=({}, {}) size={}x{} scale={}",
            position.0, position.1, face_width, face_height, scale_factor
        )));
    }
    if face_width < 0.0 || face_height < 0.0 || scale_factor < 0.0 {
        return Err(CompositeError::InvalidGeometry(format!(
            "negative size {}x{} or scale {}",
            face_width, face_height, scale_factor
        )));
    }

    let width = (face_width * scale_factor) as u32;
    let height = (overlay_h as f32 * width as f32 / overlay_w as f32 * scale_factor) as u32;

    let x = position.0 + face_width / 2.0 - width as f32 / 2.0;
    let y = position.1 + face_height / 2.0 - height as f32 / 3.0;

    Ok(Placement {
        x: x.floor() as i64,
        y: y.floor() as i64,
        width,
        height,
    })
}

/// Draw `overlay` over a face box and return the result as a new image.
///
/// `background` and `overlay` are only read. The returned image always has the
/// background's dimensions and pixel format; overlay pixels outside it are
/// dropped and transparent overlay pixels leave the background visible.
pub fn composite(
    background: &DynamicImage,
    overlay: &DynamicImage,
    position: (f32, f32),
    face_width: f32,
    face_height: f32,
    scale_factor: f32,
) -> Result<DynamicImage, CompositeError> {
    let place = placement(
        overlay.dimensions(),
        position,
        face_width,
        face_height,
        scale_factor,
    )?;

    let mut output = background.clone();

    if place.width == 0 || place.height == 0 {
        log::debug!(
            "composite: overlay collapses to {}x{}, nothing to draw",
            place.width,
            place.height
        );
        return Ok(output);
    }

    log::debug!(
        "composite: overlay {}x{} at ({}, {})",
        place.width,
        place.height,
        place.x,
        place.y
    );

    match &mut output {
        DynamicImage::ImageLuma8(buf) => {
            draw(buf, &overlay.to_rgba8(), &place, |p: Rgba<u8>| p.to_luma())
        }
        DynamicImage::ImageLumaA8(buf) => {
            draw(buf, &overlay.to_rgba8(), &place, |p: Rgba<u8>| p.to_luma_alpha())
        }
        DynamicImage::ImageRgb8(buf) => {
            draw(buf, &overlay.to_rgba8(), &place, |p: Rgba<u8>| p.to_rgb())
        }
        DynamicImage::ImageRgba8(buf) => draw(buf, &overlay.to_rgba8(), &place, |p: Rgba<u8>| p),
        DynamicImage::ImageLuma16(buf) => {
            draw(buf, &overlay.to_rgba16(), &place, |p: Rgba<u16>| p.to_luma())
        }
        DynamicImage::ImageLumaA16(buf) => {
            draw(buf, &overlay.to_rgba16(), &place, |p: Rgba<u16>| p.to_luma_alpha())
        }
        DynamicImage::ImageRgb16(buf) => {
            draw(buf, &overlay.to_rgba16(), &place, |p: Rgba<u16>| p.to_rgb())
        }
        DynamicImage::ImageRgba16(buf) => {
            draw(buf, &overlay.to_rgba16(), &place, |p: Rgba<u16>| p)
        }
        DynamicImage::ImageRgb32F(buf) => {
            draw(buf, &overlay.to_rgba32f(), &place, |p: Rgba<f32>| p.to_rgb())
        }
        DynamicImage::ImageRgba32F(buf) => {
            draw(buf, &overlay.to_rgba32f(), &place, |p: Rgba<f32>| p)
        }
        other => draw(other, &overlay.to_rgba8(), &place, |p: Rgba<u8>| p),
    }

    Ok(output)
}

/// Part of a placement that lands on a `width` x `height` canvas, as
/// half-open canvas ranges `(x0, y0, x1, y1)`.
fn visible(place: &Placement, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = place.x.max(0);
    let y0 = place.y.max(0);
    let x1 = place.x.saturating_add(place.width as i64).min(width as i64);
    let y1 = place.y.saturating_add(place.height as i64).min(height as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Nearest source index for `offset` within a span of `span` output pixels.
fn nearest(offset: i64, span: u32, source: u32) -> u32 {
    let s = (offset as f64 + 0.5) * source as f64 / span as f64;
    (s as u32).min(source - 1)
}

fn draw<I, S>(
    canvas: &mut I,
    overlay: &ImageBuffer<Rgba<S>, Vec<S>>,
    place: &Placement,
    convert: impl Fn(Rgba<S>) -> I::Pixel,
) where
    I: GenericImage,
    I::Pixel: Pixel<Subpixel = S>,
    S: Primitive,
    Rgba<S>: Pixel<Subpixel = S>,
{
    let (canvas_w, canvas_h) = canvas.dimensions();
    let Some((x0, y0, x1, y1)) = visible(place, canvas_w, canvas_h) else {
        return;
    };
    let (src_w, src_h) = overlay.dimensions();

    for y in y0..y1 {
        let sy = nearest(y as i64 - place.y, place.height, src_h);
        for x in x0..x1 {
            let sx = nearest(x as i64 - place.x, place.width, src_w);
            let top = overlay.get_pixel(sx, sy);
            // fully transparent: background stays bit-exact
            if top[3] <= S::DEFAULT_MIN_VALUE {
                continue;
            }
            let mut px = canvas.get_pixel(x, y).to_rgba();
            px.blend(top);
            canvas.put_pixel(x, y, convert(px));
        }
    }
}

/// [`composite`] using a face observation's bounding box.
pub fn composite_face(
    background: &DynamicImage,
    overlay: &DynamicImage,
    face: &FaceObservation,
    scale_factor: f32,
) -> Result<DynamicImage, CompositeError> {
    composite(
        background,
        overlay,
        face.position,
        face.width,
        face.height,
        scale_factor,
    )
}
