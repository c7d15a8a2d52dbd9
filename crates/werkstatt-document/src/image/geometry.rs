// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric transforms — axis flips and rotation by an
// arbitrary angle onto an enlarged, transparent canvas.

use image::{Rgba, RgbaImage, imageops};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;
use werkstatt_core::types::FlipAxis;

use super::buffer::PixelBuffer;

/// Tolerance, in degrees, for treating an angle as a multiple of 90.
const RIGHT_ANGLE_EPSILON: f64 = 1e-9;

/// Fill for canvas pixels outside the rotated source.
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Mirror `buffer` in place. Dimensions never change.
pub fn flip(buffer: &mut PixelBuffer, axis: FlipAxis) {
    let mut image = RgbaImage::from(std::mem::replace(buffer, PixelBuffer::new(0, 0)));
    match axis {
        FlipAxis::Horizontal => imageops::flip_horizontal_in_place(&mut image),
        FlipAxis::Vertical => imageops::flip_vertical_in_place(&mut image),
        FlipAxis::Both => imageops::rotate180_in_place(&mut image),
    }
    *buffer = PixelBuffer::from(image);
}

/// Canvas size that holds a `width` x `height` rectangle rotated by `degrees`:
/// `|w cos θ| + |h sin θ|` by `|w sin θ| + |h cos θ|`, rounded.
pub fn rotated_dimensions(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (width as f64, height as f64);
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;
    (new_w, new_h)
}

/// Rotate clockwise by `degrees` about the image centre.
///
/// Exact multiples of 90 are lossless index remaps. Any other angle is
/// resampled bilinearly onto the bounding-box canvas; canvas pixels outside
/// the rotated source are fully transparent.
pub fn rotate(buffer: &PixelBuffer, degrees: f64) -> PixelBuffer {
    if buffer.is_empty() {
        return buffer.clone();
    }

    let normalised = degrees.rem_euclid(360.0);
    let quarter_turns = (normalised / 90.0).round();
    if (normalised - quarter_turns * 90.0).abs() < RIGHT_ANGLE_EPSILON {
        return rotate_quarter_turns(buffer, quarter_turns as u32 % 4);
    }

    rotate_resampled(buffer, degrees)
}

fn rotate_quarter_turns(buffer: &PixelBuffer, turns: u32) -> PixelBuffer {
    if turns == 0 {
        return buffer.clone();
    }
    let image = RgbaImage::from(buffer.clone());
    let rotated = match turns {
        1 => imageops::rotate90(&image),
        2 => imageops::rotate180(&image),
        _ => imageops::rotate270(&image),
    };
    debug!(turns, "Lossless quarter-turn rotation applied");
    PixelBuffer::from(rotated)
}

/// Bilinear rotation onto the bounding-box canvas.
///
/// Pixel centres sit at integer coordinates, so a `w`-wide grid is centred
/// on `(w - 1) / 2`. The source is padded with one transparent pixel on
/// every side before warping: edge pixels are always sampled from inside
/// the image and blend into transparency instead of being cut off.
pub(crate) fn rotate_resampled(buffer: &PixelBuffer, degrees: f64) -> PixelBuffer {
    let (width, height) = buffer.dimensions();
    let (new_w, new_h) = rotated_dimensions(width, height, degrees);

    let mut padded = RgbaImage::from_pixel(width + 2, height + 2, TRANSPARENT);
    imageops::replace(&mut padded, &RgbaImage::from(buffer.clone()), 1, 1);

    let projection = Projection::translate(-(width as f32 + 1.0) / 2.0, -(height as f32 + 1.0) / 2.0)
        .and_then(Projection::rotate(degrees.to_radians() as f32))
        .and_then(Projection::translate(
            (new_w as f32 - 1.0) / 2.0,
            (new_h as f32 - 1.0) / 2.0,
        ));

    let mut output = RgbaImage::new(new_w, new_h);
    warp_into(&padded, &projection, Interpolation::Bilinear, TRANSPARENT, &mut output);

    debug!(degrees, new_w, new_h, "Resampled rotation applied");
    PixelBuffer::from(output)
}
