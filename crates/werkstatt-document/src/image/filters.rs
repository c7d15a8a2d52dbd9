// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel and windowed filters — grayscale, brightness/contrast, and a
// separable box blur with edge replication.

use super::buffer::{CHANNELS, PixelBuffer};

/// Replace R, G and B with BT.601 luma (`0.299 R + 0.587 G + 0.114 B`).
///
/// Alpha is untouched. Applying this twice is the same as applying it once.
pub fn grayscale(buffer: &mut PixelBuffer) {
    for px in buffer.pixels_mut() {
        let luma = luma_bt601(px[0], px[1], px[2]);
        px[0] = luma;
        px[1] = luma;
        px[2] = luma;
    }
}

/// BT.601 luma, rounded to the nearest integer.
#[inline]
pub fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    luma.round().clamp(0.0, 255.0) as u8
}

/// Add `brightness`, then stretch around mid-grey by the `contrast` factor.
///
/// Both arguments are in -255..=255 (validated by the caller). Each pass
/// clamps to 0..=255 before the next runs; alpha is untouched.
pub fn brightness_contrast(buffer: &mut PixelBuffer, brightness: i32, contrast: i32) {
    let factor = contrast_factor(contrast);

    for px in buffer.pixels_mut() {
        for channel in &mut px[..3] {
            let brightened = (*channel as i32 + brightness).clamp(0, 255) as f64;
            let contrasted = factor * (brightened - 128.0) + 128.0;
            *channel = contrasted.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// `259 (c + 255) / (255 (259 - c))`; exactly 1.0 at `c == 0`.
pub fn contrast_factor(contrast: i32) -> f64 {
    let c = contrast as f64;
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

/// Separable box blur with a `(2 * radius + 1)`-tap uniform kernel.
///
/// The horizontal pass reads the source and writes a temporary buffer; the
/// vertical pass reads the temporary buffer and writes the result. Taps that
/// fall outside the image reuse the nearest edge pixel. All four channels,
/// alpha included, are averaged.
pub fn box_blur(source: &PixelBuffer, radius: u32) -> PixelBuffer {
    let (width, height) = source.dimensions();
    if radius == 0 || source.is_empty() {
        return source.clone();
    }

    let mut temp = PixelBuffer::new(width, height);
    blur_pass(
        source.as_raw(),
        temp.as_raw_mut(),
        width as usize,
        height as usize,
        radius as usize,
        Direction::Horizontal,
    );

    let mut output = PixelBuffer::new(width, height);
    blur_pass(
        temp.as_raw(),
        output.as_raw_mut(),
        width as usize,
        height as usize,
        radius as usize,
        Direction::Vertical,
    );

    output
}

#[derive(Clone, Copy)]
enum Direction {
    Horizontal,
    Vertical,
}

/// One 1-D pass of the box filter over every line in `direction`.
///
/// Uses a running sum per channel, so cost is independent of the radius.
fn blur_pass(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    radius: usize,
    direction: Direction,
) {
    let (lines, length) = match direction {
        Direction::Horizontal => (height, width),
        Direction::Vertical => (width, height),
    };
    let index = |line: usize, pos: usize| -> usize {
        match direction {
            Direction::Horizontal => (line * width + pos) * CHANNELS,
            Direction::Vertical => (pos * width + line) * CHANNELS,
        }
    };

    let taps = (2 * radius + 1) as u32;
    let half = taps / 2;
    let last = length - 1;
    let clamped = |pos: isize| -> usize { pos.clamp(0, last as isize) as usize };

    for line in 0..lines {
        // Window centred on position 0 with replicated left edge.
        let mut sums = [0u32; CHANNELS];
        for offset in -(radius as isize)..=(radius as isize) {
            let i = index(line, clamped(offset));
            for c in 0..CHANNELS {
                sums[c] += src[i + c] as u32;
            }
        }

        for pos in 0..length {
            let out = index(line, pos);
            for c in 0..CHANNELS {
                dst[out + c] = ((sums[c] + half) / taps) as u8;
            }

            // Slide: drop the leftmost tap, add the next one on the right.
            let leaving = index(line, clamped(pos as isize - radius as isize));
            let entering = index(line, clamped(pos as isize + radius as isize + 1));
            for c in 0..CHANNELS {
                sums[c] = sums[c] + src[entering + c] as u32 - src[leaving + c] as u32;
            }
        }
    }
}
