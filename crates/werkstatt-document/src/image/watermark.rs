// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text watermark — places a line of text with a fixed-width measurement
// model, rasterises it to a coverage mask with `imageproc`, and blends it over
// the existing pixels at the requested opacity.

use ab_glyph::{FontArc, PxScale};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_text_mut;
use tracing::debug;
use werkstatt_core::error::{Result, WerkstattError};
use werkstatt_core::types::{Rgb, WatermarkPosition};

use super::buffer::PixelBuffer;
use super::params::WatermarkParams;

/// Advance per character, as a fraction of the font size.
pub const CHAR_ADVANCE_EM: f64 = 0.6;

/// A TrueType/OpenType font used to draw watermark text.
#[derive(Clone)]
pub struct WatermarkFont(FontArc);

impl WatermarkFont {
    /// Parse font file bytes (TTF or OTF).
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        FontArc::try_from_vec(data)
            .map(Self)
            .map_err(|err| WerkstattError::InvalidParameter(format!("invalid font: {err}")))
    }

    pub fn as_font(&self) -> &FontArc {
        &self.0
    }
}

impl std::fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WatermarkFont")
    }
}

/// Estimated `(width, height)` of `text` at `font_size_px`.
pub fn measure_text(text: &str, font_size_px: u32) -> (u32, u32) {
    let chars = text.chars().count() as f64;
    let width = (chars * font_size_px as f64 * CHAR_ADVANCE_EM).round() as u32;
    (width, font_size_px)
}

/// Top-left corner for a `text_size` box inside a `canvas` at `position`.
///
/// Every position keeps `inset` pixels from the edges it is anchored to.
/// Coordinates may be negative when the text is wider than the canvas.
pub fn text_origin(
    canvas: (u32, u32),
    text_size: (u32, u32),
    position: WatermarkPosition,
    inset: u32,
) -> (i32, i32) {
    let (cw, ch) = (canvas.0 as i64, canvas.1 as i64);
    let (tw, th) = (text_size.0 as i64, text_size.1 as i64);
    let inset = inset as i64;

    let (x, y) = match position {
        WatermarkPosition::TopLeft => (inset, inset),
        WatermarkPosition::TopRight => (cw - tw - inset, inset),
        WatermarkPosition::BottomLeft => (inset, ch - th - inset),
        WatermarkPosition::BottomRight => (cw - tw - inset, ch - th - inset),
        WatermarkPosition::Center => ((cw - tw) / 2, (ch - th) / 2),
    };
    (clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Draw `params.text` onto `buffer`.
pub fn apply_watermark(buffer: &mut PixelBuffer, params: &WatermarkParams, font: &WatermarkFont) {
    let (width, height) = buffer.dimensions();
    let text_size = measure_text(&params.text, params.font_size_px);
    let (x, y) = text_origin((width, height), text_size, params.position, params.inset());

    let mut mask = GrayImage::new(width, height);
    draw_text_mut(
        &mut mask,
        Luma([255u8]),
        x,
        y,
        PxScale::from(params.font_size_px as f32),
        font.as_font(),
        &params.text,
    );

    debug!(
        x,
        y,
        text_w = text_size.0,
        text_h = text_size.1,
        "Watermark placed"
    );
    composite_mask(buffer, &mask, params.color, params.opacity);
}

/// Blend `color` over `buffer` wherever `mask` has coverage.
///
/// With `a = coverage * opacity`, colour channels become
/// `a * color + (1 - a) * existing` and alpha is composited source-over.
/// `mask` must match the buffer dimensions; extra mask pixels are ignored.
pub fn composite_mask(buffer: &mut PixelBuffer, mask: &GrayImage, color: Rgb, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0) as f64;
    if opacity == 0.0 {
        return;
    }
    let text = [color.r as f64, color.g as f64, color.b as f64];
    let width = buffer.width();

    for (index, px) in buffer.pixels_mut().enumerate() {
        let x = index as u32 % width;
        let y = index as u32 / width;
        let Some(Luma([coverage])) = mask.get_pixel_checked(x, y).copied() else {
            continue;
        };
        if coverage == 0 {
            continue;
        }

        let a = coverage as f64 / 255.0 * opacity;
        for c in 0..3 {
            let blended = a * text[c] + (1.0 - a) * px[c] as f64;
            px[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        let alpha = a * 255.0 + (1.0 - a) * px[3] as f64;
        px[3] = alpha.round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_measurement() {
        assert_eq!(measure_text("hello", 20), (60, 20));
        // Counted in characters, not bytes.
        assert_eq!(measure_text("©©", 10), (12, 10));
    }

    #[test]
    fn corners_keep_uniform_inset() {
        let canvas = (400, 300);
        let text = (100, 24);
        assert_eq!(text_origin(canvas, text, WatermarkPosition::TopLeft, 20), (20, 20));
        assert_eq!(text_origin(canvas, text, WatermarkPosition::TopRight, 20), (280, 20));
        assert_eq!(text_origin(canvas, text, WatermarkPosition::BottomLeft, 20), (20, 256));
        assert_eq!(
            text_origin(canvas, text, WatermarkPosition::BottomRight, 20),
            (280, 256)
        );
    }

    #[test]
    fn centre_ignores_inset() {
        assert_eq!(
            text_origin((400, 300), (100, 24), WatermarkPosition::Center, 999),
            (150, 138)
        );
    }

    #[test]
    fn oversized_text_goes_negative() {
        let (x, _) = text_origin((50, 50), (200, 10), WatermarkPosition::TopRight, 20);
        assert_eq!(x, -170);
    }

    #[test]
    fn full_coverage_blends_at_opacity() {
        let mut buffer = PixelBuffer::filled(2, 1, [0, 0, 0, 255]);
        let mut mask = GrayImage::new(2, 1);
        mask.put_pixel(1, 0, Luma([255]));

        composite_mask(&mut buffer, &mask, Rgb::new(200, 100, 50), 0.5);

        assert_eq!(buffer.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(buffer.pixel(1, 0), Some([100, 50, 25, 255]));
    }

    #[test]
    fn alpha_is_composited_source_over() {
        let mut buffer = PixelBuffer::filled(1, 1, [0, 0, 0, 0]);
        let mask = GrayImage::from_pixel(1, 1, Luma([255]));
        composite_mask(&mut buffer, &mask, Rgb::WHITE, 0.4);
        assert_eq!(buffer.pixel(0, 0).unwrap()[3], 102);
    }

    #[test]
    fn zero_opacity_changes_nothing() {
        let original = PixelBuffer::filled(3, 3, [10, 20, 30, 40]);
        let mut buffer = original.clone();
        let mask = GrayImage::from_pixel(3, 3, Luma([255]));
        composite_mask(&mut buffer, &mask, Rgb::WHITE, 0.0);
        assert_eq!(buffer, original);
    }

    #[test]
    fn partial_coverage_scales_opacity() {
        let mut buffer = PixelBuffer::filled(1, 1, [0, 0, 0, 255]);
        let mask = GrayImage::from_pixel(1, 1, Luma([51]));
        composite_mask(&mut buffer, &mask, Rgb::WHITE, 1.0);
        // a = 51/255 = 0.2
        assert_eq!(buffer.pixel(0, 0), Some([51, 51, 51, 255]));
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let result = WatermarkFont::from_bytes(b"not a font".to_vec());
        assert!(matches!(result, Err(WerkstattError::InvalidParameter(_))));
    }
}
