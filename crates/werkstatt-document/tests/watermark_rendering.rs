// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark rendering with a real font: placement against the measured
// text box, untouched pixels outside it, opacity blending, and the inset
// taken from ToolDefaults.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use image::RgbaImage;
use werkstatt_core::{InputFile, RasterFormat, Rgb, ToolDefaults, WatermarkPosition};
use werkstatt_document::image::codec;
use werkstatt_document::image::watermark::{measure_text, text_origin};
use werkstatt_document::{ImageProcessor, PixelBuffer, TransformParameters, WatermarkParams, tools};

const FONT: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans.ttf"));

const CANVAS: (u32, u32) = (200, 100);
const BLACK: [u8; 4] = [0, 0, 0, 255];
const TEXT: &str = "werkstatt";
const SIZE_PX: u32 = 24;

// Anti-aliased edges may bleed a pixel or two past the estimated box.
const SLACK: i32 = 3;

fn processor() -> ImageProcessor {
    ImageProcessor::with_font_bytes(FONT.to_vec()).unwrap()
}

fn params(position: WatermarkPosition, opacity: f32, inset_px: Option<u32>) -> TransformParameters {
    TransformParameters::Watermark(WatermarkParams {
        text: TEXT.into(),
        font_size_px: SIZE_PX,
        opacity,
        color: Rgb { r: 255, g: 255, b: 255 },
        position,
        inset_px,
    })
}

fn render(position: WatermarkPosition, opacity: f32) -> RgbaImage {
    let canvas = PixelBuffer::filled(CANVAS.0, CANVAS.1, BLACK);
    processor()
        .apply(canvas, &params(position, opacity, Some(20)))
        .unwrap()
        .into()
}

/// `(min_x, min_y, max_x, max_y)` of every pixel that differs from black.
fn ink_bounds(image: &RgbaImage) -> Option<(i32, i32, i32, i32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, px)| px.0 != BLACK)
        .map(|(x, y, _)| (x as i32, y as i32))
        .fold(None, |acc, (x, y)| match acc {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

#[test]
fn ink_stays_inside_the_measured_box() {
    let text_size = measure_text(TEXT, SIZE_PX);
    for position in [
        WatermarkPosition::TopLeft,
        WatermarkPosition::TopRight,
        WatermarkPosition::BottomLeft,
        WatermarkPosition::BottomRight,
        WatermarkPosition::Center,
    ] {
        let image = render(position, 1.0);
        let (ox, oy) = text_origin(CANVAS, text_size, position, 20);
        let (tw, th) = (text_size.0 as i32, text_size.1 as i32);
        let (x0, y0, x1, y1) = ink_bounds(&image).unwrap_or_else(|| panic!("{position:?}: no ink"));

        assert!(x0 >= ox - SLACK && x1 < ox + tw + SLACK, "{position:?}: x {x0}..{x1}, box {ox}+{tw}");
        assert!(y0 >= oy - SLACK && y1 < oy + th + SLACK, "{position:?}: y {y0}..{y1}, box {oy}+{th}");
        // The first glyph starts at the anchor, not somewhere inside the box.
        assert!(x0 <= ox + SLACK, "{position:?}: ink starts at {x0}, anchor {ox}");
    }
}

#[test]
fn pixels_outside_the_box_are_untouched() {
    let image = render(WatermarkPosition::BottomRight, 1.0);
    let (ox, oy) = text_origin(CANVAS, measure_text(TEXT, SIZE_PX), WatermarkPosition::BottomRight, 20);
    let (tw, th) = measure_text(TEXT, SIZE_PX);

    for (x, y, px) in image.enumerate_pixels() {
        let (x, y) = (x as i32, y as i32);
        let inside = x >= ox - SLACK && x < ox + tw as i32 + SLACK && y >= oy - SLACK && y < oy + th as i32 + SLACK;
        if !inside {
            assert_eq!(px.0, BLACK, "pixel ({x}, {y}) changed");
        }
    }
}

#[test]
fn half_opacity_blends_halfway() {
    let opaque = render(WatermarkPosition::Center, 1.0);
    let half = render(WatermarkPosition::Center, 0.5);

    // White on black at opacity 1.0 leaves each channel equal to the glyph
    // coverage; half opacity halves it and keeps the canvas opaque.
    let mut inked = 0;
    for (full, blended) in opaque.pixels().zip(half.pixels()) {
        if full.0 == BLACK {
            assert_eq!(blended.0, BLACK);
            continue;
        }
        inked += 1;
        let coverage = full[0] as f64;
        for c in 0..3 {
            assert!((blended[c] as f64 - coverage / 2.0).abs() <= 0.5, "{:?} vs {:?}", blended.0, full.0);
        }
        assert_eq!(blended[3], 255);
        if full.0 == [255, 255, 255, 255] {
            assert_eq!(blended.0, [128, 128, 128, 255]);
        }
    }
    assert!(inked > 0);
}

#[test]
fn unset_inset_comes_from_tool_defaults() {
    let bytes = codec::encode(&PixelBuffer::filled(CANVAS.0, CANVAS.1, BLACK), RasterFormat::Png, 0).unwrap();
    let input = InputFile::new(bytes, "image/png", "page.png");
    let run = |inset_px: Option<u32>, defaults: &ToolDefaults| {
        let output = tools::transform_image(
            &processor(),
            &input,
            &params(WatermarkPosition::TopLeft, 1.0, inset_px),
            defaults,
        )
        .unwrap();
        let image: RgbaImage = codec::decode(&output.bytes, Some(&output.mime_type)).unwrap().into();
        ink_bounds(&image).unwrap()
    };

    let defaults = ToolDefaults {
        watermark_inset_px: 4,
        ..ToolDefaults::default()
    };
    let (x0, y0, _, _) = run(None, &defaults);
    assert!((4 - SLACK..=4 + SLACK).contains(&x0), "ink starts at x {x0}");
    assert!(y0 >= 4 - SLACK && y0 < 4 + SIZE_PX as i32, "ink starts at y {y0}");

    // An explicit inset wins over the default.
    let (x0, _, _, _) = run(Some(40), &defaults);
    assert!(x0 >= 40 - SLACK, "ink starts at x {x0}");
}
