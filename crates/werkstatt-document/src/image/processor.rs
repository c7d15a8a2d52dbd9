// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — the single entry point of the pixel transform engine.
// Validates parameters, dispatches to the filter/geometry/watermark
// routines, and wraps decode → transform → encode for byte-level callers.

use tracing::{debug, info, instrument};
use werkstatt_core::error::{Result, WerkstattError};
use werkstatt_core::types::RasterFormat;

use super::buffer::PixelBuffer;
use super::codec;
use super::filters;
use super::geometry;
use super::params::TransformParameters;
use super::watermark::{self, WatermarkFont};

/// Stateless transform engine.
///
/// The only configuration is an optional font for the watermark transform;
/// every other operation is a pure function of the buffer and parameters.
///
/// ```ignore
/// let png = ImageProcessor::new().process(
///     &upload.bytes,
///     Some(&upload.mime_type),
///     &TransformParameters::Blur { radius: 4 },
///     RasterFormat::Png,
///     92,
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImageProcessor {
    /// Font used for `Watermark`; other transforms never read it.
    font: Option<WatermarkFont>,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    /// A processor that can draw watermarks with `font`.
    pub fn with_font(font: WatermarkFont) -> Self {
        Self { font: Some(font) }
    }

    /// Parse `font_bytes` (TTF/OTF) and use them for watermarks.
    pub fn with_font_bytes(font_bytes: Vec<u8>) -> Result<Self> {
        Ok(Self::with_font(WatermarkFont::from_bytes(font_bytes)?))
    }

    // -- Transform ------------------------------------------------------------

    /// Apply one transform to `buffer`.
    ///
    /// Parameters are validated before any pixel is touched. Rotation may
    /// change the dimensions; every other transform keeps them.
    #[instrument(skip(self, buffer), fields(op = params.name(), width = buffer.width(), height = buffer.height()))]
    pub fn apply(&self, mut buffer: PixelBuffer, params: &TransformParameters) -> Result<PixelBuffer> {
        params.validate()?;
        info!("Applying transform");

        let output = match params {
            TransformParameters::Grayscale => {
                filters::grayscale(&mut buffer);
                buffer
            }
            TransformParameters::BrightnessContrast {
                brightness,
                contrast,
            } => {
                filters::brightness_contrast(&mut buffer, *brightness, *contrast);
                buffer
            }
            TransformParameters::Blur { radius } => filters::box_blur(&buffer, *radius),
            TransformParameters::Flip { axis } => {
                geometry::flip(&mut buffer, *axis);
                buffer
            }
            TransformParameters::Rotate { degrees } => geometry::rotate(&buffer, *degrees),
            TransformParameters::Watermark(settings) => {
                let font = self.font.as_ref().ok_or_else(|| {
                    WerkstattError::InvalidParameter("watermark requires a font".into())
                })?;
                watermark::apply_watermark(&mut buffer, settings, font);
                buffer
            }
        };

        debug!(
            out_w = output.width(),
            out_h = output.height(),
            "Transform complete"
        );
        Ok(output)
    }

    /// Decode `bytes`, apply `params`, and encode the result as `format`.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len(), op = params.name()))]
    pub fn process(
        &self,
        bytes: &[u8],
        mime_hint: Option<&str>,
        params: &TransformParameters,
        format: RasterFormat,
        quality: u8,
    ) -> Result<Vec<u8>> {
        params.validate()?;
        let buffer = codec::decode(bytes, mime_hint)?;
        let transformed = self.apply(buffer, params)?;
        codec::encode(&transformed, format, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werkstatt_core::types::{FlipAxis, Rgb, WatermarkPosition};

    use crate::image::params::WatermarkParams;

    fn checker(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from(image::RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([250, 20, 20, 255])
            } else {
                image::Rgba([20, 20, 250, 128])
            }
        }))
    }

    #[test]
    fn grayscale_twice_equals_once() {
        let processor = ImageProcessor::new();
        let once = processor
            .apply(checker(6, 6), &TransformParameters::Grayscale)
            .unwrap();
        let twice = processor
            .apply(once.clone(), &TransformParameters::Grayscale)
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn brightness_clamps_red_channel() {
        let buffer = PixelBuffer::filled(1, 1, [100, 0, 0, 255]);
        let out = ImageProcessor::new()
            .apply(
                buffer,
                &TransformParameters::BrightnessContrast {
                    brightness: 200,
                    contrast: 0,
                },
            )
            .unwrap();
        assert_eq!(out.pixel(0, 0).unwrap()[0], 255);
    }

    #[test]
    fn double_horizontal_flip_is_identity() {
        let processor = ImageProcessor::new();
        let params = TransformParameters::Flip {
            axis: FlipAxis::Horizontal,
        };
        let original = checker(5, 3);
        let once = processor.apply(original.clone(), &params).unwrap();
        let twice = processor.apply(once, &params).unwrap();
        assert_eq!(twice, original);
    }

    #[test]
    fn invalid_radius_is_rejected_before_work() {
        let result =
            ImageProcessor::new().apply(checker(4, 4), &TransformParameters::Blur { radius: 0 });
        assert!(matches!(result, Err(WerkstattError::InvalidParameter(_))));
    }

    #[test]
    fn rotation_changes_dimensions() {
        let out = ImageProcessor::new()
            .apply(checker(10, 4), &TransformParameters::Rotate { degrees: 90.0 })
            .unwrap();
        assert_eq!(out.dimensions(), (4, 10));
    }

    #[test]
    fn watermark_without_font_is_invalid() {
        let params = TransformParameters::Watermark(WatermarkParams {
            text: "sample".into(),
            font_size_px: 16,
            opacity: 0.5,
            color: Rgb::WHITE,
            position: WatermarkPosition::Center,
            inset_px: None,
        });
        let result = ImageProcessor::new().apply(checker(40, 40), &params);
        assert!(matches!(result, Err(WerkstattError::InvalidParameter(_))));
    }

    #[test]
    fn process_round_trips_through_png() {
        let processor = ImageProcessor::new();
        let input = codec::encode(&checker(8, 8), RasterFormat::Png, 0).unwrap();
        let output = processor
            .process(
                &input,
                Some("image/png"),
                &TransformParameters::Flip {
                    axis: FlipAxis::Vertical,
                },
                RasterFormat::Png,
                0,
            )
            .unwrap();

        let mut expected = checker(8, 8);
        geometry::flip(&mut expected, FlipAxis::Vertical);
        assert_eq!(codec::decode(&output, None).unwrap(), expected);
    }

    #[test]
    fn process_validates_before_decoding() {
        // Garbage bytes would be a decode error; the bad parameter wins.
        let result = ImageProcessor::new().process(
            b"garbage",
            None,
            &TransformParameters::BrightnessContrast {
                brightness: 0,
                contrast: 300,
            },
            RasterFormat::Png,
            0,
        );
        assert!(matches!(result, Err(WerkstattError::InvalidParameter(_))));
    }
}
