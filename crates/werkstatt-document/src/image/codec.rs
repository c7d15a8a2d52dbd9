// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer decoder/encoder — converts encoded image bytes into a
// `PixelBuffer` and back, using the `image` crate's codecs.

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use tracing::{debug, instrument};
use werkstatt_core::error::{Result, WerkstattError};
use werkstatt_core::types::RasterFormat;

use super::buffer::PixelBuffer;

/// Decode `bytes` into an RGBA buffer.
///
/// The byte signature decides the format whenever it is recognisable;
/// `mime_hint` is only consulted for data without a known signature.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn decode(bytes: &[u8], mime_hint: Option<&str>) -> Result<PixelBuffer> {
    if bytes.is_empty() {
        return Err(WerkstattError::CorruptDocument("image data is empty".into()));
    }

    let format = detect_format(bytes, mime_hint)?;
    let image = image::load_from_memory_with_format(bytes, to_image_format(format)).map_err(
        |err| WerkstattError::CorruptDocument(format!("failed to decode {format:?} image: {err}")),
    )?;

    debug!(
        ?format,
        width = image.width(),
        height = image.height(),
        "Image decoded from bytes"
    );
    Ok(PixelBuffer::from(image.to_rgba8()))
}

/// Encode `buffer` as `format`.
///
/// `quality` (1-100, clamped) only affects JPEG; lossless formats ignore it.
/// JPEG has no alpha channel, so translucent pixels are flattened onto white.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn encode(buffer: &PixelBuffer, format: RasterFormat, quality: u8) -> Result<Vec<u8>> {
    let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_raw().to_vec())
        .ok_or_else(|| WerkstattError::Encode("pixel buffer length mismatch".into()))?;

    let output = match format {
        RasterFormat::Jpeg => {
            let quality = quality.clamp(1, 100);
            let mut output = Vec::new();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            flatten_onto_white(&rgba)
                .write_with_encoder(encoder)
                .map_err(|err| WerkstattError::Encode(format!("JPEG encoding failed: {err}")))?;
            output
        }
        other => encode_to_format(&DynamicImage::ImageRgba8(rgba), to_image_format(other))?,
    };

    debug!(?format, output_bytes = output.len(), "Image encoded");
    Ok(output)
}

/// Work out which supported format `bytes` holds.
pub fn detect_format(bytes: &[u8], mime_hint: Option<&str>) -> Result<RasterFormat> {
    if let Ok(guessed) = image::guess_format(bytes) {
        return from_image_format(guessed).ok_or_else(|| {
            WerkstattError::UnsupportedFormat(format!("{guessed:?} images"))
        });
    }

    match mime_hint {
        Some(mime) => RasterFormat::from_mime(mime)
            .ok_or_else(|| WerkstattError::UnsupportedFormat(mime.to_string())),
        None => Err(WerkstattError::UnsupportedFormat(
            "unrecognised image signature".into(),
        )),
    }
}

/// Composite every pixel over opaque white and drop the alpha channel.
pub(crate) fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = a as u32;
        let over_white = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([over_white(r), over_white(g), over_white(b)])
    })
}

fn to_image_format(format: RasterFormat) -> ImageFormat {
    match format {
        RasterFormat::Png => ImageFormat::Png,
        RasterFormat::Jpeg => ImageFormat::Jpeg,
        RasterFormat::WebP => ImageFormat::WebP,
        RasterFormat::Bmp => ImageFormat::Bmp,
        RasterFormat::Gif => ImageFormat::Gif,
    }
}

fn from_image_format(format: ImageFormat) -> Option<RasterFormat> {
    match format {
        ImageFormat::Png => Some(RasterFormat::Png),
        ImageFormat::Jpeg => Some(RasterFormat::Jpeg),
        ImageFormat::WebP => Some(RasterFormat::WebP),
        ImageFormat::Bmp => Some(RasterFormat::Bmp),
        ImageFormat::Gif => Some(RasterFormat::Gif),
        _ => None,
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| WerkstattError::Encode(format!("image encoding failed: {err}")))?;
    Ok(buffer)
}
