// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer — the RGBA working representation between decode and encode.

use image::RgbaImage;
use werkstatt_core::error::{Result, WerkstattError};

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Row-major RGBA raster, 8 bits per channel.
///
/// `channels.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let channels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            channels,
        }
    }

    /// Wrap existing RGBA bytes, rejecting a length that does not match.
    pub fn from_raw(width: u32, height: u32, channels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if channels.len() != expected {
            return Err(WerkstattError::InvalidParameter(format!(
                "pixel data is {} bytes, a {width}x{height} RGBA buffer needs {expected}",
                channels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.channels
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.channels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.channels
    }

    /// Byte offset of pixel (x, y). Caller guarantees bounds.
    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Pixel at (x, y), or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.channels[i..i + CHANNELS]);
        Some(px)
    }

    /// Overwrite pixel (x, y); out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.channels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Iterate over pixels as mutable 4-byte slices.
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.channels.chunks_exact_mut(CHANNELS)
    }

    /// Iterate over pixels as 4-byte slices.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.channels.chunks_exact(CHANNELS)
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: image.into_raw(),
        }
    }
}

impl From<PixelBuffer> for RgbaImage {
    fn from(buffer: PixelBuffer) -> Self {
        let PixelBuffer {
            width,
            height,
            channels,
        } = buffer;
        // Length invariant is upheld by every constructor.
        RgbaImage::from_raw(width, height, channels)
            .unwrap_or_else(|| RgbaImage::new(width, height))
    }
}
