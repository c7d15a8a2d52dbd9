// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — RGBA pixel buffer, codecs, and the transform engine
// (grayscale, brightness/contrast, box blur, flip, rotate, watermark).

pub mod buffer;
pub mod codec;
pub mod filters;
pub mod geometry;
pub mod params;
pub mod processor;
pub mod watermark;

pub use buffer::PixelBuffer;
pub use params::{TransformParameters, WatermarkParams};
pub use processor::ImageProcessor;
pub use watermark::WatermarkFont;
