// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// werkstatt-document — the two processing pipelines behind the Werkstatt tools.
//
// Provides raster transforms (grayscale, brightness/contrast, box blur, flip,
// rotate, watermark) with PNG/JPEG/WebP/BMP/GIF codecs, PDF page-set
// operations (split, reorder, rotate, merge), and image-to-PDF layout.

pub mod image;
pub mod pdf;
pub mod tools;

// Re-export the primary types so callers can use `werkstatt_document::DocumentHandle` etc.
pub use image::{ImageProcessor, PixelBuffer, TransformParameters, WatermarkFont, WatermarkParams};
pub use pdf::{DocumentHandle, PageHandle, PageSelection, PageSizing, PdfComposer, Placement, place};
