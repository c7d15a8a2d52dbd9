// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image placement — fit a source rectangle inside a page's margins without
// upscaling, centred on the page. All units are PDF points.

use serde::Serialize;
use werkstatt_core::error::{Result, WerkstattError};

/// Where an image lands on a page. `(x, y)` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Ratio of placed size to source size; never above 1.
    pub scale: f64,
}

/// Fit a `source_w` x `source_h` image on a `page_w` x `page_h` page.
///
/// The image is scaled by `min(avail_w / source_w, avail_h / source_h, 1)`
/// where `avail_* = page_* - 2 * margin`, then centred on the page.
pub fn place(source_w: f64, source_h: f64, page_w: f64, page_h: f64, margin: f64) -> Result<Placement> {
    for (name, value) in [
        ("source width", source_w),
        ("source height", source_h),
        ("page width", page_w),
        ("page height", page_h),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(WerkstattError::InvalidGeometry(format!(
                "{name} must be positive, got {value}"
            )));
        }
    }
    if !margin.is_finite() || margin < 0.0 {
        return Err(WerkstattError::InvalidGeometry(format!(
            "margin must be non-negative, got {margin}"
        )));
    }

    let avail_w = page_w - 2.0 * margin;
    let avail_h = page_h - 2.0 * margin;
    if avail_w <= 0.0 || avail_h <= 0.0 {
        return Err(WerkstattError::InvalidGeometry(format!(
            "margin {margin} leaves no room on a {page_w} x {page_h} page"
        )));
    }

    let scale = (avail_w / source_w).min(avail_h / source_h).min(1.0);
    let width = source_w * scale;
    let height = source_h * scale;

    Ok(Placement {
        x: (page_w - width) / 2.0,
        y: (page_h - height) / 2.0,
        width,
        height,
        scale,
    })
}
