// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool defaults.
//
// These are the values a page shell pre-fills before the user touches a
// control. Nothing in the pipelines reads them implicitly; callers pass the
// relevant field into each operation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WerkstattError};
use crate::types::{PaperSize, RasterFormat};

/// Defaults for tool parameters that have no natural zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    /// Page size for image-to-PDF composition.
    pub paper_size: PaperSize,
    /// Page margin for image-to-PDF composition, in points.
    pub margin_pt: f64,
    /// JPEG encoder quality (1-100).
    pub jpeg_quality: u8,
    /// Number of recent items each tool keeps.
    pub history_cap: usize,
    /// Distance between watermark text and the nearest image edges, in pixels.
    pub watermark_inset_px: u32,
    /// Output format for image tools; `None` keeps the input format.
    pub output_format: Option<RasterFormat>,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_pt: 36.0,
            jpeg_quality: 92,
            history_cap: 10,
            watermark_inset_px: 20,
            output_format: None,
        }
    }
}

impl ToolDefaults {
    /// Parse defaults from JSON. Missing fields keep their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        let defaults: Self = serde_json::from_str(json)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Read and parse a JSON defaults file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Loaded tool defaults");
        Self::from_json(&text)
    }

    /// Reject values no tool could use.
    pub fn validate(&self) -> Result<()> {
        if self.history_cap == 0 {
            return Err(WerkstattError::InvalidParameter(
                "history_cap must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(WerkstattError::InvalidParameter(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if !self.margin_pt.is_finite() || self.margin_pt < 0.0 {
            return Err(WerkstattError::InvalidParameter(format!(
                "margin_pt must be a non-negative number, got {}",
                self.margin_pt
            )));
        }
        Ok(())
    }
}
