// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform parameters — one variant per pixel operation, validated before
// any pixel is touched.

use serde::{Deserialize, Serialize};
use werkstatt_core::config::ToolDefaults;
use werkstatt_core::error::{Result, WerkstattError};
use werkstatt_core::types::{FlipAxis, Rgb, WatermarkPosition};

/// Largest accepted blur radius, in pixels.
pub const MAX_BLUR_RADIUS: u32 = 50;

/// Largest accepted watermark font size, in pixels.
pub const MAX_FONT_SIZE_PX: u32 = 1000;

/// Watermark inset used when neither the request nor the defaults set one.
pub const DEFAULT_INSET_PX: u32 = 20;

/// Settings for a watermark overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkParams {
    pub text: String,
    pub font_size_px: u32,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
    pub color: Rgb,
    pub position: WatermarkPosition,
    /// Distance to the nearest edges, in pixels. Ignored for `Center`.
    /// `None` takes `ToolDefaults::watermark_inset_px`.
    #[serde(default)]
    pub inset_px: Option<u32>,
}

/// Which transform to apply, and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformParameters {
    Grayscale,
    BrightnessContrast { brightness: i32, contrast: i32 },
    Blur { radius: u32 },
    Flip { axis: FlipAxis },
    /// Clockwise, any angle.
    Rotate { degrees: f64 },
    Watermark(WatermarkParams),
}

impl TransformParameters {
    /// Short operation name, used in logs and history.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::BrightnessContrast { .. } => "brightness-contrast",
            Self::Blur { .. } => "blur",
            Self::Flip { .. } => "flip",
            Self::Rotate { .. } => "rotate",
            Self::Watermark(_) => "watermark",
        }
    }

    /// Check every numeric field against its declared range.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Grayscale | Self::Flip { .. } => Ok(()),
            Self::BrightnessContrast {
                brightness,
                contrast,
            } => {
                check_range("brightness", *brightness, -255, 255)?;
                check_range("contrast", *contrast, -255, 255)
            }
            Self::Blur { radius } => check_range("blur radius", *radius, 1, MAX_BLUR_RADIUS),
            Self::Rotate { degrees } => {
                if degrees.is_finite() {
                    Ok(())
                } else {
                    Err(WerkstattError::InvalidParameter(format!(
                        "rotation must be a finite angle, got {degrees}"
                    )))
                }
            }
            Self::Watermark(params) => params.validate(),
        }
    }

    /// Fill every unset field from `defaults`.
    pub fn with_defaults(&self, defaults: &ToolDefaults) -> Self {
        match self {
            Self::Watermark(params) if params.inset_px.is_none() => Self::Watermark(WatermarkParams {
                inset_px: Some(defaults.watermark_inset_px),
                ..params.clone()
            }),
            other => other.clone(),
        }
    }
}

impl WatermarkParams {
    /// Effective inset in pixels.
    pub fn inset(&self) -> u32 {
        self.inset_px.unwrap_or(DEFAULT_INSET_PX)
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(WerkstattError::InvalidParameter(
                "watermark text is empty".into(),
            ));
        }
        check_range("font size", self.font_size_px, 1, MAX_FONT_SIZE_PX)?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(WerkstattError::InvalidParameter(format!(
                "opacity must be between 0 and 1, got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

fn check_range<T>(name: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(WerkstattError::InvalidParameter(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}
