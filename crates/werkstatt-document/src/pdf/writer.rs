// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF composer — lay raster images out one per page using `printpdf` 0.8.
//
// Each image is decoded through the pixel pipeline's codec, flattened onto
// white, placed with `layout::place`, and embedded at 72 dpi so one source
// pixel is one PDF point before scaling.

use image::RgbaImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use werkstatt_core::config::ToolDefaults;
use werkstatt_core::error::{Result, WerkstattError};
use werkstatt_core::output::InputFile;
use werkstatt_core::types::{PaperSize, pt_to_mm};

use super::layout::{Placement, place};
use crate::image::codec;

/// Resolution at which images are embedded: 1 px = 1 pt.
const EMBED_DPI: f32 = 72.0;

/// How each output page is sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSizing {
    /// Every page has the given paper size; images are fitted inside it.
    Paper(PaperSize),
    /// Each page is the image size plus the margin on every side.
    FitToImage,
}

/// Builds multi-page PDFs from raster images.
#[derive(Debug, Clone)]
pub struct PdfComposer {
    sizing: PageSizing,
    /// Margin on every side, in points.
    margin_pt: f64,
    title: String,
}

impl PdfComposer {
    pub fn new(sizing: PageSizing, margin_pt: f64) -> Self {
        Self {
            sizing,
            margin_pt,
            title: "Werkstatt Images".into(),
        }
    }

    /// A4 pages with a half-inch margin.
    pub fn a4() -> Self {
        Self::new(PageSizing::Paper(PaperSize::A4), 36.0)
    }

    /// Set the title written to the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn sizing(&self) -> PageSizing {
        self.sizing
    }

    pub fn margin_pt(&self) -> f64 {
        self.margin_pt
    }

    /// Page size in points for an image of `width` x `height` pixels.
    fn page_size_pt(&self, width: u32, height: u32) -> (f64, f64) {
        match self.sizing {
            PageSizing::Paper(paper) => paper.dimensions_pt(),
            PageSizing::FitToImage => (
                width as f64 + 2.0 * self.margin_pt,
                height as f64 + 2.0 * self.margin_pt,
            ),
        }
    }

    /// Compose one page per image, in order.
    ///
    /// Images are processed one after another; the first that fails to
    /// decode or place aborts the whole batch.
    #[instrument(skip(self, images), fields(images = images.len(), sizing = ?self.sizing))]
    pub fn compose(&self, images: &[InputFile]) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(WerkstattError::InvalidParameter(
                "at least one image is required".into(),
            ));
        }

        info!(title = %self.title, "Composing image PDF");
        let mut doc = PdfDocument::new(&self.title);
        let mut pages = Vec::with_capacity(images.len());

        for (index, input) in images.iter().enumerate() {
            let page = self.compose_page(&mut doc, input).inspect_err(|err| {
                warn!(index, filename = %input.filename, %err, "Image PDF batch aborted");
            })?;
            pages.push(page);
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            output_bytes = output.len(),
            warnings = warnings.len(),
            "Image PDF serialised"
        );
        Ok(output)
    }

    fn compose_page(&self, doc: &mut PdfDocument, input: &InputFile) -> Result<PdfPage> {
        let buffer = codec::decode(&input.bytes, Some(&input.mime_type))?;
        let (width, height) = buffer.dimensions();
        let (page_w, page_h) = self.page_size_pt(width, height);
        let placement = place(width as f64, height as f64, page_w, page_h, self.margin_pt)?;

        let rgb = codec::flatten_onto_white(&RgbaImage::from(buffer));
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        debug!(
            filename = %input.filename,
            width,
            height,
            scale = placement.scale,
            "Image placed on page"
        );

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: transform_for(&placement),
        }];
        Ok(PdfPage::new(
            Mm(pt_to_mm(page_w) as f32),
            Mm(pt_to_mm(page_h) as f32),
            ops,
        ))
    }
}

impl Default for PdfComposer {
    fn default() -> Self {
        Self::a4()
    }
}

impl From<&ToolDefaults> for PdfComposer {
    fn from(defaults: &ToolDefaults) -> Self {
        Self::new(PageSizing::Paper(defaults.paper_size), defaults.margin_pt)
    }
}

fn transform_for(placement: &Placement) -> XObjectTransform {
    XObjectTransform {
        translate_x: Some(Pt(placement.x as f32)),
        translate_y: Some(Pt(placement.y as f32)),
        scale_x: Some(placement.scale as f32),
        scale_y: Some(placement.scale as f32),
        dpi: Some(EMBED_DPI),
        rotate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelBuffer;
    use crate::pdf::model::DocumentHandle;
    use werkstatt_core::types::RasterFormat;

    fn png(width: u32, height: u32) -> InputFile {
        let buffer = PixelBuffer::filled(width, height, [30, 120, 200, 255]);
        let bytes = codec::encode(&buffer, RasterFormat::Png, 0).unwrap();
        InputFile::new(bytes, "image/png", "photo.png")
    }

    #[test]
    fn one_page_per_image() {
        let pdf = PdfComposer::a4().compose(&[png(40, 30), png(10, 80), png(5, 5)]).unwrap();
        let handle = DocumentHandle::load(&pdf).unwrap();
        assert_eq!(handle.page_count(), 3);
    }

    #[test]
    fn paper_sizing_uses_paper_dimensions() {
        let pdf = PdfComposer::new(PageSizing::Paper(PaperSize::Letter), 36.0)
            .compose(&[png(20, 20)])
            .unwrap();
        let media_box = DocumentHandle::load(&pdf).unwrap().media_box(0).unwrap();
        assert!((media_box[2] - media_box[0] - 612.0).abs() < 0.5);
        assert!((media_box[3] - media_box[1] - 792.0).abs() < 0.5);
    }

    #[test]
    fn fit_to_image_adds_margins() {
        let pdf = PdfComposer::new(PageSizing::FitToImage, 10.0)
            .compose(&[png(300, 200)])
            .unwrap();
        let media_box = DocumentHandle::load(&pdf).unwrap().media_box(0).unwrap();
        assert!((media_box[2] - media_box[0] - 320.0).abs() < 0.5);
        assert!((media_box[3] - media_box[1] - 220.0).abs() < 0.5);
    }

    #[test]
    fn empty_batch_is_invalid() {
        assert!(matches!(
            PdfComposer::a4().compose(&[]),
            Err(WerkstattError::InvalidParameter(_))
        ));
    }

    #[test]
    fn first_bad_image_aborts_batch() {
        let bad = InputFile::new(b"not an image".to_vec(), "image/png", "broken.png");
        let result = PdfComposer::a4().compose(&[png(4, 4), bad, png(4, 4)]);
        assert!(matches!(result, Err(WerkstattError::CorruptDocument(_))));
    }

    #[test]
    fn margin_too_large_is_invalid_geometry() {
        let result = PdfComposer::new(PageSizing::Paper(PaperSize::A5), 500.0).compose(&[png(4, 4)]);
        assert!(matches!(result, Err(WerkstattError::InvalidGeometry(_))));
    }
}
