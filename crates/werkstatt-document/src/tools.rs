// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool entry points — one function per tool. Each takes the uploaded
// file(s), runs the pipeline, and returns download-ready output named
// `<verb>-<original-name>`.

use tracing::{info, instrument};
use werkstatt_core::config::ToolDefaults;
use werkstatt_core::error::{Result, WerkstattError};
use werkstatt_core::output::{
    InputFile, ToolOutput, numbered_filename, output_filename, replace_extension,
};
use werkstatt_core::types::RasterFormat;

use crate::image::codec;
use crate::image::{ImageProcessor, TransformParameters};
use crate::pdf::pages::{self, PageSelection};
use crate::pdf::{DocumentHandle, PdfComposer};

const PDF_MIME: &str = "application/pdf";

/// Filename prefix for each image transform.
pub fn transform_verb(params: &TransformParameters) -> &'static str {
    match params {
        TransformParameters::Grayscale => "grayscale",
        TransformParameters::BrightnessContrast { .. } => "adjusted",
        TransformParameters::Blur { .. } => "blurred",
        TransformParameters::Flip { .. } => "flipped",
        TransformParameters::Rotate { .. } => "rotated",
        TransformParameters::Watermark(_) => "watermarked",
    }
}

// -- Image tools --------------------------------------------------------------

/// Apply one transform to an uploaded image.
///
/// The output keeps the input's format unless `defaults.output_format` says
/// otherwise, in which case the filename extension follows the new format.
#[instrument(skip(processor, input, defaults), fields(filename = %input.filename, op = params.name()))]
pub fn transform_image(
    processor: &ImageProcessor,
    input: &InputFile,
    params: &TransformParameters,
    defaults: &ToolDefaults,
) -> Result<ToolOutput> {
    let params = &params.with_defaults(defaults);
    params.validate()?;
    let source_format = codec::detect_format(&input.bytes, Some(&input.mime_type))?;
    let format = defaults.output_format.unwrap_or(source_format);

    let buffer = codec::decode(&input.bytes, Some(&input.mime_type))?;
    let transformed = processor.apply(buffer, params)?;
    let bytes = codec::encode(&transformed, format, defaults.jpeg_quality)?;

    let name = renamed_for(&input.filename, source_format, format);
    info!(output_bytes = bytes.len(), ?format, "Image tool complete");
    Ok(ToolOutput::new(
        bytes,
        format.mime_type(),
        output_filename(transform_verb(params), &name),
    ))
}

/// Re-encode an uploaded image as `format` without transforming it.
#[instrument(skip(input, defaults), fields(filename = %input.filename))]
pub fn convert_image(input: &InputFile, format: RasterFormat, defaults: &ToolDefaults) -> Result<ToolOutput> {
    let buffer = codec::decode(&input.bytes, Some(&input.mime_type))?;
    let bytes = codec::encode(&buffer, format, defaults.jpeg_quality)?;
    let name = replace_extension(&input.filename, format.extension());
    Ok(ToolOutput::new(
        bytes,
        format.mime_type(),
        output_filename("converted", &name),
    ))
}

/// Keep the filename unless the format changed.
fn renamed_for(filename: &str, from: RasterFormat, to: RasterFormat) -> String {
    if from == to {
        filename.to_string()
    } else {
        replace_extension(filename, to.extension())
    }
}

// -- PDF tools ----------------------------------------------------------------

/// Split into files of `pages_per_file` consecutive pages.
#[instrument(skip(input), fields(filename = %input.filename))]
pub fn split_pdf_fixed(input: &InputFile, pages_per_file: u32) -> Result<Vec<ToolOutput>> {
    let document = DocumentHandle::load(&input.bytes)?;
    let groups = pages::split_fixed(&document.pages(), pages_per_file)?;
    write_groups(&document, &groups, &input.filename)
}

/// Split into one file per range, e.g. `"1-3, 5, 8-10"`.
#[instrument(skip(input), fields(filename = %input.filename))]
pub fn split_pdf_ranges(input: &InputFile, ranges: &str) -> Result<Vec<ToolOutput>> {
    let document = DocumentHandle::load(&input.bytes)?;
    let groups = pages::split_ranges(&document.pages(), ranges)?;
    write_groups(&document, &groups, &input.filename)
}

fn write_groups(
    document: &DocumentHandle,
    groups: &[Vec<pages::PageHandle>],
    filename: &str,
) -> Result<Vec<ToolOutput>> {
    let outputs = groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let bytes = document.derive(group)?.to_bytes()?;
            Ok(ToolOutput::new(
                bytes,
                PDF_MIME,
                numbered_filename("split", index + 1, filename),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(outputs = outputs.len(), "PDF split complete");
    Ok(outputs)
}

/// Rearrange pages; `permutation[i]` is the 0-based source position of
/// output page `i`.
#[instrument(skip(input, permutation), fields(filename = %input.filename))]
pub fn reorder_pdf(input: &InputFile, permutation: &[u32]) -> Result<ToolOutput> {
    let document = DocumentHandle::load(&input.bytes)?;
    let order = pages::reorder(&document.pages(), permutation)?;
    let bytes = document.derive(&order)?.to_bytes()?;
    Ok(ToolOutput::new(
        bytes,
        PDF_MIME,
        output_filename("reordered", &input.filename),
    ))
}

/// Rotate the selected pages by `delta` degrees (90, 180, 270 or -90).
#[instrument(skip(input), fields(filename = %input.filename))]
pub fn rotate_pdf(input: &InputFile, selection: &PageSelection, delta: i32) -> Result<ToolOutput> {
    let document = DocumentHandle::load(&input.bytes)?;
    let rotated = pages::rotate(&document.pages(), selection, delta)?;
    let bytes = document.derive(&rotated)?.to_bytes()?;
    Ok(ToolOutput::new(
        bytes,
        PDF_MIME,
        output_filename("rotated", &input.filename),
    ))
}

/// Concatenate documents in the order given.
#[instrument(skip(inputs), fields(inputs = inputs.len()))]
pub fn merge_pdfs(inputs: &[InputFile]) -> Result<ToolOutput> {
    let first = inputs.first().ok_or_else(|| {
        WerkstattError::InvalidParameter("merge needs at least one document".into())
    })?;
    let documents = inputs
        .iter()
        .map(|input| DocumentHandle::load(&input.bytes))
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&DocumentHandle> = documents.iter().collect();

    let bytes = DocumentHandle::merge(&refs)?.to_bytes()?;
    Ok(ToolOutput::new(
        bytes,
        PDF_MIME,
        output_filename("merged", &first.filename),
    ))
}

/// Lay images out one per page.
#[instrument(skip(composer, inputs), fields(inputs = inputs.len()))]
pub fn images_to_pdf(composer: &PdfComposer, inputs: &[InputFile]) -> Result<ToolOutput> {
    let bytes = composer.compose(inputs)?;
    let first = inputs.first().map_or("images", |input| input.filename.as_str());
    Ok(ToolOutput::new(
        bytes,
        PDF_MIME,
        output_filename("images", &replace_extension(first, "pdf")),
    ))
}
