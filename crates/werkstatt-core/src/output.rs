// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input and output artifacts exchanged with the page shell, plus the
// download filename convention (`<verb>-<original-name>`).

/// A file handed to a tool by the upload zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl InputFile {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }
}

/// A result ready for download or display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl ToolOutput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }
}

/// `grayscale` + `photo.jpg` → `grayscale-photo.jpg`.
pub fn output_filename(verb: &str, original: &str) -> String {
    format!("{verb}-{}", display_name(original))
}

/// `split` + 2 + `report.pdf` → `split-2-report.pdf`.
pub fn numbered_filename(verb: &str, number: usize, original: &str) -> String {
    format!("{verb}-{number}-{}", display_name(original))
}

/// Swap the extension of `name` for `extension`, adding one if missing.
///
/// Only the last extension is replaced (`archive.tar.gz` → `archive.tar.png`).
pub fn replace_extension(name: &str, extension: &str) -> String {
    let stem = match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    };
    format!("{stem}.{extension}")
}

/// Strip any directory components a browser may have left in the name.
fn display_name(original: &str) -> &str {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    if base.is_empty() { "file" } else { base }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_prefix_naming() {
        assert_eq!(output_filename("grayscale", "photo.jpg"), "grayscale-photo.jpg");
        assert_eq!(output_filename("rotated", "document.pdf"), "rotated-document.pdf");
    }

    #[test]
    fn directory_components_are_dropped() {
        assert_eq!(
            output_filename("blurred", "C:\\Users\\me\\cat.png"),
            "blurred-cat.png"
        );
        assert_eq!(output_filename("flipped", "a/b/"), "flipped-file");
    }

    #[test]
    fn numbered_outputs() {
        assert_eq!(numbered_filename("split", 3, "report.pdf"), "split-3-report.pdf");
    }

    #[test]
    fn extension_replacement() {
        assert_eq!(replace_extension("photo.jpeg", "png"), "photo.png");
        assert_eq!(replace_extension("scan", "pdf"), "scan.pdf");
        assert_eq!(replace_extension(".hidden", "pdf"), ".hidden.pdf");
        assert_eq!(replace_extension("archive.tar.gz", "png"), "archive.tar.png");
    }
}
