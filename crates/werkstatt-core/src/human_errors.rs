// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for tool pages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The core never presents these; the page shell decides how to show them.

use crate::error::WerkstattError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change a setting or pick a different file.
    ActionRequired,
    /// The input itself cannot be processed by this tool.
    Permanent,
    /// Something on the device went wrong; trying again may help.
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether pressing "try again" with the same input can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `WerkstattError` into a `HumanError`.
pub fn humanize_error(err: &WerkstattError) -> HumanError {
    match err {
        // -- Decode errors --
        WerkstattError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!(
                "Try saving the image as a PNG or JPEG first, then upload it again. (File type: {detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        WerkstattError::CorruptDocument(_) => HumanError {
            message: "This file looks damaged.".into(),
            suggestion: "Try opening it in another program first to check it works, or choose a different file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        WerkstattError::PasswordRequired => HumanError {
            message: "This PDF is password protected.".into(),
            suggestion: "Remove the password in your PDF reader, save a copy, and upload that copy instead.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Parameter errors --
        WerkstattError::InvalidParameter(detail) => HumanError {
            message: "One of the settings is out of range.".into(),
            suggestion: format!("Adjust the setting and run the tool again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Structural errors --
        WerkstattError::IncompleteReorder { expected, actual } => HumanError {
            message: "The new page order is incomplete.".into(),
            suggestion: format!(
                "Every page must appear exactly once. The document has {expected} pages but {actual} were listed."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        WerkstattError::InvalidGeometry(_) => HumanError {
            message: "The page size or margins don't leave room for the image.".into(),
            suggestion: "Try a smaller margin or a larger page size.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        WerkstattError::EmptyPageSelection(_) => HumanError {
            message: "No pages matched your selection.".into(),
            suggestion: "Enter page numbers like \"1-3, 5\" using pages that exist in the document.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Output --
        WerkstattError::Encode(_) => HumanError {
            message: "The result couldn't be saved in that format.".into(),
            suggestion: "Try a different output format, such as PNG.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage --
        WerkstattError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The tool doesn't have permission to save its history.".into(),
                    suggestion: "Your result is fine. Check the storage permissions if you want history to be kept.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing saved data.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        WerkstattError::Serialization(_) => HumanError {
            message: "Saved tool data couldn't be read.".into(),
            suggestion: "Try clearing the tool's history. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
