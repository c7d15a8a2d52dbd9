// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Werkstatt.

use thiserror::Error;

/// Top-level error type for all Werkstatt operations.
#[derive(Debug, Error)]
pub enum WerkstattError {
    // -- Decode errors --
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("document is corrupt: {0}")]
    CorruptDocument(String),

    #[error("document is password protected")]
    PasswordRequired,

    // -- Parameter errors --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    // -- Structural precondition errors --
    #[error("reorder must list every page exactly once: expected {expected} pages, got {actual}")]
    IncompleteReorder { expected: usize, actual: usize },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("no pages selected: {0}")]
    EmptyPageSelection(String),

    // -- Output --
    #[error("encoding failed: {0}")]
    Encode(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error families, used by shells to decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input bytes could not be turned into an image or document.
    Decode,
    /// A tunable value was out of range; the user must correct it.
    Parameter,
    /// A structural precondition (page permutation, geometry) was violated.
    Structural,
    /// The result could not be serialised.
    Output,
    /// History or configuration storage failed.
    Storage,
}

impl WerkstattError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_) | Self::CorruptDocument(_) | Self::PasswordRequired => {
                ErrorKind::Decode
            }
            Self::InvalidParameter(_) => ErrorKind::Parameter,
            Self::IncompleteReorder { .. }
            | Self::InvalidGeometry(_)
            | Self::EmptyPageSelection(_) => ErrorKind::Structural,
            Self::Encode(_) => ErrorKind::Output,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Storage,
        }
    }

    /// True for the decode family (`UnsupportedFormat`, `CorruptDocument`,
    /// `PasswordRequired`).
    pub fn is_decode_error(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WerkstattError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_family_is_grouped() {
        assert!(WerkstattError::PasswordRequired.is_decode_error());
        assert!(WerkstattError::UnsupportedFormat("image/x-foo".into()).is_decode_error());
        assert!(!WerkstattError::InvalidParameter("radius".into()).is_decode_error());
    }

    #[test]
    fn incomplete_reorder_message_names_counts() {
        let err = WerkstattError::IncompleteReorder {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.kind(), ErrorKind::Structural);
        let message = err.to_string();
        assert!(message.contains("expected 4"));
        assert!(message.contains("got 3"));
    }
}
