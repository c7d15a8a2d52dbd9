// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Werkstatt — Core types, errors, history and tool invocation shared by the
// image and document pipelines.

pub mod config;
pub mod error;
pub mod history;
pub mod human_errors;
pub mod invocation;
pub mod output;
pub mod types;

pub use config::ToolDefaults;
pub use error::{ErrorKind, WerkstattError};
pub use history::{HistoryEntry, HistoryStore, JsonFileHistory, MemoryHistory};
pub use invocation::{ToolInvocation, ToolStatus};
pub use output::{InputFile, ToolOutput};
pub use types::*;
