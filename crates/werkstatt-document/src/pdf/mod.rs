// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — page-set model over `lopdf`, page planning operations, image
// placement, and image-to-PDF composition with `printpdf`.

pub mod layout;
pub mod model;
pub mod pages;
pub mod writer;

pub use layout::{Placement, place};
pub use model::DocumentHandle;
pub use pages::{PageHandle, PageSelection};
pub use writer::{PageSizing, PdfComposer};
