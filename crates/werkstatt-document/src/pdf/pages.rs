// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-set operations — plan which source pages, in which order and
// orientation, make up each output document. Nothing here touches PDF
// objects; `DocumentHandle::derive` materialises the plans.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use werkstatt_core::error::{Result, WerkstattError};

/// Rotation deltas accepted by [`rotate`].
pub const ROTATION_DELTAS: [i32; 4] = [90, 180, 270, -90];

/// One page of a planned output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageHandle {
    /// 0-based index of the page in the source document.
    pub source_index: u32,
    /// Absolute orientation written to the output page.
    pub rotation_degrees: i32,
}

impl PageHandle {
    pub fn new(source_index: u32, rotation_degrees: i32) -> Self {
        Self {
            source_index,
            rotation_degrees,
        }
    }
}

/// Map any multiple of 90 onto 0, 90, 180 or 270.
pub fn normalise_rotation(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Which pages of a view an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ranges", rename_all = "snake_case")]
pub enum PageSelection {
    All,
    /// A range expression such as `"1-3, 5, 8-10"`.
    Ranges(String),
}

/// Split `view` into consecutive chunks of `pages_per_file` pages.
///
/// The last chunk holds the remainder, so a view of N pages yields
/// `ceil(N / pages_per_file)` chunks.
pub fn split_fixed(view: &[PageHandle], pages_per_file: u32) -> Result<Vec<Vec<PageHandle>>> {
    if pages_per_file == 0 {
        return Err(WerkstattError::InvalidParameter(
            "pages per file must be at least 1".into(),
        ));
    }
    if view.is_empty() {
        return Err(WerkstattError::EmptyPageSelection(
            "there are no pages to split".into(),
        ));
    }

    let chunks: Vec<Vec<PageHandle>> = view
        .chunks(pages_per_file as usize)
        .map(<[PageHandle]>::to_vec)
        .collect();
    debug!(pages = view.len(), pages_per_file, chunks = chunks.len(), "Fixed split planned");
    Ok(chunks)
}

/// Parse a comma-separated list of 1-based, inclusive page ranges.
///
/// Each token is either `n` or `a-b`. Tokens that are malformed, reversed,
/// zero, or beyond `page_count` are skipped with a warning. Fails with
/// `EmptyPageSelection` if no token survives. Returned ranges are 0-based.
pub fn parse_ranges(expression: &str, page_count: u32) -> Result<Vec<RangeInclusive<u32>>> {
    let mut ranges = Vec::new();

    for token in expression.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_token(token, page_count) {
            Some(range) => ranges.push(range),
            None => warn!(token, page_count, "Skipping invalid page range"),
        }
    }

    if ranges.is_empty() {
        return Err(WerkstattError::EmptyPageSelection(format!(
            "no valid page ranges in \"{expression}\" for a {page_count}-page document"
        )));
    }
    Ok(ranges)
}

fn parse_token(token: &str, page_count: u32) -> Option<RangeInclusive<u32>> {
    let (start, end) = match token.split_once('-') {
        Some((a, b)) => (a.trim().parse::<u32>().ok()?, b.trim().parse::<u32>().ok()?),
        None => {
            let page = token.parse::<u32>().ok()?;
            (page, page)
        }
    };

    if start == 0 || start > end || end > page_count {
        return None;
    }
    Some(start - 1..=end - 1)
}

/// One output per range; each holds that range's pages in order.
pub fn split_ranges(view: &[PageHandle], expression: &str) -> Result<Vec<Vec<PageHandle>>> {
    let ranges = parse_ranges(expression, view.len() as u32)?;
    let groups: Vec<Vec<PageHandle>> = ranges
        .into_iter()
        .map(|range| view[*range.start() as usize..=*range.end() as usize].to_vec())
        .collect();
    debug!(groups = groups.len(), "Range split planned");
    Ok(groups)
}

/// Rearrange `view` so that output position `i` holds `view[permutation[i]]`.
///
/// `permutation` holds 0-based positions and must name every page exactly
/// once; anything shorter, longer, or with repeats is `IncompleteReorder`.
pub fn reorder(view: &[PageHandle], permutation: &[u32]) -> Result<Vec<PageHandle>> {
    let expected = view.len();
    if permutation.len() != expected {
        return Err(WerkstattError::IncompleteReorder {
            expected,
            actual: permutation.len(),
        });
    }

    if let Some(&bad) = permutation.iter().find(|&&i| i as usize >= expected) {
        return Err(WerkstattError::InvalidParameter(format!(
            "page position {bad} out of range (document has {expected} pages)"
        )));
    }

    let distinct: HashSet<u32> = permutation.iter().copied().collect();
    if distinct.len() != expected {
        return Err(WerkstattError::IncompleteReorder {
            expected,
            actual: distinct.len(),
        });
    }

    Ok(permutation.iter().map(|&i| view[i as usize]).collect())
}

/// Rotate the selected pages of `view` by `delta` degrees.
///
/// The new orientation is `view`'s orientation plus `delta`, so rotating a
/// document's fresh view always yields the same absolute result. Pages
/// outside the selection keep their orientation.
pub fn rotate(view: &[PageHandle], selection: &PageSelection, delta: i32) -> Result<Vec<PageHandle>> {
    if !ROTATION_DELTAS.contains(&delta) {
        return Err(WerkstattError::InvalidParameter(format!(
            "rotation must be one of 90, 180, 270 or -90, got {delta}"
        )));
    }

    let selected: HashSet<u32> = match selection {
        PageSelection::All => (0..view.len() as u32).collect(),
        PageSelection::Ranges(expression) => parse_ranges(expression, view.len() as u32)?
            .into_iter()
            .flatten()
            .collect(),
    };

    let rotated = view
        .iter()
        .enumerate()
        .map(|(position, page)| {
            if selected.contains(&(position as u32)) {
                PageHandle::new(
                    page.source_index,
                    normalise_rotation(page.rotation_degrees + delta),
                )
            } else {
                *page
            }
        })
        .collect();
    debug!(delta, selected = selected.len(), "Rotation planned");
    Ok(rotated)
}
