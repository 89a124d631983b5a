// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Best-effort splitter for raw unified-diff text (Bitbucket `diff/<hash>`).
//!
//! ```text
//! diff --git a/src/x.rs b/src/x.rs      <- section header, path from "b/"
//! index 1a2b..3c4d 100644
//! --- a/src/x.rs
//! +++ b/src/x.rs
//! @@ -1,3 +1,4 @@                       <- diff text starts here
//! ...
//! ```
//!
//! Sections without a usable header are skipped; sections without hunks
//! (binary files, pure renames, mode changes) yield an empty diff.

use super::types::FileDiff;

const MARKER: &str = "diff --git a/";

/// Split `text` into one [`FileDiff`] per file section.
#[must_use]
pub fn split_unified_diff(text: &str) -> Vec<FileDiff> {
    // only markers at the start of a line open a section
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.starts_with(MARKER) {
            starts.push(offset);
        }
        offset += line.len();
    }

    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            text.get(start + MARKER.len()..end).and_then(parse_section)
        })
        .collect()
}

fn parse_section(section: &str) -> Option<FileDiff> {
    let header = section.lines().next()?;
    let path = header
        .rsplit_once(" b/")
        .map(|(_, new_path)| new_path)
        .or_else(|| header.split_once(' ').map(|(old_path, _)| old_path))?
        .trim();
    if path.is_empty() {
        return None;
    }

    let diff = section.find("\n@@").map_or("", |idx| &section[idx + 1..]);

    Some(FileDiff {
        path: path.to_string(),
        diff: diff.trim_end_matches('\n').to_string(),
    })
}
