//! Selection extraction: turn a document plus a cursor position or text
//! selection into the code fragment to execute and, where one can be
//! inferred, its runtime.
//!
//! Four mutually exclusive modes, chosen from the cursor/selection state:
//!
//! 1. empty selection on an opening fence marker — scan forward to the
//!    closing fence and take the block body;
//! 2. empty selection on a fence line without a recognized tag — scan
//!    backward to the opening marker and take the block body;
//! 3. empty selection anywhere else — take the single cursor line and
//!    look backward for the runtime;
//! 4. non-empty selection — take the selected character range, one line
//!    at a time, with no runtime inference.
//!
//! The block-accumulation paths (1, 2 and 4) trim every line and drop
//! lines that are blank or start with `//`; mode 3 keeps the cursor line
//! as-is apart from trimming. Whatever the mode, the returned fragment
//! never ends with a newline, and an empty fragment means there is
//! nothing to execute.

use serde::{Deserialize, Serialize};

use crate::runtime::{detect_runtime, is_bare_fence, is_fence_line, Runtime};

/// Line prefix that marks a line as non-executable commentary.
const COMMENT_PREFIX: &str = "//";

/// Zero-based location in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A normalized document selection; `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// Build a selection from two endpoints in either order.
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed selection: just a cursor.
    pub fn cursor(line: usize, character: usize) -> Self {
        let at = Position::new(line, character);
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Fragment and inferred runtime produced by [`extract_selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub text: String,
    pub runtime: Option<Runtime>,
}

impl SelectionResult {
    /// True when extraction produced nothing executable.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Trim a line and keep it only if it is neither blank nor a comment.
fn filter_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
        None
    } else {
        Some(trimmed)
    }
}

/// Character-bounded variant of [`filter_line`] for selection edges.
/// Offsets are in characters and clamped to the line.
fn filter_span(line: &str, start: usize, end: usize) -> Option<String> {
    let span: String = line
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();
    filter_line(&span).map(str::to_string)
}

/// Join kept lines, one trailing newline each; the common post-processing
/// in [`extract_selection`] strips the last one.
fn join_kept(kept: &[&str]) -> String {
    let mut text = String::new();
    for line in kept {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// Mode 1: cursor sits on an opening fence marker; take the body below it.
fn extract_from_opening_fence(
    lines: &[&str],
    cursor_line: usize,
    runtime: Runtime,
) -> SelectionResult {
    let mut kept = Vec::new();
    for line in lines.iter().skip(cursor_line + 1) {
        if is_bare_fence(line) {
            break;
        }
        if let Some(keep) = filter_line(line) {
            kept.push(keep);
        }
    }
    SelectionResult {
        text: join_kept(&kept),
        runtime: Some(runtime),
    }
}

/// Mode 2: cursor sits on a fence line without a recognized tag (usually
/// the closing delimiter); walk upward to the opening marker.
///
/// Accumulation happens bottom-up, so the kept lines are reversed once the
/// marker is found. A cursor in the first two lines cannot close a valid
/// block and yields an empty result. When no marker exists above, the
/// runtime stays unknown and the fragment is returned as accumulated.
fn extract_from_closing_fence(lines: &[&str], cursor_line: usize) -> SelectionResult {
    if cursor_line < 2 {
        return SelectionResult {
            text: String::new(),
            runtime: None,
        };
    }

    let mut kept = Vec::new();
    for index in (0..cursor_line).rev() {
        if let Some(runtime) = detect_runtime(lines[index]) {
            kept.reverse();
            return SelectionResult {
                text: join_kept(&kept),
                runtime: Some(runtime),
            };
        }
        if let Some(keep) = filter_line(lines[index]) {
            kept.push(keep);
        }
    }

    SelectionResult {
        text: join_kept(&kept),
        runtime: None,
    }
}

/// Mode 3: plain cursor line. The line itself is the fragment (trimmed,
/// comment filtering does not apply to an explicit single-line pick); the
/// runtime comes from the nearest opening marker at or above the cursor.
fn extract_single_line(lines: &[&str], cursor_line: usize) -> SelectionResult {
    let runtime = (0..=cursor_line)
        .rev()
        .find_map(|index| detect_runtime(lines[index]));
    SelectionResult {
        text: lines[cursor_line].trim().to_string(),
        runtime,
    }
}

/// Mode 4: explicit character range. Boundary lines are cut at the
/// selection's character offsets, interior lines are taken whole; every
/// piece goes through the blank/comment filter. No runtime is ever
/// inferred from a hand-made selection.
fn extract_from_range(lines: &[&str], selection: Selection) -> SelectionResult {
    let mut text = String::new();

    if selection.start.line < lines.len() {
        let last_line = selection.end.line.min(lines.len() - 1);
        for index in selection.start.line..=last_line {
            let line = lines[index];
            let kept = if selection.start.line == selection.end.line {
                filter_span(line, selection.start.character, selection.end.character)
            } else if index == selection.start.line {
                filter_span(line, selection.start.character, line.chars().count())
            } else if index == selection.end.line {
                filter_span(line, 0, selection.end.character)
            } else {
                filter_line(line).map(str::to_string)
            };
            if let Some(keep) = kept {
                text.push_str(&keep);
                text.push('\n');
            }
        }
    }

    SelectionResult {
        text,
        runtime: None,
    }
}

/// Strip exactly one trailing newline, if present.
pub fn remove_trailing_newline(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}

/// Extract the fragment and runtime selected by `selection` over the
/// document `lines`.
///
/// An empty [`SelectionResult`] signals "nothing to execute"; callers are
/// expected to tell the user rather than dispatch an empty command.
pub fn extract_selection(lines: &[&str], selection: Selection) -> SelectionResult {
    let mut result = if selection.is_empty() {
        let cursor_line = selection.start.line;
        if cursor_line >= lines.len() {
            SelectionResult {
                text: String::new(),
                runtime: None,
            }
        } else if let Some(runtime) = detect_runtime(lines[cursor_line]) {
            extract_from_opening_fence(lines, cursor_line, runtime)
        } else if is_fence_line(lines[cursor_line]) {
            extract_from_closing_fence(lines, cursor_line)
        } else {
            extract_single_line(lines, cursor_line)
        }
    } else {
        extract_from_range(lines, selection)
    };

    result.text = remove_trailing_newline(&result.text).to_string();
    result
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
