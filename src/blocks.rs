//! Whole-document block scanning. Enumerates every executable fenced block
//! so a host can put an annotation (code lens, gutter button, list entry)
//! on each one; the [`crate::extract`] module is the cursor-driven
//! counterpart used at execution time.

use crate::runtime::{detect_runtime, is_bare_fence, Runtime};

/// One executable fenced block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBlock {
    pub runtime: Runtime,
    /// Block body with comment lines removed and no trailing newline.
    pub text: String,
    /// Zero-based index of the opening fence line.
    pub start_line: usize,
}

impl CommandBlock {
    /// Label for the host-side annotation on this block.
    pub fn annotation_title(&self) -> String {
        format!("Execute {}-Script block in terminal", self.runtime.as_str())
    }
}

/// Scan `lines` and collect every terminated, runtime-tagged fenced block.
///
/// Body lines keep their indentation; lines whose trimmed form starts with
/// `//` are dropped. A block is closed by a line that trims to the bare
/// fence delimiter; a block still open at the end of the document is
/// discarded. Fence markers inside an open block are not re-interpreted.
pub fn scan_blocks(lines: &[&str]) -> Vec<CommandBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(Runtime, usize, String)> = None;

    for (index, line) in lines.iter().enumerate() {
        match open.as_mut() {
            None => {
                if let Some(runtime) = detect_runtime(line) {
                    open = Some((runtime, index, String::new()));
                }
            }
            Some((runtime, start_line, text)) => {
                if is_bare_fence(line) {
                    if text.ends_with('\n') {
                        text.pop();
                    }
                    blocks.push(CommandBlock {
                        runtime: *runtime,
                        text: std::mem::take(text),
                        start_line: *start_line,
                    });
                    open = None;
                } else if !line.trim().starts_with("//") {
                    text.push_str(line);
                    text.push('\n');
                }
            }
        }
    }

    blocks
}
