//! Runtime catalog: the closed set of script kinds this crate can execute
//! and the fence-marker detection that maps markdown code blocks onto them.

use serde::{Deserialize, Serialize};

/// Opening delimiter of a fenced code block.
pub const FENCE: &str = "```";

/// Fence tags recognized as executable, in display order.
///
/// Several tags can map onto the same runtime (`sh` and `bash`, `ts` and
/// `typescript`). Tags are matched exactly and case-sensitively; anything
/// else (`json`, `yaml`, a bare fence) is simply not executable.
pub const RUNTIME_TAGS: &[(&str, Runtime)] = &[
    ("sh", Runtime::Shell),
    ("bash", Runtime::Shell),
    ("js", Runtime::NodeJs),
    ("python", Runtime::Python),
    ("ts", Runtime::TypeScript),
    ("typescript", Runtime::TypeScript),
];

/// Execution environment for a code fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Runtime {
    /// Sent to the terminal verbatim (`sh`, `bash` fences).
    Shell,
    /// Wrapped as `node -e "..."` (`js` fences).
    NodeJs,
    /// Wrapped as `python -c "..."` / `python3 -c "..."` (`python` fences).
    Python,
    /// Wrapped as `tsx -e "..."` or `ts-node ... -e "..."` (`ts`, `typescript` fences).
    TypeScript,
}

/// Every runtime, in picker order.
pub const ALL_RUNTIMES: &[Runtime] = &[
    Runtime::Shell,
    Runtime::NodeJs,
    Runtime::Python,
    Runtime::TypeScript,
];

impl Runtime {
    /// Display label, also used in annotation titles ("Shell-Script" etc.).
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Shell => "Shell",
            Runtime::NodeJs => "NodeJs",
            Runtime::Python => "Python",
            Runtime::TypeScript => "TypeScript",
        }
    }

    /// Resolve a bare fence tag (the part after the backticks).
    pub fn from_tag(tag: &str) -> Option<Runtime> {
        RUNTIME_TAGS
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, runtime)| *runtime)
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the runtime an opening fence marker selects.
///
/// Total function over any line of text: trims the line, requires the
/// ```` ``` ```` prefix, and matches the remaining tag exactly against
/// [`RUNTIME_TAGS`]. Empty input, a bare ```` ``` ````, and unrecognized
/// tags all return `None`.
pub fn detect_runtime(line: &str) -> Option<Runtime> {
    line.trim().strip_prefix(FENCE).and_then(Runtime::from_tag)
}

/// True for a bare closing/opening fence delimiter (```` ``` ```` with no tag).
pub fn is_bare_fence(line: &str) -> bool {
    line.trim() == FENCE
}

/// True for any line that starts a fence, recognized tag or not.
pub fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}
