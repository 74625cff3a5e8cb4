use thiserror::Error;
use tracing::{error, warn};

/// Domain-specific errors for mdexec.
///
/// The core entry points never raise: extraction, dispatch and session
/// selection end in a notification or a logged no-op. These variants
/// cover the fallible edges around the core, i.e. driving it from a file
/// on disk and owning real shell processes.
#[derive(Error, Debug)]
pub enum MdexecError {
    #[error("Failed to read document '{path}': {source}")]
    DocumentRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line} is outside the document ({line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },

    #[error("Process spawn failed: {0}")]
    ProcessSpawn(String),
}

pub type Result<T> = std::result::Result<T, MdexecError>;

/// Extension trait for silent error logging with caller location
/// tracking. Use when the operation is recoverable and the user doesn't
/// need to know.
///
/// # Examples
///
/// ```ignore
/// use mdexec::error::ResultExt;
///
/// // Log and continue when the write fails; the session is fire-and-forget.
/// stdin.write_all(line.as_bytes()).log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
