//! Executable probing: decide which of several candidate interpreters is
//! actually present in the environment.
//!
//! Probing is the collaborator primitive of this module: the core never
//! inspects raw spawn errors, it only sees the classified [`ProbeError`]
//! produced by an [`ExecutableProber`] implementation. Absence of every
//! candidate is a normal outcome, not a failure — [`detect_executable`]
//! never panics and never returns an error.

use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, warn};

/// Classified outcome of probing one candidate that was not usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The candidate does not exist on the search path.
    #[error("command not found")]
    NotFound,
    /// The candidate exists but the probe did not complete cleanly
    /// (spawn failure other than not-found, or a non-success exit).
    /// Treated the same as [`ProbeError::NotFound`] when scanning
    /// candidates; the detail is kept for the logs.
    #[error("probe failed: {0}")]
    Failed(String),
}

/// A way to ask the environment whether a named executable is usable.
pub trait ExecutableProber {
    /// Probe a single candidate. `Ok(())` means the candidate can be
    /// invoked; the error classifies why it cannot.
    fn probe(&self, name: &str) -> Result<(), ProbeError>;
}

/// Real prober: spawns `<name> --version` with all stdio nulled and waits.
///
/// A clean exit marks the candidate usable. A non-success exit still means
/// "unavailable" — an interpreter that cannot even report its version is
/// not one we want to hand code to.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProber;

impl ExecutableProber for SystemProber {
    fn probe(&self, name: &str) -> Result<(), ProbeError> {
        let status = Command::new(name)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ProbeError::Failed(format!(
                "{} --version exited with {}",
                name, status
            ))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ProbeError::NotFound),
            Err(err) => Err(ProbeError::Failed(err.to_string())),
        }
    }
}

/// Return the first candidate, in order, that probes as usable.
///
/// The scan short-circuits on the first success; later candidates are not
/// probed. Not-found candidates are logged at debug level and skipped;
/// unexpected probe failures are logged with their detail and likewise
/// skipped. Exhausting the list yields `None`.
pub fn detect_executable<'a>(
    prober: &dyn ExecutableProber,
    candidates: &[&'a str],
) -> Option<&'a str> {
    for &name in candidates {
        match prober.probe(name) {
            Ok(()) => {
                debug!(executable = name, "probe succeeded");
                return Some(name);
            }
            Err(ProbeError::NotFound) => {
                debug!(executable = name, "probe: command not found");
            }
            Err(ProbeError::Failed(detail)) => {
                warn!(executable = name, detail = %detail, "probe: unexpected failure");
            }
        }
    }
    None
}
