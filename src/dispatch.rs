//! Turning a (runtime, fragment) pair into the final command line and
//! handing it to a terminal session.
//!
//! Shell fragments go out verbatim. Everything else is wrapped in its
//! interpreter's inline-eval form with the fragment escaped once; for
//! Python and TypeScript the interpreter binary is probed first and a
//! miss aborts the dispatch with a notification instead of touching any
//! session.

use tracing::debug;

use crate::escape::escape_for_shell;
use crate::host::{HostEnv, UserInterface};
use crate::probe::{detect_executable, ExecutableProber};
use crate::runtime::Runtime;
use crate::session::SessionManager;

/// Interpreter candidates for [`Runtime::Python`], probed in order.
pub const PYTHON_CANDIDATES: &[&str] = &["python", "python3"];

/// Interpreter candidates for [`Runtime::TypeScript`], probed in order.
pub const TYPESCRIPT_CANDIDATES: &[&str] = &["tsx", "ts-node"];

/// ts-node needs these flags to run an inline script without a project
/// tsconfig getting in the way.
const TS_NODE_FLAGS: &str =
    "--transpile-only --compiler-options '{\"module\":\"commonjs\",\"moduleResolution\":\"node\"}'";

/// Build the command line for `fragment` under `runtime`.
///
/// Returns `None` when no interpreter could be found; the miss has
/// already been reported through `ui` and nothing must be dispatched.
pub fn build_command(
    runtime: Runtime,
    fragment: &str,
    prober: &dyn ExecutableProber,
    ui: &dyn UserInterface,
) -> Option<String> {
    match runtime {
        Runtime::Shell => Some(fragment.to_string()),
        Runtime::NodeJs => Some(format!("node -e \"{}\"", escape_for_shell(fragment))),
        Runtime::Python => match detect_executable(prober, PYTHON_CANDIDATES) {
            Some(python) => Some(format!("{} -c \"{}\"", python, escape_for_shell(fragment))),
            None => {
                ui.notify("Unable to find python or python3. Is it installed?");
                None
            }
        },
        Runtime::TypeScript => match detect_executable(prober, TYPESCRIPT_CANDIDATES) {
            Some("tsx") => Some(format!("tsx -e \"{}\"", escape_for_shell(fragment))),
            Some(_) => Some(format!(
                "ts-node {} -e \"{}\"",
                TS_NODE_FLAGS,
                escape_for_shell(fragment)
            )),
            None => {
                ui.notify("Unable to find tsx or ts-node. Is it installed?");
                None
            }
        },
    }
}

/// Entry point for executing an extracted fragment.
///
/// Owns the [`SessionManager`] so session affinity survives across
/// invocations. Hosts deliver terminal lifecycle events through
/// [`sessions_mut`](Dispatcher::sessions_mut).
#[derive(Debug, Default)]
pub struct Dispatcher {
    sessions: SessionManager,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// Execute `fragment` under `runtime` in a terminal session.
    ///
    /// Fire and forget: probe misses and declined work are reported
    /// through the host's notification surface, never returned.
    pub fn execute_at(&mut self, runtime: Runtime, fragment: &str, env: &mut HostEnv<'_>) {
        debug!(%runtime, len = fragment.len(), "execute requested");
        let Some(command) = build_command(runtime, fragment, env.prober, env.ui) else {
            return;
        };
        let id = self.sessions.get_or_create(env.terminals);
        self.sessions.dispatch(env.terminals, env.ui, id, &command);
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
