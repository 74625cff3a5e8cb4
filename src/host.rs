//! Traits the hosting editor implements for the core, and the bundle that
//! hands all of them to one invocation.
//!
//! The core never talks to an editor API directly. Terminal access goes
//! through [`TerminalHost`](crate::session::TerminalHost), interpreter
//! discovery through [`ExecutableProber`](crate::probe::ExecutableProber),
//! and user-facing prompts through [`UserInterface`]. Hosts own the real
//! resources; the core only borrows them for the duration of a call.

use crate::config::Confirmation;
use crate::probe::ExecutableProber;
use crate::runtime::Runtime;
use crate::session::TerminalHost;

/// Prompt and notification surface of the hosting editor.
pub trait UserInterface {
    /// Show a transient informational message.
    fn notify(&self, message: &str);

    /// Ask the user to confirm an execution. `mode` selects the prompt
    /// style and is never [`Confirmation::None`]; callers short-circuit
    /// that case. Returns true when the user chose to execute.
    fn confirm_execution(&self, mode: Confirmation) -> bool;

    /// Ask the user to choose a runtime when none could be inferred.
    /// `None` means the picker was dismissed.
    fn pick_runtime(&self) -> Option<Runtime>;
}

/// Collaborator handles for a single invocation of the core.
pub struct HostEnv<'a> {
    pub terminals: &'a mut dyn TerminalHost,
    pub prober: &'a dyn ExecutableProber,
    pub ui: &'a dyn UserInterface,
}
