//! Terminal session selection and text delivery.
//!
//! The host owns the actual terminals; this module owns the policy of
//! which one receives a command. [`SessionManager`] keeps a soft affinity
//! to the session that last executed something and falls back through the
//! host's active session, any live session, and finally a fresh one.
//! Sessions the host reports as exited are never selected.
//!
//! Delivery is fire and forget. The command text is handed to the host's
//! terminal input and nothing about the child process comes back.

use tracing::debug;

use crate::host::UserInterface;

/// Opaque handle to a host-owned terminal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal capabilities the hosting editor exposes to the core.
///
/// Identity is the host's business: the same `SessionId` must keep
/// referring to the same terminal for as long as that terminal exists.
pub trait TerminalHost {
    /// Open a new terminal session and return its handle.
    fn create_session(&mut self) -> SessionId;

    /// The session currently focused in the host, if any.
    fn active_session(&self) -> Option<SessionId>;

    /// All sessions currently known to the host, in host order.
    fn sessions(&self) -> Vec<SessionId>;

    /// True when the session's shell process has terminated.
    fn has_exited(&self, id: SessionId) -> bool;

    /// Path of the shell the session was created with, when the host
    /// knows it. Drives per-shell command re-encoding.
    fn shell_path(&self, id: SessionId) -> Option<String>;

    /// Bring the session to the foreground.
    fn show(&mut self, id: SessionId);

    /// Write `text` to the session's input; `execute` appends the
    /// host's run signal (the newline a user would type).
    fn send_text(&mut self, id: SessionId, text: &str, execute: bool);

    /// Start delivering session lifecycle events to the core, i.e. call
    /// [`SessionManager::session_closed`] and
    /// [`SessionManager::active_session_changed`] from now on. Invoked at
    /// most once per manager.
    fn register_event_handlers(&mut self) {}
}

/// Session affinity state plus the send path.
///
/// One instance per dispatcher. Holds session ids only, never sessions;
/// a stale id is harmless because every read goes back through the host.
#[derive(Debug, Default)]
pub struct SessionManager {
    last_used: Option<SessionId>,
    handlers_registered: bool,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session the next dispatch will prefer, if any.
    pub fn last_used(&self) -> Option<SessionId> {
        self.last_used
    }

    /// Pick the session to execute in: affinity, then the host's active
    /// session, then the first live session, then a new one. Exited
    /// sessions are skipped at every step.
    pub fn get_or_create(&mut self, host: &mut dyn TerminalHost) -> SessionId {
        if let Some(id) = self.last_used {
            if !host.has_exited(id) {
                debug!(session = %id, "reusing last-used session");
                return id;
            }
        }
        if let Some(id) = host.active_session() {
            if !host.has_exited(id) {
                debug!(session = %id, "using host's active session");
                return id;
            }
        }
        if let Some(id) = host.sessions().into_iter().find(|&id| !host.has_exited(id)) {
            debug!(session = %id, "using first live session");
            return id;
        }
        let id = host.create_session();
        debug!(session = %id, "created new session");
        id
    }

    /// Send `command` to session `id` and notify the user.
    ///
    /// Records affinity, performs the one-time host event registration,
    /// re-encodes for the session's shell, brings the session to the
    /// foreground and delivers the text with the run signal, multi-line
    /// commands one line at a time. Fire and forget: no result comes
    /// back, so there is nothing to return.
    pub fn dispatch(
        &mut self,
        host: &mut dyn TerminalHost,
        ui: &dyn UserInterface,
        id: SessionId,
        command: &str,
    ) {
        self.last_used = Some(id);
        if !self.handlers_registered {
            host.register_event_handlers();
            self.handlers_registered = true;
        }

        let adjusted = adjust_command_for_shell(command, host.shell_path(id).as_deref());
        host.show(id);
        if adjusted.contains('\n') {
            for line in adjusted.split('\n') {
                host.send_text(id, line, true);
            }
        } else {
            host.send_text(id, &adjusted, true);
        }

        debug!(session = %id, bytes = adjusted.len(), "command sent");
        ui.notify("Code block sent to terminal for execution!");
    }

    /// Host callback: a session closed. Clears affinity when it pointed
    /// at that session.
    pub fn session_closed(&mut self, id: SessionId) {
        if self.last_used == Some(id) {
            debug!(session = %id, "last-used session closed");
            self.last_used = None;
        }
    }

    /// Host callback: the focused session changed. Follows focus
    /// unconditionally, including to no session at all.
    pub fn active_session_changed(&mut self, id: Option<SessionId>) {
        self.last_used = id;
    }
}

/// Re-encode `command` for the shell behind `shell_path`.
///
/// Only interpreter-wrapped commands are touched, recognized by the
/// `node -e` and `python -c` markers, and only when the host knows the
/// session's shell. PowerShell rewrites the escape characters the POSIX
/// escaper produced; cmd.exe cannot take them (or embedded line breaks)
/// at all, so both are stripped. Every other shell gets the command
/// verbatim.
pub fn adjust_command_for_shell(command: &str, shell_path: Option<&str>) -> String {
    let node_wrapped = command.contains("node -e");
    let python_wrapped = command.contains("python -c");
    if !node_wrapped && !python_wrapped {
        return command.to_string();
    }
    let Some(path) = shell_path else {
        return command.to_string();
    };

    if path.contains("powershell") {
        let mut adjusted = command.to_string();
        if node_wrapped {
            adjusted = adjusted.replace('\\', "`");
        }
        if python_wrapped {
            adjusted = adjusted.replace("\\\"", "'");
        }
        return adjusted;
    }

    if path.contains("cmd") {
        return command.replace(['\\', '\r', '\n'], "");
    }

    command.to_string()
}
