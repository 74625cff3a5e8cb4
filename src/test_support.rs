//! In-memory collaborator fakes shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::config::Confirmation;
use crate::host::UserInterface;
use crate::probe::{ExecutableProber, ProbeError};
use crate::runtime::Runtime;
use crate::session::{SessionId, TerminalHost};

/// Terminal host fake: a vector of sessions and a log of every call.
#[derive(Default)]
pub struct FakeHost {
    next_id: u64,
    pub sessions: Vec<SessionId>,
    pub exited: HashSet<SessionId>,
    pub active: Option<SessionId>,
    pub shell_paths: HashMap<SessionId, String>,
    pub sent: Vec<(SessionId, String, bool)>,
    pub shown: Vec<SessionId>,
    pub registrations: usize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self) -> SessionId {
        self.create_session()
    }

    pub fn set_active(&mut self, id: Option<SessionId>) {
        self.active = id;
    }

    pub fn mark_exited(&mut self, id: SessionId) {
        self.exited.insert(id);
    }

    pub fn set_shell_path(&mut self, id: SessionId, path: &str) {
        self.shell_paths.insert(id, path.to_string());
    }
}

impl TerminalHost for FakeHost {
    fn create_session(&mut self) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.push(id);
        id
    }

    fn active_session(&self) -> Option<SessionId> {
        self.active
    }

    fn sessions(&self) -> Vec<SessionId> {
        self.sessions.clone()
    }

    fn has_exited(&self, id: SessionId) -> bool {
        self.exited.contains(&id)
    }

    fn shell_path(&self, id: SessionId) -> Option<String> {
        self.shell_paths.get(&id).cloned()
    }

    fn show(&mut self, id: SessionId) {
        self.shown.push(id);
    }

    fn send_text(&mut self, id: SessionId, text: &str, execute: bool) {
        self.sent.push((id, text.to_string(), execute));
    }

    fn register_event_handlers(&mut self) {
        self.registrations += 1;
    }
}

/// User interface fake with scripted confirm/pick responses.
pub struct RecordingUi {
    notes: RefCell<Vec<String>>,
    confirm_response: Cell<bool>,
    confirm_calls: RefCell<Vec<Confirmation>>,
    pick_response: Cell<Option<Runtime>>,
    pick_calls: Cell<usize>,
}

impl RecordingUi {
    /// Confirms everything, picks nothing.
    pub fn new() -> Self {
        Self {
            notes: RefCell::new(Vec::new()),
            confirm_response: Cell::new(true),
            confirm_calls: RefCell::new(Vec::new()),
            pick_response: Cell::new(None),
            pick_calls: Cell::new(0),
        }
    }

    pub fn declining() -> Self {
        let ui = Self::new();
        ui.confirm_response.set(false);
        ui
    }

    pub fn picking(runtime: Runtime) -> Self {
        let ui = Self::new();
        ui.pick_response.set(Some(runtime));
        ui
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notes.borrow().clone()
    }

    pub fn confirm_calls(&self) -> Vec<Confirmation> {
        self.confirm_calls.borrow().clone()
    }

    pub fn pick_calls(&self) -> usize {
        self.pick_calls.get()
    }
}

impl UserInterface for RecordingUi {
    fn notify(&self, message: &str) {
        self.notes.borrow_mut().push(message.to_string());
    }

    fn confirm_execution(&self, mode: Confirmation) -> bool {
        self.confirm_calls.borrow_mut().push(mode);
        self.confirm_response.get()
    }

    fn pick_runtime(&self) -> Option<Runtime> {
        self.pick_calls.set(self.pick_calls.get() + 1);
        self.pick_response.get()
    }
}

/// Prober fake backed by a fixed set of available executable names.
pub struct StaticProber {
    available: HashSet<&'static str>,
}

impl StaticProber {
    pub fn with(names: &[&'static str]) -> Self {
        Self {
            available: names.iter().copied().collect(),
        }
    }

    pub fn none() -> Self {
        Self::with(&[])
    }
}

impl ExecutableProber for StaticProber {
    fn probe(&self, name: &str) -> Result<(), ProbeError> {
        if self.available.contains(name) {
            Ok(())
        } else {
            Err(ProbeError::NotFound)
        }
    }
}
