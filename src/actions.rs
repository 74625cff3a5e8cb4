//! The two user-invocable entry points a host wires to its command
//! system: executing an annotated block and executing the current editor
//! selection. Both end in [`Dispatcher::execute_at`] after argument
//! checks, runtime resolution and the confirmation gate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, Confirmation};
use crate::dispatch::Dispatcher;
use crate::extract::{extract_selection, Selection};
use crate::host::HostEnv;
use crate::runtime::Runtime;

/// Payload of a block annotation's execute command. Hosts deserialize
/// this straight from the annotation arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteArgs {
    pub runtime: Option<Runtime>,
    pub command: Option<String>,
}

/// Snapshot of the active editor at invocation time.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub text: String,
    pub selection: Selection,
}

impl EditorState {
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        EditorState {
            text: text.into(),
            selection,
        }
    }

    fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

/// Execute an annotated block. Missing pieces are reported to the user;
/// nothing is dispatched unless both runtime and command are present and
/// the confirmation gate passes.
pub fn execute_command(
    dispatcher: &mut Dispatcher,
    args: ExecuteArgs,
    config: &Config,
    env: &mut HostEnv<'_>,
) {
    let Some(runtime) = args.runtime else {
        env.ui.notify("No runtime selected.");
        return;
    };
    let command = match args.command {
        Some(command) if !command.is_empty() => command,
        _ => {
            env.ui.notify("Empty command, nothing to execute.");
            return;
        }
    };
    if !confirm(config, env) {
        return;
    }
    dispatcher.execute_at(runtime, &command, env);
}

/// Execute whatever the editor's cursor or selection designates.
///
/// Extraction decides the fragment and, where possible, the runtime;
/// when it can't, the user picks one, and dismissing the picker aborts
/// without noise. An empty fragment is reported as "Nothing selected".
pub fn execute_selection(
    dispatcher: &mut Dispatcher,
    editor: Option<&EditorState>,
    config: &Config,
    env: &mut HostEnv<'_>,
) {
    let Some(editor) = editor else {
        env.ui.notify("Could not detect an active editor.");
        return;
    };

    let lines = editor.lines();
    let result = extract_selection(&lines, editor.selection);
    debug!(
        len = result.text.len(),
        runtime = ?result.runtime,
        "selection extracted"
    );

    if result.is_empty() {
        env.ui.notify("Nothing selected");
        return;
    }

    let runtime = match result.runtime {
        Some(runtime) => runtime,
        None => match env.ui.pick_runtime() {
            Some(runtime) => runtime,
            None => return,
        },
    };

    if !confirm(config, env) {
        return;
    }
    dispatcher.execute_at(runtime, &result.text, env);
}

/// Confirmation gate. [`Confirmation::None`] passes straight through; a
/// decline in any other mode notifies and blocks the dispatch.
fn confirm(config: &Config, env: &HostEnv<'_>) -> bool {
    if config.confirmation == Confirmation::None {
        return true;
    }
    if env.ui.confirm_execution(config.confirmation) {
        true
    } else {
        env.ui.notify("Execution cancelled.");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Position;
    use crate::test_support::{FakeHost, RecordingUi, StaticProber};

    fn args(runtime: Option<Runtime>, command: Option<&str>) -> ExecuteArgs {
        ExecuteArgs {
            runtime,
            command: command.map(str::to_string),
        }
    }

    fn editor(text: &str, selection: Selection) -> EditorState {
        EditorState::new(text, selection)
    }

    #[test]
    fn missing_runtime_is_reported() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::new();
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        execute_command(
            &mut dispatcher,
            args(None, Some("echo hi")),
            &Config::default(),
            &mut env,
        );

        assert_eq!(ui.notifications(), vec!["No runtime selected."]);
        assert!(host.sent.is_empty());
    }

    #[test]
    fn missing_or_empty_command_is_reported() {
        for command in [None, Some("")] {
            let mut dispatcher = Dispatcher::new();
            let mut host = FakeHost::new();
            let prober = StaticProber::none();
            let ui = RecordingUi::new();
            let mut env = HostEnv {
                terminals: &mut host,
                prober: &prober,
                ui: &ui,
            };

            execute_command(
                &mut dispatcher,
                args(Some(Runtime::Shell), command),
                &Config::default(),
                &mut env,
            );

            assert_eq!(
                ui.notifications(),
                vec!["Empty command, nothing to execute."]
            );
            assert!(host.sent.is_empty());
        }
    }

    #[test]
    fn well_formed_args_are_dispatched() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::new();
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        execute_command(
            &mut dispatcher,
            args(Some(Runtime::Shell), Some("echo hi")),
            &Config::default(),
            &mut env,
        );

        assert_eq!(host.sent.len(), 1);
        assert_eq!(host.sent[0].1, "echo hi");
    }

    #[test]
    fn declined_confirmation_blocks_the_dispatch() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::declining();
        let config = Config {
            confirmation: Confirmation::Modal,
            ..Config::default()
        };
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        execute_command(
            &mut dispatcher,
            args(Some(Runtime::Shell), Some("echo hi")),
            &config,
            &mut env,
        );

        assert_eq!(ui.confirm_calls(), vec![Confirmation::Modal]);
        assert_eq!(ui.notifications(), vec!["Execution cancelled."]);
        assert!(host.sent.is_empty());
    }

    #[test]
    fn accepted_confirmation_dispatches() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::new();
        let config = Config {
            confirmation: Confirmation::Pick,
            ..Config::default()
        };
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        execute_command(
            &mut dispatcher,
            args(Some(Runtime::Shell), Some("echo hi")),
            &config,
            &mut env,
        );

        assert_eq!(ui.confirm_calls(), vec![Confirmation::Pick]);
        assert_eq!(host.sent.len(), 1);
    }

    #[test]
    fn missing_editor_is_reported() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::new();
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        execute_selection(&mut dispatcher, None, &Config::default(), &mut env);

        assert_eq!(ui.notifications(), vec!["Could not detect an active editor."]);
        assert!(host.sent.is_empty());
    }

    #[test]
    fn empty_extraction_is_reported() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::new();
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        let editor = editor("```sh\n```\nplain", Selection::cursor(0, 0));
        execute_selection(&mut dispatcher, Some(&editor), &Config::default(), &mut env);

        assert_eq!(ui.notifications(), vec!["Nothing selected"]);
        assert!(host.sent.is_empty());
    }

    #[test]
    fn extraction_with_a_runtime_skips_the_picker() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::new();
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        let editor = editor("```sh\necho hi\n```", Selection::cursor(0, 0));
        execute_selection(&mut dispatcher, Some(&editor), &Config::default(), &mut env);

        assert_eq!(ui.pick_calls(), 0);
        assert_eq!(host.sent[0].1, "echo hi");
    }

    #[test]
    fn unknown_runtime_falls_back_to_the_picker() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::picking(Runtime::Shell);
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        let selection = Selection::new(Position::new(0, 0), Position::new(0, 7));
        let editor = editor("echo hi", selection);
        execute_selection(&mut dispatcher, Some(&editor), &Config::default(), &mut env);

        assert_eq!(ui.pick_calls(), 1);
        assert_eq!(host.sent[0].1, "echo hi");
    }

    #[test]
    fn dismissed_picker_aborts_silently() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::new();
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        let selection = Selection::new(Position::new(0, 0), Position::new(0, 7));
        let editor = editor("echo hi", selection);
        execute_selection(&mut dispatcher, Some(&editor), &Config::default(), &mut env);

        assert_eq!(ui.pick_calls(), 1);
        assert!(ui.notifications().is_empty());
        assert!(host.sent.is_empty());
    }

    #[test]
    fn selection_path_honours_the_confirmation_gate() {
        let mut dispatcher = Dispatcher::new();
        let mut host = FakeHost::new();
        let prober = StaticProber::none();
        let ui = RecordingUi::declining();
        let config = Config {
            confirmation: Confirmation::Message,
            ..Config::default()
        };
        let mut env = HostEnv {
            terminals: &mut host,
            prober: &prober,
            ui: &ui,
        };

        let editor = editor("```sh\necho hi\n```", Selection::cursor(0, 0));
        execute_selection(&mut dispatcher, Some(&editor), &config, &mut env);

        assert_eq!(ui.confirm_calls(), vec![Confirmation::Message]);
        assert_eq!(ui.notifications(), vec!["Execution cancelled."]);
        assert!(host.sent.is_empty());
    }

    #[test]
    fn execute_args_deserialize_from_annotation_payloads() {
        let args: ExecuteArgs =
            serde_json::from_str(r#"{ "runtime": "NodeJs", "command": "console.log(1)" }"#)
                .unwrap();
        assert_eq!(args.runtime, Some(Runtime::NodeJs));
        assert_eq!(args.command.as_deref(), Some("console.log(1)"));
    }
}
