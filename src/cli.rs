//! Command line front end: argument surface plus the real collaborators
//! (shell-backed terminal sessions and stderr prompts) that the library's
//! traits abstract over.
//!
//! Data output (`list`, `--dry-run`) goes to stdout; notifications and
//! prompts go to stderr.

use std::io::{BufRead, Write};
use std::process::{Child, Command, Stdio};

use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::actions::{execute_command, execute_selection, EditorState, ExecuteArgs};
use crate::blocks::scan_blocks;
use crate::config::{load_config, Confirmation};
use crate::dispatch::{build_command, Dispatcher, PYTHON_CANDIDATES, TYPESCRIPT_CANDIDATES};
use crate::error::{MdexecError, Result, ResultExt};
use crate::extract::{extract_selection, Selection};
use crate::host::{HostEnv, UserInterface};
use crate::probe::{detect_executable, ExecutableProber, SystemProber};
use crate::runtime::{Runtime, ALL_RUNTIMES};
use crate::session::{SessionId, TerminalHost};

#[derive(Parser)]
#[command(
    name = "mdexec",
    about = "Execute fenced code blocks from markdown documents in your shell.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List the executable code blocks in a markdown document.")]
    List {
        #[arg(help = "Markdown document to scan.")]
        file: String,
    },

    #[command(about = "Execute the code block or line at a cursor position.")]
    Run {
        #[arg(help = "Markdown document to execute from.")]
        file: String,

        #[arg(long, help = "Cursor line, 1-based, as printed by `mdexec list`.")]
        line: usize,

        #[arg(
            long,
            value_parser = parse_runtime,
            help = "Runtime override: sh, bash, js, node, python, ts or typescript."
        )]
        runtime: Option<Runtime>,

        #[arg(long, help = "Print the command that would run instead of running it.")]
        dry_run: bool,

        #[arg(short, long, help = "Skip the confirmation prompt.")]
        yes: bool,
    },

    #[command(about = "Report which interpreters are available on this machine.")]
    Doctor,
}

/// Flag values for `--runtime`. Fence tags are accepted as-is, plus the
/// obvious spellings a shell user would try first.
fn parse_runtime(value: &str) -> std::result::Result<Runtime, String> {
    let lowered = value.to_ascii_lowercase();
    if let Some(runtime) = Runtime::from_tag(&lowered) {
        return Ok(runtime);
    }
    match lowered.as_str() {
        "shell" => Ok(Runtime::Shell),
        "node" | "nodejs" => Ok(Runtime::NodeJs),
        _ => Err(format!(
            "unknown runtime '{value}' (expected sh, bash, js, node, python, ts or typescript)"
        )),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { file } => cmd_list(&file),
        Commands::Run {
            file,
            line,
            runtime,
            dry_run,
            yes,
        } => cmd_run(&file, line, runtime, dry_run, yes),
        Commands::Doctor => {
            cmd_doctor();
            Ok(())
        }
    }
}

fn cmd_list(file: &str) -> Result<()> {
    let text = read_document(file)?;
    let lines: Vec<&str> = text.lines().collect();
    let blocks = scan_blocks(&lines);
    if blocks.is_empty() {
        eprintln!("No executable code blocks found.");
        return Ok(());
    }
    for block in &blocks {
        let first_line = block.text.lines().next().unwrap_or("");
        println!(
            "{:>4}  {:<11} {}",
            block.start_line + 1,
            block.runtime.as_str(),
            first_line
        );
    }
    Ok(())
}

fn cmd_run(
    file: &str,
    line: usize,
    runtime: Option<Runtime>,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    let text = read_document(file)?;
    let line_count = text.lines().count();
    if line == 0 || line > line_count {
        return Err(MdexecError::LineOutOfRange { line, line_count });
    }
    let selection = Selection::cursor(line - 1, 0);

    let mut config = load_config();
    if yes {
        config.confirmation = Confirmation::None;
    }

    let prober = SystemProber;
    let ui = TerminalUi;

    if dry_run {
        let lines: Vec<&str> = text.lines().collect();
        let extracted = extract_selection(&lines, selection);
        if extracted.is_empty() {
            ui.notify("Nothing selected");
            return Ok(());
        }
        let Some(runtime) = runtime.or(extracted.runtime).or_else(|| ui.pick_runtime()) else {
            return Ok(());
        };
        if let Some(command) = build_command(runtime, &extracted.text, &prober, &ui) {
            println!("{command}");
        }
        return Ok(());
    }

    let mut host = PipedShellHost::new();
    let mut dispatcher = Dispatcher::new();
    let mut env = HostEnv {
        terminals: &mut host,
        prober: &prober,
        ui: &ui,
    };
    match runtime {
        Some(runtime) => {
            let lines: Vec<&str> = text.lines().collect();
            let extracted = extract_selection(&lines, selection);
            if extracted.is_empty() {
                env.ui.notify("Nothing selected");
                return Ok(());
            }
            let args = ExecuteArgs {
                runtime: Some(runtime),
                command: Some(extracted.text),
            };
            execute_command(&mut dispatcher, args, &config, &mut env);
        }
        None => {
            let editor = EditorState::new(text, selection);
            execute_selection(&mut dispatcher, Some(&editor), &config, &mut env);
        }
    }
    Ok(())
}

fn cmd_doctor() {
    let prober = SystemProber;
    println!("{:<12} {}", "shell", resolve_shell());
    report(&prober, "node", &["node"]);
    report(&prober, "python", PYTHON_CANDIDATES);
    report(&prober, "typescript", TYPESCRIPT_CANDIDATES);
    println!("{:<12} {}", "log file", crate::logging::log_path().display());
}

fn report(prober: &dyn ExecutableProber, label: &str, candidates: &[&str]) {
    match detect_executable(prober, candidates) {
        Some(found) => println!("{label:<12} {found}"),
        None => println!("{label:<12} not found (tried {})", candidates.join(", ")),
    }
}

fn read_document(file: &str) -> Result<String> {
    let path = shellexpand::tilde(file);
    std::fs::read_to_string(path.as_ref()).map_err(|source| MdexecError::DocumentRead {
        path: path.into_owned(),
        source,
    })
}

/// Prompt surface for a plain terminal.
pub struct TerminalUi;

impl UserInterface for TerminalUi {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm_execution(&self, _mode: Confirmation) -> bool {
        // Picker, message and modal confirmation all collapse to the same
        // question on a terminal.
        eprint!("Execute this code block in the terminal? [y/N] ");
        match prompt_line() {
            Some(answer) => matches!(answer.trim(), "y" | "Y" | "yes"),
            None => false,
        }
    }

    fn pick_runtime(&self) -> Option<Runtime> {
        for (index, runtime) in ALL_RUNTIMES.iter().enumerate() {
            eprintln!("  {}) {runtime}", index + 1);
        }
        eprint!("Runtime to use [1-{}]: ", ALL_RUNTIMES.len());
        let answer = prompt_line()?;
        let choice: usize = answer.trim().parse().ok()?;
        ALL_RUNTIMES.get(choice.checked_sub(1)?).copied()
    }
}

/// One answer line from stdin, with the pending prompt flushed first.
/// `None` on EOF or a read failure; callers treat both as a dismissal.
fn prompt_line() -> Option<String> {
    std::io::stderr().flush().ok();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(err) => {
            warn!(error = %err, "failed to read prompt answer");
            None
        }
    }
}

/// Terminal sessions backed by shell child processes with piped stdin.
///
/// Each session is one spawned shell. Sent text is written to the shell's
/// stdin, so a session accumulates state (cwd, variables) across sends the
/// way a terminal pane does. Sessions live until the host is dropped; drop
/// closes every stdin and waits for the shells to finish what they were
/// sent.
pub struct PipedShellHost {
    shell: String,
    next_id: u64,
    active: Option<SessionId>,
    sessions: Mutex<Vec<ShellSession>>,
}

struct ShellSession {
    id: SessionId,
    // None when the spawn failed; the session then reports itself exited.
    child: Option<Child>,
}

impl PipedShellHost {
    pub fn new() -> Self {
        Self::with_shell(resolve_shell())
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        PipedShellHost {
            shell: shell.into(),
            next_id: 1,
            active: None,
            sessions: Mutex::new(Vec::new()),
        }
    }
}

impl Default for PipedShellHost {
    fn default() -> Self {
        Self::new()
    }
}

/// The shell new sessions run: `$SHELL` when set, otherwise `sh` from the
/// search path.
fn resolve_shell() -> String {
    if let Ok(shell) = std::env::var("SHELL") {
        if !shell.is_empty() {
            return shell;
        }
    }
    match which::which("sh") {
        Ok(path) => path.display().to_string(),
        Err(err) => {
            warn!(error = %err, "no sh on the search path");
            "sh".to_string()
        }
    }
}

impl TerminalHost for PipedShellHost {
    fn create_session(&mut self) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        let child = Command::new(&self.shell)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|err| MdexecError::ProcessSpawn(format!("{}: {err}", self.shell)))
            .log_err();
        if let Some(child) = &child {
            info!(session = %id, shell = %self.shell, pid = child.id(), "shell session started");
        }
        self.sessions.lock().push(ShellSession { id, child });
        self.active = Some(id);
        id
    }

    fn active_session(&self) -> Option<SessionId> {
        self.active
    }

    fn sessions(&self) -> Vec<SessionId> {
        self.sessions.lock().iter().map(|s| s.id).collect()
    }

    fn has_exited(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
            return true;
        };
        match session.child.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(_)) => true,
                Ok(None) => false,
                Err(err) => {
                    warn!(session = %id, error = %err, "could not poll shell status");
                    true
                }
            },
            None => true,
        }
    }

    fn shell_path(&self, id: SessionId) -> Option<String> {
        self.sessions
            .lock()
            .iter()
            .find(|s| s.id == id)
            .map(|_| self.shell.clone())
    }

    // Piped shells share the parent's stdout; there is no window to raise.
    fn show(&mut self, _id: SessionId) {}

    fn send_text(&mut self, id: SessionId, text: &str, execute: bool) {
        let mut sessions = self.sessions.lock();
        let Some(stdin) = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| s.child.as_mut())
            .and_then(|child| child.stdin.as_mut())
        else {
            warn!(session = %id, "text sent to a session with no live shell");
            return;
        };
        let newline = if execute { "\n" } else { "" };
        write!(stdin, "{text}{newline}")
            .and_then(|()| stdin.flush())
            .log_err();
    }
}

impl Drop for PipedShellHost {
    fn drop(&mut self) {
        for session in self.sessions.lock().iter_mut() {
            if let Some(mut child) = session.child.take() {
                drop(child.stdin.take());
                child.wait().warn_on_err();
            }
        }
    }
}
