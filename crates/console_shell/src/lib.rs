//! Runtime-agnostic browser-native console engine with a host-extensible command registry.
//!
//! The engine owns a flat command registry seeded with built-ins (`help`, `clear`, `echo`) and
//! hands out console sessions. A session owns the current input line, an unbounded history
//! buffer with a browse cursor, and the output log. One command executes at a time; overlapping
//! submissions queue in order and never interleave output.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
    rc::{Rc, Weak},
};

use futures::future::LocalBoxFuture;
use leptos::{
    create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet, SignalUpdate,
};
use playground_contract::{
    CommandDescriptor, ConsoleError, ConsoleErrorCode, ConsoleLine, ConsoleLineKind,
};

/// Command name reserved for the session-level log reset.
///
/// The session intercepts it before registry lookup; host commands cannot shadow it.
pub const CLEAR_COMMAND: &str = "clear";

/// Arguments handed to a command handler for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Resolved command name.
    pub name: String,
    /// Positional arguments after the command name.
    pub args: Vec<String>,
}

/// Async command handler.
///
/// `Ok(None)` produces no output line; `Ok(Some(text))` is appended to the log verbatim; an
/// error is surfaced as a prefixed error line and aborts only that one command.
pub type CommandHandler =
    Rc<dyn Fn(CommandInvocation) -> LocalBoxFuture<'static, Result<Option<String>, ConsoleError>>>;

/// One host-supplied command registration.
#[derive(Clone)]
pub struct HostCommand {
    /// Help metadata.
    pub descriptor: CommandDescriptor,
    /// Invocation handler.
    pub handler: CommandHandler,
}

#[derive(Clone)]
struct RegisteredCommand {
    descriptor: CommandDescriptor,
    handler: CommandHandler,
}

#[derive(Default)]
struct RegistryState {
    commands: BTreeMap<String, RegisteredCommand>,
}

/// Shared flat command registry.
///
/// Built-ins are always present. Installing host commands rebuilds the table with built-ins
/// first, so a host command shadows a same-named built-in for every name except
/// [`CLEAR_COMMAND`].
#[derive(Clone)]
pub struct CommandRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a registry seeded with the built-in commands.
    pub fn new() -> Self {
        let registry = Self {
            state: Rc::new(RefCell::new(RegistryState::default())),
        };
        registry.install_host_commands(Vec::new());
        registry
    }

    /// Rebuilds the registry from built-ins plus `host_commands`.
    ///
    /// A host command named [`CLEAR_COMMAND`] is dropped; every other host name wins over a
    /// built-in of the same name.
    pub fn install_host_commands(&self, host_commands: Vec<HostCommand>) {
        let mut commands = BTreeMap::new();
        for builtin in builtin_commands(Rc::downgrade(&self.state)) {
            commands.insert(builtin.descriptor.name.clone(), builtin);
        }
        for host in host_commands {
            if host.descriptor.name == CLEAR_COMMAND {
                continue;
            }
            commands.insert(
                host.descriptor.name.clone(),
                RegisteredCommand {
                    descriptor: host.descriptor,
                    handler: host.handler,
                },
            );
        }
        self.state.borrow_mut().commands = commands;
    }

    /// Returns the registered command descriptors sorted by name.
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.state
            .borrow()
            .commands
            .values()
            .map(|registered| registered.descriptor.clone())
            .collect()
    }

    fn resolve(&self, name: &str) -> Option<RegisteredCommand> {
        self.state.borrow().commands.get(name).cloned()
    }
}

fn builtin_commands(registry: Weak<RefCell<RegistryState>>) -> Vec<RegisteredCommand> {
    vec![
        RegisteredCommand {
            descriptor: CommandDescriptor::new(
                CLEAR_COMMAND,
                "Clear the console log.",
                CLEAR_COMMAND,
            ),
            // Unreachable through a session, which intercepts `clear` before lookup.
            handler: Rc::new(|_| Box::pin(async { Ok(None) })),
        },
        RegisteredCommand {
            descriptor: CommandDescriptor::new(
                "echo",
                "Print the given arguments.",
                "echo <args...>",
            ),
            handler: Rc::new(|invocation: CommandInvocation| {
                Box::pin(async move { Ok(Some(invocation.args.join(" "))) })
            }),
        },
        RegisteredCommand {
            descriptor: CommandDescriptor::new("help", "List available commands.", "help"),
            handler: Rc::new(move |_| {
                let registry = registry.clone();
                Box::pin(async move {
                    let Some(state) = registry.upgrade() else {
                        return Err(ConsoleError::new(
                            ConsoleErrorCode::Unavailable,
                            "command registry is gone",
                        ));
                    };
                    let mut lines = vec!["commands:".to_string()];
                    for registered in state.borrow().commands.values() {
                        lines.push(format!(
                            "  {:<10} {}",
                            registered.descriptor.usage, registered.descriptor.summary
                        ));
                    }
                    Ok(Some(lines.join("\n")))
                })
            }),
        },
    ]
}

#[derive(Clone)]
struct SessionState {
    input: RwSignal<String>,
    log: RwSignal<Vec<ConsoleLine>>,
    history: RwSignal<Vec<String>>,
    cursor: RwSignal<Option<usize>>,
    executing: Rc<Cell<bool>>,
    queue: Rc<RefCell<VecDeque<CommandInvocation>>>,
}

/// A console session with one foreground execution slot.
#[derive(Clone)]
pub struct ConsoleSessionHandle {
    state: SessionState,
    registry: CommandRegistry,
}

impl ConsoleSessionHandle {
    /// Reactive output log for this session.
    pub fn log(&self) -> ReadSignal<Vec<ConsoleLine>> {
        self.state.log.read_only()
    }

    /// Reactive current input line.
    pub fn input(&self) -> ReadSignal<String> {
        self.state.input.read_only()
    }

    /// Reactive submitted-line history, newest first.
    pub fn history(&self) -> ReadSignal<Vec<String>> {
        self.state.history.read_only()
    }

    /// Replaces the current input line from an editor event.
    pub fn set_input(&self, text: impl Into<String>) {
        self.state.input.set(text.into());
    }

    /// Clears the current input line without submitting or recording it.
    pub fn interrupt(&self) {
        self.state.input.set(String::new());
    }

    /// Empties the output log.
    pub fn clear_log(&self) {
        self.state.log.set(Vec::new());
    }

    /// Moves the history cursor one entry older and loads it into the input line.
    pub fn history_up(&self) {
        let history = self.state.history.get_untracked();
        if history.is_empty() {
            return;
        }
        let next = match self.state.cursor.get_untracked() {
            None => 0,
            Some(index) => (index + 1).min(history.len() - 1),
        };
        self.state.cursor.set(Some(next));
        self.state.input.set(history[next].clone());
    }

    /// Moves the history cursor one entry newer, back to the empty line at the end.
    pub fn history_down(&self) {
        match self.state.cursor.get_untracked() {
            None => {}
            Some(0) => {
                self.state.cursor.set(None);
                self.state.input.set(String::new());
            }
            Some(index) => {
                let history = self.state.history.get_untracked();
                self.state.cursor.set(Some(index - 1));
                self.state.input.set(history[index - 1].clone());
            }
        }
    }

    /// Parses and executes one submitted line.
    ///
    /// The line is recorded in history even when blank or malformed. `clear` is intercepted
    /// before registry lookup. Overlapping submissions queue and run strictly in order.
    pub fn submit(&self, line: impl Into<String>) {
        let line = line.into();
        self.state
            .history
            .update(|entries| entries.insert(0, line.clone()));
        self.state.cursor.set(None);
        self.state.input.set(String::new());

        let argv = console_headless::split_line(&line);
        let Some((name, args)) = console_headless::split_command(&argv) else {
            return;
        };

        self.state
            .log
            .update(|entries| entries.push(ConsoleLine::prompt(format!("> {line}"))));

        if name == CLEAR_COMMAND {
            self.clear_log();
            return;
        }

        self.state.queue.borrow_mut().push_back(CommandInvocation {
            name: name.to_string(),
            args: args.to_vec(),
        });
        if self.state.executing.get() {
            return;
        }
        self.state.executing.set(true);
        let session = self.clone();
        leptos::spawn_local(async move {
            session.drain_queue().await;
        });
    }

    async fn drain_queue(&self) {
        loop {
            let next = self.state.queue.borrow_mut().pop_front();
            let Some(invocation) = next else {
                break;
            };
            let line = execute_invocation(&self.registry, invocation).await;
            if let Some(line) = line {
                self.state.log.update(|entries| entries.push(line));
            }
        }
        self.state.executing.set(false);
    }
}

/// Resolves and runs one invocation, returning the log line it produced, if any.
async fn execute_invocation(
    registry: &CommandRegistry,
    invocation: CommandInvocation,
) -> Option<ConsoleLine> {
    let Some(registered) = registry.resolve(&invocation.name) else {
        return Some(ConsoleLine {
            kind: ConsoleLineKind::Error,
            text: format!("command not found: {}", invocation.name),
        });
    };
    match (registered.handler)(invocation).await {
        Ok(Some(text)) => Some(ConsoleLine::output(text)),
        Ok(None) => None,
        Err(err) => Some(ConsoleLine::error(err.message)),
    }
}

/// Root console engine shared by the playground UI.
#[derive(Clone)]
pub struct ConsoleEngine {
    registry: CommandRegistry,
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleEngine {
    /// Creates an engine with the built-in command set.
    pub fn new() -> Self {
        Self {
            registry: CommandRegistry::new(),
        }
    }

    /// Returns the shared registry.
    pub fn registry(&self) -> CommandRegistry {
        self.registry.clone()
    }

    /// Rebuilds the registry from built-ins plus the given host commands.
    pub fn install_host_commands(&self, host_commands: Vec<HostCommand>) {
        self.registry.install_host_commands(host_commands);
    }

    /// Creates one console session with its own input, history, and log.
    pub fn new_session(&self) -> ConsoleSessionHandle {
        ConsoleSessionHandle {
            state: SessionState {
                input: create_rw_signal(String::new()),
                log: create_rw_signal(Vec::new()),
                history: create_rw_signal(Vec::new()),
                cursor: create_rw_signal(None),
                executing: Rc::new(Cell::new(false)),
                queue: Rc::new(RefCell::new(VecDeque::new())),
            },
            registry: self.registry.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use leptos::SignalGetUntracked;

    fn host_command(name: &str, output: &str) -> HostCommand {
        let output = output.to_string();
        HostCommand {
            descriptor: CommandDescriptor::new(name, "test command", name),
            handler: Rc::new(move |_| {
                let output = output.clone();
                Box::pin(async move { Ok(Some(output)) })
            }),
        }
    }

    fn invocation(name: &str, args: &[&str]) -> CommandInvocation {
        CommandInvocation {
            name: name.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    #[test]
    fn echo_joins_arguments_with_spaces() {
        let registry = CommandRegistry::new();
        let line = block_on(execute_invocation(&registry, invocation("echo", &["a", "b c"])))
            .expect("output line");
        assert_eq!(line.kind, ConsoleLineKind::Output);
        assert_eq!(line.text, "a b c");
    }

    #[test]
    fn help_lists_registered_commands() {
        let registry = CommandRegistry::new();
        registry.install_host_commands(vec![host_command("lex", "rows")]);
        let line = block_on(execute_invocation(&registry, invocation("help", &[])))
            .expect("output line");
        for name in ["clear", "echo", "help", "lex"] {
            assert!(line.text.contains(name), "missing `{name}` in {}", line.text);
        }
    }

    #[test]
    fn unknown_command_is_reported_not_fatal() {
        let registry = CommandRegistry::new();
        let line = block_on(execute_invocation(&registry, invocation("lexx", &[])))
            .expect("error line");
        assert_eq!(line.kind, ConsoleLineKind::Error);
        assert_eq!(line.text, "command not found: lexx");
        // The registry stays usable afterwards.
        assert!(block_on(execute_invocation(&registry, invocation("echo", &["ok"]))).is_some());
    }

    #[test]
    fn handler_failure_surfaces_prefixed_error_line() {
        let registry = CommandRegistry::new();
        registry.install_host_commands(vec![HostCommand {
            descriptor: CommandDescriptor::new("boom", "always fails", "boom"),
            handler: Rc::new(|_| {
                Box::pin(async { Err(ConsoleError::internal("it broke")) })
            }),
        }]);
        let line = block_on(execute_invocation(&registry, invocation("boom", &[])))
            .expect("error line");
        assert_eq!(line.kind, ConsoleLineKind::Error);
        assert_eq!(line.text, "error: it broke");
    }

    #[test]
    fn host_command_shadows_builtin_except_clear() {
        let registry = CommandRegistry::new();
        registry.install_host_commands(vec![
            host_command("echo", "shadowed"),
            host_command(CLEAR_COMMAND, "never"),
        ]);
        let line = block_on(execute_invocation(&registry, invocation("echo", &["ignored"])))
            .expect("output line");
        assert_eq!(line.text, "shadowed");
        let clear = registry.resolve(CLEAR_COMMAND).expect("builtin clear");
        assert_eq!(clear.descriptor.summary, "Clear the console log.");
    }

    #[test]
    fn reinstall_rebuilds_registry_from_builtins() {
        let registry = CommandRegistry::new();
        registry.install_host_commands(vec![host_command("lex", "rows")]);
        assert!(registry.resolve("lex").is_some());
        registry.install_host_commands(Vec::new());
        assert!(registry.resolve("lex").is_none());
        assert!(registry.resolve("echo").is_some());
    }

    #[test]
    fn blank_submission_records_history_and_leaves_log_unchanged() {
        let _ = leptos::create_runtime();
        let session = ConsoleEngine::new().new_session();
        session.submit("");
        session.submit("   ");
        assert_eq!(session.history().get_untracked().len(), 2);
        assert!(session.log().get_untracked().is_empty());
        assert!(session.input().get_untracked().is_empty());
    }

    #[test]
    fn clear_is_intercepted_before_dispatch() {
        let _ = leptos::create_runtime();
        let session = ConsoleEngine::new().new_session();
        session.state.log.update(|entries| {
            entries.push(ConsoleLine::output("old"));
        });
        session.submit("clear");
        assert!(session.log().get_untracked().is_empty());
        // Still recorded in history like every submission.
        assert_eq!(session.history().get_untracked(), vec!["clear".to_string()]);
    }

    #[test]
    fn history_navigation_clamps_at_both_ends() {
        let _ = leptos::create_runtime();
        let session = ConsoleEngine::new().new_session();
        // Seed history as three submissions would: newest first, cursor not browsing.
        session.state.history.set(vec![
            "c".to_string(),
            "b".to_string(),
            "a".to_string(),
        ]);

        let mut seen = Vec::new();
        for _ in 0..3 {
            session.history_up();
            seen.push(session.input().get_untracked());
        }
        assert_eq!(seen, vec!["c", "b", "a"]);

        // Clamped at the oldest entry.
        session.history_up();
        assert_eq!(session.input().get_untracked(), "a");

        for _ in 0..3 {
            session.history_down();
        }
        assert_eq!(session.input().get_untracked(), "");
        session.history_down();
        assert_eq!(session.input().get_untracked(), "");

        // Browsing never mutates the buffer itself.
        assert_eq!(
            session.history().get_untracked(),
            vec!["c".to_string(), "b".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn interrupt_clears_input_without_recording() {
        let _ = leptos::create_runtime();
        let session = ConsoleEngine::new().new_session();
        session.set_input("half typed");
        session.interrupt();
        assert!(session.input().get_untracked().is_empty());
        assert!(session.history().get_untracked().is_empty());
    }

    #[test]
    fn queued_invocations_run_in_submission_order() {
        let registry = CommandRegistry::new();
        registry.install_host_commands(vec![
            host_command("first", "one"),
            host_command("second", "two"),
        ]);
        let mut queue = VecDeque::from(vec![
            invocation("first", &[]),
            invocation("second", &[]),
        ]);
        let mut outputs = Vec::new();
        while let Some(next) = queue.pop_front() {
            if let Some(line) = block_on(execute_invocation(&registry, next)) {
                outputs.push(line.text);
            }
        }
        assert_eq!(outputs, vec!["one", "two"]);
    }

    #[test]
    fn submission_while_executing_queues_behind_the_foreground_command() {
        let _ = leptos::create_runtime();
        let engine = ConsoleEngine::new();
        let session = engine.new_session();
        // The first command's handler submits a second line while the executing flag is
        // still set, so the session must enqueue it rather than start a second drain.
        let reentrant = session.clone();
        engine.install_host_commands(vec![
            HostCommand {
                descriptor: CommandDescriptor::new("first", "test command", "first"),
                handler: Rc::new(move |_| {
                    reentrant.submit("second");
                    Box::pin(async { Ok(Some("one".to_string())) })
                }),
            },
            host_command("second", "two"),
        ]);

        session.submit("first");

        let texts: Vec<String> = session
            .log()
            .get_untracked()
            .iter()
            .map(|line| line.text.clone())
            .collect();
        // The second command's output never interleaves ahead of the first's.
        assert_eq!(texts, vec!["> first", "> second", "one", "two"]);
        assert!(!session.state.executing.get());
        assert!(session.state.queue.borrow().is_empty());
    }
}
