//! Line-oriented front end: parses command lines into store actions and
//! renders state back as text lines.

use thiserror::Error;

use crate::kernel::search::SearchOptions;
use crate::kernel::selection::TextRange;
use crate::kernel::services::{KernelMessage, KernelServiceHost};
use crate::kernel::{Action, ChatRole, ImportEntry, NotificationLevel, Store, Terminal};
use crate::models::{path, NodeId, NodeKind};

pub const HELP: &str = "\
commands:
  tree                       show the workspace tree
  touch <path> [text]        create a file (and open it)
  mkdir <path>               create a folder
  new <name> | newdir <name> create under the selected folder
  mv <path> <folder|/>       move a node
  rename <path> <name>       rename a node
  rm <path>                  delete a node and its subtree
  select <folder|/>          toggle the target folder for new nodes
  import <path[=text]>...    import files (folders end with /) under the selected folder
  open <path> | close [path] | tabs
  cat [path]                 print a document
  write <text>               replace the active buffer (\\n for newlines)
  undo
  capture <text>             capture a snippet of the active document
  search <query>             search names and content
  ask <prompt>               chat with the assistant
  modify <instruction>       ask the assistant to rewrite the captured snippet
  apply | discard            apply or drop the proposed rewrite
  chat                       show the transcript
  health                     check the assistant backend
  term <command>             run a terminal command
  term-prev | term-next      recall terminal history
  term-complete <input> | term-reset
  theme | font <size> | sidebar
  help | quit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("no such path: {0}")]
    NoSuchPath(String),
}

/// Parsed command line; paths are still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Tree,
    Touch { path: String, content: String },
    Mkdir { path: String },
    New { name: String },
    NewDir { name: String },
    Move { path: String, destination: String },
    Rename { path: String, name: String },
    Remove { path: String },
    Select { path: String },
    Import { entries: Vec<ImportEntry> },
    Open { path: String },
    Close { path: Option<String> },
    Tabs,
    Cat { path: Option<String> },
    Write { content: String },
    Undo,
    Capture { text: String },
    Search { query: String },
    Ask { prompt: String },
    Modify { instruction: String },
    Apply,
    Discard,
    Chat,
    Health,
    Term { command: String },
    TermRecall { older: bool },
    TermComplete { input: String },
    TermReset,
    Theme,
    Font { size: u8 },
    Sidebar,
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

fn required(rest: &str, usage: &'static str) -> Result<String, ShellError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(ShellError::Usage(usage))
    } else {
        Ok(rest.to_string())
    }
}

fn two_args(rest: &str, usage: &'static str) -> Result<(String, String), ShellError> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((a.to_string(), b.to_string())),
        _ => Err(ShellError::Usage(usage)),
    }
}

fn optional(rest: &str) -> Option<String> {
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// `None` for blank lines.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "tree" | "ls" => ShellCommand::Tree,
        "touch" => {
            let rest = required(rest, "touch <path> [text]")?;
            let (path, content) = rest.split_once(char::is_whitespace).unwrap_or((rest.as_str(), ""));
            ShellCommand::Touch {
                path: path.to_string(),
                content: unescape(content.trim_start()),
            }
        }
        "mkdir" => ShellCommand::Mkdir {
            path: required(rest, "mkdir <path>")?,
        },
        "new" => ShellCommand::New {
            name: required(rest, "new <name>")?,
        },
        "newdir" => ShellCommand::NewDir {
            name: required(rest, "newdir <name>")?,
        },
        "mv" => {
            let (path, destination) = two_args(rest, "mv <path> <folder|/>")?;
            ShellCommand::Move { path, destination }
        }
        "rename" => {
            let (path, name) = two_args(rest, "rename <path> <name>")?;
            ShellCommand::Rename { path, name }
        }
        "rm" => ShellCommand::Remove {
            path: required(rest, "rm <path>")?,
        },
        "select" => ShellCommand::Select {
            path: required(rest, "select <folder|/>")?,
        },
        "import" => {
            let entries: Vec<ImportEntry> = rest
                .split_whitespace()
                .map(|arg| match arg.split_once('=') {
                    Some((path, content)) => ImportEntry::file(path, unescape(content)),
                    None if arg.ends_with('/') => ImportEntry::folder(arg),
                    None => ImportEntry::file(arg, ""),
                })
                .collect();
            if entries.is_empty() {
                return Err(ShellError::Usage("import <path[=text]>..."));
            }
            ShellCommand::Import { entries }
        }
        "open" => ShellCommand::Open {
            path: required(rest, "open <path>")?,
        },
        "close" => ShellCommand::Close {
            path: optional(rest),
        },
        "tabs" => ShellCommand::Tabs,
        "cat" => ShellCommand::Cat {
            path: optional(rest),
        },
        "write" => ShellCommand::Write {
            content: unescape(rest),
        },
        "undo" => ShellCommand::Undo,
        "capture" => ShellCommand::Capture {
            text: unescape(&required(rest, "capture <text>")?),
        },
        "search" | "grep" => ShellCommand::Search {
            query: required(rest, "search <query>")?,
        },
        "ask" => ShellCommand::Ask {
            prompt: required(rest, "ask <prompt>")?,
        },
        "modify" => ShellCommand::Modify {
            instruction: required(rest, "modify <instruction>")?,
        },
        "apply" => ShellCommand::Apply,
        "discard" => ShellCommand::Discard,
        "chat" => ShellCommand::Chat,
        "health" => ShellCommand::Health,
        "term" | "$" => ShellCommand::Term {
            command: required(rest, "term <command>")?,
        },
        "term-prev" => ShellCommand::TermRecall { older: true },
        "term-next" => ShellCommand::TermRecall { older: false },
        "term-complete" => ShellCommand::TermComplete {
            input: rest.trim().to_string(),
        },
        "term-reset" => ShellCommand::TermReset,
        "theme" => ShellCommand::Theme,
        "font" => {
            let size = rest
                .trim()
                .parse()
                .map_err(|_| ShellError::Usage("font <size>"))?;
            ShellCommand::Font { size }
        }
        "sidebar" => ShellCommand::Sidebar,
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

pub struct Shell {
    store: Store,
    host: Option<KernelServiceHost>,
}

impl Shell {
    pub fn new(store: Store, host: Option<KernelServiceHost>) -> Self {
        Self { store, host }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Parses and executes one line. Returns `None` on quit.
    pub fn execute_line(&mut self, line: &str) -> Option<Vec<String>> {
        match parse(line) {
            Ok(None) => Some(Vec::new()),
            Ok(Some(ShellCommand::Quit)) => None,
            Ok(Some(command)) => Some(self.execute(command)),
            Err(err) => Some(vec![format!("error: {err}")]),
        }
    }

    pub fn execute(&mut self, command: ShellCommand) -> Vec<String> {
        match self.run(command) {
            Ok(mut lines) => {
                lines.extend(self.drain_notifications());
                lines
            }
            Err(err) => vec![format!("error: {err}")],
        }
    }

    fn run(&mut self, command: ShellCommand) -> Result<Vec<String>, ShellError> {
        let mut out = Vec::new();
        match command {
            ShellCommand::Help => out.extend(HELP.lines().map(str::to_string)),
            ShellCommand::Quit => {}
            ShellCommand::Tree => out.extend(self.render_tree()),
            ShellCommand::Touch { path, content } => {
                let (parent, name) = self.split_target(&path)?;
                self.dispatch(Action::CreateFile {
                    parent,
                    name,
                    content,
                });
            }
            ShellCommand::Mkdir { path } => {
                let (parent, name) = self.split_target(&path)?;
                self.dispatch(Action::CreateFolder { parent, name });
            }
            ShellCommand::New { name } => self.dispatch(Action::NewFile { name }),
            ShellCommand::NewDir { name } => self.dispatch(Action::NewFolder { name }),
            ShellCommand::Move { path, destination } => {
                let id = self.resolve(&path)?;
                let destination = self.resolve_folder_or_root(&destination)?;
                self.dispatch(Action::Move { id, destination });
            }
            ShellCommand::Rename { path, name } => {
                let id = self.resolve(&path)?;
                self.dispatch(Action::Rename { id, name });
            }
            ShellCommand::Remove { path } => {
                let id = self.resolve(&path)?;
                self.dispatch(Action::Remove { id });
            }
            ShellCommand::Select { path } => {
                let id = self.resolve_folder_or_root(&path)?;
                self.dispatch(Action::SelectDirectory { id });
                let selected = self.store.state().selection.selected_directory();
                out.push(format!("target folder: {}", self.describe(selected)));
            }
            ShellCommand::Import { entries } => {
                let parent = self.store.state().selection.selected_directory();
                self.dispatch(Action::Import { parent, entries });
            }
            ShellCommand::Open { path } => {
                let id = self.resolve(&path)?;
                self.dispatch(Action::Open { id });
            }
            ShellCommand::Close { path } => {
                let id = match path {
                    Some(path) => self.resolve(&path)?,
                    None => self
                        .store
                        .state()
                        .documents
                        .active_id()
                        .ok_or(ShellError::Usage("close <path>"))?,
                };
                self.dispatch(Action::Close { id });
            }
            ShellCommand::Tabs => out.extend(self.render_tabs()),
            ShellCommand::Cat { path } => {
                let content = match path {
                    Some(path) => {
                        let id = self.resolve(&path)?;
                        match self.store.export_document(id) {
                            Ok(content) => content,
                            Err(err) => return Ok(vec![format!("error: {err}")]),
                        }
                    }
                    None => self.store.state().editor_content().to_string(),
                };
                out.extend(content.lines().map(str::to_string));
            }
            ShellCommand::Write { content } => self.dispatch(Action::EditActive { content }),
            ShellCommand::Undo => self.dispatch(Action::Undo),
            ShellCommand::Capture { text } => {
                let content = self.store.state().editor_content();
                let start = content.find(&text).unwrap_or(0);
                let range = TextRange::new(start, start + text.len());
                self.dispatch(Action::CaptureSelection { range, text });
            }
            ShellCommand::Search { query } => {
                self.dispatch(Action::Search {
                    query,
                    options: SearchOptions::default(),
                });
                for hit in &self.store.state().search.hits {
                    if hit.is_name_match() {
                        out.push(format!("{} (name)", hit.path));
                    } else {
                        out.push(format!("{}:{}: {}", hit.path, hit.line, hit.text));
                    }
                }
            }
            ShellCommand::Ask { prompt } => {
                self.dispatch(Action::AssistantSubmit { prompt });
                out.extend(self.await_assistant());
            }
            ShellCommand::Modify { instruction } => {
                self.dispatch(Action::AssistantRequestModification { instruction });
                out.extend(self.await_assistant());
                if let Some(code) = self
                    .store
                    .state()
                    .assistant
                    .pending
                    .as_ref()
                    .and_then(|p| p.proposed_replacement.as_deref())
                {
                    out.push("proposed replacement (apply | discard):".to_string());
                    out.extend(code.lines().map(|line| format!("  {line}")));
                }
            }
            ShellCommand::Apply => self.dispatch(Action::AssistantApplyPending),
            ShellCommand::Discard => self.dispatch(Action::AssistantDiscardPending),
            ShellCommand::Chat => {
                for message in &self.store.state().assistant.messages {
                    let who = match message.role {
                        ChatRole::User => "you",
                        ChatRole::Assistant => "assistant",
                    };
                    out.push(format!("[{who}]"));
                    out.extend(message.content.lines().map(str::to_string));
                }
            }
            ShellCommand::Health => {
                self.dispatch(Action::CheckAssistantHealth);
                self.pump_until(|action| matches!(action, Action::AssistantHealthChecked { .. }));
                let available = self.store.state().assistant.available;
                out.push(format!(
                    "assistant {}",
                    if available { "available" } else { "unavailable" }
                ));
            }
            ShellCommand::Term { command } => {
                let before = self.store.state().terminal.lines().len();
                self.dispatch(Action::TerminalRun { command });
                let lines = self.store.state().terminal.lines();
                out.extend(lines[before.min(lines.len())..].iter().cloned());
            }
            ShellCommand::TermRecall { older } => {
                if let Some(command) = self.store.terminal_recall(older) {
                    out.push(format!("$ {command}"));
                }
            }
            ShellCommand::TermComplete { input } => {
                out.push(Terminal::complete(&input).unwrap_or(input.as_str()).to_string());
            }
            ShellCommand::TermReset => {
                self.dispatch(Action::TerminalReset);
                out.extend(self.store.state().terminal.lines().iter().cloned());
            }
            ShellCommand::Theme => self.dispatch(Action::ToggleTheme),
            ShellCommand::Font { size } => self.dispatch(Action::SetFontSize { size }),
            ShellCommand::Sidebar => self.dispatch(Action::ToggleSidebar),
        }
        Ok(out)
    }

    pub fn dispatch(&mut self, action: Action) {
        let result = self.store.dispatch(action);
        if let Some(host) = &self.host {
            host.run_effects(result.effects);
        } else if !result.effects.is_empty() {
            tracing::debug!(effects = result.effects.len(), "no service host, effects dropped");
        }
    }

    /// Feeds bus messages back into the store until one matching `done` has
    /// been dispatched, or the bus goes quiet.
    fn pump_until(&mut self, done: impl Fn(&Action) -> bool) {
        const WAIT: std::time::Duration = std::time::Duration::from_millis(100);
        const MAX_IDLE_ROUNDS: usize = 1200;

        let mut idle = 0;
        loop {
            let Some(host) = self.host.as_mut() else {
                return;
            };
            match host.recv_timeout(WAIT) {
                Ok(KernelMessage::Action(action)) => {
                    idle = 0;
                    let finished = done(&action);
                    self.dispatch(action);
                    if finished {
                        return;
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    idle += 1;
                    if idle >= MAX_IDLE_ROUNDS {
                        return;
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    fn await_assistant(&mut self) -> Vec<String> {
        let before = self.store.state().assistant.messages.len();
        let Some(in_flight) = self.store.state().assistant.in_flight else {
            return Vec::new();
        };
        self.pump_until(|action| {
            matches!(action, Action::AssistantResponded { request_id, .. } if *request_id == in_flight)
        });
        let messages = &self.store.state().assistant.messages;
        messages[before.min(messages.len())..]
            .iter()
            .filter(|m| m.role == ChatRole::Assistant)
            .flat_map(|m| m.content.lines().map(str::to_string))
            .collect()
    }

    fn drain_notifications(&mut self) -> Vec<String> {
        self.store
            .take_notifications()
            .into_iter()
            .map(|n| match n.level {
                NotificationLevel::Info => format!("info: {}", n.message),
                NotificationLevel::Error => format!("error: {}", n.message),
            })
            .collect()
    }

    fn resolve(&self, target: &str) -> Result<NodeId, ShellError> {
        let target = target.trim_matches(path::SEPARATOR);
        self.store
            .state()
            .tree
            .find_by_path(target)
            .map(|node| node.id())
            .map_err(|_| ShellError::NoSuchPath(target.to_string()))
    }

    fn resolve_folder_or_root(&self, target: &str) -> Result<Option<NodeId>, ShellError> {
        if matches!(target.trim(), "/" | ".") {
            return Ok(None);
        }
        self.resolve(target).map(Some)
    }

    /// Splits `a/b/name` into the resolved parent and the leaf name.
    fn split_target(&self, target: &str) -> Result<(Option<NodeId>, String), ShellError> {
        let target = target.trim_matches(path::SEPARATOR);
        let parent = match path::parent_path(target) {
            Some(parent) => Some(self.resolve(parent)?),
            None => None,
        };
        Ok((parent, path::file_name(target).to_string()))
    }

    fn describe(&self, id: Option<NodeId>) -> String {
        id.and_then(|id| self.store.state().tree.get(id))
            .map(|node| node.path().to_string())
            .unwrap_or_else(|| "/".to_string())
    }

    fn render_tree(&self) -> Vec<String> {
        let state = self.store.state();
        let active = state.documents.active_id();
        state
            .tree
            .walk()
            .filter_map(|id| state.tree.get(id))
            .map(|node| {
                let indent = "  ".repeat(path::depth(node.path()).saturating_sub(1));
                let marker = if Some(node.id()) == active {
                    "*"
                } else if state.documents.contains(node.id()) {
                    "+"
                } else {
                    " "
                };
                match node.kind() {
                    NodeKind::Folder => format!("{marker} {indent}{}/", node.name()),
                    NodeKind::File => format!("{marker} {indent}{}", node.name()),
                }
            })
            .collect()
    }

    fn render_tabs(&self) -> Vec<String> {
        let documents = &self.store.state().documents;
        documents
            .iter()
            .map(|doc| {
                let marker = if documents.active_id() == Some(doc.id) {
                    "*"
                } else {
                    " "
                };
                format!("{marker} {}", doc.path)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/shell.rs"]
mod tests;
