//! Mock terminal: a tiny command interpreter over the workspace.
//!
//! Nothing is executed; every command produces canned or tree-derived lines.

use crate::models::{FileTree, NodeKind};

const DEFAULT_SCROLLBACK_LINES: usize = 5000;
const DEFAULT_HISTORY_ENTRIES: usize = 500;
const WORKING_DIRECTORY: &str = "/codeforge";
const ENGINE_VERSION: &str = "Game Engine v1.0.0";

pub const BANNER: [&str; 2] = ["> Terminal initialized", "> Type \"help\" for available commands"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Lines(Vec<String>),
    Clear,
}

/// Read-only view of the workspace a command may inspect.
#[derive(Debug, Clone, Copy)]
pub struct TerminalContext<'a> {
    pub active_document: Option<&'a str>,
    pub tree: &'a FileTree,
}

pub fn run_command(command: &str, ctx: TerminalContext<'_>) -> CommandOutput {
    let lowered = command.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();
    let Some(cmd) = parts.next() else {
        return CommandOutput::Lines(Vec::new());
    };
    let args: Vec<&str> = parts.collect();

    let lines = match cmd {
        "help" => vec![
            "> Available commands:".to_string(),
            "  help    - Show this help message".to_string(),
            "  clear   - Clear the terminal".to_string(),
            "  run     - Run the current file".to_string(),
            "  ls      - List directory contents".to_string(),
            "  cd      - Change directory".to_string(),
            "  pwd     - Print working directory".to_string(),
            "  echo    - Print text".to_string(),
            "  version - Show game engine version".to_string(),
        ],
        "clear" => return CommandOutput::Clear,
        "run" => match ctx.active_document {
            Some(name) => vec![
                format!("> Running {name}..."),
                "> Executing script...".to_string(),
                "> Output:".to_string(),
                "--------------------".to_string(),
                "  Hello, world!".to_string(),
                "  Script completed successfully.".to_string(),
                "--------------------".to_string(),
            ],
            None => vec!["> Error: No active file to run".to_string()],
        },
        "ls" => {
            let mut lines = vec!["> Directory listing:".to_string()];
            for &id in ctx.tree.roots() {
                let Some(node) = ctx.tree.get(id) else {
                    continue;
                };
                match node.kind() {
                    NodeKind::Folder => lines.push(format!("  {}/", node.name())),
                    NodeKind::File => lines.push(format!("  {}", node.name())),
                }
            }
            lines
        }
        "cd" => match args.first() {
            Some(dir) => vec![format!("> Changed to {dir} directory")],
            None => vec!["> Changed to home directory".to_string()],
        },
        "pwd" => vec![format!("> {WORKING_DIRECTORY}")],
        "echo" => vec![format!("> {}", args.join(" "))],
        "version" => vec![format!("> {ENGINE_VERSION}")],
        _ => vec![format!("> Command not found: {}", command.trim())],
    };
    CommandOutput::Lines(lines)
}

#[derive(Debug, Clone)]
pub struct Terminal {
    scrollback: Vec<String>,
    history: Vec<String>,
    /// Steps back from the newest history entry; `None` when not browsing.
    history_cursor: Option<usize>,
    max_scrollback: usize,
    max_history: usize,
}

impl Default for Terminal {
    fn default() -> Self {
        Self {
            scrollback: BANNER.iter().map(|line| line.to_string()).collect(),
            history: Vec::new(),
            history_cursor: None,
            max_scrollback: DEFAULT_SCROLLBACK_LINES,
            max_history: DEFAULT_HISTORY_ENTRIES,
        }
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Echoes the command, records it in history and appends its output.
    /// Blank input is ignored.
    pub fn submit(&mut self, command: &str, ctx: TerminalContext<'_>) -> bool {
        if command.trim().is_empty() {
            return false;
        }
        self.history.push(command.to_string());
        self.history_cursor = None;
        let overflow = self.history.len().saturating_sub(self.max_history);
        if overflow > 0 {
            self.history.drain(..overflow);
        }

        self.scrollback.push(format!("$ {command}"));
        match run_command(command, ctx) {
            CommandOutput::Clear => self.scrollback.clear(),
            CommandOutput::Lines(lines) => self.scrollback.extend(lines),
        }

        let overflow = self.scrollback.len().saturating_sub(self.max_scrollback);
        if overflow > 0 {
            self.scrollback.drain(..overflow);
        }
        true
    }

    pub fn lines(&self) -> &[String] {
        &self.scrollback
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Older history entry, stopping at the oldest.
    pub fn previous_command(&mut self) -> Option<&str> {
        if self.history.is_empty() {
            return None;
        }
        let next = match self.history_cursor {
            None => 0,
            Some(step) => (step + 1).min(self.history.len() - 1),
        };
        self.history_cursor = Some(next);
        self.history
            .get(self.history.len() - 1 - next)
            .map(String::as_str)
    }

    /// Newer history entry; stepping past the newest yields an empty line.
    pub fn next_command(&mut self) -> Option<&str> {
        match self.history_cursor {
            None => None,
            Some(0) => {
                self.history_cursor = None;
                Some("")
            }
            Some(step) => {
                self.history_cursor = Some(step - 1);
                self.history
                    .get(self.history.len() - step)
                    .map(String::as_str)
            }
        }
    }

    /// Tab completion for the two commands worth completing.
    pub fn complete(input: &str) -> Option<&'static str> {
        if input.starts_with('r') {
            Some("run")
        } else if input.starts_with('c') {
            Some("clear")
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.scrollback = vec![
            "> New terminal session started".to_string(),
            BANNER[1].to_string(),
        ];
        self.history_cursor = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/terminal.rs"]
mod tests;
