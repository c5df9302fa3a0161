use super::*;

fn lines(output: CommandOutput) -> Vec<String> {
    match output {
        CommandOutput::Lines(lines) => lines,
        CommandOutput::Clear => panic!("unexpected clear"),
    }
}

#[test]
fn ls_lists_root_nodes() {
    let mut tree = FileTree::new();
    tree.create_folder(None, "src").unwrap();
    tree.create_file(None, "index.html", "").unwrap();
    let ctx = TerminalContext {
        active_document: None,
        tree: &tree,
    };

    assert_eq!(
        lines(run_command("ls", ctx)),
        vec!["> Directory listing:", "  src/", "  index.html"]
    );
}

#[test]
fn run_requires_active_document() {
    let tree = FileTree::new();
    let none = TerminalContext {
        active_document: None,
        tree: &tree,
    };
    assert_eq!(
        lines(run_command("run", none)),
        vec!["> Error: No active file to run"]
    );

    let some = TerminalContext {
        active_document: Some("game.js"),
        tree: &tree,
    };
    assert_eq!(lines(run_command("RUN", some))[0], "> Running game.js...");
}

#[test]
fn simple_commands() {
    let tree = FileTree::new();
    let ctx = TerminalContext {
        active_document: None,
        tree: &tree,
    };

    assert_eq!(lines(run_command("echo hello world", ctx)), vec!["> hello world"]);
    assert_eq!(lines(run_command("echo", ctx)), vec!["> "]);
    assert_eq!(lines(run_command("cd src", ctx)), vec!["> Changed to src directory"]);
    assert_eq!(lines(run_command("cd", ctx)), vec!["> Changed to home directory"]);
    assert_eq!(lines(run_command("version", ctx)), vec!["> Game Engine v1.0.0"]);
    assert_eq!(lines(run_command("help", ctx)).len(), 9);
    assert_eq!(run_command("clear", ctx), CommandOutput::Clear);
    assert_eq!(
        lines(run_command("make all", ctx)),
        vec!["> Command not found: make all"]
    );
}

#[test]
fn submit_echoes_and_clears() {
    let tree = FileTree::new();
    let ctx = TerminalContext {
        active_document: None,
        tree: &tree,
    };
    let mut terminal = Terminal::new();
    assert_eq!(terminal.lines().len(), 2);

    assert!(!terminal.submit("   ", ctx));
    assert!(terminal.submit("pwd", ctx));
    assert_eq!(terminal.lines()[2], "$ pwd");
    assert_eq!(terminal.lines()[3], "> /codeforge");

    assert!(terminal.submit("clear", ctx));
    assert!(terminal.lines().is_empty());
    assert_eq!(terminal.history(), ["pwd", "clear"]);
}

#[test]
fn history_navigation() {
    let tree = FileTree::new();
    let ctx = TerminalContext {
        active_document: None,
        tree: &tree,
    };
    let mut terminal = Terminal::new();
    assert_eq!(terminal.previous_command(), None);

    terminal.submit("ls", ctx);
    terminal.submit("pwd", ctx);
    terminal.submit("version", ctx);

    assert_eq!(terminal.previous_command(), Some("version"));
    assert_eq!(terminal.previous_command(), Some("pwd"));
    assert_eq!(terminal.previous_command(), Some("ls"));
    assert_eq!(terminal.previous_command(), Some("ls"));
    assert_eq!(terminal.next_command(), Some("pwd"));
    assert_eq!(terminal.next_command(), Some("version"));
    assert_eq!(terminal.next_command(), Some(""));
    assert_eq!(terminal.next_command(), None);
}

#[test]
fn history_is_bounded() {
    let tree = FileTree::new();
    let ctx = TerminalContext {
        active_document: None,
        tree: &tree,
    };
    let mut terminal = Terminal::new();
    for n in 0..(DEFAULT_HISTORY_ENTRIES + 20) {
        terminal.submit(&format!("echo {n}"), ctx);
    }

    assert_eq!(terminal.history().len(), DEFAULT_HISTORY_ENTRIES);
    assert_eq!(terminal.history()[0], "echo 20");
    assert!(terminal.lines().len() <= DEFAULT_SCROLLBACK_LINES);
    assert_eq!(
        terminal.previous_command(),
        Some(format!("echo {}", DEFAULT_HISTORY_ENTRIES + 19).as_str())
    );
}

#[test]
fn reset_keeps_history() {
    let tree = FileTree::new();
    let ctx = TerminalContext {
        active_document: None,
        tree: &tree,
    };
    let mut terminal = Terminal::new();
    terminal.submit("pwd", ctx);
    terminal.reset();

    assert_eq!(terminal.lines()[0], "> New terminal session started");
    assert_eq!(terminal.previous_command(), Some("pwd"));
}

#[test]
fn tab_completion() {
    assert_eq!(Terminal::complete("r"), Some("run"));
    assert_eq!(Terminal::complete("cl"), Some("clear"));
    assert_eq!(Terminal::complete("x"), None);
}
