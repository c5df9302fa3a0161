use super::*;
use crate::kernel::services::adapters::AsyncRuntime;
use crate::kernel::services::ports::{AssistantBridge, AssistantError, GenerateRequest};
use crate::kernel::AppState;
use std::sync::Arc;

fn shell() -> Shell {
    Shell::new(Store::new(AppState::default()), None)
}

#[test]
fn parse_commands() {
    assert_eq!(parse("   ").unwrap(), None);
    assert_eq!(
        parse("touch src/a.js let a = 1;\\n").unwrap(),
        Some(ShellCommand::Touch {
            path: "src/a.js".to_string(),
            content: "let a = 1;\n".to_string(),
        })
    );
    assert_eq!(
        parse("mv src/a.js /").unwrap(),
        Some(ShellCommand::Move {
            path: "src/a.js".to_string(),
            destination: "/".to_string(),
        })
    );
    assert_eq!(parse("CLOSE").unwrap(), Some(ShellCommand::Close { path: None }));
    assert_eq!(parse("font 16").unwrap(), Some(ShellCommand::Font { size: 16 }));
    assert_eq!(
        parse("import lib/ lib/x.js=1").unwrap(),
        Some(ShellCommand::Import {
            entries: vec![ImportEntry::folder("lib/"), ImportEntry::file("lib/x.js", "1")],
        })
    );
}

#[test]
fn parse_errors() {
    assert_eq!(
        parse("frobnicate").unwrap_err(),
        ShellError::UnknownCommand("frobnicate".to_string())
    );
    assert_eq!(
        parse("rename onlyone").unwrap_err(),
        ShellError::Usage("rename <path> <name>")
    );
    assert!(matches!(parse("font big"), Err(ShellError::Usage(_))));
    assert!(matches!(parse("rm"), Err(ShellError::Usage(_))));
}

#[test]
fn quit_ends_session() {
    let mut shell = shell();
    assert!(shell.execute_line("quit").is_none());
    assert_eq!(shell.execute_line(""), Some(Vec::new()));
}

#[test]
fn tree_session() {
    let mut shell = shell();
    shell.execute_line("mkdir src");
    shell.execute_line("touch src/a.js let a = 1;");
    shell.execute_line("rename src lib");

    let tree = shell.execute_line("tree").unwrap();
    assert_eq!(tree, vec!["  lib/", "*   a.js"]);
    assert_eq!(shell.execute_line("cat lib/a.js").unwrap(), vec!["let a = 1;"]);
    assert_eq!(shell.execute_line("tabs").unwrap(), vec!["* lib/a.js"]);

    let missing = shell.execute_line("rm src").unwrap();
    assert_eq!(missing, vec!["error: no such path: src"]);

    let invalid = shell.execute_line("mv lib lib").unwrap();
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].starts_with("error: invalid target"));
}

#[test]
fn write_and_undo() {
    let mut shell = shell();
    shell.execute_line("touch a.js one");
    shell.execute_line("write two");
    shell.execute_line("write three");
    assert_eq!(shell.execute_line("cat").unwrap(), vec!["three"]);
    shell.execute_line("undo");
    assert_eq!(shell.execute_line("cat").unwrap(), vec!["two"]);
}

#[test]
fn new_file_uses_selected_folder_and_template() {
    let mut shell = shell();
    shell.execute_line("mkdir game");
    assert_eq!(
        shell.execute_line("select game").unwrap(),
        vec!["target folder: game"]
    );
    shell.execute_line("new main.py");

    let node = shell.store().state().tree.find_by_path("game/main.py").unwrap();
    assert!(node.content().unwrap().contains("def main():"));
    assert_eq!(
        shell.store().state().documents.active().unwrap().path,
        "game/main.py"
    );
}

#[test]
fn terminal_output_is_returned() {
    let mut shell = shell();
    shell.execute_line("mkdir src");
    assert_eq!(
        shell.execute_line("term ls").unwrap(),
        vec!["$ ls", "> Directory listing:", "  src/"]
    );
}

struct ScriptedAssistant;

impl AssistantBridge for ScriptedAssistant {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AssistantError> {
        if request.prompt.contains("Original Code:") {
            Ok("1. **Modified Code:**\n```javascript\nlet b = 2;\n```\nDone.".to_string())
        } else {
            Ok("Hello there.".to_string())
        }
    }

    fn health(&self) -> bool {
        true
    }
}

#[test]
fn assistant_round_trip_through_host() {
    let runtime = Arc::new(AsyncRuntime::new().unwrap());
    let host = KernelServiceHost::new(runtime.clone(), Arc::new(ScriptedAssistant));
    let mut shell = Shell::new(Store::new(AppState::default()), Some(host));

    assert_eq!(shell.execute_line("ask hi").unwrap(), vec!["Hello there."]);

    shell.execute_line("touch a.js let a = 1;\\nlet c = 3;");
    shell.execute_line("capture let a = 1;");
    let out = shell.execute_line("modify rename a to b").unwrap();
    assert!(out.contains(&"proposed replacement (apply | discard):".to_string()));
    assert!(out.contains(&"  let b = 2;".to_string()));

    assert!(shell.execute_line("apply").unwrap().is_empty());
    assert_eq!(
        shell.execute_line("cat a.js").unwrap(),
        vec!["let b = 2;", "let c = 3;"]
    );
    assert_eq!(shell.execute_line("health").unwrap(), vec!["assistant available"]);
}

struct OfflineAssistant;

impl AssistantBridge for OfflineAssistant {
    fn generate(&self, _request: &GenerateRequest) -> Result<String, AssistantError> {
        Err(AssistantError::Network("offline".to_string()))
    }

    fn health(&self) -> bool {
        false
    }
}

#[test]
fn health_waits_for_health_result() {
    let runtime = Arc::new(AsyncRuntime::new().unwrap());
    let host = KernelServiceHost::new(runtime.clone(), Arc::new(OfflineAssistant));
    // a late reply for a request nobody waits on is already queued
    host.context().dispatch(Action::AssistantResponded {
        request_id: 42,
        result: Ok("late".to_string()),
    });
    let mut shell = Shell::new(Store::new(AppState::default()), Some(host));

    assert_eq!(
        shell.execute_line("health").unwrap(),
        vec!["assistant unavailable"]
    );
    assert!(shell.store().state().assistant.messages.is_empty());
}

#[test]
fn terminal_history_and_completion() {
    let mut shell = shell();
    shell.execute_line("term pwd");
    shell.execute_line("term version");

    assert_eq!(shell.execute_line("term-prev").unwrap(), vec!["$ version"]);
    assert_eq!(shell.execute_line("term-prev").unwrap(), vec!["$ pwd"]);
    assert_eq!(shell.execute_line("term-next").unwrap(), vec!["$ version"]);
    assert_eq!(shell.execute_line("term-complete cl").unwrap(), vec!["clear"]);
    assert_eq!(shell.execute_line("term-complete zz").unwrap(), vec!["zz"]);
    assert_eq!(
        shell.execute_line("term-reset").unwrap(),
        vec![
            "> New terminal session started",
            "> Type \"help\" for available commands"
        ]
    );
}
