use std::io::{self, BufRead, Write};
use std::sync::Arc;

use codeforge::app::shell::Shell;
use codeforge::kernel::services::adapters::{
    ensure_settings_file, load_settings, AsyncRuntime, HttpAssistant,
};
use codeforge::kernel::services::KernelServiceHost;
use codeforge::kernel::{Action, AppState, Store};
use codeforge::models::FileTree;

mod logging;

fn main() -> io::Result<()> {
    let logging = logging::init();

    let settings_path = ensure_settings_file()
        .map_err(|e| tracing::warn!(error = %e, "settings file unavailable"))
        .ok();
    let settings = load_settings(settings_path.as_deref());
    tracing::info!(base_url = %settings.assistant.base_url, "settings loaded");

    let runtime = Arc::new(AsyncRuntime::new()?);
    let assistant = Arc::new(HttpAssistant::new(&settings.assistant));
    let host = KernelServiceHost::new(runtime.clone(), assistant).with_settings_path(settings_path);

    let store = Store::new(AppState::new(FileTree::new(), settings.preferences.clone()));
    let mut shell = Shell::new(store, Some(host));
    shell.dispatch(Action::CheckAssistantHealth);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "codeforge: type \"help\" for commands")?;
    if let Some(guard) = &logging {
        writeln!(stdout, "logs: {}", guard.log_dir().display())?;
    }

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match shell.execute_line(&line) {
            Some(lines) => {
                for line in lines {
                    writeln!(stdout, "{line}")?;
                }
            }
            None => break,
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
