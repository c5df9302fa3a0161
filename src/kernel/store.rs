//! Single mutation entry point.
//!
//! Typed operations (`create_file`, `rename`, `edit`, ...) return
//! [`Result`](crate::kernel::error::Result) and leave the state untouched on
//! failure. [`Store::dispatch`] wraps them for action-driven callers: errors
//! become notifications and async work comes back as [`Effect`]s.

mod assistant;
mod documents;
mod workspace;

pub use workspace::starter_template;

use super::error::WorkspaceError;
use super::state::Notification;
use super::{Action, AppState, Effect};

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            state_changed: true,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.state.notifications)
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let outcome = match action {
            Action::CreateFile {
                parent,
                name,
                content,
            } => self.create_file(parent, &name, content).map(|_| DispatchResult::changed(true)),
            Action::CreateFolder { parent, name } => self
                .create_folder(parent, &name)
                .map(|_| DispatchResult::changed(true)),
            Action::NewFile { name } => self.new_file(&name).map(|_| DispatchResult::changed(true)),
            Action::NewFolder { name } => {
                self.new_folder(&name).map(|_| DispatchResult::changed(true))
            }
            Action::Rename { id, name } => {
                self.rename(id, &name).map(|_| DispatchResult::changed(true))
            }
            Action::Remove { id } => self.remove(id).map(|_| DispatchResult::changed(true)),
            Action::Move { id, destination } => self
                .move_node(id, destination)
                .map(|_| DispatchResult::changed(true)),
            Action::ToggleExpand { id } => {
                self.state.tree.toggle_expand(id);
                Ok(DispatchResult::changed(true))
            }
            Action::Import { parent, entries } => self.import_entries(parent, &entries).map(|ids| {
                self.notify(Notification::info(format!("Imported {} item(s)", ids.len())));
                DispatchResult::changed(true)
            }),
            Action::Open { id } => self.open(id).map(|_| DispatchResult::changed(true)),
            Action::Close { id } => self.close(id).map(|_| DispatchResult::changed(true)),
            Action::Activate { id } => self.activate(id).map(DispatchResult::changed),
            Action::Edit { id, content } => self.edit(id, &content).map(DispatchResult::changed),
            Action::EditActive { content } => {
                self.edit_active(&content).map(DispatchResult::changed)
            }
            Action::Undo => self.undo().map(DispatchResult::changed),
            Action::SelectDirectory { id } => {
                self.select_directory(id).map(|_| DispatchResult::changed(true))
            }
            Action::CaptureSelection { range, text } => self
                .capture_selection(range, &text)
                .map(|_| DispatchResult::changed(true)),
            Action::Search { query, options } => {
                self.state.search.query = query.clone();
                self.state.search.options = options.clone();
                match self.search(&query, &options) {
                    Ok(hits) => {
                        self.state.search.hits = hits;
                        self.state.search.last_error = None;
                        Ok(DispatchResult::changed(true))
                    }
                    Err(err) => {
                        self.state.search.hits.clear();
                        self.state.search.last_error = Some(err.to_string());
                        Err(err)
                    }
                }
            }
            Action::ClearSearch => Ok(DispatchResult::changed(self.state.search.clear())),
            Action::AssistantSubmit { prompt } => {
                self.submit_prompt(&prompt).map(|effect| match effect {
                    Some(effect) => DispatchResult::effect(effect),
                    None => DispatchResult::changed(false),
                })
            }
            Action::AssistantRequestModification { instruction } => self
                .request_modification(&instruction)
                .map(DispatchResult::effect),
            Action::AssistantResponded { request_id, result } => self
                .complete_request(request_id, result)
                .map(DispatchResult::changed),
            Action::AssistantApplyPending => {
                self.apply_pending_edit().map(|_| DispatchResult::changed(true))
            }
            Action::AssistantDiscardPending => self
                .discard_pending_edit()
                .map(|_| DispatchResult::changed(true)),
            Action::AssistantHealthChecked { available } => Ok(DispatchResult::changed(
                self.set_assistant_available(available),
            )),
            Action::CheckAssistantHealth => {
                Ok(DispatchResult::effect(Effect::CheckAssistantHealth))
            }
            Action::TerminalRun { command } => {
                Ok(DispatchResult::changed(self.terminal_run(&command)))
            }
            Action::TerminalReset => {
                self.state.terminal.reset();
                Ok(DispatchResult::changed(true))
            }
            Action::ToggleTheme => {
                let prefs = &mut self.state.preferences;
                prefs.theme = prefs.theme.toggled();
                Ok(self.persist_preferences())
            }
            Action::SetFontSize { size } => {
                let size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
                if self.state.preferences.font_size == size {
                    Ok(DispatchResult::changed(false))
                } else {
                    self.state.preferences.font_size = size;
                    Ok(self.persist_preferences())
                }
            }
            Action::ToggleSidebar => {
                let prefs = &mut self.state.preferences;
                prefs.sidebar_visible = !prefs.sidebar_visible;
                Ok(self.persist_preferences())
            }
            Action::DismissNotifications => {
                let changed = !self.state.notifications.is_empty();
                self.state.notifications.clear();
                Ok(DispatchResult::changed(changed))
            }
        };

        match outcome {
            Ok(result) => result,
            Err(err) => {
                self.report(&err);
                DispatchResult::changed(true)
            }
        }
    }

    fn persist_preferences(&self) -> DispatchResult {
        DispatchResult::effect(Effect::PersistPreferences(self.state.preferences.clone()))
    }

    fn notify(&mut self, notification: Notification) {
        self.state.notifications.push(notification);
    }

    fn report(&mut self, err: &WorkspaceError) {
        tracing::warn!(error = %err, "action failed");
        self.notify(Notification::error(err.to_string()));
    }
}

const MIN_FONT_SIZE: u8 = 8;
const MAX_FONT_SIZE: u8 = 32;

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
