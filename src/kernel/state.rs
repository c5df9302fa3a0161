use rustc_hash::FxHashMap;

use crate::kernel::services::ports::Preferences;
use crate::models::{EditHistory, EditHistoryConfig, FileTree, NodeId};

use super::assistant::AssistantState;
use super::documents::OpenDocumentSet;
use super::search::SearchState;
use super::selection::SelectionController;
use super::terminal::Terminal;

/// Seed content of the scratch buffer edited while no document is active.
pub const SCRATCH_STARTER: &str = "// Game code goes here...\n\nfunction Player(name, health) {\n  this.name = name;\n  this.health = health;\n  \n  this.attack = function(target) {\n    console.log(this.name + \" attacks \" + target.name);\n    return Math.floor(Math.random() * 10) + 1;\n  }\n}\n\nconst hero = new Player(\"Hero\", 100);\nconst enemy = new Player(\"Enemy\", 50);\n\nlet damage = hero.attack(enemy);\nconsole.log(\"Damage dealt: \" + damage);";

/// Undo history owner: an open document, or the scratch buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKey {
    Document(NodeId),
    Scratch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tree: FileTree,
    pub documents: OpenDocumentSet,
    pub selection: SelectionController,
    pub histories: FxHashMap<HistoryKey, EditHistory>,
    pub history_config: EditHistoryConfig,
    pub scratch: String,
    pub assistant: AssistantState,
    pub search: SearchState,
    pub terminal: Terminal,
    pub preferences: Preferences,
    pub notifications: Vec<Notification>,
}

impl AppState {
    pub fn new(tree: FileTree, preferences: Preferences) -> Self {
        Self {
            tree,
            documents: OpenDocumentSet::new(),
            selection: SelectionController::new(),
            histories: FxHashMap::default(),
            history_config: EditHistoryConfig::default(),
            scratch: SCRATCH_STARTER.to_string(),
            assistant: AssistantState::default(),
            search: SearchState::default(),
            terminal: Terminal::new(),
            preferences,
            notifications: Vec::new(),
        }
    }

    /// The key edits and undo go to right now.
    pub fn active_history_key(&self) -> HistoryKey {
        self.documents
            .active_id()
            .map(HistoryKey::Document)
            .unwrap_or(HistoryKey::Scratch)
    }

    /// Content the editor currently shows.
    pub fn editor_content(&self) -> &str {
        match self.documents.active() {
            Some(doc) => &doc.content,
            None => &self.scratch,
        }
    }

    pub fn history(&self, key: HistoryKey) -> Option<&EditHistory> {
        self.histories.get(&key)
    }

    pub(super) fn history_mut(&mut self, key: HistoryKey) -> &mut EditHistory {
        let config = self.history_config.clone();
        self.histories
            .entry(key)
            .or_insert_with(|| EditHistory::with_config(config))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FileTree::new(), Preferences::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
