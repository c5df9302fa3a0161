use crate::kernel::search::SearchOptions;
use crate::kernel::selection::TextRange;
use crate::kernel::services::ports::AssistantError;
use crate::models::NodeId;

#[derive(Debug, Clone)]
pub enum Action {
    CreateFile {
        parent: Option<NodeId>,
        name: String,
        content: String,
    },
    CreateFolder {
        parent: Option<NodeId>,
        name: String,
    },
    /// Created under the selected directory with a starter template.
    NewFile {
        name: String,
    },
    NewFolder {
        name: String,
    },
    Rename {
        id: NodeId,
        name: String,
    },
    Remove {
        id: NodeId,
    },
    Move {
        id: NodeId,
        destination: Option<NodeId>,
    },
    ToggleExpand {
        id: NodeId,
    },
    Import {
        parent: Option<NodeId>,
        entries: Vec<ImportEntry>,
    },
    Open {
        id: NodeId,
    },
    Close {
        id: NodeId,
    },
    Activate {
        id: NodeId,
    },
    Edit {
        id: NodeId,
        content: String,
    },
    /// Edits the active document, or the scratch buffer.
    EditActive {
        content: String,
    },
    Undo,
    SelectDirectory {
        id: Option<NodeId>,
    },
    CaptureSelection {
        range: TextRange,
        text: String,
    },
    Search {
        query: String,
        options: SearchOptions,
    },
    ClearSearch,
    AssistantSubmit {
        prompt: String,
    },
    AssistantRequestModification {
        instruction: String,
    },
    AssistantResponded {
        request_id: u64,
        result: Result<String, AssistantError>,
    },
    AssistantApplyPending,
    AssistantDiscardPending,
    AssistantHealthChecked {
        available: bool,
    },
    CheckAssistantHealth,
    TerminalRun {
        command: String,
    },
    TerminalReset,
    ToggleTheme,
    SetFontSize {
        size: u8,
    },
    ToggleSidebar,
    DismissNotifications,
}

/// One imported entry; `content == None` marks a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub relative_path: String,
    pub content: Option<String>,
}

impl ImportEntry {
    pub fn file(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: Some(content.into()),
        }
    }

    pub fn folder(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: None,
        }
    }
}
