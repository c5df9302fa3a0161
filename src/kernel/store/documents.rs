use crate::kernel::error::{Result, WorkspaceError};
use crate::kernel::search::{self, SearchHit, SearchOptions};
use crate::kernel::selection::TextRange;
use crate::kernel::state::HistoryKey;
use crate::kernel::terminal::TerminalContext;
use crate::models::{NodeId, TargetError};

impl super::Store {
    /// Opens a file node (or just activates it when already open).
    ///
    /// The first open seeds the document's history with its content so the
    /// first edit can be undone.
    pub fn open(&mut self, id: NodeId) -> Result<()> {
        let added = self.open_document_from_tree(id)?;
        let key = HistoryKey::Document(id);
        if !self.state.histories.contains_key(&key) {
            let content = self.current_content(key).unwrap_or_default().to_string();
            self.state.history_mut(key).push(content);
        }
        tracing::debug!(?id, added, "document opened");
        Ok(())
    }

    pub fn close(&mut self, id: NodeId) -> Result<()> {
        if !self.state.documents.close(id) {
            return Err(WorkspaceError::NotFound);
        }
        tracing::debug!(?id, active = ?self.state.documents.active_id(), "document closed");
        Ok(())
    }

    pub fn activate(&mut self, id: NodeId) -> Result<bool> {
        if !self.state.documents.contains(id) {
            return Err(WorkspaceError::NotFound);
        }
        Ok(self.state.documents.set_active(id))
    }

    /// The single write path for document content.
    ///
    /// Records an undo snapshot under the document's key, updates the open
    /// document cache (if any) and writes through to the tree node.
    pub fn edit(&mut self, id: NodeId, content: &str) -> Result<bool> {
        let node = self.state.tree.find_by_id(id)?;
        let Some(current) = node.content() else {
            return Err(WorkspaceError::InvalidTarget(TargetError::NotAFile));
        };
        if current == content {
            return Ok(false);
        }
        self.record_snapshot(HistoryKey::Document(id), content);
        self.write_content(HistoryKey::Document(id), content)?;
        Ok(true)
    }

    /// Edits the active document, or the scratch buffer when none is open.
    pub fn edit_active(&mut self, content: &str) -> Result<bool> {
        match self.state.documents.active_id() {
            Some(id) => self.edit(id, content),
            None => {
                if self.state.scratch == content {
                    return Ok(false);
                }
                self.record_snapshot(HistoryKey::Scratch, content);
                self.write_content(HistoryKey::Scratch, content)?;
                Ok(true)
            }
        }
    }

    /// Steps the active history back one snapshot. No-op without an earlier
    /// snapshot.
    pub fn undo(&mut self) -> Result<bool> {
        let key = self.state.active_history_key();
        let Some(content) = self
            .state
            .histories
            .get_mut(&key)
            .and_then(|history| history.undo())
            .map(str::to_string)
        else {
            return Ok(false);
        };
        self.write_content(key, &content)?;
        tracing::debug!(?key, "undo applied");
        Ok(true)
    }

    pub fn select_directory(&mut self, id: Option<NodeId>) -> Result<Option<NodeId>> {
        if let Some(id) = id {
            if !self.state.tree.find_by_id(id)?.is_folder() {
                return Err(WorkspaceError::InvalidTarget(TargetError::NotAFolder));
            }
        }
        Ok(self.state.selection.select_directory(id))
    }

    /// Captures `text` from the active document for a later modification
    /// request. Empty text clears the capture.
    pub fn capture_selection(&mut self, range: TextRange, text: &str) -> Result<()> {
        let id = self
            .state
            .documents
            .active_id()
            .ok_or(WorkspaceError::NotFound)?;
        self.state.selection.capture_selection(id, range, text);
        Ok(())
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        search::search(&self.state.tree, &self.state.documents, query, options)
    }

    pub fn terminal_run(&mut self, command: &str) -> bool {
        let state = &mut self.state;
        let ctx = TerminalContext {
            active_document: state.documents.active().map(|doc| doc.name.as_str()),
            tree: &state.tree,
        };
        state.terminal.submit(command, ctx)
    }

    /// Steps through terminal history (`older` = towards the oldest entry).
    pub fn terminal_recall(&mut self, older: bool) -> Option<String> {
        let terminal = &mut self.state.terminal;
        let recalled = if older {
            terminal.previous_command()
        } else {
            terminal.next_command()
        };
        recalled.map(str::to_string)
    }

    fn current_content(&self, key: HistoryKey) -> Option<&str> {
        match key {
            HistoryKey::Document(id) => self
                .state
                .documents
                .get(id)
                .map(|doc| doc.content.as_str())
                .or_else(|| self.state.tree.get(id).and_then(|node| node.content())),
            HistoryKey::Scratch => Some(self.state.scratch.as_str()),
        }
    }

    /// An empty history gets the pre-edit content as its baseline first.
    fn record_snapshot(&mut self, key: HistoryKey, content: &str) {
        let baseline = self
            .state
            .history(key)
            .map_or(true, |history| history.is_empty())
            .then(|| self.current_content(key).unwrap_or_default().to_string());
        let history = self.state.history_mut(key);
        if let Some(baseline) = baseline {
            history.push(baseline);
        }
        history.push(content);
    }

    /// Writes content without touching history.
    fn write_content(&mut self, key: HistoryKey, content: &str) -> Result<()> {
        match key {
            HistoryKey::Document(id) => {
                self.state.tree.set_content(id, content)?;
                self.state.documents.set_content(id, content);
            }
            HistoryKey::Scratch => self.state.scratch = content.to_string(),
        }
        Ok(())
    }
}
