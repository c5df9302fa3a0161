//! Target directory for new nodes and the captured code selection.

use crate::models::NodeId;

/// Byte range inside a document at capture time; informational only, the
/// captured text is matched by containment later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSelection {
    pub document_id: NodeId,
    pub range: TextRange,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected_directory: Option<NodeId>,
    captured: Option<CapturedSelection>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selecting the already-selected folder clears the selection.
    pub fn select_directory(&mut self, id: Option<NodeId>) -> Option<NodeId> {
        self.selected_directory = match id {
            Some(id) if self.selected_directory == Some(id) => None,
            other => other,
        };
        self.selected_directory
    }

    pub fn selected_directory(&self) -> Option<NodeId> {
        self.selected_directory
    }

    /// Empty text clears any previous capture.
    pub fn capture_selection(&mut self, document_id: NodeId, range: TextRange, raw_text: &str) {
        if raw_text.is_empty() {
            self.captured = None;
            return;
        }
        self.captured = Some(CapturedSelection {
            document_id,
            range,
            text: raw_text.to_string(),
        });
    }

    pub fn captured(&self) -> Option<&CapturedSelection> {
        self.captured.as_ref()
    }

    pub fn clear_captured(&mut self) -> bool {
        self.captured.take().is_some()
    }

    /// Drops references to nodes that no longer exist.
    pub fn forget_removed(&mut self, removed: &[NodeId]) -> bool {
        let mut changed = false;
        if self
            .selected_directory
            .is_some_and(|id| removed.contains(&id))
        {
            self.selected_directory = None;
            changed = true;
        }
        if self
            .captured
            .as_ref()
            .is_some_and(|c| removed.contains(&c.document_id))
        {
            self.captured = None;
            changed = true;
        }
        changed
    }
}
