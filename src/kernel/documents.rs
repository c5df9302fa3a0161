//! Open documents (tabs) and the active-document cursor.
//!
//! Documents are keyed by node id, never by path, so they stay attached
//! across renames and moves. Each entry caches name/path/content for display;
//! the store refreshes the cache whenever it mutates the matching node.

use crate::models::{Node, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub id: NodeId,
    pub name: String,
    pub path: String,
    pub content: String,
}

impl OpenDocument {
    /// `None` for folders.
    pub fn from_node(node: &Node) -> Option<Self> {
        let content = node.content()?;
        Some(Self {
            id: node.id(),
            name: node.name().to_string(),
            path: node.path().to_string(),
            content: content.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct OpenDocumentSet {
    documents: Vec<OpenDocument>,
    active: Option<NodeId>,
}

impl OpenDocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the document if absent, then makes it active.
    ///
    /// Returns `true` when a new tab was added.
    pub fn open(&mut self, document: OpenDocument) -> bool {
        let id = document.id;
        let added = if self.contains(id) {
            false
        } else {
            self.documents.push(document);
            true
        };
        self.active = Some(id);
        added
    }

    /// Closing the active document activates the preceding tab, else the
    /// first remaining one, else nothing.
    pub fn close(&mut self, id: NodeId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.documents.remove(index);

        if self.active == Some(id) {
            let next = index
                .checked_sub(1)
                .and_then(|prev| self.documents.get(prev))
                .or_else(|| self.documents.first());
            self.active = next.map(|doc| doc.id);
        }
        true
    }

    /// Closes every document whose node was removed. If the active document
    /// was among them, the first remaining document becomes active.
    pub fn close_removed(&mut self, removed: &[NodeId]) -> Vec<NodeId> {
        let mut closed = Vec::new();
        self.documents.retain(|doc| {
            if removed.contains(&doc.id) {
                closed.push(doc.id);
                false
            } else {
                true
            }
        });

        if self.active.is_some_and(|id| closed.contains(&id)) {
            self.active = self.documents.first().map(|doc| doc.id);
        }
        closed
    }

    pub fn set_active(&mut self, id: NodeId) -> bool {
        if !self.contains(id) || self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Refreshes the cached name/path from the tree node, if open.
    pub fn refresh(&mut self, node: &Node) -> bool {
        let Some(doc) = self.get_mut(node.id()) else {
            return false;
        };
        if doc.name == node.name() && doc.path == node.path() {
            return false;
        }
        doc.name = node.name().to_string();
        doc.path = node.path().to_string();
        true
    }

    pub fn set_content(&mut self, id: NodeId, content: &str) -> bool {
        match self.get_mut(id) {
            Some(doc) if doc.content != content => {
                doc.content = content.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn active_id(&self) -> Option<NodeId> {
        self.active
    }

    pub fn active(&self) -> Option<&OpenDocument> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&OpenDocument> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut OpenDocument> {
        self.documents.iter_mut().find(|doc| doc.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/documents.rs"]
mod tests;
