use crate::kernel::action::ImportEntry;
use crate::kernel::documents::OpenDocument;
use crate::kernel::error::{Result, WorkspaceError};
use crate::kernel::state::HistoryKey;
use crate::models::{path, NodeId, TargetError};

impl super::Store {
    /// Creates a file and opens it.
    pub fn create_file(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        content: impl Into<String>,
    ) -> Result<NodeId> {
        let id = self.state.tree.create_file(parent, name, content)?;
        if let Some(parent) = parent {
            self.state.tree.expand(parent);
        }
        tracing::debug!(?id, ?parent, name, "file created");
        self.open(id)?;
        Ok(id)
    }

    pub fn create_folder(&mut self, parent: Option<NodeId>, name: &str) -> Result<NodeId> {
        let id = self.state.tree.create_folder(parent, name)?;
        if let Some(parent) = parent {
            self.state.tree.expand(parent);
        }
        tracing::debug!(?id, ?parent, name, "folder created");
        Ok(id)
    }

    /// Creates a file with a starter template under the selected directory.
    pub fn new_file(&mut self, name: &str) -> Result<NodeId> {
        let parent = self.state.selection.selected_directory();
        let normalized =
            path::normalize_name(name).ok_or_else(|| WorkspaceError::InvalidName(name.to_string()))?;
        let content = starter_template(normalized);
        self.create_file(parent, normalized, content)
    }

    pub fn new_folder(&mut self, name: &str) -> Result<NodeId> {
        let parent = self.state.selection.selected_directory();
        self.create_folder(parent, name)
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<()> {
        let rewritten = self.state.tree.rename(id, name)?;
        self.refresh_documents(&rewritten);
        tracing::debug!(?id, rewritten = rewritten.len(), "node renamed");
        Ok(())
    }

    /// Moves `id` under `destination` (`None` = root).
    pub fn move_node(&mut self, id: NodeId, destination: Option<NodeId>) -> Result<()> {
        let rewritten = self.state.tree.move_to(id, destination)?;
        if let Some(destination) = destination {
            self.state.tree.expand(destination);
        }
        self.refresh_documents(&rewritten);
        tracing::debug!(?id, ?destination, rewritten = rewritten.len(), "node moved");
        Ok(())
    }

    /// Removes the subtree and everything attached to it: open documents,
    /// histories, selection and any pending assistant edit.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let removed = self.state.tree.remove(id)?;

        let closed = self.state.documents.close_removed(&removed);
        self.state.selection.forget_removed(&removed);
        for node in &removed {
            self.state.histories.remove(&HistoryKey::Document(*node));
        }
        if self
            .state
            .assistant
            .pending
            .as_ref()
            .is_some_and(|p| removed.contains(&p.target_document_id))
        {
            self.state.assistant.pending = None;
        }

        tracing::debug!(?id, removed = removed.len(), closed = closed.len(), "node removed");
        Ok(removed)
    }

    /// Replays an import batch under `parent`.
    ///
    /// The whole batch is validated first, then entries are created parents
    /// first; missing intermediate folders are created on the way. Imported
    /// files are not opened. Returns the ids of every created node.
    pub fn import_entries(
        &mut self,
        parent: Option<NodeId>,
        entries: &[ImportEntry],
    ) -> Result<Vec<NodeId>> {
        if let Some(parent) = parent {
            if !self.state.tree.find_by_id(parent)?.is_folder() {
                return Err(WorkspaceError::InvalidTarget(TargetError::NotAFolder));
            }
        }

        let mut batch: Vec<(Vec<&str>, &ImportEntry)> = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut components = Vec::new();
            for raw in path::components(&entry.relative_path) {
                let name = path::normalize_name(raw)
                    .ok_or_else(|| WorkspaceError::InvalidName(entry.relative_path.clone()))?;
                components.push(name);
            }
            if components.is_empty() {
                return Err(WorkspaceError::InvalidName(entry.relative_path.clone()));
            }
            batch.push((components, entry));
        }
        batch.sort_by_key(|(components, _)| components.len());

        let mut created = Vec::new();
        for (components, entry) in batch {
            let Some((leaf, folders)) = components.split_last() else {
                continue;
            };
            let mut current = parent;
            for folder in folders {
                current = Some(match self.child_folder(current, folder) {
                    Some(existing) => existing,
                    None => {
                        let id = self.state.tree.create_folder(current, folder)?;
                        created.push(id);
                        id
                    }
                });
            }
            let id = match &entry.content {
                Some(content) => Some(self.state.tree.create_file(current, leaf, content.clone())?),
                None if self.child_folder(current, leaf).is_some() => None,
                None => Some(self.state.tree.create_folder(current, leaf)?),
            };
            created.extend(id);
        }

        tracing::info!(entries = entries.len(), created = created.len(), "import finished");
        Ok(created)
    }

    /// Exported text of a file: the open document's cache when open,
    /// otherwise the tree content.
    pub fn export_document(&self, id: NodeId) -> Result<String> {
        if let Some(doc) = self.state.documents.get(id) {
            return Ok(doc.content.clone());
        }
        self.state
            .tree
            .find_by_id(id)?
            .content()
            .map(str::to_string)
            .ok_or(WorkspaceError::InvalidTarget(TargetError::NotAFile))
    }

    fn child_folder(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        let siblings = match parent {
            Some(parent) => self.state.tree.get(parent)?.children(),
            None => self.state.tree.roots(),
        };
        siblings.iter().copied().find(|&id| {
            self.state
                .tree
                .get(id)
                .is_some_and(|node| node.is_folder() && node.name() == name)
        })
    }

    fn refresh_documents(&mut self, ids: &[NodeId]) {
        for &id in ids {
            if let Some(node) = self.state.tree.get(id) {
                self.state.documents.refresh(node);
            }
        }
    }

    pub(super) fn open_document_from_tree(&mut self, id: NodeId) -> Result<bool> {
        let node = self.state.tree.find_by_id(id)?;
        let doc = OpenDocument::from_node(node)
            .ok_or(WorkspaceError::InvalidTarget(TargetError::NotAFile))?;
        Ok(self.state.documents.open(doc))
    }
}

/// Initial content for a new file, chosen by extension.
pub fn starter_template(name: &str) -> String {
    match path::extension(name).unwrap_or_default() {
        "js" => format!(
            "// {name}\n\n/**\n * Main function\n */\nfunction main() {{\n  console.log(\"Hello from {name}!\");\n}}\n\nmain();"
        ),
        "ts" => format!(
            "// {name}\n\n/**\n * Main function\n */\nfunction main(): void {{\n  console.log(\"Hello from {name}!\");\n}}\n\nmain();"
        ),
        "jsx" | "tsx" => "import React from 'react';\n\ninterface Props {\n  name?: string;\n}\n\nexport default function Component({ name = \"World\" }: Props) {\n  return (\n    <div>\n      <h1>Hello, {name}!</h1>\n    </div>\n  );\n}\n".to_string(),
        "html" => format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <title>{name}</title>\n</head>\n<body>\n  <h1>Hello World</h1>\n</body>\n</html>"
        ),
        "css" => format!(
            "/* {name} */\n\nbody {{\n  font-family: Arial, sans-serif;\n  margin: 0;\n  padding: 20px;\n  line-height: 1.6;\n}}"
        ),
        "json" => "{\n  \"name\": \"example\",\n  \"version\": \"1.0.0\",\n  \"description\": \"Example JSON file\"\n}".to_string(),
        "py" => format!(
            "# {name}\n\ndef main():\n    print(\"Hello from {name}!\")\n\nif __name__ == \"__main__\":\n    main()"
        ),
        _ => format!("// New file: {name}\n"),
    }
}
