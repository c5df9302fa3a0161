//! 文件树数据模型
//!
//! 节点存放在 slotmap 里，`NodeId` 在节点的整个生命周期内不变，
//! 删除后旧 id 不会再解析到任何节点。每个节点缓存自己的完整路径，
//! 重命名 / 移动时立即重写整棵子树的路径，不做惰性失效。

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use thiserror::Error;

use super::path;

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetError {
    NotAFolder,
    NotAFile,
    MoveIntoSelf,
    MoveIntoDescendant,
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetError::NotAFolder => write!(f, "target is not a folder"),
            TargetError::NotAFile => write!(f, "target is not a file"),
            TargetError::MoveIntoSelf => write!(f, "cannot move a node into itself"),
            TargetError::MoveIntoDescendant => {
                write!(f, "cannot move a node into its own subtree")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileTreeError {
    #[error("node not found")]
    NotFound,
    #[error("invalid target: {0}")]
    InvalidTarget(TargetError),
    #[error("invalid name {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, FileTreeError>;

#[derive(Debug, Clone)]
enum NodeData {
    File { content: String },
    Folder { children: Vec<NodeId> },
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: CompactString,
    path: String,
    parent: Option<NodeId>,
    data: NodeData,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::File { .. } => NodeKind::File,
            NodeData::Folder { .. } => NodeKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.data, NodeData::Folder { .. })
    }

    /// 文件内容；文件夹返回 `None`
    pub fn content(&self) -> Option<&str> {
        match &self.data {
            NodeData::File { content } => Some(content),
            NodeData::Folder { .. } => None,
        }
    }

    /// 子节点（插入顺序）；文件返回空切片
    pub fn children(&self) -> &[NodeId] {
        match &self.data {
            NodeData::File { .. } => &[],
            NodeData::Folder { children } => children,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    expanded: FxHashSet<NodeId>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn find_by_id(&self, id: NodeId) -> Result<&Node> {
        self.arena.get(id).ok_or(FileTreeError::NotFound)
    }

    /// 按完整路径精确查找；同名节点时返回先序遍历中的第一个
    pub fn find_by_path(&self, path: &str) -> Result<&Node> {
        self.walk()
            .filter_map(|id| self.arena.get(id))
            .find(|node| node.path == path)
            .ok_or(FileTreeError::NotFound)
    }

    pub fn create_file(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        content: impl Into<String>,
    ) -> Result<NodeId> {
        self.insert(
            parent,
            name,
            NodeData::File {
                content: content.into(),
            },
        )
    }

    pub fn create_folder(&mut self, parent: Option<NodeId>, name: &str) -> Result<NodeId> {
        self.insert(
            parent,
            name,
            NodeData::Folder {
                children: Vec::new(),
            },
        )
    }

    fn insert(&mut self, parent: Option<NodeId>, name: &str, data: NodeData) -> Result<NodeId> {
        let name = path::normalize_name(name)
            .ok_or_else(|| FileTreeError::InvalidName(name.to_string()))?;

        let parent_path = match parent {
            Some(parent_id) => {
                let parent_node = self.arena.get(parent_id).ok_or(FileTreeError::NotFound)?;
                if !parent_node.is_folder() {
                    return Err(FileTreeError::InvalidTarget(TargetError::NotAFolder));
                }
                Some(parent_node.path.clone())
            }
            None => None,
        };

        let path = path::join(parent_path.as_deref(), name);
        let id = self.arena.insert_with_key(|id| Node {
            id,
            name: CompactString::new(name),
            path,
            parent,
            data,
        });
        if let Some(siblings) = self.children_mut(parent) {
            siblings.push(id);
        }

        debug_assert!(self.verify_paths());
        Ok(id)
    }

    /// 重命名节点并重写子树路径，返回路径被重写的节点（先序）
    ///
    /// 文件：旧名有扩展名而新名没有时，保留旧扩展名。
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<Vec<NodeId>> {
        let requested = path::normalize_name(new_name)
            .ok_or_else(|| FileTreeError::InvalidName(new_name.to_string()))?;

        let node = self.arena.get_mut(id).ok_or(FileTreeError::NotFound)?;
        let name = if node.is_folder() {
            CompactString::new(requested)
        } else {
            CompactString::new(path::preserve_extension(&node.name, requested))
        };
        node.name = name;

        let rewritten = self.rewrite_paths(id);
        debug_assert!(self.verify_paths());
        Ok(rewritten)
    }

    /// 删除节点及其整棵子树，返回被删除的节点（先序）
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let parent = self.arena.get(id).ok_or(FileTreeError::NotFound)?.parent;
        let removed = self.subtree(id);

        if let Some(siblings) = self.children_mut(parent) {
            siblings.retain(|&child| child != id);
        }
        for &node_id in &removed {
            self.arena.remove(node_id);
            self.expanded.remove(&node_id);
        }

        debug_assert!(self.verify_paths());
        Ok(removed)
    }

    /// 移动到目标文件夹（`None` 为根），追加到末尾，返回路径被重写的节点
    pub fn move_to(&mut self, id: NodeId, destination: Option<NodeId>) -> Result<Vec<NodeId>> {
        let old_parent = self.arena.get(id).ok_or(FileTreeError::NotFound)?.parent;

        if let Some(dest_id) = destination {
            if dest_id == id {
                return Err(FileTreeError::InvalidTarget(TargetError::MoveIntoSelf));
            }
            let dest = self.arena.get(dest_id).ok_or(FileTreeError::NotFound)?;
            if !dest.is_folder() {
                return Err(FileTreeError::InvalidTarget(TargetError::NotAFolder));
            }
            if self.is_ancestor(id, dest_id) {
                return Err(FileTreeError::InvalidTarget(TargetError::MoveIntoDescendant));
            }
        }

        if let Some(siblings) = self.children_mut(old_parent) {
            siblings.retain(|&child| child != id);
        }
        if let Some(siblings) = self.children_mut(destination) {
            siblings.push(id);
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = destination;
        }

        let rewritten = self.rewrite_paths(id);
        debug_assert!(self.verify_paths());
        Ok(rewritten)
    }

    pub fn set_content(&mut self, id: NodeId, new_content: impl Into<String>) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(FileTreeError::NotFound)?;
        match &mut node.data {
            NodeData::File { content } => {
                *content = new_content.into();
                Ok(())
            }
            NodeData::Folder { .. } => Err(FileTreeError::InvalidTarget(TargetError::NotAFile)),
        }
    }

    /// `ancestor` 是否是 `node` 的（严格）祖先
    pub fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.arena.get(node).and_then(|n| n.parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    /// 以 `id` 为根的子树（先序，包含自身）
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        if !self.arena.contains_key(id) {
            return Vec::new();
        }
        PreOrder::new(self, vec![id]).collect()
    }

    /// 整棵树的先序遍历
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder::new(self, self.roots.iter().rev().copied().collect())
    }

    pub fn files(&self) -> impl Iterator<Item = &Node> + '_ {
        self.walk()
            .filter_map(|id| self.arena.get(id))
            .filter(|node| !node.is_folder())
    }

    fn children_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => match &mut self.arena.get_mut(id)?.data {
                NodeData::Folder { children } => Some(children),
                NodeData::File { .. } => None,
            },
        }
    }

    fn rewrite_paths(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut rewritten = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let parent_path = self
                .arena
                .get(current)
                .and_then(|n| n.parent)
                .and_then(|p| self.arena.get(p))
                .map(|p| p.path.clone());

            let Some(node) = self.arena.get_mut(current) else {
                continue;
            };
            node.path = path::join(parent_path.as_deref(), &node.name);
            if let NodeData::Folder { children } = &node.data {
                stack.extend(children.iter().rev());
            }
            rewritten.push(current);
        }

        rewritten
    }

    /// 校验每个节点的路径都等于祖先名字的 `/` 连接，且父子链接一致
    pub fn verify_paths(&self) -> bool {
        self.arena.iter().all(|(id, node)| {
            let linked = match node.parent {
                Some(parent_id) => self
                    .arena
                    .get(parent_id)
                    .is_some_and(|parent| parent.children().contains(&id)),
                None => self.roots.contains(&id),
            };
            if !linked {
                return false;
            }

            let mut names = vec![node.name.as_str()];
            let mut current = node.parent;
            while let Some(parent_id) = current {
                let Some(parent) = self.arena.get(parent_id) else {
                    return false;
                };
                names.push(parent.name.as_str());
                current = parent.parent;
            }
            names.reverse();
            node.path == names.join("/")
        })
    }

    pub fn toggle_expand(&mut self, id: NodeId) {
        if self.arena.get(id).is_some_and(Node::is_folder) {
            if self.expanded.contains(&id) {
                self.expanded.remove(&id);
            } else {
                self.expanded.insert(id);
            }
        }
    }

    pub fn expand(&mut self, id: NodeId) {
        if self.arena.get(id).is_some_and(Node::is_folder) {
            self.expanded.insert(id);
        }
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.expanded.remove(&id);
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }
}

pub struct PreOrder<'a> {
    tree: &'a FileTree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrder<'a> {
    fn new(tree: &'a FileTree, stack: Vec<NodeId>) -> Self {
        Self { tree, stack }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.arena.get(id) {
            self.stack.extend(node.children().iter().rev());
        }
        Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: CompactString,
    pub kind: NodeKind,
    pub is_expanded: bool,
}

impl FileTree {
    /// 侧边栏展示用的扁平行：根节点始终可见，文件夹展开后才显示子节点
    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self.roots.iter().rev().map(|&id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let is_expanded = self.expanded.contains(&id);
            result.push(FileTreeRow {
                id,
                depth,
                name: node.name.clone(),
                kind: node.kind(),
                is_expanded,
            });

            if is_expanded {
                for &child in node.children().iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
