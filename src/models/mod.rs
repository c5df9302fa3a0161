//! 数据模型层

pub mod edit_history;
pub mod file_tree;
pub mod path;

pub use edit_history::{EditHistory, EditHistoryConfig, DEFAULT_HISTORY_LIMIT};
pub use file_tree::{
    FileTree, FileTreeError, FileTreeRow, Node, NodeId, NodeKind, PreOrder, TargetError,
};
