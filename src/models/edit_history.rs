//! 编辑历史（线性快照）
//!
//! 每次编辑记录一份完整内容快照：
//! - 最多保留 `limit` 份，超出时丢弃最旧的
//! - Undo 只移动游标，不删除快照
//! - Undo 之后的新编辑会丢弃游标之后的快照（没有分支）

use std::collections::VecDeque;

/// 默认快照上限
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Clone, Debug)]
pub struct EditHistoryConfig {
    pub limit: usize,
}

impl Default for EditHistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EditHistory {
    snapshots: VecDeque<String>,
    /// 当前快照下标；`snapshots` 为空时无意义
    cursor: usize,
    config: EditHistoryConfig,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_config(EditHistoryConfig::default())
    }

    pub fn with_config(config: EditHistoryConfig) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            config: EditHistoryConfig {
                limit: config.limit.max(1),
            },
        }
    }

    /// 记录一份新快照，成为当前位置
    pub fn push(&mut self, content: impl Into<String>) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push_back(content.into());
        while self.snapshots.len() > self.config.limit {
            self.snapshots.pop_front();
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// 回到上一份快照并返回其内容；没有更早的快照时返回 `None`
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor).map(String::as_str)
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.cursor > 0
    }

    pub fn current(&self) -> Option<&str> {
        self.snapshots.get(self.cursor).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.config.limit
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/edit_history.rs"]
mod tests;
