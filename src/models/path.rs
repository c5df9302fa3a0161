//! 虚拟路径工具
//!
//! 工作区路径是 `/` 连接的名字序列，根节点的路径就是它自己的名字。
//! 这里只有纯函数，不持有任何状态。

use std::borrow::Cow;

pub const SEPARATOR: char = '/';

/// 父路径 + 名字；`parent` 为 `None` 或空串时返回名字本身
pub fn join(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => {
            let mut path = String::with_capacity(parent.len() + 1 + name.len());
            path.push_str(parent);
            path.push(SEPARATOR);
            path.push_str(name);
            path
        }
        _ => name.to_string(),
    }
}

pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

pub fn file_name(path: &str) -> &str {
    path.rsplit_once(SEPARATOR)
        .map(|(_, name)| name)
        .unwrap_or(path)
}

pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|c| !c.is_empty())
}

pub fn depth(path: &str) -> usize {
    components(path).count()
}

/// 最后一个 `.` 之后的部分（非空才算扩展名）
///
/// `.env` 的扩展名是 `env`，`Makefile` 没有扩展名。
pub fn extension(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// 重命名文件时保留扩展名：旧名有扩展名、新名不含 `.` 时补上旧扩展名
pub fn preserve_extension<'a>(old_name: &str, new_name: &'a str) -> Cow<'a, str> {
    match extension(old_name) {
        Some(ext) if !new_name.contains('.') => Cow::Owned(format!("{new_name}.{ext}")),
        _ => Cow::Borrowed(new_name),
    }
}

/// 规范化节点名：去掉首尾空白，拒绝空名和包含分隔符的名字
pub fn normalize_name(name: &str) -> Option<&str> {
    let name = name.trim();
    if name.is_empty() || name.contains(SEPARATOR) {
        return None;
    }
    Some(name)
}

#[cfg(test)]
#[path = "../../tests/unit/models/path.rs"]
mod tests;
