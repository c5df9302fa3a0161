//! codeforge - 代码编辑器外壳的无界面核心
//!
//! 模块结构：
//! - models: 数据模型（FileTree, EditHistory, 路径工具）
//! - kernel: 状态/动作/副作用（Store, OpenDocumentSet, 助手协议, 搜索, 终端）
//! - kernel::services: 端口与适配器（AssistantBridge, HttpAssistant, 设置, 运行时）
//! - app: 命令行外壳

pub mod app;
pub mod kernel;
pub mod models;
