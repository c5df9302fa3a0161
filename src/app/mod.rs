//! 应用层：把文本命令翻译成内核动作

pub mod shell;

pub use shell::{parse, Shell, ShellCommand, ShellError};
