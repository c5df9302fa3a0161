//! Assistant protocol: request formatting, response parsing and the
//! code-apply rule. No IO here; the call itself goes through
//! `services::ports::AssistantBridge`.

use regex::Regex;
use std::sync::OnceLock;

use crate::kernel::documents::OpenDocument;
use crate::kernel::error::{Result, WorkspaceError};
use crate::models::{path, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// In-flight assistant-driven modification of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCodeEdit {
    pub request_id: u64,
    pub target_document_id: NodeId,
    pub origin_snapshot: String,
    pub instruction: String,
    pub proposed_replacement: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssistantState {
    /// Set while a request is outstanding; new submissions are rejected.
    pub busy: bool,
    pub available: bool,
    pub in_flight: Option<u64>,
    pub pending: Option<PendingCodeEdit>,
    pub messages: Vec<ChatMessage>,
    next_request_id: u64,
}

impl Default for AssistantState {
    fn default() -> Self {
        Self {
            busy: false,
            available: true,
            in_flight: None,
            pending: None,
            messages: Vec::new(),
            next_request_id: 1,
        }
    }
}

impl AssistantState {
    pub fn begin_request(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.busy = true;
        self.in_flight = Some(id);
        id
    }

    pub fn finish_request(&mut self, request_id: u64) -> bool {
        if self.in_flight != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        self.busy = false;
        true
    }
}

pub const ERROR_REPLY: &str =
    "Sorry, there was an error processing your request. Please try again.";

fn code_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:[\w-]*\n)?(.*?)```").expect("code block regex is valid")
    })
}

/// Inner text of the first fenced code block, trimmed. Empty blocks count as
/// no block.
pub fn extract_code_block(response: &str) -> Option<String> {
    let captures = code_block_regex().captures(response)?;
    let code = captures.get(1)?.as_str().trim();
    (!code.is_empty()).then(|| code.to_string())
}

pub fn language_for_path(file_path: &str) -> &'static str {
    let ext = path::extension(path::file_name(file_path)).unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "cs" => "csharp",
        "rs" => "rust",
        "html" | "htm" => "html",
        "css" => "css",
        "json" => "json",
        "md" => "markdown",
        _ => "plaintext",
    }
}

/// Prompt sent to the backend for a modification request.
pub fn modification_prompt(origin: &str, instruction: &str, language: &str) -> String {
    format!(
        "Original Code:\n```{language}\n{origin}\n```\n\n\
         User Request: {instruction}\n\n\
         Please provide the following response structure:\n\
         1.  **Modified Code:** Enclose the complete modified code snippet within a single markdown code block (```language ... ```).\n\
         2.  **Explanation:** Provide a clear explanation with these sections:\n    \
         *   **What the code does:** Describe the functionality of the modified code.\n    \
         *   **How it improves the original:** Explain the specific improvements made compared to the original code.\n    \
         *   **Why the change was made:** Justify the reasoning behind the modifications."
    )
}

/// Transcript entry shown to the user for a modification request.
pub fn modification_display(origin: &str, instruction: &str, language: &str) -> String {
    format!("Looking at the following code:\n```{language}\n{origin}\n```\n\nMy request: {instruction}")
}

pub fn modification_context(document: &OpenDocument) -> String {
    format!(
        "Active file: {}\nThis is a code modification request. Follow the requested response structure carefully.",
        document.path
    )
}

/// Whether a free-form prompt talks about the active document.
pub fn refers_to_document(prompt: &str, document: &OpenDocument) -> bool {
    let prompt = prompt.to_lowercase();
    ["this file", "the file", "current file", "this code", "the code", "above code"]
        .iter()
        .any(|phrase| prompt.contains(phrase))
        || prompt.contains(&document.path.to_lowercase())
        || prompt.contains(&document.name.to_lowercase())
}

/// Context for a free-form prompt: the active file path, plus its content
/// when the prompt refers to it.
pub fn chat_context(prompt: &str, active: Option<&OpenDocument>) -> Option<String> {
    let document = active?;
    let mut context = format!("Active file: {}\n", document.path);
    if refers_to_document(prompt, document) {
        let language = language_for_path(&document.path);
        context.push_str(&format!(
            "\nFile content:\n```{language}\n{}\n```\n",
            document.content
        ));
    }
    Some(context)
}

/// Replaces `origin` inside `current`.
///
/// Whole-content equality replaces everything; otherwise only the first
/// occurrence is substituted. A missing origin is a stale selection.
pub fn apply_replacement(current: &str, origin: &str, replacement: &str) -> Result<String> {
    if current == origin {
        return Ok(replacement.to_string());
    }
    if origin.is_empty() {
        return Err(WorkspaceError::StaleSelection);
    }
    match current.find(origin) {
        Some(start) => {
            let mut result =
                String::with_capacity(current.len() - origin.len() + replacement.len());
            result.push_str(&current[..start]);
            result.push_str(replacement);
            result.push_str(&current[start + origin.len()..]);
            Ok(result)
        }
        None => Err(WorkspaceError::StaleSelection),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/assistant.rs"]
mod tests;
