use crate::kernel::assistant::{
    self, apply_replacement, chat_context, extract_code_block, ChatMessage, PendingCodeEdit,
    ERROR_REPLY,
};
use crate::kernel::error::{Result, WorkspaceError};
use crate::kernel::services::ports::{AssistantError, GenerateRequest};
use crate::kernel::Effect;

impl super::Store {
    fn ensure_assistant_ready(&self) -> Result<()> {
        if !self.state.assistant.available {
            return Err(WorkspaceError::AssistantUnavailable);
        }
        if self.state.assistant.busy {
            return Err(WorkspaceError::Busy);
        }
        Ok(())
    }

    /// Free-form chat prompt. Blank prompts are ignored.
    pub fn submit_prompt(&mut self, prompt: &str) -> Result<Option<Effect>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(None);
        }
        self.ensure_assistant_ready()?;

        let context = chat_context(prompt, self.state.documents.active());
        let request = GenerateRequest::new(prompt).with_context(context);
        self.state.assistant.messages.push(ChatMessage::user(prompt));
        let request_id = self.state.assistant.begin_request();

        tracing::info!(request_id, "assistant prompt submitted");
        Ok(Some(Effect::AssistantGenerate {
            request_id,
            request,
        }))
    }

    /// Asks the assistant to rewrite the captured selection.
    ///
    /// The captured text becomes the pending edit's origin snapshot and is
    /// embedded verbatim in the prompt.
    pub fn request_modification(&mut self, instruction: &str) -> Result<Effect> {
        let captured = self
            .state
            .selection
            .captured()
            .ok_or(WorkspaceError::NoSelection)?;
        let document = self
            .state
            .documents
            .get(captured.document_id)
            .ok_or(WorkspaceError::NoSelection)?;
        self.ensure_assistant_ready()?;

        let instruction = instruction.trim().to_string();
        let origin = captured.text.clone();
        let target = document.id;
        let language = assistant::language_for_path(&document.path);
        let request = GenerateRequest::new(assistant::modification_prompt(
            &origin,
            &instruction,
            language,
        ))
        .with_context(Some(assistant::modification_context(document)))
        .with_code_to_modify(origin.as_str());
        let display = assistant::modification_display(&origin, &instruction, language);

        self.state.assistant.messages.push(ChatMessage::user(display));
        let request_id = self.state.assistant.begin_request();
        self.state.assistant.pending = Some(PendingCodeEdit {
            request_id,
            target_document_id: target,
            origin_snapshot: origin,
            instruction,
            proposed_replacement: None,
        });

        tracing::info!(request_id, document = ?target, "assistant modification requested");
        Ok(Effect::AssistantGenerate {
            request_id,
            request,
        })
    }

    /// Handles a backend response. Responses for requests that are no longer
    /// in flight are ignored (`Ok(false)`).
    pub fn complete_request(
        &mut self,
        request_id: u64,
        result: std::result::Result<String, AssistantError>,
    ) -> Result<bool> {
        if !self.state.assistant.finish_request(request_id) {
            tracing::debug!(request_id, "ignoring stale assistant response");
            return Ok(false);
        }
        let pending_matches = self
            .state
            .assistant
            .pending
            .as_ref()
            .is_some_and(|p| p.request_id == request_id);

        let text = match result {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(request_id, error = %err, "assistant request failed");
                self.state
                    .assistant
                    .messages
                    .push(ChatMessage::assistant(ERROR_REPLY));
                if pending_matches {
                    self.state.assistant.pending = None;
                }
                return Err(err.into());
            }
        };

        let proposal = pending_matches.then(|| extract_code_block(&text));
        self.state
            .assistant
            .messages
            .push(ChatMessage::assistant(text));

        match proposal {
            Some(Some(code)) => {
                if let Some(pending) = self.state.assistant.pending.as_mut() {
                    pending.proposed_replacement = Some(code);
                }
                Ok(true)
            }
            Some(None) => {
                self.state.assistant.pending = None;
                Err(WorkspaceError::NoCodeBlockFound)
            }
            None => Ok(true),
        }
    }

    /// Applies the proposed replacement to the target document's current
    /// content through the regular edit path.
    pub fn apply_pending_edit(&mut self) -> Result<()> {
        let Some((target, origin, replacement)) = self
            .state
            .assistant
            .pending
            .as_ref()
            .and_then(|p| {
                let replacement = p.proposed_replacement.clone()?;
                Some((p.target_document_id, p.origin_snapshot.clone(), replacement))
            })
        else {
            return Err(WorkspaceError::NoPendingEdit);
        };

        let current = match self.export_document(target) {
            Ok(current) => current,
            Err(err) => {
                self.state.assistant.pending = None;
                return Err(err);
            }
        };
        let updated = match apply_replacement(&current, &origin, &replacement) {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(document = ?target, "captured selection is stale");
                self.state.assistant.pending = None;
                return Err(err);
            }
        };

        self.edit(target, &updated)?;
        self.state.assistant.pending = None;
        self.state.selection.clear_captured();
        tracing::info!(document = ?target, "assistant edit applied");
        Ok(())
    }

    pub fn discard_pending_edit(&mut self) -> Result<()> {
        self.state
            .assistant
            .pending
            .take()
            .map(|_| ())
            .ok_or(WorkspaceError::NoPendingEdit)
    }

    pub fn set_assistant_available(&mut self, available: bool) -> bool {
        if self.state.assistant.available == available {
            return false;
        }
        tracing::info!(available, "assistant availability changed");
        self.state.assistant.available = available;
        true
    }
}
