use crate::kernel::services::ports::{GenerateRequest, Preferences};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AssistantGenerate {
        request_id: u64,
        request: GenerateRequest,
    },
    CheckAssistantHealth,
    PersistPreferences(Preferences),
}
