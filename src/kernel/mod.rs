//! Headless workspace core (state/action/effect).

pub mod action;
pub mod assistant;
pub mod documents;
pub mod effect;
pub mod error;
pub mod search;
pub mod selection;
pub mod services;
pub mod state;
pub mod store;
pub mod terminal;

pub use action::{Action, ImportEntry};
pub use assistant::{AssistantState, ChatMessage, ChatRole, PendingCodeEdit};
pub use documents::{OpenDocument, OpenDocumentSet};
pub use effect::Effect;
pub use error::{Result, WorkspaceError};
pub use search::{SearchHit, SearchOptions, SearchState};
pub use selection::{CapturedSelection, SelectionController, TextRange};
pub use state::{AppState, HistoryKey, Notification, NotificationLevel};
pub use store::{DispatchResult, Store};
pub use terminal::{CommandOutput, Terminal};
