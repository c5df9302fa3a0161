//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod assistant;
pub mod paths;
pub mod runtime;
pub mod settings;

pub use assistant::HttpAssistant;
pub use paths::{ensure_log_dir, get_app_data_dir, get_log_dir};
pub use runtime::AsyncRuntime;
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, save_preferences, SettingsError,
};
