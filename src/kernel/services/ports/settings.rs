use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn editor_theme(self) -> &'static str {
        match self {
            Theme::Dark => "vs-dark",
            Theme::Light => "vs-light",
        }
    }
}

/// The persisted UI preference subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_font_size")]
    pub font_size: u8,
    #[serde(default = "default_line_height")]
    pub line_height: u8,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_sidebar_visible")]
    pub sidebar_visible: bool,
}

fn default_font_size() -> u8 {
    14
}

fn default_line_height() -> u8 {
    20
}

fn default_language() -> String {
    "javascript".to_string()
}

fn default_sidebar_visible() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: default_font_size(),
            line_height: default_line_height(),
            language: default_language(),
            sidebar_visible: default_sidebar_visible(),
        }
    }
}
