//! Centralized coordination options with TOML preset support.
//!
//! Everything that used to be a loosely-shaped option blob in the front-end
//! (window radius, viewer toggles, palette, endpoint, key bindings) lives
//! here as explicit structs. Options serialize to/from TOML so sessions can
//! be started from presets.

mod colors;
mod keybindings;
mod selection;
mod source;
mod viewer;

use std::path::Path;

pub use colors::ColorOptions;
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
pub use selection::SelectionOptions;
use serde::{Deserialize, Serialize};
pub use source::SourceOptions;
pub use viewer::ViewerOptions;

use crate::error::MsalinkError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[selection]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Hover/lock window parameters.
    pub selection: SelectionOptions,
    /// Structure viewer toggles.
    pub viewer: ViewerOptions,
    /// REST endpoint parameters.
    pub source: SourceOptions,
    /// Color palette options.
    pub colors: ColorOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, MsalinkError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| MsalinkError::OptionsParse(e.to_string()))?;
        options.keybindings.fill_defaults();
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::Io`] if the file cannot be read,
    /// [`MsalinkError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, MsalinkError> {
        let content = std::fs::read_to_string(path).map_err(MsalinkError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`MsalinkError::OptionsParse`] if serialization fails,
    /// [`MsalinkError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MsalinkError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MsalinkError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MsalinkError::Io)?;
        }
        std::fs::write(path, content).map_err(MsalinkError::Io)
    }
}
