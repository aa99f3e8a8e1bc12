//! Converts raw UI events into session commands.
//!
//! The `InputProcessor` owns the key-binding map and nothing else; the
//! selection state it needs to interpret clicks is passed in per event.
//! It is the only thing that sits between raw UI callbacks and
//! [`Session::execute`](crate::session::Session::execute).

use super::event::{InputEvent, KeyAction};
use crate::options::KeybindingOptions;
use crate::selection::{SelectionMode, SelectionState};
use crate::session::SessionCommand;

impl KeyAction {
    /// Convert to the corresponding parameterless [`SessionCommand`].
    fn to_command(self) -> SessionCommand {
        match self {
            Self::Unlock => SessionCommand::Unlock,
            Self::Dehover => SessionCommand::Dehover,
            Self::ToggleLigands => SessionCommand::ToggleLigands,
        }
    }
}

/// Parse a feature-widget hover label (`"42A"`) into a 0-based column.
///
/// The trailing one-letter code is dropped and the remaining residue number
/// is taken as 1-based.
#[must_use]
pub fn parse_feature_label(label: &str) -> Option<i64> {
    let digits = label
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let residue: i64 = digits.parse().ok()?;
    (residue >= 1).then(|| residue - 1)
}

/// Converts raw UI events into [`SessionCommand`]s.
///
/// # Usage
///
/// ```ignore
/// for event in ui_events {
///     if let Some(cmd) =
///         processor.handle_event(event, &session.selection_state())
///     {
///         session.execute(cmd)?;
///     }
/// }
/// ```
pub struct InputProcessor {
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_bindings: KeybindingOptions::default(),
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self { key_bindings }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeybindingOptions {
        &mut self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, code: &str) -> Option<SessionCommand> {
        self.key_bindings.lookup(code).map(KeyAction::to_command)
    }

    /// Process a raw input event and return zero or one commands.
    ///
    /// `selection` is the current selection snapshot; a click on the
    /// focused column of a locked selection releases the lock instead of
    /// re-locking it.
    pub fn handle_event(
        &self,
        event: InputEvent,
        selection: &SelectionState,
    ) -> Option<SessionCommand> {
        match event {
            InputEvent::ColumnEnter { column } => {
                Some(SessionCommand::HoverColumn { column })
            }
            InputEvent::ColumnLeave => Some(SessionCommand::Dehover),
            InputEvent::ColumnClick { column } => {
                let unlock = selection.mode == SelectionMode::Locked
                    && selection.focus_column == column;
                Some(if unlock {
                    SessionCommand::Unlock
                } else {
                    SessionCommand::LockColumn { column }
                })
            }
            InputEvent::ChainRowClick { row } => {
                Some(SessionCommand::ToggleChainAt { row })
            }
            InputEvent::FeatureHover { label } => {
                let column = parse_feature_label(&label);
                if column.is_none() {
                    log::debug!("ignoring feature hover label {label:?}");
                }
                column.map(|column| SessionCommand::HoverColumn { column })
            }
            InputEvent::Key { code } => self.handle_key_press(&code),
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}
