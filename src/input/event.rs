use serde::{Deserialize, Serialize};

/// UI events feeding the coordination session.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// converts them into [`SessionCommand`](crate::session::SessionCommand)
/// values.
///
/// # Example
///
/// ```ignore
/// if let Some(cmd) = processor.handle_event(
///     InputEvent::ColumnClick { column: 12 },
///     &session.selection_state(),
/// ) {
///     session.execute(cmd)?;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer entered an alignment column.
    ColumnEnter {
        /// Alignment column.
        column: i64,
    },
    /// Pointer left the alignment grid.
    ColumnLeave,
    /// An alignment column was clicked.
    ColumnClick {
        /// Alignment column.
        column: i64,
    },
    /// A chain row in the alignment listing was clicked.
    ChainRowClick {
        /// Row index in display order.
        row: usize,
    },
    /// The feature-track widget reported a hover. The label is a residue
    /// number followed by a one-letter code, e.g. `"42A"`.
    FeatureHover {
        /// Raw label from the widget.
        label: String,
    },
    /// A key was pressed (`KeyboardEvent.code` format, e.g. `"Escape"`).
    Key {
        /// Key code string.
        code: String,
    },
}

/// Session-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// unlock = "Escape"
/// toggle_ligands = "KeyL"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Release a locked selection.
    Unlock,
    /// Clear the hover preview.
    Dehover,
    /// Toggle ligand rendering.
    ToggleLigands,
}
