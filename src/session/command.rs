//! The session's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered from the alignment grid,
//! the feature-track widget, a key press or a programmatic call, is a
//! [`SessionCommand`]. Consumers construct commands and pass them to
//! [`Session::execute`](super::Session::execute).

use crate::selection::SelectionEvent;
use crate::source::FetchError;

/// A discrete or parameterized operation the session can perform.
///
/// ```ignore
/// session.execute(SessionCommand::LockColumn { column: 12 })?;
/// session.execute(SessionCommand::ToggleChain { chain_id: "1abc_A".into() })?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    // ── Selection ───────────────────────────────────────────────────
    /// Preview the window around a column.
    HoverColumn {
        /// Alignment column.
        column: i64,
    },
    /// Pin the window around a column.
    LockColumn {
        /// Alignment column.
        column: i64,
    },
    /// Release a pinned window.
    Unlock,
    /// Clear the hover preview.
    Dehover,

    // ── Chains ──────────────────────────────────────────────────────
    /// Show or hide a chain, fetching it first if needed.
    ToggleChain {
        /// Raw chain id (`<pdbId>_<chain>`).
        chain_id: String,
    },
    /// Toggle the chain behind an alignment row.
    ToggleChainAt {
        /// Row index in display order.
        row: usize,
    },

    // ── Display ─────────────────────────────────────────────────────
    /// Turn ligand rendering on or off.
    SetRenderLigands {
        /// New state.
        enabled: bool,
    },
    /// Flip ligand rendering.
    ToggleLigands,
}

/// What a command or a pump changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The selection moved, locked or cleared.
    Selection(SelectionEvent),
    /// A loaded chain was shown or hidden.
    ChainToggled {
        /// Chain id.
        chain_id: String,
        /// New selection flag.
        selected: bool,
    },
    /// A chain is being fetched and will be shown once it arrives.
    ChainLoadDeferred {
        /// Chain id.
        chain_id: String,
    },
    /// A background fetch finished.
    ChainLoaded {
        /// Chain id.
        chain_id: String,
        /// Selection flag after the deferred toggle.
        selected: bool,
    },
    /// A background fetch failed; an alert was recorded.
    ChainLoadFailed {
        /// Chain id.
        chain_id: String,
        /// Failure reported by the source.
        cause: FetchError,
    },
    /// Ligand rendering changed.
    RenderLigandsChanged(bool),
}
