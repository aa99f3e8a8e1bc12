//! Crate-level error types.

use std::fmt;

use crate::source::FetchError;

/// Errors produced by the msalink crate.
#[derive(Debug)]
pub enum MsalinkError {
    /// Malformed or inconsistent alignment input, rejected at load time.
    InvalidAlignment(String),
    /// A column index outside `[0, len)`.
    OutOfRange {
        /// The offending column.
        column: i64,
        /// Number of columns in the alignment.
        len: usize,
    },
    /// A row index outside the alignment listing.
    RowOutOfRange {
        /// The offending row.
        row: usize,
        /// Number of rows.
        len: usize,
    },
    /// A chain structure could not be fetched from the data source.
    ChainLoadFailed {
        /// Raw chain id that was requested.
        chain_id: String,
        /// Failure reported by the source.
        cause: FetchError,
    },
    /// A chain id that does not follow the `<pdbId>_<chain>` form.
    InvalidChainId(String),
    /// Any other data source failure (alignment or reference model fetch).
    Fetch(FetchError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for MsalinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlignment(msg) => {
                write!(f, "invalid alignment: {msg}")
            }
            Self::OutOfRange { column, len } => {
                write!(f, "column {column} out of range [0, {len})")
            }
            Self::RowOutOfRange { row, len } => {
                write!(f, "row {row} out of range [0, {len})")
            }
            Self::ChainLoadFailed { chain_id, cause } => {
                write!(f, "loading chain {chain_id} failed: {cause}")
            }
            Self::InvalidChainId(id) => write!(f, "invalid chain id: {id:?}"),
            Self::Fetch(e) => write!(f, "fetch error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for MsalinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ChainLoadFailed { cause, .. } => Some(cause),
            Self::Fetch(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FetchError> for MsalinkError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<std::io::Error> for MsalinkError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
