//! Structure data source: the REST contract the coordination core consumes.
//!
//! The server exposes two GET endpoints per chain id, both returning JSON:
//! the chain model (`json/{id}`) and the alignment of its homologues
//! (`alignment/{id}`). Two more list the known chain ids: `all` and the
//! cluster representatives `reps`. [`StructureSource`] abstracts over them
//! so the registry worker and the session can run against HTTP or an
//! in-memory fixture alike.

#[cfg(feature = "http")]
mod http;
mod memory;

use std::fmt;

#[cfg(feature = "http")]
pub use http::HttpSource;
pub use memory::MemorySource;
use serde::{Deserialize, Serialize};

/// Failure of a single fetch, shaped like an HTTP status line.
///
/// Transport-level failures (connection refused, timeouts, undecodable
/// bodies) carry status `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    /// HTTP status code, or `0` when no response was received.
    pub status: u16,
    /// Reason phrase or transport error description.
    pub status_text: String,
}

impl FetchError {
    /// Construct from a status code and reason text.
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
        }
    }

    /// A transport failure with no HTTP status.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::new(0, msg)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.status_text)
    }
}

impl std::error::Error for FetchError {}

/// Which chain-id list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainListKind {
    /// Every chain the server knows.
    All,
    /// One representative chain per sequence cluster.
    Representative,
}

impl ChainListKind {
    /// Endpoint path relative to the base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Representative => "reps",
        }
    }

    /// Human-readable name used in alerts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all chain ids",
            Self::Representative => "representative chain ids",
        }
    }
}

/// Provider of chain models, alignments and chain-id lists.
///
/// Implementations are called from the registry's background fetch thread
/// and therefore must be `Send + Sync`.
pub trait StructureSource: Send + Sync {
    /// Fetch the full model for one chain.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the chain cannot be retrieved.
    fn fetch_chain_model(&self, chain_id: &str)
        -> Result<ChainModel, FetchError>;

    /// Fetch the alignment of all chains homologous to `reference_chain_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the alignment cannot be retrieved.
    fn fetch_alignment(
        &self,
        reference_chain_id: &str,
    ) -> Result<AlignmentPayload, FetchError>;

    /// Fetch one of the chain-id lists, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the list cannot be retrieved.
    fn fetch_chain_ids(
        &self,
        kind: ChainListKind,
    ) -> Result<Vec<String>, FetchError>;
}

// ---------------------------------------------------------------------------
// Chain model
// ---------------------------------------------------------------------------

/// A chain model as delivered by the server.
///
/// The payload is opaque to the coordination core; only a handful of
/// fields are read here. Everything else is passed through to the viewer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainModel(pub serde_json::Value);

impl ChainModel {
    /// Wrap an arbitrary JSON document.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }

    /// Chain id reported by the server.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Representative chain whose alignment covers this chain.
    #[must_use]
    pub fn representative(&self) -> Option<&str> {
        self.str_field("rep")
    }

    /// PDB-format coordinates, handed to the viewer untouched.
    #[must_use]
    pub fn pdb(&self) -> Option<&str> {
        self.str_field("pdb")
            .or_else(|| self.str_field("pdbRepresentation"))
    }

    /// One-letter sequence of the chain.
    #[must_use]
    pub fn sequence(&self) -> Option<&str> {
        self.str_field("sequence")
    }

    /// Per-residue records, empty when absent.
    #[must_use]
    pub fn residues(&self) -> &[serde_json::Value] {
        self.0
            .get("residues")
            .and_then(serde_json::Value::as_array)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Numeric value of `feature` for every residue, `0.0` where missing.
    #[must_use]
    pub fn residue_feature(&self, feature: &str) -> Vec<f64> {
        self.residues()
            .iter()
            .map(|r| {
                r.get(feature)
                    .and_then(serde_json::Value::as_f64)
                    .unwrap_or(0.0)
            })
            .collect()
    }

    /// Integer residue numbers listed under `key` (numbers or numeric
    /// strings).
    #[must_use]
    pub fn residue_numbers(&self, key: &str) -> Vec<i64> {
        self.0
            .get(key)
            .and_then(serde_json::Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| {
                        v.as_i64()
                            .or_else(|| v.as_str()?.trim().parse().ok())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Alignment payload
// ---------------------------------------------------------------------------

/// One aligned chain in an [`AlignmentPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignedChain {
    /// Chain id (`<pdbId>_<chain>`).
    pub id: String,
    /// Gap-padded one-letter sequence.
    pub sequence: String,
    /// EC number, if annotated.
    pub ec: Option<String>,
    /// Pfam family, if annotated.
    pub pfam: Option<String>,
    /// UniProt accession, if annotated.
    pub uniprot: Option<String>,
    /// Structure title.
    pub title: Option<String>,
}

/// Per-column annotation in an [`AlignmentPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionAnnotation {
    /// Known mutation at this column.
    pub mutant: Option<String>,
    /// Known sequence variant at this column.
    pub variant: Option<String>,
    /// Active-site description.
    pub active_site: Option<String>,
}

impl PositionAnnotation {
    /// Text shown when hovering the column: the first of mutant, variant
    /// and active site that is present.
    #[must_use]
    pub fn tooltip(&self) -> Option<&str> {
        self.mutant
            .as_deref()
            .or(self.variant.as_deref())
            .or(self.active_site.as_deref())
    }
}

/// Alignment response of the `alignment/{id}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentPayload {
    /// Aligned chains in display order.
    pub chains: Vec<AlignedChain>,
    /// Column annotations (may be shorter than the alignment).
    pub positions: Vec<PositionAnnotation>,
}

impl AlignmentPayload {
    /// Look up a chain entry by id.
    #[must_use]
    pub fn chain(&self, id: &str) -> Option<&AlignedChain> {
        self.chains.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn chain_model_accessors() {
        let model = ChainModel::new(json!({
            "id": "1abc_A",
            "rep": "2xyz_B",
            "pdb": "ATOM ...",
            "residues": [{ "averageRmsdIncrease": 1.5 }, {}],
            "earlyResidueNumbers": [3, "7", "x"],
        }));
        assert_eq!(model.id(), Some("1abc_A"));
        assert_eq!(model.representative(), Some("2xyz_B"));
        assert_eq!(model.pdb(), Some("ATOM ..."));
        assert_eq!(model.residue_feature("averageRmsdIncrease"), [1.5, 0.0]);
        assert_eq!(model.residue_numbers("earlyResidueNumbers"), [3, 7]);
        assert!(model.residue_numbers("missing").is_empty());
    }

    #[test]
    fn payload_parses_camel_case_annotations() {
        let payload: AlignmentPayload = serde_json::from_value(json!({
            "chains": [{ "id": "1abc_A", "sequence": "MK-L", "ec": "1.2.3.4" }],
            "positions": [{ "activeSite": "catalytic" }, { "variant": "K>R", "activeSite": "x" }],
        }))
        .unwrap();
        assert_eq!(payload.chains[0].ec.as_deref(), Some("1.2.3.4"));
        assert_eq!(payload.positions[0].tooltip(), Some("catalytic"));
        assert_eq!(payload.positions[1].tooltip(), Some("K>R"));
        assert!(payload.chain("1abc_A").is_some());
        assert!(payload.chain("9zzz_Z").is_none());
    }

    #[test]
    fn chain_lists_map_to_endpoints() {
        assert_eq!(ChainListKind::All.path(), "all");
        assert_eq!(ChainListKind::Representative.path(), "reps");
        assert_eq!(
            ChainListKind::Representative.label(),
            "representative chain ids"
        );
    }

    #[test]
    fn fetch_error_display_matches_status_line() {
        let e = FetchError::new(404, "Not Found");
        assert_eq!(e.to_string(), "[404] Not Found");
        assert_eq!(FetchError::transport("refused").status, 0);
    }
}
