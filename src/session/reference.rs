//! Chain identifiers, reference-chain metadata and prev/next navigation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::MsalinkError;
use crate::source::AlignedChain;

/// Composite `<pdbId>_<chain>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainId {
    /// PDB entry id.
    pub pdb_id: String,
    /// Chain letter(s) within the entry.
    pub chain: String,
}

impl ChainId {
    /// Split `raw` on its first `_`.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::InvalidChainId`] when either part is missing.
    pub fn parse(raw: &str) -> Result<Self, MsalinkError> {
        match raw.trim().split_once('_') {
            Some((pdb_id, chain)) if !pdb_id.is_empty() && !chain.is_empty() => {
                Ok(Self {
                    pdb_id: pdb_id.to_owned(),
                    chain: chain.to_owned(),
                })
            }
            _ => Err(MsalinkError::InvalidChainId(raw.to_owned())),
        }
    }
}

impl FromStr for ChainId {
    type Err = MsalinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.pdb_id, self.chain)
    }
}

/// Header information about the reference chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReferenceInfo {
    /// Raw reference chain id.
    pub chain_id: String,
    /// PDB entry id.
    pub pdb_id: String,
    /// Chain letter.
    pub chain: String,
    /// Representative chain whose alignment was loaded.
    pub representative: String,
    /// EC number.
    pub ec: Option<String>,
    /// Pfam family.
    pub pfam: Option<String>,
    /// UniProt accession.
    pub uniprot: Option<String>,
    /// Entry title.
    pub title: Option<String>,
}

impl ReferenceInfo {
    pub(crate) fn new(
        id: &ChainId,
        representative: &str,
        meta: Option<&AlignedChain>,
    ) -> Self {
        Self {
            chain_id: id.to_string(),
            pdb_id: id.pdb_id.clone(),
            chain: id.chain.clone(),
            representative: representative.to_owned(),
            ec: meta.and_then(|m| m.ec.clone()),
            pfam: meta.and_then(|m| m.pfam.clone()),
            uniprot: meta.and_then(|m| m.uniprot.clone()),
            title: meta.and_then(|m| m.title.clone()),
        }
    }

    /// EC number as a path (`"1.2.3.4"` becomes `"1/2/3/4"`), for
    /// browsing the enzyme hierarchy.
    #[must_use]
    pub fn ec_path(&self) -> Option<String> {
        self.ec.as_deref().map(|ec| ec.replace('.', "/"))
    }
}

/// The id `offset` places away from `current` in `ids`, if any.
///
/// `current` missing from `ids` counts as position `-1`, so an offset of
/// `1` then yields the first id.
#[must_use]
pub fn neighbour<'a>(
    ids: &'a [String],
    current: &str,
    offset: isize,
) -> Option<&'a str> {
    let index = ids
        .iter()
        .position(|id| id == current)
        .and_then(|i| isize::try_from(i).ok())
        .unwrap_or(-1);
    let target = usize::try_from(index.checked_add(offset)?).ok()?;
    ids.get(target).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_split_on_first_underscore() {
        let id = ChainId::parse("1abc_A").unwrap();
        assert_eq!(id.pdb_id, "1abc");
        assert_eq!(id.chain, "A");
        assert_eq!(id.to_string(), "1abc_A");

        let nested: ChainId = "1abc_A_B".parse().unwrap();
        assert_eq!(nested.chain, "A_B");
    }

    #[test]
    fn malformed_chain_ids_are_rejected() {
        for raw in ["1abc", "1abc_", "_A", ""] {
            assert!(
                matches!(ChainId::parse(raw), Err(MsalinkError::InvalidChainId(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn ec_number_becomes_a_path() {
        let meta = AlignedChain {
            id: "1abc_A".to_owned(),
            ec: Some("1.2.3.4".to_owned()),
            ..AlignedChain::default()
        };
        let id = ChainId::parse("1abc_A").unwrap();
        let info = ReferenceInfo::new(&id, "1abc_A", Some(&meta));
        assert_eq!(info.ec_path().as_deref(), Some("1/2/3/4"));
        assert_eq!(ReferenceInfo::new(&id, "1abc_A", None).ec_path(), None);
    }

    #[test]
    fn neighbours_follow_list_order() {
        let ids: Vec<String> =
            ["a_1", "b_2", "c_3"].iter().map(|s| (*s).to_owned()).collect();
        assert_eq!(neighbour(&ids, "b_2", -1), Some("a_1"));
        assert_eq!(neighbour(&ids, "b_2", 1), Some("c_3"));
        assert_eq!(neighbour(&ids, "a_1", -1), None);
        assert_eq!(neighbour(&ids, "c_3", 1), None);
        assert_eq!(neighbour(&ids, "zzz", 1), Some("a_1"));
    }
}
