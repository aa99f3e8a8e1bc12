//! In-memory [`StructureSource`] for offline sessions and tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rustc_hash::FxHashMap;

use super::{
    AlignmentPayload, ChainListKind, ChainModel, FetchError, StructureSource,
};

/// Serves pre-registered chain models, alignments and chain-id lists.
///
/// Unknown ids and unset lists answer `404 Not Found`; ids registered through
/// [`fail_chain`](Self::fail_chain) answer with the given error. Every
/// chain-model request is counted, which is what coalescing tests observe.
#[derive(Default)]
pub struct MemorySource {
    chains: Mutex<FxHashMap<String, Result<ChainModel, FetchError>>>,
    alignments: Mutex<FxHashMap<String, AlignmentPayload>>,
    chain_ids: Mutex<FxHashMap<ChainListKind, Result<Vec<String>, FetchError>>>,
    chain_requests: AtomicUsize,
}

impl MemorySource {
    /// Empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `model` for `chain_id`.
    pub fn insert_chain(&self, chain_id: &str, model: ChainModel) {
        if let Ok(mut chains) = self.chains.lock() {
            let _ = chains.insert(chain_id.to_owned(), Ok(model));
        }
    }

    /// Answer requests for `chain_id` with `error`.
    pub fn fail_chain(&self, chain_id: &str, error: FetchError) {
        if let Ok(mut chains) = self.chains.lock() {
            let _ = chains.insert(chain_id.to_owned(), Err(error));
        }
    }

    /// Serve `payload` for alignments requested with `reference_chain_id`.
    pub fn insert_alignment(
        &self,
        reference_chain_id: &str,
        payload: AlignmentPayload,
    ) {
        if let Ok(mut alignments) = self.alignments.lock() {
            let _ = alignments.insert(reference_chain_id.to_owned(), payload);
        }
    }

    /// Serve `ids` for the `kind` list.
    pub fn insert_chain_ids(&self, kind: ChainListKind, ids: &[&str]) {
        let ids = ids.iter().map(|&id| id.to_owned()).collect();
        if let Ok(mut lists) = self.chain_ids.lock() {
            let _ = lists.insert(kind, Ok(ids));
        }
    }

    /// Answer requests for the `kind` list with `error`.
    pub fn fail_chain_ids(&self, kind: ChainListKind, error: FetchError) {
        if let Ok(mut lists) = self.chain_ids.lock() {
            let _ = lists.insert(kind, Err(error));
        }
    }

    /// Number of chain-model requests received so far.
    #[must_use]
    pub fn chain_requests(&self) -> usize {
        self.chain_requests.load(Ordering::SeqCst)
    }
}

fn not_found() -> FetchError {
    FetchError::new(404, "Not Found")
}

impl StructureSource for MemorySource {
    fn fetch_chain_model(
        &self,
        chain_id: &str,
    ) -> Result<ChainModel, FetchError> {
        let _ = self.chain_requests.fetch_add(1, Ordering::SeqCst);
        let chains = self
            .chains
            .lock()
            .map_err(|_| FetchError::transport("source poisoned"))?;
        chains.get(chain_id).cloned().unwrap_or_else(|| Err(not_found()))
    }

    fn fetch_alignment(
        &self,
        reference_chain_id: &str,
    ) -> Result<AlignmentPayload, FetchError> {
        let alignments = self
            .alignments
            .lock()
            .map_err(|_| FetchError::transport("source poisoned"))?;
        alignments.get(reference_chain_id).cloned().ok_or_else(not_found)
    }

    fn fetch_chain_ids(
        &self,
        kind: ChainListKind,
    ) -> Result<Vec<String>, FetchError> {
        let lists = self
            .chain_ids
            .lock()
            .map_err(|_| FetchError::transport("source poisoned"))?;
        lists.get(&kind).cloned().unwrap_or_else(|| Err(not_found()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_not_found() {
        let source = MemorySource::new();
        let err = source.fetch_chain_model("9zzz_Z").unwrap_err();
        assert_eq!(err.status, 404);
        assert_eq!(source.chain_requests(), 1);
        assert!(source.fetch_alignment("9zzz_Z").is_err());
        assert!(source.fetch_chain_ids(ChainListKind::All).is_err());
    }

    #[test]
    fn chain_id_lists_keep_order() {
        let source = MemorySource::new();
        source.insert_chain_ids(ChainListKind::All, &["2xyz_B", "1abc_A"]);
        source.fail_chain_ids(
            ChainListKind::Representative,
            FetchError::new(503, "Service Unavailable"),
        );
        assert_eq!(
            source.fetch_chain_ids(ChainListKind::All).unwrap(),
            ["2xyz_B", "1abc_A"]
        );
        let err = source
            .fetch_chain_ids(ChainListKind::Representative)
            .unwrap_err();
        assert_eq!(err.status, 503);
    }

    #[test]
    fn registered_failures_are_replayed() {
        let source = MemorySource::new();
        source.fail_chain("1abc_A", FetchError::new(500, "Internal Server Error"));
        let err = source.fetch_chain_model("1abc_A").unwrap_err();
        assert_eq!(err.status, 500);
    }
}
