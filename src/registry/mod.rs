//! Lazily-loaded chain structures and their selection flags.
//!
//! The registry decouples "is the structure available" from "is it shown".
//! Entries are created at first reference and kept for the whole session,
//! in insertion order. Structures are fetched on a background thread with
//! at most one in-flight fetch per chain id; finished fetches are applied
//! to entries only inside [`ChainRegistry::poll`], on the caller's thread,
//! while [`LoadHandle`]s resolve as soon as the fetch finishes.

mod worker;

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;

use self::worker::{FetchResult, FetchWorker, LoadSlot};
use crate::error::MsalinkError;
use crate::source::{ChainModel, FetchError, StructureSource};

/// What a waiting [`LoadHandle`] eventually receives.
pub type LoadOutcome = Result<Arc<ChainModel>, FetchError>;

/// One chain known to the session.
#[derive(Debug, Clone)]
pub struct ChainEntry {
    id: String,
    loaded: bool,
    selected: bool,
    payload: Option<Arc<ChainModel>>,
    last_error: Option<FetchError>,
}

impl ChainEntry {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            loaded: false,
            selected: false,
            payload: None,
            last_error: None,
        }
    }

    /// Chain id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the structure payload has arrived.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the chain is toggled visible.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Structure payload, once loaded.
    #[must_use]
    pub fn payload(&self) -> Option<&Arc<ChainModel>> {
        self.payload.as_ref()
    }

    /// Error of the most recent failed fetch, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }
}

/// Handle returned by [`ChainRegistry::ensure_loaded`].
///
/// A pending handle resolves as soon as the background fetch finishes,
/// whether or not the registry has been polled; every handle joined to the
/// same fetch receives the same outcome. Dropping the registry resolves
/// outstanding handles with a transport error.
#[derive(Debug, Clone)]
pub struct LoadHandle {
    state: HandleState,
}

#[derive(Debug, Clone)]
enum HandleState {
    Ready(Arc<ChainModel>),
    Pending(Arc<LoadSlot>),
}

impl LoadHandle {
    /// Whether the payload was available immediately.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, HandleState::Ready(_))
    }

    /// Non-blocking check for the outcome.
    #[must_use]
    pub fn try_outcome(&self) -> Option<LoadOutcome> {
        match &self.state {
            HandleState::Ready(model) => Some(Ok(Arc::clone(model))),
            HandleState::Pending(slot) => slot.peek(),
        }
    }

    /// Block until the fetch finishes. Safe to call on the thread that owns
    /// the registry.
    #[must_use]
    pub fn wait(self) -> LoadOutcome {
        match self.state {
            HandleState::Ready(model) => Ok(model),
            HandleState::Pending(slot) => slot.wait().unwrap_or_else(|| {
                Err(FetchError::transport("chain registry dropped"))
            }),
        }
    }

    /// Block up to `timeout` for the outcome; `None` if it has not arrived.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> Option<LoadOutcome> {
        match &self.state {
            HandleState::Ready(model) => Some(Ok(Arc::clone(model))),
            HandleState::Pending(slot) => slot.wait_timeout(timeout),
        }
    }
}

/// Result of [`ChainRegistry::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The flag was flipped; carries the new value.
    Toggled(bool),
    /// The chain is being fetched; it becomes selected once loaded.
    Deferred,
}

/// Notification produced by [`ChainRegistry::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    /// A chain payload arrived.
    Loaded {
        /// Chain id.
        chain_id: String,
        /// Selection flag after any deferred toggle was applied.
        selected: bool,
    },
    /// A fetch failed; the entry stays unloaded.
    ChainLoadFailed {
        /// Chain id.
        chain_id: String,
        /// Failure reported by the source.
        cause: FetchError,
    },
}

impl RegistryEvent {
    /// Convert a failure event into the crate error type.
    #[must_use]
    pub fn into_error(self) -> Option<MsalinkError> {
        match self {
            Self::ChainLoadFailed { chain_id, cause } => {
                Some(MsalinkError::ChainLoadFailed { chain_id, cause })
            }
            Self::Loaded { .. } => None,
        }
    }
}

#[derive(Default)]
struct InFlight {
    slot: Arc<LoadSlot>,
    select_on_load: bool,
}

/// Registry of chains with coalesced background loading.
pub struct ChainRegistry {
    /// Entries in insertion order.
    entries: Vec<ChainEntry>,
    index: FxHashMap<String, usize>,
    in_flight: FxHashMap<String, InFlight>,
    worker: FetchWorker,
    fetches_started: usize,
}

impl ChainRegistry {
    /// Registry fetching through `source` on a background thread.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::ThreadSpawn`] if the fetch thread cannot start.
    pub fn new(source: Arc<dyn StructureSource>) -> Result<Self, MsalinkError> {
        let worker = FetchWorker::new(source).map_err(MsalinkError::ThreadSpawn)?;
        Ok(Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
            in_flight: FxHashMap::default(),
            worker,
            fetches_started: 0,
        })
    }

    fn entry_index(&mut self, chain_id: &str) -> usize {
        if let Some(&idx) = self.index.get(chain_id) {
            return idx;
        }
        let idx = self.entries.len();
        self.entries.push(ChainEntry::new(chain_id));
        let _ = self.index.insert(chain_id.to_owned(), idx);
        idx
    }

    /// Create an unloaded, unselected entry if `chain_id` is new.
    pub fn register(&mut self, chain_id: &str) {
        let _ = self.entry_index(chain_id);
    }

    /// Register a chain whose payload is already at hand (e.g. the
    /// reference chain fetched when the session opened).
    pub fn insert_loaded(
        &mut self,
        chain_id: &str,
        payload: ChainModel,
        selected: bool,
    ) {
        let idx = self.entry_index(chain_id);
        let entry = &mut self.entries[idx];
        entry.loaded = true;
        entry.selected = selected;
        entry.payload = Some(Arc::new(payload));
        entry.last_error = None;
    }

    /// Return the payload if loaded, otherwise start or join the single
    /// in-flight fetch for `chain_id`.
    pub fn ensure_loaded(&mut self, chain_id: &str) -> LoadHandle {
        let idx = self.entry_index(chain_id);
        if let Some(payload) = self.entries[idx].payload.as_ref() {
            return LoadHandle {
                state: HandleState::Ready(Arc::clone(payload)),
            };
        }

        if let Some(pending) = self.in_flight.get(chain_id) {
            log::debug!("joining in-flight fetch for chain {chain_id}");
            return LoadHandle {
                state: HandleState::Pending(Arc::clone(&pending.slot)),
            };
        }

        log::debug!("fetching chain {chain_id}");
        let pending = InFlight::default();
        let slot = Arc::clone(&pending.slot);
        let _ = self.in_flight.insert(chain_id.to_owned(), pending);
        self.fetches_started += 1;
        self.worker.submit(chain_id, Arc::clone(&slot));
        LoadHandle {
            state: HandleState::Pending(slot),
        }
    }

    /// Flip the selection flag. Unloaded chains are fetched first and become
    /// selected when the payload arrives; repeated toggles while the fetch
    /// is pending do not cancel it.
    pub fn toggle(&mut self, chain_id: &str) -> ToggleOutcome {
        let idx = self.entry_index(chain_id);
        if self.entries[idx].loaded {
            let entry = &mut self.entries[idx];
            entry.selected = !entry.selected;
            log::debug!("chain {chain_id} selected={}", entry.selected);
            return ToggleOutcome::Toggled(entry.selected);
        }

        // The handle is dropped; the deferred flip happens in `poll`.
        let _ = self.ensure_loaded(chain_id);
        if let Some(pending) = self.in_flight.get_mut(chain_id) {
            pending.select_on_load = true;
        }
        ToggleOutcome::Deferred
    }

    /// Invoke `f` for every selected entry, in insertion order.
    pub fn for_each_selected(&self, mut f: impl FnMut(&ChainEntry)) {
        for entry in self.entries.iter().filter(|e| e.selected) {
            f(entry);
        }
    }

    /// Ids of the selected entries, in insertion order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.for_each_selected(|e| ids.push(e.id.clone()));
        ids
    }

    /// Read access to an entry.
    #[must_use]
    pub fn entry(&self, chain_id: &str) -> Option<&ChainEntry> {
        self.index.get(chain_id).map(|&idx| &self.entries[idx])
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no chain has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a fetch for `chain_id` is in flight.
    #[must_use]
    pub fn is_pending(&self, chain_id: &str) -> bool {
        self.in_flight.contains_key(chain_id)
    }

    /// Whether any fetch is in flight.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Number of fetches dispatched to the source so far.
    #[must_use]
    pub fn fetches_started(&self) -> usize {
        self.fetches_started
    }

    /// Apply every finished fetch without blocking.
    pub fn poll(&mut self) -> Vec<RegistryEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.worker.try_recv() {
            events.push(self.apply(result));
        }
        events
    }

    /// Block up to `timeout` for the next finished fetch, then apply it and
    /// anything else already finished.
    pub fn poll_timeout(&mut self, timeout: Duration) -> Vec<RegistryEvent> {
        if !self.has_pending() {
            return Vec::new();
        }
        let mut events = Vec::new();
        if let Some(result) = self.worker.recv_timeout(timeout) {
            events.push(self.apply(result));
        }
        events.extend(self.poll());
        events
    }

    fn apply(&mut self, (chain_id, outcome): FetchResult) -> RegistryEvent {
        let select_on_load = self
            .in_flight
            .remove(&chain_id)
            .is_some_and(|pending| pending.select_on_load);
        let idx = self.entry_index(&chain_id);
        let entry = &mut self.entries[idx];

        match outcome {
            Ok(model) => {
                entry.loaded = true;
                entry.payload = Some(model);
                entry.last_error = None;
                if select_on_load {
                    entry.selected = true;
                }
                log::info!("chain {chain_id} loaded");
                RegistryEvent::Loaded {
                    selected: entry.selected,
                    chain_id,
                }
            }
            Err(cause) => {
                entry.loaded = false;
                entry.last_error = Some(cause.clone());
                log::error!("loading chain {chain_id} failed with {cause}");
                RegistryEvent::ChainLoadFailed { chain_id, cause }
            }
        }
    }
}
