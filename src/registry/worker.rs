//! Background fetch thread for chain models.
//!
//! Requests go in over an mpsc channel together with the [`LoadSlot`] that
//! waiting handles block on. The thread fills the slot as soon as the fetch
//! finishes, so handles resolve without the owner polling. The same outcome
//! also comes back over a second channel and is only applied to registry
//! state when the owner polls.
//!
//! Shutdown never blocks the owner: a shared flag tells the thread to stop
//! before its next request, and the thread is detached. A fetch already in
//! progress finishes in the background and its result is discarded. Slots
//! of dropped requests resolve to a transport error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Condvar, Mutex};
use std::time::Duration;

use web_time::Instant;

use super::LoadOutcome;
use crate::source::{FetchError, StructureSource};

/// A finished fetch: the chain id and the shared outcome.
pub(crate) type FetchResult = (String, LoadOutcome);

/// Outcome cell shared by every handle joined to one fetch.
#[derive(Debug, Default)]
pub(crate) struct LoadSlot {
    outcome: Mutex<Option<LoadOutcome>>,
    ready: Condvar,
}

impl LoadSlot {
    fn resolve(&self, outcome: LoadOutcome) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = Some(outcome);
        }
        self.ready.notify_all();
    }

    /// Outcome if already resolved.
    pub(crate) fn peek(&self) -> Option<LoadOutcome> {
        self.outcome.lock().ok()?.clone()
    }

    /// Block until resolved.
    pub(crate) fn wait(&self) -> Option<LoadOutcome> {
        let slot = self.outcome.lock().ok()?;
        self.ready.wait_while(slot, |o| o.is_none()).ok()?.clone()
    }

    /// Block until resolved or `limit` elapses.
    pub(crate) fn wait_timeout(&self, limit: Duration) -> Option<LoadOutcome> {
        let slot = self.outcome.lock().ok()?;
        self.ready
            .wait_timeout_while(slot, limit, |o| o.is_none())
            .ok()?
            .0
            .clone()
    }
}

fn dropped() -> FetchError {
    FetchError::transport("chain registry dropped")
}

enum FetchRequest {
    Chain(String, Arc<LoadSlot>),
    Shutdown,
}

/// Single background thread that runs chain fetches in request order.
pub(crate) struct FetchWorker {
    request_tx: mpsc::Sender<FetchRequest>,
    result_rx: mpsc::Receiver<FetchResult>,
    closed: Arc<AtomicBool>,
}

impl FetchWorker {
    /// Spawn the fetch thread.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] if the background thread fails to spawn.
    pub(crate) fn new(
        source: Arc<dyn StructureSource>,
    ) -> Result<Self, std::io::Error> {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (result_tx, result_rx) = mpsc::channel::<FetchResult>();
        let closed = Arc::new(AtomicBool::new(false));

        let thread_closed = Arc::clone(&closed);
        // Detached: the handle is dropped and never joined.
        let _ = std::thread::Builder::new()
            .name("chain-fetch".into())
            .spawn(move || {
                Self::thread_loop(
                    &*source,
                    &request_rx,
                    &result_tx,
                    &thread_closed,
                );
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            closed,
        })
    }

    /// Queue a fetch (non-blocking send). `slot` is resolved by the thread.
    pub(crate) fn submit(&self, chain_id: &str, slot: Arc<LoadSlot>) {
        if let Err(mpsc::SendError(FetchRequest::Chain(_, slot))) = self
            .request_tx
            .send(FetchRequest::Chain(chain_id.to_owned(), slot))
        {
            slot.resolve(Err(dropped()));
        }
    }

    /// Non-blocking check for a finished fetch.
    pub(crate) fn try_recv(&self) -> Option<FetchResult> {
        self.result_rx.try_recv().ok()
    }

    /// Block up to `timeout` for a finished fetch.
    pub(crate) fn recv_timeout(&self, timeout: Duration) -> Option<FetchResult> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    /// Stop the background thread without waiting for it. Queued requests
    /// are dropped; a fetch in progress runs to completion in the
    /// background and its result is discarded.
    pub(crate) fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        let _ = self.request_tx.send(FetchRequest::Shutdown);
    }

    fn thread_loop(
        source: &dyn StructureSource,
        request_rx: &mpsc::Receiver<FetchRequest>,
        result_tx: &mpsc::Sender<FetchResult>,
        closed: &AtomicBool,
    ) {
        while let Ok(request) = request_rx.recv() {
            if closed.load(Ordering::Acquire) {
                log::debug!("chain-fetch worker closed, dropping queue");
                Self::drain(request, request_rx);
                break;
            }
            let (chain_id, slot) = match request {
                FetchRequest::Shutdown => break,
                FetchRequest::Chain(id, slot) => (id, slot),
            };

            let started = Instant::now();
            let outcome = source.fetch_chain_model(&chain_id).map(Arc::new);
            let elapsed = started.elapsed();
            match &outcome {
                Ok(_) => log::debug!(
                    "fetched chain {chain_id} in {:.1} ms",
                    elapsed.as_secs_f64() * 1000.0
                ),
                Err(e) => log::warn!("fetch of chain {chain_id} failed: {e}"),
            }

            if closed.load(Ordering::Acquire) {
                slot.resolve(Err(dropped()));
                Self::drain(FetchRequest::Shutdown, request_rx);
                break;
            }
            slot.resolve(outcome.clone());
            if result_tx.send((chain_id, outcome)).is_err() {
                break;
            }
        }
    }

    /// Resolve `first` and every queued request as dropped.
    fn drain(first: FetchRequest, request_rx: &mpsc::Receiver<FetchRequest>) {
        for request in std::iter::once(first).chain(request_rx.try_iter()) {
            if let FetchRequest::Chain(_, slot) = request {
                slot.resolve(Err(dropped()));
            }
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
