//! End-to-end coordination scenarios against an in-memory backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use msalink::options::Options;
use msalink::registry::{ChainRegistry, RegistryEvent, ToggleOutcome};
use msalink::selection::{ResidueRange, SelectionMode};
use msalink::session::{Session, SessionCommand, SessionEvent};
use msalink::source::{
    AlignedChain, AlignmentPayload, ChainListKind, ChainModel, FetchError,
    MemorySource, StructureSource,
};
use msalink::sync::{HighlightStyle, RecordingSurface, ViewerCommand};
use serde_json::json;

const WAIT: Duration = Duration::from_secs(5);

/// Source whose chain fetches block until the test releases them.
struct GatedSource {
    gate: Mutex<mpsc::Receiver<()>>,
    requests: AtomicUsize,
}

impl GatedSource {
    fn new() -> (Arc<Self>, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let source = Self {
            gate: Mutex::new(rx),
            requests: AtomicUsize::new(0),
        };
        (Arc::new(source), tx)
    }
}

impl StructureSource for GatedSource {
    fn fetch_chain_model(
        &self,
        chain_id: &str,
    ) -> Result<ChainModel, FetchError> {
        let _ = self.requests.fetch_add(1, Ordering::SeqCst);
        let _ = self.gate.lock().unwrap().recv();
        Ok(ChainModel::new(json!({ "id": chain_id })))
    }

    fn fetch_alignment(
        &self,
        _reference_chain_id: &str,
    ) -> Result<AlignmentPayload, FetchError> {
        Err(FetchError::new(404, "Not Found"))
    }

    fn fetch_chain_ids(
        &self,
        _kind: ChainListKind,
    ) -> Result<Vec<String>, FetchError> {
        Ok(Vec::new())
    }
}

fn aligned(id: &str, sequence: &str) -> AlignedChain {
    AlignedChain {
        id: id.to_owned(),
        sequence: sequence.to_owned(),
        ..AlignedChain::default()
    }
}

fn backend() -> Arc<MemorySource> {
    let source = MemorySource::new();
    source.insert_chain(
        "1ref_A",
        ChainModel::new(json!({ "id": "1ref_A", "rep": "1ref_A" })),
    );
    source.insert_chain("2hom_B", ChainModel::new(json!({ "id": "2hom_B" })));
    source.fail_chain("3err_C", FetchError::new(503, "Service Unavailable"));
    source.insert_chain_ids(ChainListKind::All, &["1ref_A", "2hom_B", "3err_C"]);
    source.insert_chain_ids(ChainListKind::Representative, &["1ref_A", "2hom_B"]);
    source.insert_alignment(
        "1ref_A",
        AlignmentPayload {
            chains: vec![
                aligned("1ref_A", "MKTAYIAKQR"),
                aligned("2hom_B", "MKSAYIAKQR"),
                aligned("3err_C", "MKTAYIALQR"),
            ],
            positions: Vec::new(),
        },
    );
    source.insert_alignment(
        "2hom_B",
        AlignmentPayload {
            chains: vec![
                aligned("2hom_B", "MKSAYIAKQR"),
                aligned("1ref_A", "MKTAYIAKQR"),
            ],
            positions: Vec::new(),
        },
    );
    Arc::new(source)
}

fn settle(session: &mut Session, surface: &mut RecordingSurface) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while session.has_pending() {
        events.extend(session.pump_timeout(surface, WAIT));
    }
    events
}

#[test]
fn variant_columns_of_loaded_alignment() {
    let session = Session::open(backend(), Options::default(), "1ref_A").unwrap();
    let variants: Vec<usize> = session.alignment().variant_columns().collect();
    assert_eq!(variants, [2, 7]);
}

#[test]
fn hover_and_lock_windows() {
    let mut session =
        Session::open(backend(), Options::default(), "1ref_A").unwrap();
    let _ = session
        .execute(SessionCommand::HoverColumn { column: 5 })
        .unwrap();
    assert_eq!(session.selection_state().range, ResidueRange::new(3, 7));

    let _ = session
        .execute(SessionCommand::LockColumn { column: 4 })
        .unwrap();
    let _ = session
        .execute(SessionCommand::HoverColumn { column: 8 })
        .unwrap();
    let state = session.selection_state();
    assert_eq!(state.mode, SelectionMode::Locked);
    assert_eq!(state.focus_column, 4);
    assert_eq!(state.range, ResidueRange::new(2, 6));
}

#[test]
fn wider_window_clamps_at_the_start() {
    let mut options = Options::default();
    options.selection.window_radius = 3;
    let mut session = Session::open(backend(), options, "1ref_A").unwrap();
    let _ = session
        .execute(SessionCommand::HoverColumn { column: 1 })
        .unwrap();
    assert_eq!(session.selection_state().range, ResidueRange::new(0, 4));
}

#[test]
fn viewer_follows_hover_lock_and_toggles() {
    let mut session =
        Session::open(backend(), Options::default(), "1ref_A").unwrap();
    let mut surface = RecordingSurface::new();
    let _ = session.pump(&mut surface);
    assert_eq!(surface.drain(), [ViewerCommand::Show("1ref_A".to_owned())]);

    let _ = session
        .execute(SessionCommand::ToggleChain {
            chain_id: "2hom_B".to_owned(),
        })
        .unwrap();
    let _ = settle(&mut session, &mut surface);
    assert_eq!(surface.drain(), [ViewerCommand::Show("2hom_B".to_owned())]);

    let _ = session
        .execute(SessionCommand::LockColumn { column: 5 })
        .unwrap();
    let _ = session.pump(&mut surface);
    let full = |id: &str| ViewerCommand::Highlight {
        chain_id: id.to_owned(),
        range: ResidueRange::new(3, 7),
        style: HighlightStyle::Full,
    };
    assert_eq!(
        surface.drain(),
        [
            full("1ref_A"),
            full("2hom_B"),
            ViewerCommand::CenterOn("1ref_A".to_owned()),
        ]
    );

    let _ = session
        .execute(SessionCommand::ToggleChain {
            chain_id: "2hom_B".to_owned(),
        })
        .unwrap();
    let _ = session.pump(&mut surface);
    assert_eq!(
        surface.drain(),
        [
            ViewerCommand::Hide("2hom_B".to_owned()),
            ViewerCommand::ClearHighlight("2hom_B".to_owned()),
        ]
    );
}

#[test]
fn switching_reference_tears_down_the_old_one() {
    let mut session =
        Session::open(backend(), Options::default(), "1ref_A").unwrap();
    let mut surface = RecordingSurface::new();
    let _ = session
        .execute(SessionCommand::LockColumn { column: 5 })
        .unwrap();
    let _ = session.pump(&mut surface);
    let _ = surface.drain();

    session.load_reference("2hom_B").unwrap();
    assert!(!session.registry().entry("1ref_A").unwrap().is_loaded());
    let _ = session.pump(&mut surface);
    assert_eq!(
        surface.drain(),
        [
            ViewerCommand::Show("2hom_B".to_owned()),
            ViewerCommand::ClearHighlight("1ref_A".to_owned()),
            ViewerCommand::Hide("1ref_A".to_owned()),
        ]
    );
    let _ = session.pump(&mut surface);
    assert!(surface.drain().is_empty());
}

#[test]
fn failed_chain_stays_hidden_and_alerts() {
    let mut session =
        Session::open(backend(), Options::default(), "1ref_A").unwrap();
    let mut surface = RecordingSurface::new();
    let _ = session
        .execute(SessionCommand::ToggleChainAt { row: 2 })
        .unwrap();
    let events = settle(&mut session, &mut surface);
    assert_eq!(
        events,
        [SessionEvent::ChainLoadFailed {
            chain_id: "3err_C".to_owned(),
            cause: FetchError::new(503, "Service Unavailable"),
        }]
    );
    let entry = session.registry().entry("3err_C").unwrap();
    assert!(!entry.is_loaded());
    assert!(!entry.is_selected());
    assert_eq!(session.alerts().len(), 1);
    assert!(!surface
        .drain()
        .contains(&ViewerCommand::Show("3err_C".to_owned())));
}

#[test]
fn pending_fetches_are_coalesced() {
    let (source, release) = GatedSource::new();
    let mut registry = ChainRegistry::new(source.clone()).unwrap();

    let first = registry.ensure_loaded("A_1");
    assert_eq!(registry.toggle("A_1"), ToggleOutcome::Deferred);
    let second = registry.ensure_loaded("A_1");
    assert!(registry.is_pending("A_1"));
    assert!(first.wait_timeout(Duration::from_millis(20)).is_none());

    release.send(()).unwrap();
    let mut events = Vec::new();
    while registry.has_pending() {
        events.extend(registry.poll_timeout(WAIT));
    }

    assert_eq!(source.requests.load(Ordering::SeqCst), 1);
    assert_eq!(
        events,
        [RegistryEvent::Loaded {
            chain_id: "A_1".to_owned(),
            selected: true,
        }]
    );
    let a = first.wait().unwrap();
    let b = second.wait().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(registry.ensure_loaded("A_1").is_ready());
}
