//! The coordination session: one controller per opened reference chain.
//!
//! A [`Session`] owns everything the front-end used to keep in ambient
//! scope: the alignment, the selection coordinator, the chain registry, the
//! view translator, the alert list and the breadcrumb context. All user
//! actions enter through [`Session::execute`]; background fetch results are
//! applied in [`Session::pump`].

mod alerts;
mod command;
mod reference;

use std::sync::Arc;
use std::time::Duration;

pub use alerts::{Alert, AlertKind, AlertLog};
pub use command::{SessionCommand, SessionEvent};
pub use reference::{neighbour, ChainId, ReferenceInfo};

use crate::alignment::AlignmentModel;
use crate::error::MsalinkError;
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::registry::{ChainRegistry, RegistryEvent, ToggleOutcome};
use crate::selection::{SelectionCoordinator, SelectionEvent, SelectionState};
use crate::source::{
    ChainListKind, ChainModel, PositionAnnotation, StructureSource,
};
use crate::sync::{RenderSurface, ViewSync};
use crate::tracks::color::per_residue_feature_colors;
use crate::tracks::feature::standard_tracks;
use crate::tracks::FeatureTrack;

/// Breadcrumb shown while a selection is locked.
const SELECTION_MODE_CONTEXT: &str = "selection mode";

/// Coordination state for one reference chain and its alignment.
pub struct Session {
    options: Options,
    source: Arc<dyn StructureSource>,
    input: InputProcessor,
    alignment: AlignmentModel,
    positions: Vec<PositionAnnotation>,
    selection: SelectionCoordinator,
    registry: ChainRegistry,
    view_sync: ViewSync,
    alerts: AlertLog,
    context: Vec<String>,
    reference: Option<ReferenceInfo>,
    all_ids: Vec<String>,
    representative_ids: Vec<String>,
}

impl Session {
    /// Session with nothing loaded.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::ThreadSpawn`] if the fetch thread cannot start.
    pub fn new(
        source: Arc<dyn StructureSource>,
        options: Options,
    ) -> Result<Self, MsalinkError> {
        let registry = ChainRegistry::new(Arc::clone(&source))?;
        let view_sync = ViewSync::new(
            options.viewer.render_ligands,
            options.viewer.center_on_lock,
        );
        Ok(Self {
            selection: SelectionCoordinator::new(
                options.selection.window_radius,
                0,
            ),
            input: InputProcessor::with_key_bindings(
                options.keybindings.clone(),
            ),
            options,
            source,
            alignment: AlignmentModel::new(),
            positions: Vec::new(),
            registry,
            view_sync,
            alerts: AlertLog::new(),
            context: Vec::new(),
            reference: None,
            all_ids: Vec::new(),
            representative_ids: Vec::new(),
        })
    }

    /// Open a session on `reference_id`: fetch the chain-id lists, then the
    /// reference chain model and the alignment of its representative chain.
    ///
    /// # Errors
    ///
    /// See [`load_reference`](Self::load_reference).
    pub fn open(
        source: Arc<dyn StructureSource>,
        options: Options,
        reference_id: &str,
    ) -> Result<Self, MsalinkError> {
        let mut session = Self::new(source, options)?;
        session.load_chain_ids();
        session.load_reference(reference_id)?;
        Ok(session)
    }

    /// Fetch the representative and full chain-id lists. A list that
    /// cannot be fetched keeps its previous contents and is reported as an
    /// alert.
    pub fn load_chain_ids(&mut self) {
        for kind in [ChainListKind::Representative, ChainListKind::All] {
            match self.source.fetch_chain_ids(kind) {
                Ok(ids) => {
                    log::debug!("{} {}", ids.len(), kind.label());
                    match kind {
                        ChainListKind::All => self.all_ids = ids,
                        ChainListKind::Representative => {
                            self.representative_ids = ids;
                        }
                    }
                }
                Err(cause) => self.alerts.load_failed(kind.label(), &cause),
            }
        }
    }

    /// Replace the reference chain. Fetches run on the caller's thread.
    ///
    /// The reference chain is registered loaded and selected, every aligned
    /// chain is registered unloaded, and the selection resets to idle.
    /// Chains of a previous reference are hidden on the next
    /// [`pump`](Self::pump). Fetch failures are also recorded as alerts.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::InvalidChainId`] for a malformed id,
    /// [`MsalinkError::ChainLoadFailed`] when the chain model cannot be
    /// fetched, [`MsalinkError::Fetch`] when the alignment cannot be
    /// fetched, [`MsalinkError::InvalidAlignment`] for a malformed
    /// alignment. The session is unchanged on error.
    pub fn load_reference(
        &mut self,
        reference_id: &str,
    ) -> Result<(), MsalinkError> {
        let id = ChainId::parse(reference_id)?;
        let raw = id.to_string();
        log::info!("opening reference chain {raw}");

        let model = self.source.fetch_chain_model(&raw).map_err(|cause| {
            self.alerts.load_failed(&format!("chain {raw}"), &cause);
            MsalinkError::ChainLoadFailed {
                chain_id: raw.clone(),
                cause,
            }
        })?;
        let representative =
            model.representative().unwrap_or(&raw).to_owned();
        let payload =
            self.source.fetch_alignment(&representative).map_err(|cause| {
                self.alerts.load_failed(
                    &format!("alignment {representative}"),
                    &cause,
                );
                MsalinkError::Fetch(cause)
            })?;
        let alignment = AlignmentModel::from_payload(&payload, &raw)?;

        let mut registry = ChainRegistry::new(Arc::clone(&self.source))?;
        registry.insert_loaded(&raw, model, true);
        for chain in &payload.chains {
            registry.register(&chain.id);
        }

        log::info!(
            "alignment of {representative}: {} chains x {} columns",
            alignment.sequence_count(),
            alignment.column_count()
        );
        self.reference = Some(ReferenceInfo::new(
            &id,
            &representative,
            payload.chain(&raw),
        ));
        self.selection.set_sequence_length(alignment.column_count());
        self.alignment = alignment;
        self.positions = payload.positions;
        self.registry = registry;
        self.view_sync.set_reference(Some(raw));
        self.context.clear();
        Ok(())
    }

    /// Perform one command.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::OutOfRange`] for columns outside the alignment,
    /// [`MsalinkError::RowOutOfRange`] for unknown rows,
    /// [`MsalinkError::InvalidChainId`] for malformed chain ids. State is
    /// unchanged on error.
    pub fn execute(
        &mut self,
        command: SessionCommand,
    ) -> Result<Vec<SessionEvent>, MsalinkError> {
        log::debug!("execute {command:?}");
        let events = match command {
            SessionCommand::HoverColumn { column } => {
                let event = self.selection.hover(column)?;
                self.selection_events(event)
            }
            SessionCommand::LockColumn { column } => {
                let event = self.selection.lock(column)?;
                self.selection_events(Some(event))
            }
            SessionCommand::Unlock => {
                let event = self.selection.unlock();
                self.selection_events(event)
            }
            SessionCommand::Dehover => {
                let event = self.selection.dehover();
                self.selection_events(event)
            }
            SessionCommand::ToggleChain { chain_id } => {
                self.toggle_chain(&chain_id)?
            }
            SessionCommand::ToggleChainAt { row } => {
                let chain_id = self
                    .alignment
                    .sequences()
                    .get(row)
                    .map(|s| s.source_chain_id.clone())
                    .ok_or(MsalinkError::RowOutOfRange {
                        row,
                        len: self.alignment.sequence_count(),
                    })?;
                self.toggle_chain(&chain_id)?
            }
            SessionCommand::SetRenderLigands { enabled } => {
                self.set_render_ligands(enabled)
            }
            SessionCommand::ToggleLigands => {
                self.set_render_ligands(!self.view_sync.render_ligands())
            }
        };
        Ok(events)
    }

    /// Translate a UI event and execute the resulting command, if any.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn handle_input(
        &mut self,
        event: InputEvent,
    ) -> Result<Vec<SessionEvent>, MsalinkError> {
        let selection = self.selection.state();
        match self.input.handle_event(event, &selection) {
            Some(command) => self.execute(command),
            None => Ok(Vec::new()),
        }
    }

    fn selection_events(
        &mut self,
        event: Option<SelectionEvent>,
    ) -> Vec<SessionEvent> {
        match event {
            Some(SelectionEvent::Locked { range, .. }) => {
                self.context = vec![
                    SELECTION_MODE_CONTEXT.to_owned(),
                    format!("range: {},{}", range.start, range.end),
                ];
            }
            Some(SelectionEvent::Unlocked) => self.context.clear(),
            _ => {}
        }
        event.map(SessionEvent::Selection).into_iter().collect()
    }

    fn toggle_chain(
        &mut self,
        chain_id: &str,
    ) -> Result<Vec<SessionEvent>, MsalinkError> {
        let _ = ChainId::parse(chain_id)?;
        let event = match self.registry.toggle(chain_id) {
            ToggleOutcome::Toggled(selected) => SessionEvent::ChainToggled {
                chain_id: chain_id.to_owned(),
                selected,
            },
            ToggleOutcome::Deferred => SessionEvent::ChainLoadDeferred {
                chain_id: chain_id.to_owned(),
            },
        };
        Ok(vec![event])
    }

    fn set_render_ligands(&mut self, enabled: bool) -> Vec<SessionEvent> {
        if self.view_sync.render_ligands() == enabled {
            return Vec::new();
        }
        self.view_sync.set_render_ligands(enabled);
        self.options.viewer.render_ligands = enabled;
        vec![SessionEvent::RenderLigandsChanged(enabled)]
    }

    /// Apply finished fetches, record failures as alerts, and bring
    /// `surface` up to date.
    pub fn pump(&mut self, surface: &mut dyn RenderSurface) -> Vec<SessionEvent> {
        let events = self.registry.poll();
        self.finish_pump(events, surface)
    }

    /// As [`pump`](Self::pump), but first blocks up to `timeout` for a
    /// pending fetch to finish.
    pub fn pump_timeout(
        &mut self,
        surface: &mut dyn RenderSurface,
        timeout: Duration,
    ) -> Vec<SessionEvent> {
        let events = self.registry.poll_timeout(timeout);
        self.finish_pump(events, surface)
    }

    fn finish_pump(
        &mut self,
        events: Vec<RegistryEvent>,
        surface: &mut dyn RenderSurface,
    ) -> Vec<SessionEvent> {
        let events = events
            .into_iter()
            .map(|event| match event {
                RegistryEvent::Loaded { chain_id, selected } => {
                    SessionEvent::ChainLoaded { chain_id, selected }
                }
                RegistryEvent::ChainLoadFailed { chain_id, cause } => {
                    self.alerts.load_failed(&format!("chain {chain_id}"), &cause);
                    SessionEvent::ChainLoadFailed { chain_id, cause }
                }
            })
            .collect();
        let _ = self.view_sync.apply(
            &self.selection.state(),
            &self.registry,
            surface,
        );
        events
    }

    /// Whether any chain fetch is still running.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.registry.has_pending()
    }

    /// Forget what the surface was told, so the next pump re-sends the full
    /// state.
    pub fn reset_view(&mut self) {
        self.view_sync.reset();
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The loaded alignment.
    #[must_use]
    pub fn alignment(&self) -> &AlignmentModel {
        &self.alignment
    }

    /// Chain registry.
    #[must_use]
    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Selection snapshot.
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    /// Selection coordinator, for `is_focus`/`in_range` queries.
    #[must_use]
    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    /// Open alerts.
    #[must_use]
    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    /// Close the alert at `index`.
    pub fn close_alert(&mut self, index: usize) -> Option<Alert> {
        self.alerts.close(index)
    }

    /// Breadcrumb trail: `["selection mode", "range: a,b"]` while locked,
    /// empty otherwise.
    #[must_use]
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Reference chain metadata, once a reference is loaded.
    #[must_use]
    pub fn reference(&self) -> Option<&ReferenceInfo> {
        self.reference.as_ref()
    }

    /// Tooltip for an alignment column (mutant, variant or active site).
    #[must_use]
    pub fn position_tooltip(&self, column: usize) -> Option<&str> {
        self.positions.get(column)?.tooltip()
    }

    fn reference_model(&self) -> Option<&ChainModel> {
        let id = &self.reference.as_ref()?.chain_id;
        self.registry.entry(id)?.payload().map(|payload| &**payload)
    }

    /// Feature tracks of the reference chain, in the highlight color.
    #[must_use]
    pub fn feature_tracks(&self) -> Vec<FeatureTrack> {
        self.reference_model()
            .map(|model| standard_tracks(model, &self.options.colors.highlight))
            .unwrap_or_default()
    }

    /// Per-residue colors of the reference chain by the configured
    /// `viewer.coloring_feature`.
    #[must_use]
    pub fn structure_colors(&self) -> Option<Vec<[f32; 3]>> {
        let feature = self.options.viewer.coloring_feature.as_deref()?;
        let model = self.reference_model()?;
        Some(per_residue_feature_colors(model, feature))
    }

    /// Every chain id the server knows, as last loaded.
    #[must_use]
    pub fn all_chain_ids(&self) -> &[String] {
        &self.all_ids
    }

    /// Representative chain ids, as last loaded.
    #[must_use]
    pub fn representative_chain_ids(&self) -> &[String] {
        &self.representative_ids
    }

    /// The chain id `offset` places from the reference in the full chain-id
    /// list (previous and next navigation links).
    #[must_use]
    pub fn neighbours(&self, offset: isize) -> Option<&str> {
        let current = self.reference.as_ref()?;
        neighbour(&self.all_ids, &current.chain_id, offset)
    }
}
