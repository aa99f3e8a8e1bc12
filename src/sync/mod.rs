//! Reconciles selection and registry state with the external viewer.
//!
//! [`ViewSync`] is a reducer: given a [`SelectionState`] and a
//! [`ChainRegistry`] snapshot it computes which chains should be visible and
//! highlighted, diffs that against what it emitted last time, and returns
//! only the commands for chains that actually changed. The surface itself
//! is an external capability behind [`RenderSurface`].

use rustc_hash::FxHashMap;

use crate::registry::{ChainEntry, ChainRegistry};
use crate::selection::{ResidueRange, SelectionMode, SelectionState};

/// How a highlight should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    /// Transient hover preview.
    Preview,
    /// Locked selection.
    Full,
}

/// A single instruction for the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Make a chain visible.
    Show(String),
    /// Hide a chain.
    Hide(String),
    /// Highlight a column window on a chain.
    Highlight {
        /// Chain id.
        chain_id: String,
        /// Highlighted columns.
        range: ResidueRange,
        /// Preview or full highlight.
        style: HighlightStyle,
    },
    /// Remove any highlight from a chain.
    ClearHighlight(String),
    /// Show the ligands bound to a chain.
    ShowLigands(String),
    /// Hide the ligands bound to a chain.
    HideLigands(String),
    /// Center the camera on a chain.
    CenterOn(String),
}

/// External structure viewer capability.
///
/// The coordination core only ever issues these calls; it never reaches
/// into rendering internals.
pub trait RenderSurface {
    /// Make a chain visible.
    fn show(&mut self, chain_id: &str);
    /// Hide a chain.
    fn hide(&mut self, chain_id: &str);
    /// Highlight `range` on a chain.
    fn highlight(
        &mut self,
        chain_id: &str,
        range: ResidueRange,
        style: HighlightStyle,
    );
    /// Remove the highlight from a chain.
    fn clear_highlight(&mut self, chain_id: &str);
    /// Center the camera on a chain.
    fn center_on(&mut self, chain_id: &str);

    /// Show the ligands of a chain. Surfaces without ligand layers ignore
    /// this.
    fn show_ligands(&mut self, _chain_id: &str) {}

    /// Hide the ligands of a chain.
    fn hide_ligands(&mut self, _chain_id: &str) {}

    /// Dispatch one command to the matching method.
    fn apply(&mut self, command: &ViewerCommand) {
        match command {
            ViewerCommand::Show(id) => self.show(id),
            ViewerCommand::Hide(id) => self.hide(id),
            ViewerCommand::Highlight {
                chain_id,
                range,
                style,
            } => self.highlight(chain_id, *range, *style),
            ViewerCommand::ClearHighlight(id) => self.clear_highlight(id),
            ViewerCommand::ShowLigands(id) => self.show_ligands(id),
            ViewerCommand::HideLigands(id) => self.hide_ligands(id),
            ViewerCommand::CenterOn(id) => self.center_on(id),
        }
    }
}

/// Surface that records every command it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    /// Commands in the order they were applied.
    pub commands: Vec<ViewerCommand>,
}

impl RecordingSurface {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded commands, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<ViewerCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl RenderSurface for RecordingSurface {
    fn show(&mut self, chain_id: &str) {
        self.commands.push(ViewerCommand::Show(chain_id.to_owned()));
    }

    fn hide(&mut self, chain_id: &str) {
        self.commands.push(ViewerCommand::Hide(chain_id.to_owned()));
    }

    fn highlight(
        &mut self,
        chain_id: &str,
        range: ResidueRange,
        style: HighlightStyle,
    ) {
        self.commands.push(ViewerCommand::Highlight {
            chain_id: chain_id.to_owned(),
            range,
            style,
        });
    }

    fn clear_highlight(&mut self, chain_id: &str) {
        self.commands
            .push(ViewerCommand::ClearHighlight(chain_id.to_owned()));
    }

    fn center_on(&mut self, chain_id: &str) {
        self.commands.push(ViewerCommand::CenterOn(chain_id.to_owned()));
    }

    fn show_ligands(&mut self, chain_id: &str) {
        self.commands
            .push(ViewerCommand::ShowLigands(chain_id.to_owned()));
    }

    fn hide_ligands(&mut self, chain_id: &str) {
        self.commands
            .push(ViewerCommand::HideLigands(chain_id.to_owned()));
    }
}

/// What the surface was last told about one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ChainView {
    visible: bool,
    ligands: bool,
    highlight: Option<(ResidueRange, HighlightStyle)>,
}

/// Diffing translator from coordination state to viewer commands.
#[derive(Debug, Clone, Default)]
pub struct ViewSync {
    last: FxHashMap<String, ChainView>,
    last_mode: SelectionMode,
    render_ligands: bool,
    center_on_lock: bool,
    reference: Option<String>,
}

impl ViewSync {
    /// Translator with ligand rendering and lock centering configured.
    #[must_use]
    pub fn new(render_ligands: bool, center_on_lock: bool) -> Self {
        Self {
            render_ligands,
            center_on_lock,
            ..Self::default()
        }
    }

    /// Chain the camera centers on when a selection is locked.
    pub fn set_reference(&mut self, chain_id: Option<String>) {
        self.reference = chain_id;
    }

    /// Toggle ligand rendering for every visible chain (takes effect on the
    /// next reconciliation).
    pub fn set_render_ligands(&mut self, render_ligands: bool) {
        self.render_ligands = render_ligands;
    }

    /// Whether ligands are rendered.
    #[must_use]
    pub fn render_ligands(&self) -> bool {
        self.render_ligands
    }

    /// Forget what was emitted, so the next reconciliation re-sends the full
    /// state (e.g. after the viewer was recreated).
    pub fn reset(&mut self) {
        self.last.clear();
        self.last_mode = SelectionMode::Idle;
    }

    fn desired(&self, selected: bool, selection: &SelectionState) -> ChainView {
        let style = match selection.mode {
            SelectionMode::Locked => HighlightStyle::Full,
            SelectionMode::Hover | SelectionMode::Idle => {
                HighlightStyle::Preview
            }
        };
        ChainView {
            visible: selected,
            ligands: selected && self.render_ligands,
            highlight: selection
                .active_range()
                .filter(|_| selected)
                .map(|range| (range, style)),
        }
    }

    /// Compute the minimal command list bringing the surface in line with
    /// `selection` and `registry`. Chains without a payload are never shown;
    /// any previously shown chain that is missing or unloaded is hidden.
    pub fn reconcile(
        &mut self,
        selection: &SelectionState,
        registry: &ChainRegistry,
    ) -> Vec<ViewerCommand> {
        let mut commands = Vec::new();

        for entry in registry.entries().iter().filter(|e| e.is_loaded()) {
            let id = entry.id();
            let next = self.desired(entry.is_selected(), selection);
            let prev = self.last.get(id).copied().unwrap_or_default();
            if prev == next {
                continue;
            }

            if prev.visible != next.visible {
                commands.push(if next.visible {
                    ViewerCommand::Show(id.to_owned())
                } else {
                    ViewerCommand::Hide(id.to_owned())
                });
            }
            if prev.ligands != next.ligands {
                commands.push(if next.ligands {
                    ViewerCommand::ShowLigands(id.to_owned())
                } else {
                    ViewerCommand::HideLigands(id.to_owned())
                });
            }
            if prev.highlight != next.highlight {
                commands.push(match next.highlight {
                    Some((range, style)) => ViewerCommand::Highlight {
                        chain_id: id.to_owned(),
                        range,
                        style,
                    },
                    None => ViewerCommand::ClearHighlight(id.to_owned()),
                });
            }
            let _ = self.last.insert(id.to_owned(), next);
        }

        // Chains the surface still knows about that are no longer loaded
        // in this registry (a new reference was opened) are torn down.
        let mut retired: Vec<String> = self
            .last
            .keys()
            .filter(|id| !registry.entry(id).is_some_and(ChainEntry::is_loaded))
            .cloned()
            .collect();
        retired.sort_unstable();
        for id in retired {
            if let Some(prev) = self.last.remove(&id) {
                if prev.ligands {
                    commands.push(ViewerCommand::HideLigands(id.clone()));
                }
                if prev.highlight.is_some() {
                    commands.push(ViewerCommand::ClearHighlight(id.clone()));
                }
                if prev.visible {
                    commands.push(ViewerCommand::Hide(id));
                }
            }
        }

        let entered_lock = selection.mode == SelectionMode::Locked
            && self.last_mode != SelectionMode::Locked;
        if entered_lock && self.center_on_lock {
            if let Some(reference) = self.reference.as_deref().filter(|r| {
                registry.entry(r).is_some_and(ChainEntry::is_selected)
            }) {
                commands.push(ViewerCommand::CenterOn(reference.to_owned()));
            }
        }
        self.last_mode = selection.mode;

        if !commands.is_empty() {
            log::debug!("view sync: {} command(s)", commands.len());
        }
        commands
    }

    /// Reconcile and forward the commands to `surface`. Returns the number
    /// of commands issued.
    pub fn apply(
        &mut self,
        selection: &SelectionState,
        registry: &ChainRegistry,
        surface: &mut dyn RenderSurface,
    ) -> usize {
        let commands = self.reconcile(selection, registry);
        for command in &commands {
            surface.apply(command);
        }
        commands.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::selection::SelectionCoordinator;
    use crate::source::{ChainModel, MemorySource};

    fn registry(chains: &[(&str, bool)]) -> ChainRegistry {
        let mut registry =
            ChainRegistry::new(Arc::new(MemorySource::new())).unwrap();
        for (id, selected) in chains {
            registry.insert_loaded(id, ChainModel::default(), *selected);
        }
        registry
    }

    fn show(id: &str) -> ViewerCommand {
        ViewerCommand::Show(id.to_owned())
    }

    #[test]
    fn first_reconcile_shows_selected_chains_only() {
        let registry = registry(&[("A_1", true), ("B_2", false)]);
        let sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(false, true);
        assert_eq!(sync.reconcile(&sel.state(), &registry), [show("A_1")]);
    }

    #[test]
    fn unchanged_state_emits_nothing() {
        let registry = registry(&[("A_1", true)]);
        let mut sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(false, true);
        let _ = sel.hover(5).unwrap();
        assert!(!sync.reconcile(&sel.state(), &registry).is_empty());
        assert!(sync.reconcile(&sel.state(), &registry).is_empty());
    }

    #[test]
    fn hover_then_lock_switches_highlight_style() {
        let registry = registry(&[("A_1", true), ("B_2", false)]);
        let mut sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(false, true);
        sync.set_reference(Some("A_1".to_owned()));
        let _ = sync.reconcile(&sel.state(), &registry);

        let _ = sel.hover(5).unwrap();
        assert_eq!(
            sync.reconcile(&sel.state(), &registry),
            [ViewerCommand::Highlight {
                chain_id: "A_1".to_owned(),
                range: ResidueRange::new(3, 7),
                style: HighlightStyle::Preview,
            }]
        );

        let _ = sel.lock(5).unwrap();
        assert_eq!(
            sync.reconcile(&sel.state(), &registry),
            [
                ViewerCommand::Highlight {
                    chain_id: "A_1".to_owned(),
                    range: ResidueRange::new(3, 7),
                    style: HighlightStyle::Full,
                },
                ViewerCommand::CenterOn("A_1".to_owned()),
            ]
        );

        let _ = sel.unlock();
        assert_eq!(
            sync.reconcile(&sel.state(), &registry),
            [ViewerCommand::ClearHighlight("A_1".to_owned())]
        );
    }

    #[test]
    fn relock_does_not_recenter() {
        let registry = registry(&[("A_1", true)]);
        let mut sel = SelectionCoordinator::new(1, 10);
        let mut sync = ViewSync::new(false, true);
        sync.set_reference(Some("A_1".to_owned()));
        let _ = sel.lock(2).unwrap();
        let first = sync.reconcile(&sel.state(), &registry);
        assert!(first.contains(&ViewerCommand::CenterOn("A_1".to_owned())));

        let _ = sel.lock(6).unwrap();
        let second = sync.reconcile(&sel.state(), &registry);
        assert!(!second.iter().any(|c| matches!(c, ViewerCommand::CenterOn(_))));
    }

    #[test]
    fn hiding_a_chain_clears_its_highlight() {
        let mut registry = registry(&[("A_1", true)]);
        let mut sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(true, false);
        let _ = sel.hover(0).unwrap();
        let _ = sync.reconcile(&sel.state(), &registry);

        let _ = registry.toggle("A_1");
        assert_eq!(
            sync.reconcile(&sel.state(), &registry),
            [
                ViewerCommand::Hide("A_1".to_owned()),
                ViewerCommand::HideLigands("A_1".to_owned()),
                ViewerCommand::ClearHighlight("A_1".to_owned()),
            ]
        );
    }

    #[test]
    fn ligand_toggle_only_touches_ligand_layer() {
        let registry = registry(&[("A_1", true), ("B_2", true)]);
        let sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(false, false);
        let _ = sync.reconcile(&sel.state(), &registry);

        sync.set_render_ligands(true);
        assert_eq!(
            sync.reconcile(&sel.state(), &registry),
            [
                ViewerCommand::ShowLigands("A_1".to_owned()),
                ViewerCommand::ShowLigands("B_2".to_owned()),
            ]
        );
    }

    #[test]
    fn chains_missing_from_a_new_registry_are_hidden() {
        let old = registry(&[("A_1", true), ("B_2", true)]);
        let mut sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(false, false);
        let _ = sel.hover(4).unwrap();
        let _ = sync.reconcile(&sel.state(), &old);

        let _ = sel.dehover();
        let new = registry(&[("B_2", true)]);
        assert_eq!(
            sync.reconcile(&sel.state(), &new),
            [
                ViewerCommand::ClearHighlight("B_2".to_owned()),
                ViewerCommand::ClearHighlight("A_1".to_owned()),
                ViewerCommand::Hide("A_1".to_owned()),
            ]
        );
    }

    #[test]
    fn chains_left_unloaded_in_a_new_registry_are_hidden() {
        let old = registry(&[("A_1", true)]);
        let mut sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(false, false);
        let _ = sel.lock(5).unwrap();
        let _ = sync.reconcile(&sel.state(), &old);

        let mut new = registry(&[("B_2", true)]);
        new.register("A_1");
        assert_eq!(
            sync.reconcile(&sel.state(), &new),
            [
                show("B_2"),
                ViewerCommand::Highlight {
                    chain_id: "B_2".to_owned(),
                    range: ResidueRange::new(3, 7),
                    style: HighlightStyle::Full,
                },
                ViewerCommand::ClearHighlight("A_1".to_owned()),
                ViewerCommand::Hide("A_1".to_owned()),
            ]
        );
        assert!(sync.reconcile(&sel.state(), &new).is_empty());
    }

    #[test]
    fn apply_forwards_to_surface_and_reset_resends() {
        let registry = registry(&[("A_1", true)]);
        let sel = SelectionCoordinator::new(2, 10);
        let mut sync = ViewSync::new(false, true);
        let mut surface = RecordingSurface::new();

        assert_eq!(sync.apply(&sel.state(), &registry, &mut surface), 1);
        assert_eq!(sync.apply(&sel.state(), &registry, &mut surface), 0);
        sync.reset();
        assert_eq!(sync.apply(&sel.state(), &registry, &mut surface), 1);
        assert_eq!(surface.drain(), [show("A_1"), show("A_1")]);
    }
}
