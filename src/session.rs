//! One interactive map instance: selection, memoized layers and hover/click state.

use crate::config::{Registry, Settings};
use crate::error::MapResult;
use crate::interaction::{FeatureStateStore, FeatureTarget, Interaction};
use crate::layers::{ElectionLayers, LayerComposer};
use crate::models::{CandidateFilter, District, LngLat};
use crate::selection::SelectionState;
use serde::{Deserialize, Serialize};

/// Input event delivered by the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    PointerMove { feature: District, position: LngLat },
    PointerLeave,
    Click { feature: District },
    CloseDetail,
    SelectElection { election: String },
    SelectCandidate { candidate: CandidateFilter },
}

pub struct MapSession<'r> {
    registry: &'r Registry,
    selection: SelectionState,
    composer: LayerComposer,
    interaction: Interaction,
}

impl<'r> MapSession<'r> {
    pub fn new(registry: &'r Registry, settings: Settings) -> Self {
        let selection = SelectionState::new(registry);
        let interaction = Interaction::new(FeatureTarget::for_election(registry.default_election()));
        Self {
            registry,
            selection,
            composer: LayerComposer::new(settings),
            interaction,
        }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn settings(&self) -> &Settings {
        self.composer.settings()
    }

    /// Current layers; recomposed only when the selection is new.
    pub fn layers(&mut self) -> MapResult<&ElectionLayers> {
        self.composer.layers(self.registry, &self.selection)
    }

    pub fn layer_compositions(&self) -> usize {
        self.composer.misses()
    }

    /// Change election; resets the candidate filter and all hover/click state.
    ///
    /// The old election's source is replaced, so its feature state is dropped
    /// wholesale. Re-selecting the active election behaves like a candidate change.
    pub fn select_election(&mut self, id: &str, store: &mut dyn FeatureStateStore) -> MapResult<()> {
        self.selection.set_election(self.registry, id)?;
        self.rescope(store)
    }

    /// Change candidate filter; clears hover/click in the renderer and locally.
    pub fn select_candidate(
        &mut self,
        filter: CandidateFilter,
        store: &mut dyn FeatureStateStore,
    ) -> MapResult<()> {
        self.selection.set_candidate(self.registry, filter)?;
        self.rescope(store)
    }

    fn rescope(&mut self, store: &mut dyn FeatureStateStore) -> MapResult<()> {
        let target = FeatureTarget::for_election(self.registry.election(&self.selection.election)?);
        if self.interaction.target() == &target {
            // same source stays mounted
            self.interaction.clear(store);
        } else {
            store.remove_feature_state(self.interaction.target());
        }
        self.interaction.reset(target);
        Ok(())
    }

    pub fn apply(&mut self, event: &MapEvent, store: &mut dyn FeatureStateStore) -> MapResult<()> {
        match event {
            MapEvent::PointerMove { feature, position } => {
                self.interaction.pointer_move(store, feature, *position)
            }
            MapEvent::PointerLeave => self.interaction.pointer_leave(store),
            MapEvent::Click { feature } => self.interaction.click(store, feature),
            MapEvent::CloseDetail => self.interaction.close_detail(store),
            MapEvent::SelectElection { election } => self.select_election(election, store)?,
            MapEvent::SelectCandidate { candidate } => {
                self.select_candidate(candidate.clone(), store)?
            }
        }
        Ok(())
    }

    /// Tear down: clear every flag this map set in the renderer.
    pub fn unmount(&mut self, store: &mut dyn FeatureStateStore) {
        self.interaction.clear(store);
    }
}
