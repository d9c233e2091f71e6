//! Hover/click state machine kept in lock-step with the renderer's feature state.
//!
//! The renderer stores a small flag map per feature (`hovered`, `clicked`) that
//! drives outline and opacity styling. [`Interaction`] is the only writer of
//! those flags: whenever it marks a feature it first clears the feature that
//! held the same flag before, so at most one feature is hovered and at most one
//! is clicked, and the renderer always mirrors the local state.

use crate::models::{District, Election, FeatureId, LngLat};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-feature visual flags pushed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    Hovered,
    Clicked,
}

impl FeatureFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureFlag::Hovered => "hovered",
            FeatureFlag::Clicked => "clicked",
        }
    }
}

/// Flag name → value, merged into the renderer's state for one feature.
pub type FeatureState = BTreeMap<String, bool>;

fn flag_state(flag: FeatureFlag, value: bool) -> FeatureState {
    BTreeMap::from([(flag.as_str().to_string(), value)])
}

/// Source and source layer whose features the flags apply to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureTarget {
    pub source: String,
    pub source_layer: String,
}

impl FeatureTarget {
    pub fn new(source: impl Into<String>, source_layer: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_layer: source_layer.into(),
        }
    }

    /// Election sources are named after the election id.
    pub fn for_election(election: &Election) -> Self {
        Self::new(election.id.clone(), election.source_layer.clone())
    }
}

/// The renderer's per-feature state API.
pub trait FeatureStateStore {
    /// Merge `state` into the stored flags of feature `id`.
    fn set_feature_state(&mut self, target: &FeatureTarget, id: &FeatureId, state: &FeatureState);

    /// Drop the state of every feature of `target`, as the renderer does when
    /// the source is removed.
    fn remove_feature_state(&mut self, target: &FeatureTarget);
}

/// In-memory feature-state store with the renderer's merge semantics.
#[derive(Debug, Default, Clone)]
pub struct MemoryFeatureStore {
    states: AHashMap<(FeatureTarget, FeatureId), FeatureState>,
    writes: usize,
}

impl MemoryFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self, target: &FeatureTarget, id: &FeatureId, flag: FeatureFlag) -> bool {
        self.states
            .get(&(target.clone(), id.clone()))
            .and_then(|s| s.get(flag.as_str()))
            .copied()
            .unwrap_or(false)
    }

    /// Features of `target` whose `flag` is currently set, sorted.
    pub fn flagged(&self, target: &FeatureTarget, flag: FeatureFlag) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self
            .states
            .iter()
            .filter(|((t, _), s)| t == target && s.get(flag.as_str()).copied().unwrap_or(false))
            .map(|((_, id), _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of store calls received (sets and removals).
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl FeatureStateStore for MemoryFeatureStore {
    fn set_feature_state(&mut self, target: &FeatureTarget, id: &FeatureId, state: &FeatureState) {
        self.writes += 1;
        let entry = self.states.entry((target.clone(), id.clone())).or_default();
        for (k, v) in state {
            entry.insert(k.clone(), *v);
        }
    }

    fn remove_feature_state(&mut self, target: &FeatureTarget) {
        self.writes += 1;
        self.states.retain(|(t, _), _| t != target);
    }
}

/// Read model behind the hover popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    pub district: District,
    pub position: LngLat,
}

/// Coarse state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionPhase {
    Idle,
    Hovered,
    Clicked,
    HoveredAndClicked,
}

/// Hover/click state of one interactive map, scoped to a single feature target.
#[derive(Debug, Clone)]
pub struct Interaction {
    target: FeatureTarget,
    hovered: Option<FeatureId>,
    clicked: Option<FeatureId>,
    hover: Option<HoverInfo>,
    detail: Option<District>,
}

impl Interaction {
    pub fn new(target: FeatureTarget) -> Self {
        Self {
            target,
            hovered: None,
            clicked: None,
            hover: None,
            detail: None,
        }
    }

    pub fn target(&self) -> &FeatureTarget {
        &self.target
    }

    pub fn hovered(&self) -> Option<&FeatureId> {
        self.hovered.as_ref()
    }

    pub fn clicked(&self) -> Option<&FeatureId> {
        self.clicked.as_ref()
    }

    /// Popup content, present while the pointer is over a district.
    pub fn hover_info(&self) -> Option<&HoverInfo> {
        self.hover.as_ref()
    }

    /// Detail panel content, present while a district is clicked.
    pub fn detail(&self) -> Option<&District> {
        self.detail.as_ref()
    }

    pub fn phase(&self) -> InteractionPhase {
        match (self.hover.is_some(), self.detail.is_some()) {
            (false, false) => InteractionPhase::Idle,
            (true, false) => InteractionPhase::Hovered,
            (false, true) => InteractionPhase::Clicked,
            (true, true) => InteractionPhase::HoveredAndClicked,
        }
    }

    fn push(&self, store: &mut dyn FeatureStateStore, id: &FeatureId, flag: FeatureFlag, value: bool) {
        store.set_feature_state(&self.target, id, &flag_state(flag, value));
    }

    /// Pointer moved over `district` at `position`.
    ///
    /// Flags change only when the hovered feature changes; the popup read model
    /// follows every move.
    pub fn pointer_move(&mut self, store: &mut dyn FeatureStateStore, district: &District, position: LngLat) {
        if district.id.is_none() {
            log::warn!("hovered district has no feature id; popup only");
        }
        if self.hovered != district.id {
            if let Some(old) = self.hovered.take() {
                self.push(store, &old, FeatureFlag::Hovered, false);
            }
            if let Some(new) = &district.id {
                self.push(store, new, FeatureFlag::Hovered, true);
                log::debug!("hover -> {new}");
            }
            self.hovered = district.id.clone();
        }
        self.hover = Some(HoverInfo {
            district: district.clone(),
            position,
        });
    }

    /// Pointer left every district.
    pub fn pointer_leave(&mut self, store: &mut dyn FeatureStateStore) {
        if let Some(old) = self.hovered.take() {
            self.push(store, &old, FeatureFlag::Hovered, false);
            log::debug!("hover cleared ({old})");
        }
        self.hover = None;
    }

    /// Click on `district`: toggles it off if it is already clicked, else moves the selection to it.
    pub fn click(&mut self, store: &mut dyn FeatureStateStore, district: &District) {
        let Some(id) = district.id.clone() else {
            log::warn!("clicked district has no feature id; ignored");
            return;
        };
        if let Some(old) = self.clicked.take() {
            self.push(store, &old, FeatureFlag::Clicked, false);
            if old == id {
                log::debug!("click toggled off ({id})");
                self.detail = None;
                return;
            }
        }
        self.push(store, &id, FeatureFlag::Clicked, true);
        log::debug!("click -> {id}");
        self.clicked = Some(id);
        self.detail = Some(district.clone());
    }

    /// Detail panel closed by the user.
    pub fn close_detail(&mut self, store: &mut dyn FeatureStateStore) {
        if let Some(old) = self.clicked.take() {
            self.push(store, &old, FeatureFlag::Clicked, false);
        }
        self.detail = None;
    }

    /// Drop hover and click locally and re-scope to `target`.
    ///
    /// The renderer is not written. Callers either [`clear`](Self::clear) first,
    /// when the source stays mounted, or remove the old source's state.
    pub fn reset(&mut self, target: FeatureTarget) {
        log::debug!("interaction reset, target {}/{}", target.source, target.source_layer);
        *self = Self::new(target);
    }

    /// Map unmounted: clear every flag this instance set, then go idle.
    pub fn clear(&mut self, store: &mut dyn FeatureStateStore) {
        self.pointer_leave(store);
        self.close_detail(store);
    }
}
