//! Declarative fill and outline layers for the active selection.
//!
//! Rules are a pure function of (election, candidate filter) and are rebuilt on
//! selection change, never patched in place. [`LayerComposer`] memoizes them per
//! selection so unrelated re-renders reuse the same rules.

use crate::config::{Registry, Settings};
use crate::error::{MapError, MapResult};
use crate::models::{CandidateFilter, Election, WINNER_FIELD, percent_key};
use crate::scale::{DEFAULT_MAX_PERCENT, generate_fill_colors};
use crate::selection::SelectionState;
use crate::styles::{selected_feature_outline, state_active};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Fill,
    Line,
    Symbol,
}

/// One layer of a map style document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub layout: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub paint: Map<String, Value>,
}

/// Fill layers of the selection plus the always-present selection outline.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionLayers {
    pub fills: Vec<LayerSpec>,
    pub outline: LayerSpec,
}

impl ElectionLayers {
    /// Fills first, outline on top.
    pub fn iter(&self) -> impl Iterator<Item = &LayerSpec> {
        self.fills.iter().chain(std::iter::once(&self.outline))
    }
}

fn fill_layer(election: &Election, id: String, filter: Option<Value>, color: Value, opacity: f64) -> LayerSpec {
    let mut paint = Map::new();
    paint.insert("fill-color".into(), color);
    paint.insert("fill-opacity".into(), json!(["case", state_active(), 1.0, opacity]));
    LayerSpec {
        id,
        kind: LayerKind::Fill,
        source: election.id.clone(),
        source_layer: Some(election.source_layer.clone()),
        filter,
        minzoom: None,
        maxzoom: None,
        layout: Map::new(),
        paint,
    }
}

fn outline_layer(election: &Election, settings: &Settings) -> LayerSpec {
    let mut paint = Map::new();
    paint.insert("line-color".into(), json!(settings.theme.text_primary));
    paint.insert("line-width".into(), selected_feature_outline());
    paint.insert("line-opacity".into(), json!(["case", state_active(), 1, 0]));
    LayerSpec {
        id: format!("{}-outline", election.id),
        kind: LayerKind::Line,
        source: election.id.clone(),
        source_layer: Some(election.source_layer.clone()),
        filter: None,
        minzoom: None,
        maxzoom: None,
        layout: Map::new(),
        paint,
    }
}

/// Build the layers for `selection`.
///
/// - "all": one fill per winner, filtered on `winner == id`, plus a tie/other
///   fill for every district whose winner is not among the winners.
/// - one candidate: a single unfiltered fill on that candidate's percentage,
///   saturating at its `max_gradient`.
pub fn compose_layers(
    registry: &Registry,
    selection: &SelectionState,
    settings: &Settings,
) -> MapResult<ElectionLayers> {
    let election = registry.election(&selection.election)?;
    let opacity = settings.map_opacity;

    let fills = match &selection.candidate {
        CandidateFilter::All => {
            let mut fills: Vec<LayerSpec> = election
                .winners
                .iter()
                .map(|w| {
                    let gradient = registry.candidate(w).and_then(|c| c.gradient.as_deref());
                    fill_layer(
                        election,
                        format!("{}-fill-{}", election.id, w),
                        Some(json!(["==", ["get", WINNER_FIELD], w])),
                        generate_fill_colors(&percent_key(w), gradient, Some(DEFAULT_MAX_PERCENT)),
                        opacity,
                    )
                })
                .collect();
            fills.push(fill_layer(
                election,
                format!("{}-fill-tie", election.id),
                Some(json!(["!", ["in", ["get", WINNER_FIELD], ["literal", election.winners]]])),
                generate_fill_colors(
                    &percent_key(WINNER_FIELD),
                    Some(registry.tie_gradient()),
                    Some(DEFAULT_MAX_PERCENT),
                ),
                opacity,
            ));
            fills
        }
        CandidateFilter::Candidate(id) => {
            let candidate = registry
                .candidate(id)
                .filter(|_| election.has_candidate(id))
                .ok_or_else(|| MapError::UnknownCandidate {
                    election: election.id.clone(),
                    candidate: id.clone(),
                })?;
            vec![fill_layer(
                election,
                format!("{}-fill-{}", election.id, id),
                None,
                generate_fill_colors(
                    &percent_key(id),
                    candidate.gradient.as_deref(),
                    candidate.max_gradient,
                ),
                opacity,
            )]
        }
    };

    Ok(ElectionLayers {
        fills,
        outline: outline_layer(election, settings),
    })
}

/// Memoizes [`compose_layers`] per selection for a fixed registry and settings.
#[derive(Debug)]
pub struct LayerComposer {
    settings: Settings,
    cache: AHashMap<SelectionState, ElectionLayers>,
    misses: usize,
}

impl LayerComposer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cache: AHashMap::new(),
            misses: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Layers for `selection`, composed on first request only.
    pub fn layers(&mut self, registry: &Registry, selection: &SelectionState) -> MapResult<&ElectionLayers> {
        match self.cache.entry(selection.clone()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                self.misses += 1;
                log::debug!(
                    "composing layers for {}/{}",
                    selection.election,
                    selection.candidate
                );
                Ok(e.insert(compose_layers(registry, selection, &self.settings)?))
            }
        }
    }

    /// How many selections were composed from scratch.
    pub fn misses(&self) -> usize {
        self.misses
    }
}
