//! Augment a base map style document with the election source, the basemap
//! source and the composed layers.

use crate::api::with_key;
use crate::config::Settings;
use crate::error::{MapError, MapResult};
use crate::layers::{ElectionLayers, LayerSpec};
use crate::models::{Election, PROMOTED_ID_FIELD};
use crate::styles::{BASEMAP_SOURCE, basemap_layers};
use serde_json::{Map, Value, json};

const BASEMAP_TILES: &str = "https://api.maptiler.com/tiles/v3/{z}/{x}/{y}.pbf";

/// Vector source serving one election's districts, with the district code as feature id.
pub fn election_source(settings: &Settings, election: &Election) -> Value {
    json!({
        "type": "vector",
        "url": format!("{}/{}", settings.tile_server_url.trim_end_matches('/'), election.id),
        "promoteId": PROMOTED_ID_FIELD,
    })
}

/// Basemap vector tiles used by the place-name and transportation overlays.
pub fn basemap_source(token: &str) -> Value {
    json!({
        "type": "vector",
        "tiles": [with_key(BASEMAP_TILES, Some(token))],
    })
}

fn layer_value(layer: &LayerSpec) -> MapResult<Value> {
    serde_json::to_value(layer).map_err(|e| MapError::InvalidStyle(e.to_string()))
}

/// Add sources and layers to `base` and set the initial camera.
///
/// Layer order: election fills, transportation, selection outline, place
/// labels. The basemap overlays need a basemap token and are skipped without one.
pub fn compose_style(
    mut base: Value,
    election: &Election,
    layers: &ElectionLayers,
    settings: &Settings,
) -> MapResult<Value> {
    let doc = base
        .as_object_mut()
        .ok_or_else(|| MapError::InvalidStyle("style root is not an object".into()))?;

    let view = settings.initial_view;
    doc.insert("center".into(), json!([view.longitude, view.latitude]));
    doc.insert("zoom".into(), json!(view.zoom));

    let sources = doc
        .entry("sources")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| MapError::InvalidStyle("\"sources\" is not an object".into()))?;
    sources.insert(election.id.clone(), election_source(settings, election));
    let token = settings.maptiler_token.as_deref();
    if let Some(t) = token {
        sources.insert(BASEMAP_SOURCE.into(), basemap_source(t));
    }

    let (transport, places) = if token.is_some() {
        basemap_layers(&settings.theme)
    } else {
        log::debug!("no basemap token; skipping place and transportation overlays");
        (Vec::new(), Vec::new())
    };

    let out = doc
        .entry("layers")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| MapError::InvalidStyle("\"layers\" is not an array".into()))?;
    for layer in layers
        .fills
        .iter()
        .chain(transport.iter())
        .chain(std::iter::once(&layers.outline))
        .chain(places.iter())
    {
        out.push(layer_value(layer)?);
    }
    Ok(base)
}

/// A minimal empty style for when no base style is available.
pub fn empty_style() -> Value {
    json!({ "version": 8, "sources": {}, "layers": [] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_object_root() {
        let reg = crate::config::Registry::builtin();
        let sel = crate::selection::SelectionState::new(&reg);
        let settings = Settings::default();
        let layers = crate::layers::compose_layers(&reg, &sel, &settings).unwrap();
        let err = compose_style(json!([1, 2]), reg.default_election(), &layers, &settings).unwrap_err();
        assert!(matches!(err, MapError::InvalidStyle(_)));
    }

    #[test]
    fn election_source_promotes_district() {
        let reg = crate::config::Registry::builtin();
        let s = Settings {
            tile_server_url: "https://tiles.example/".into(),
            ..Settings::default()
        };
        let src = election_source(&s, reg.default_election());
        assert_eq!(src["url"], json!("https://tiles.example/pres_2025_1"));
        assert_eq!(src["promoteId"], json!("district"));
    }
}
