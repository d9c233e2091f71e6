//! Shared style expressions and the basemap overlay layers (place names, transportation).

use crate::config::Theme;
use crate::layers::{LayerKind, LayerSpec};
use serde_json::{Map, Value, json};

/// Exponential base for every zoom interpolation on the map.
pub const EXPONENTIAL_BASE: f64 = 1.3;

/// Source id of the basemap vector tiles.
pub const BASEMAP_SOURCE: &str = "maptiler-source";

pub fn state_hovered() -> Value {
    json!(["boolean", ["feature-state", "hovered"], false])
}

pub fn state_clicked() -> Value {
    json!(["boolean", ["feature-state", "clicked"], false])
}

/// True for the hovered or the clicked feature.
pub fn state_active() -> Value {
    json!(["any", state_hovered(), state_clicked()])
}

/// Outline width of the hovered/clicked district.
pub fn selected_feature_outline() -> Value {
    json!(["interpolate", ["exponential", EXPONENTIAL_BASE], ["zoom"], 10, 1, 13, 2, 19, 6])
}

pub fn transportation_line_width(multiplier: f64) -> Value {
    json!([
        "interpolate",
        ["exponential", EXPONENTIAL_BASE],
        ["zoom"],
        10,
        multiplier,
        16,
        4.0 * multiplier,
        21,
        7.0 * multiplier
    ])
}

pub fn text_layout(base_font_size: f64) -> Map<String, Value> {
    let mut layout = Map::new();
    layout.insert("text-font".into(), json!(["Noto Sans Regular"]));
    layout.insert("text-field".into(), json!("{name}"));
    layout.insert(
        "text-size".into(),
        json!([
            "interpolate",
            ["exponential", EXPONENTIAL_BASE],
            ["zoom"],
            6,
            base_font_size,
            16,
            base_font_size * 1.75
        ]),
    );
    layout
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceClass {
    City,
    Town,
    Village,
    Suburb,
}

impl PlaceClass {
    pub const ALL: [PlaceClass; 4] = [PlaceClass::City, PlaceClass::Town, PlaceClass::Village, PlaceClass::Suburb];

    pub fn as_str(self) -> &'static str {
        match self {
            PlaceClass::City => "city",
            PlaceClass::Town => "town",
            PlaceClass::Village => "village",
            PlaceClass::Suburb => "suburb",
        }
    }

    fn font_size(self) -> f64 {
        match self {
            PlaceClass::City => 14.0,
            PlaceClass::Town => 12.0,
            _ => 10.0,
        }
    }

    fn min_zoom(self) -> f64 {
        match self {
            PlaceClass::City => 0.0,
            PlaceClass::Town => 8.0,
            _ => 12.0,
        }
    }
}

/// Label layer for one class of places.
pub fn place_name_layer(class: PlaceClass, theme: &Theme) -> LayerSpec {
    let mut paint = Map::new();
    paint.insert("text-color".into(), json!(theme.text_primary));
    paint.insert("text-halo-color".into(), json!(theme.background_paper));
    paint.insert(
        "text-halo-width".into(),
        json!(["interpolate", ["exponential", EXPONENTIAL_BASE], ["zoom"], 10, 1.5, 14, 2]),
    );
    LayerSpec {
        id: class.as_str().to_string(),
        kind: LayerKind::Symbol,
        source: BASEMAP_SOURCE.to_string(),
        source_layer: Some("place".into()),
        filter: Some(json!(["==", "class", class.as_str()])),
        minzoom: Some(class.min_zoom()),
        maxzoom: Some(15.0),
        layout: text_layout(class.font_size()),
        paint,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportationClass {
    Road,
    RoadSecondary,
    Rail,
}

impl TransportationClass {
    pub const ALL: [TransportationClass; 3] = [
        TransportationClass::Road,
        TransportationClass::RoadSecondary,
        TransportationClass::Rail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportationClass::Road => "road",
            TransportationClass::RoadSecondary => "road-secondary",
            TransportationClass::Rail => "rail",
        }
    }

    fn filter(self) -> Value {
        match self {
            TransportationClass::Road => json!(["in", "class", "primary", "secondary", "motorway", "trunk"]),
            TransportationClass::RoadSecondary => json!(["in", "class", "tertiary", "minor"]),
            TransportationClass::Rail => json!(["==", "class", "rail"]),
        }
    }

    fn width_multiplier(self) -> f64 {
        match self {
            TransportationClass::Road => 2.0,
            _ => 1.0,
        }
    }
}

/// Line layer for one class of roads/rails; `color` defaults to the theme background.
pub fn transportation_layer(
    class: TransportationClass,
    color: Option<&str>,
    opacity: f64,
    theme: &Theme,
) -> LayerSpec {
    let mut paint = Map::new();
    paint.insert(
        "line-color".into(),
        json!(color.unwrap_or(theme.background_default.as_str())),
    );
    paint.insert("line-width".into(), transportation_line_width(class.width_multiplier()));
    paint.insert("line-opacity".into(), json!(opacity));
    LayerSpec {
        id: class.as_str().to_string(),
        kind: LayerKind::Line,
        source: BASEMAP_SOURCE.to_string(),
        source_layer: Some("transportation".into()),
        filter: Some(class.filter()),
        minzoom: None,
        maxzoom: None,
        layout: Map::new(),
        paint,
    }
}

/// Transportation layers (drawn above the fills) and place labels (drawn on top).
pub fn basemap_layers(theme: &Theme) -> (Vec<LayerSpec>, Vec<LayerSpec>) {
    let transport = TransportationClass::ALL
        .iter()
        .map(|c| transportation_layer(*c, None, 0.4, theme))
        .collect();
    let places = PlaceClass::ALL.iter().map(|c| place_name_layer(*c, theme)).collect();
    (transport, places)
}
