use obwody_rs::layers::{LayerComposer, LayerKind, compose_layers};
use obwody_rs::selection::SelectionState;
use obwody_rs::{CandidateFilter, Registry, Settings};
use serde_json::json;

fn all_view(reg: &Registry) -> SelectionState {
    SelectionState::new(reg)
}

fn single(reg: &Registry, id: &str) -> SelectionState {
    let mut s = SelectionState::new(reg);
    s.set_candidate(reg, id.into()).unwrap();
    s
}

#[test]
fn all_view_has_one_fill_per_winner_plus_tie() {
    let reg = Registry::builtin();
    let layers = compose_layers(&reg, &all_view(&reg), &Settings::default()).unwrap();
    let ids: Vec<&str> = layers.fills.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "pres_2025_1-fill-trzaskowski",
            "pres_2025_1-fill-nawrocki",
            "pres_2025_1-fill-mentzen",
            "pres_2025_1-fill-tie"
        ]
    );
    let nawrocki = &layers.fills[1];
    assert_eq!(nawrocki.kind, LayerKind::Fill);
    assert_eq!(nawrocki.filter, Some(json!(["==", ["get", "winner"], "nawrocki"])));
    assert_eq!(nawrocki.paint["fill-color"][1], json!(["get", "nawrocki_proc"]));
    assert_eq!(nawrocki.paint["fill-color"][3], json!(20.0));

    let tie = &layers.fills[3];
    assert_eq!(
        tie.filter,
        Some(json!(["!", ["in", ["get", "winner"], ["literal", ["trzaskowski", "nawrocki", "mentzen"]]]]))
    );
    assert_eq!(tie.paint["fill-color"][1], json!(["get", "winner_proc"]));
}

#[test]
fn non_winner_never_gets_a_dedicated_layer_in_all_view() {
    let reg = Registry::builtin();
    let layers = compose_layers(&reg, &all_view(&reg), &Settings::default()).unwrap();
    for id in ["braun", "holownia", "zandberg"] {
        assert!(layers.fills.iter().all(|l| !l.id.ends_with(id)));
    }
}

#[test]
fn single_candidate_view_is_unfiltered() {
    let reg = Registry::builtin();
    let layers = compose_layers(&reg, &single(&reg, "mentzen"), &Settings::default()).unwrap();
    assert_eq!(layers.fills.len(), 1);
    let fill = &layers.fills[0];
    assert_eq!(fill.filter, None);
    assert_eq!(fill.paint["fill-color"][1], json!(["get", "mentzen_proc"]));
}

#[test]
fn single_candidate_uses_max_gradient() {
    let reg = Registry::from_json_str(
        r##"{
          "candidates": [{"id": "m", "name": "M M", "scale": ["#7986CB", "#1A237E"], "max_gradient": 20}],
          "elections": [{"id": "e", "name": "E", "candidates": ["m"], "winners": ["m"], "source_layer": "e"}]
        }"##,
    )
    .unwrap();
    let layers = compose_layers(&reg, &single(&reg, "m"), &Settings::default()).unwrap();
    let color = &layers.fills[0].paint["fill-color"];
    assert_eq!(color[3], json!(4.0));
    assert_eq!(color[9], json!(16.0));
}

#[test]
fn candidate_without_gradient_is_flat_gray() {
    let reg = Registry::builtin();
    let layers = compose_layers(&reg, &single(&reg, "braun"), &Settings::default()).unwrap();
    assert_eq!(layers.fills[0].paint["fill-color"], json!("#616161"));
}

#[test]
fn outline_and_opacity_follow_feature_state() {
    let reg = Registry::builtin();
    let settings = Settings {
        map_opacity: 0.5,
        ..Settings::default()
    };
    for sel in [all_view(&reg), single(&reg, "nawrocki")] {
        let layers = compose_layers(&reg, &sel, &settings).unwrap();
        assert_eq!(layers.outline.id, "pres_2025_1-outline");
        assert_eq!(layers.outline.kind, LayerKind::Line);
        let active = json!([
            "any",
            ["boolean", ["feature-state", "hovered"], false],
            ["boolean", ["feature-state", "clicked"], false]
        ]);
        assert_eq!(layers.outline.paint["line-opacity"], json!(["case", active, 1, 0]));
        assert_eq!(
            layers.outline.paint["line-width"],
            json!(["interpolate", ["exponential", 1.3], ["zoom"], 10, 1, 13, 2, 19, 6])
        );
        for fill in &layers.fills {
            assert_eq!(fill.paint["fill-opacity"], json!(["case", active, 1.0, 0.5]));
            assert_eq!(fill.source_layer.as_deref(), Some("pres_2025_1"));
        }
        assert_eq!(layers.iter().last(), Some(&layers.outline));
    }
}

#[test]
fn layer_spec_serializes_as_style_layer() {
    let reg = Registry::builtin();
    let layers = compose_layers(&reg, &all_view(&reg), &Settings::default()).unwrap();
    let v = serde_json::to_value(&layers.outline).unwrap();
    assert_eq!(v["type"], json!("line"));
    assert_eq!(v["source-layer"], json!("pres_2025_1"));
    assert!(v.get("filter").is_none());
    assert!(v.get("layout").is_none());
}

#[test]
fn composer_memoizes_per_selection() {
    let reg = Registry::builtin();
    let mut composer = LayerComposer::new(Settings::default());
    let all = all_view(&reg);
    let one = single(&reg, "trzaskowski");
    let first = composer.layers(&reg, &all).unwrap().clone();
    composer.layers(&reg, &one).unwrap();
    let again = composer.layers(&reg, &all).unwrap().clone();
    assert_eq!(first, again);
    assert_eq!(composer.misses(), 2);

    let mut back = one.clone();
    back.set_candidate(&reg, CandidateFilter::All).unwrap();
    composer.layers(&reg, &back).unwrap();
    assert_eq!(composer.misses(), 2);
}
