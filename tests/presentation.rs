use obwody_rs::interaction::HoverInfo;
use obwody_rs::models::LngLat;
use obwody_rs::present::{
    DETAIL_PROMPT, detail_model, legend_model, map_locale, popup_model, render_detail_text,
    render_popup_text,
};
use obwody_rs::selection::SelectionState;
use obwody_rs::{District, Registry};
use serde_json::json;

fn district() -> District {
    District::from_feature(&json!({
        "properties": {
            "district": "146501_12",
            "number": 12,
            "gmina": "Warszawa",
            "turnout": 71.25,
            "trzaskowski": 1200,
            "trzaskowski_proc": 40.0,
            "nawrocki": 900,
            "nawrocki_proc": 30.0,
            "mentzen": 450,
            "mentzen_proc": 15.0,
            "braun": 450,
            "braun_proc": 15.0
        }
    }))
    .unwrap()
}

#[test]
fn legend_lists_winners_with_ticks() {
    let reg = Registry::builtin();
    let model = legend_model(&reg, &SelectionState::new(&reg)).unwrap();
    assert_eq!(model.title, "Wynik");
    let labels: Vec<&str> = model.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Trzaskowski", "Nawrocki", "Mentzen"]);
    assert!(model.rows.iter().all(|r| r.colors.len() == 5));
    assert_eq!(model.ticks, ["20", "40", "60", "80%"]);
}

#[test]
fn legend_for_candidate_without_gradient_uses_tie_swatches() {
    let reg = Registry::builtin();
    let mut sel = SelectionState::new(&reg);
    sel.set_candidate(&reg, "braun".into()).unwrap();
    let model = legend_model(&reg, &sel).unwrap();
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].colors, reg.tie_gradient());
}

#[test]
fn popup_shows_top_three() {
    let reg = Registry::builtin();
    let election = reg.default_election();
    let hover = HoverInfo {
        district: district(),
        position: LngLat::new(21.0, 52.2),
    };
    let popup = popup_model(election, &hover);
    let ids: Vec<&str> = popup.results.iter().map(|r| r.candidate.as_str()).collect();
    // mentzen precedes braun on the ballot
    assert_eq!(ids, ["trzaskowski", "nawrocki", "mentzen"]);
    let text = render_popup_text(&popup, &reg, map_locale("pl"));
    assert!(text.starts_with("Warszawa OKW 12\n"));
    assert!(!text.contains("Grzegorz Braun"));
}

#[test]
fn detail_panel_has_total_and_turnout() {
    let reg = Registry::builtin();
    let detail = detail_model(reg.default_election(), &district());
    assert_eq!(detail.total_votes, 3000);
    assert_eq!(detail.results.len(), 4);
    let text = render_detail_text(Some(&detail), &reg, map_locale("en"));
    assert!(text.starts_with("Okręgowa Komisja Wyborcza 12\nWarszawa\nFrekwencja 71.25%\n"));
    assert!(text.contains("Rafał Trzaskowski"));
    assert!(text.contains("1,200"));
    assert!(text.contains("3,000"));
    assert!(text.contains("Łącznie głosów"));
}

#[test]
fn detail_prompt_when_nothing_clicked() {
    let reg = Registry::builtin();
    assert_eq!(render_detail_text(None, &reg, map_locale("pl")), format!("{DETAIL_PROMPT}\n"));
}
