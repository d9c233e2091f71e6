use obwody_rs::error::MapError;
use obwody_rs::selection::SelectionState;
use obwody_rs::{CandidateFilter, Registry};

const TWO_ELECTIONS: &str = r##"{
  "candidates": [
    {"id": "a", "name": "Anna A", "scale": ["#EEEEEE", "#0D47A1"]},
    {"id": "b", "name": "Bartek B"},
    {"id": "c", "name": "Celina C", "gradient": ["#111111", "#222222", "#333333", "#444444", "#555555"]}
  ],
  "elections": [
    {"id": "e1", "name": "One", "candidates": ["a", "b"], "winners": ["a"], "source_layer": "e1"},
    {"id": "e2", "name": "Two", "candidates": ["c"], "winners": ["c"], "source_layer": "e2"}
  ]
}"##;

#[test]
fn election_change_resets_candidate() {
    let reg = Registry::from_json_str(TWO_ELECTIONS).unwrap();
    let mut s = SelectionState::new(&reg);
    assert_eq!(s.election, "e1");
    s.set_candidate(&reg, "a".into()).unwrap();
    s.set_election(&reg, "e2").unwrap();
    assert_eq!(s.election, "e2");
    assert_eq!(s.candidate, CandidateFilter::All);
}

#[test]
fn candidate_must_run_in_active_election() {
    let reg = Registry::from_json_str(TWO_ELECTIONS).unwrap();
    let mut s = SelectionState::new(&reg);
    let err = s.set_candidate(&reg, "c".into()).unwrap_err();
    assert_eq!(
        err,
        MapError::UnknownCandidate {
            election: "e1".into(),
            candidate: "c".into()
        }
    );
    assert_eq!(s.candidate, CandidateFilter::All);
    // non-winners without a gradient are still selectable
    s.set_candidate(&reg, "b".into()).unwrap();
    s.set_candidate(&reg, CandidateFilter::All).unwrap();
    assert_eq!(s.candidate, CandidateFilter::All);
}
