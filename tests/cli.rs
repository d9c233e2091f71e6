use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn obwody() -> Command {
    let mut cmd = Command::cargo_bin("obwody").unwrap();
    // keep runs independent of the developer's environment
    cmd.env_remove("OBWODY_MAPTILER_TOKEN")
        .env_remove("OBWODY_TILE_SERVER_URL")
        .env_remove("OBWODY_BASE_STYLE_URL");
    cmd
}

fn with_builtin_registry(cmd: &mut Command, dir: &std::path::Path) {
    // point the per-user config lookup at an empty directory
    cmd.env("XDG_CONFIG_HOME", dir).env("HOME", dir);
}

#[test]
fn cli_shows_help() {
    obwody()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("obwody"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn lists_builtin_election() {
    let dir = tempdir().unwrap();
    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.arg("elections")
        .assert()
        .success()
        .stdout(predicate::str::contains("pres_2025_1"))
        .stdout(predicate::str::contains("Karol Nawrocki [winner, scale]"));
}

#[test]
fn writes_style_and_legend() {
    let dir = tempdir().unwrap();
    let style = dir.path().join("style.json");
    let legend = dir.path().join("legend.svg");

    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args(["style", "--candidate", "nawrocki", "--out"])
        .arg(&style)
        .assert()
        .success();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&style).unwrap()).unwrap();
    let layers = v["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0]["id"], "pres_2025_1-fill-nawrocki");

    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args(["legend", "--out"]).arg(&legend).assert().success();
    assert!(fs::read_to_string(&legend).unwrap().contains("Wynik"));
}

#[test]
fn unknown_candidate_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args(["style", "--candidate", "kowalski"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("kowalski"));
}

#[test]
fn district_prints_table_and_saves_csv() {
    let dir = tempdir().unwrap();
    let feature = dir.path().join("okw.json");
    let csv = dir.path().join("okw.csv");
    fs::write(
        &feature,
        r#"{"id": 12, "properties": {"number": 12, "gmina": "Gdańsk", "nawrocki": 1500, "braun": 20}}"#,
    )
    .unwrap();

    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args(["district", "--locale", "en", "--file"])
        .arg(&feature)
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Okręgowa Komisja Wyborcza 12"))
        .stdout(predicate::str::contains("1,520"));
    assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 3);
}

#[test]
fn replay_reports_flags_and_detail() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.json");
    fs::write(
        &events,
        r#"[
          {"type": "pointer_move", "feature": {"id": 1, "properties": {"gmina": "Sopot", "number": 3, "mentzen": 7}}, "position": {"lng": 18.56, "lat": 54.44}},
          {"type": "click", "feature": {"id": 1, "properties": {"gmina": "Sopot", "number": 3, "mentzen": 7}}},
          {"type": "pointer_move", "feature": {"id": 2, "properties": {}}, "position": {"lng": 18.57, "lat": 54.45}}
        ]"#,
    )
    .unwrap();

    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args(["replay", "--file"])
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("phase: HoveredAndClicked"))
        .stdout(predicate::str::contains("hovered: [2]"))
        .stdout(predicate::str::contains("clicked: [1]"))
        .stdout(predicate::str::contains("Okręgowa Komisja Wyborcza 3"));
}

#[test]
fn replay_candidate_change_clears_flags() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.json");
    fs::write(
        &events,
        r#"[{"type": "click", "feature": {"id": 1}}, {"type": "select_candidate", "candidate": "nawrocki"}]"#,
    )
    .unwrap();

    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args(["replay", "--file"])
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("selection: pres_2025_1 / nawrocki"))
        .stdout(predicate::str::contains("phase: Idle"))
        .stdout(predicate::str::contains("clicked: []"));
}

#[test]
fn replay_rejects_non_array() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("events.json");
    fs::write(&events, r#"{"type": "pointer_leave"}"#).unwrap();
    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args(["replay", "--file"]).arg(&events).assert().failure();
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn style_from_live_base_style() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("style.json");
    let mut cmd = obwody();
    with_builtin_registry(&mut cmd, dir.path());
    cmd.args([
        "style",
        "--base-style",
        "https://demotiles.maplibre.org/style.json",
        "--out",
    ])
    .arg(&out)
    .assert()
    .success();
    assert!(out.exists());
}
