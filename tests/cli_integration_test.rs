//! Runs the `pavemap` binary end to end.

use assert_cmd::Command;
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn pavemap(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pavemap"));
    cmd.current_dir(dir.path())
        .env_remove("PAVEMAP_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to run pavemap");
    if !output.status.success() {
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("pavemap exited with {}", output.status);
    }
    String::from_utf8(output.stdout).expect("stdout is UTF-8")
}

const RECORDS: &str = indoc! {r#"
    {
      "type": "FeatureCollection",
      "features": [
        { "properties": { "LA_NAME": "Cork County Council", "ROUTE": "R600", "AIRI_2018": 2.5 } },
        { "properties": { "LA_NAME": "Cork County Council", "ROUTE": "R586", "AIRI_2018": 6.0 } },
        { "properties": { "LA_NAME": "Fingal County Council", "ROUTE": "R132", "IsDublin": 1, "AIRI_2018": 9.0 } },
        { "properties": { "LA_NAME": "Fingal County Council", "ROUTE": "R132", "IsDublin": 1, "AIRI_2018": null } },
        { "properties": { "ROUTE": "L1010", "AIRI_2018": 1.0 } }
      ]
    }
"#};

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    pavemap(&dir).arg("init").assert().success();
    let path = dir.path().join(".pavemap.toml");
    assert!(path.is_file());

    pavemap(&dir).arg("init").assert().failure();
    pavemap(&dir).args(["init", "--force"]).assert().success();

    // The generated file loads and drives later commands
    let text = stdout_of(pavemap(&dir).args(["classify", "--kpi", "iri", "--year", "2018", "4"]));
    assert!(text.contains("Fair"), "{}", text);
}

#[test]
fn test_classify_values() {
    let dir = TempDir::new().unwrap();
    let text = stdout_of(pavemap(&dir).args([
        "classify", "--kpi", "iri", "--year", "2018", "2", "7.5", "n/a",
    ]));
    let classes: Vec<String> = text
        .lines()
        .map(|l| l.split_whitespace().skip(1).collect::<Vec<_>>().join(" "))
        .collect();
    assert_eq!(classes, vec!["Very Good", "Very Poor", "-"]);
}

#[test]
fn test_classify_unknown_kpi_fails() {
    let dir = TempDir::new().unwrap();
    pavemap(&dir)
        .args(["classify", "--kpi", "skid", "--year", "2018", "1"])
        .assert()
        .failure();
}

#[test]
fn test_where_for_default_category() {
    let dir = TempDir::new().unwrap();
    let text = stdout_of(pavemap(&dir).args(["where", "--year", "2018", "--category", "rural"]));
    assert_eq!(
        text.trim(),
        "COALESCE(IsDublin, 0) <> 1 AND COALESCE(IsCityTown, 0) <> 1 \
         AND COALESCE(IsPeat, 0) <> 1 AND COALESCE(IsFormerNa, 0) <> 1"
    );
}

#[test]
fn test_where_with_selection() {
    let dir = TempDir::new().unwrap();
    let text = stdout_of(pavemap(&dir).args([
        "where",
        "--year",
        "2018",
        "--route",
        "R600",
        "--kpi",
        "iri",
        "--select",
        "region:Cork County Council:poor",
    ]));
    assert!(text.contains("ROUTE = 'R600'"), "{}", text);
    assert!(text.contains("LA_NAME = 'Cork County Council'"), "{}", text);
    assert!(text.contains("AIRI_2018 > 5"), "{}", text);
    assert!(text.contains("AIRI_2018 <= 7"), "{}", text);
}

#[test]
fn test_aggregate_json_output() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("segments.json");
    fs::write(&records, RECORDS).unwrap();

    let text = stdout_of(pavemap(&dir).args([
        "aggregate",
        records.to_str().unwrap(),
        "--kpi",
        "iri",
        "--year",
        "2018",
        "--simplified",
        "--format",
        "json",
    ]));
    let json: Value = serde_json::from_str(&text).expect("output is JSON");

    let groups = json["groups"].as_array().unwrap();
    let keys: Vec<&str> = groups.iter().filter_map(|g| g["key"].as_str()).collect();
    assert_eq!(keys, vec!["Cork County Council", "Fingal County Council"]);
    assert_eq!(groups[0]["counts"]["good"], 1);
    assert_eq!(groups[0]["counts"]["poor"], 1);
    assert_eq!(groups[1]["total"], 1);

    assert_eq!(json["statistics"]["records_processed"], 5);
    assert_eq!(json["statistics"]["missing_value"], 1);
    assert_eq!(json["statistics"]["unresolved_group"], 1);
}

#[test]
fn test_aggregate_by_category_to_file() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("segments.json");
    let output = dir.path().join("report.txt");
    fs::write(&records, RECORDS).unwrap();

    pavemap(&dir)
        .args([
            "aggregate",
            records.to_str().unwrap(),
            "--kpi",
            "iri",
            "--year",
            "2018",
            "--group-by",
            "category",
            "--stats",
            "--sequential",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("Roughness (IRI) 2018 by category"), "{}", text);
    assert!(text.lines().any(|l| l.starts_with("Dublin")), "{}", text);
    assert!(text.lines().any(|l| l.starts_with("Rural")), "{}", text);
    assert!(text.contains("Value statistics"), "{}", text);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".pavemap.toml"),
        "[selection]\nmax_selections = 0\n",
    )
    .unwrap();
    pavemap(&dir)
        .args(["classify", "--kpi", "iri", "--year", "2018", "1"])
        .assert()
        .failure();
}
