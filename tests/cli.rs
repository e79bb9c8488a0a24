mod common;

use std::fs;

use assert_cmd::Command;
use common::{TV_HEADERS, TV_STATIONS_CSV, TestWorkspace};
use predicates::prelude::*;
use predicates::str::contains;

fn shape_import() -> Command {
    Command::cargo_bin("shape-import").expect("binary exists")
}

#[test]
fn headers_lists_declared_columns_with_roles() {
    let workspace = TestWorkspace::new();
    let settings = workspace.write_settings("tv.yml", "tvstations.csv", TV_HEADERS);

    shape_import()
        .args(["headers", "--settings", settings.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Latitude (degrees)"))
        .stdout(contains("x coordinate"))
        .stdout(contains("attribute"));
}

#[test]
fn read_renders_rows_as_table() {
    let workspace = TestWorkspace::new();
    workspace.write("tvstations.csv", TV_STATIONS_CSV);
    let settings = workspace.write_settings("tv.yml", "tvstations.csv", TV_HEADERS);

    shape_import()
        .args(["read", "--settings", settings.to_str().unwrap(), "--limit", "2"])
        .assert()
        .success()
        .stdout(contains("Primary Network Affiliation"))
        .stdout(contains("43.0553"))
        .stdout(contains("45.0589").not());
}

#[test]
fn read_json_emits_one_object_per_row() {
    let workspace = TestWorkspace::new();
    workspace.write("people.csv", "Id,Name,Age\n1,Alice,30\n2,Bob,41\n");
    let settings =
        workspace.write_settings("people.yml", "people.csv", &[("Id", "TEXT"), ("Name", "TEXT")]);

    let output = shape_import()
        .args(["read", "--settings", settings.to_str().unwrap(), "--json"])
        .output()
        .expect("run read");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            r#"{"Id":"1","Name":"Alice"}"#,
            r#"{"Id":"2","Name":"Bob"}"#
        ]
    );
}

#[test]
fn read_source_override_replaces_settings_source() {
    let workspace = TestWorkspace::new();
    let other = workspace.write("other.csv", "Id\n99\n");
    let settings = workspace.write_settings("people.yml", "missing.csv", &[("Id", "TEXT")]);

    shape_import()
        .args([
            "read",
            "--settings",
            settings.to_str().unwrap(),
            "--source",
            other.to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success()
        .stdout(contains(r#"{"Id":"99"}"#));
}

#[test]
fn export_writes_attributes_and_point_wkt() {
    let workspace = TestWorkspace::new();
    workspace.write("tvstations.csv", TV_STATIONS_CSV);
    let settings = workspace.write_settings("tv.yml", "tvstations.csv", TV_HEADERS);
    let output = workspace.path().join("stations.csv");

    shape_import()
        .args([
            "export",
            "--settings",
            settings.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read export");
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(
        lines[0],
        r#""Primary Network Affiliation","Market Rank","Licensed State","WKT""#
    );
    assert_eq!(lines[1], r#""ABC","85","WI","POINT (-89.5353 43.0553)""#);
    assert_eq!(lines.len(), 4);
}

#[test]
fn unsupported_source_fails_with_message() {
    let workspace = TestWorkspace::new();
    workspace.write("stations.json", "[]");
    let settings = workspace.write_settings("tv.yml", "stations.json", TV_HEADERS);

    shape_import()
        .args(["read", "--settings", settings.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("the file type of '.json' is not supported"));
}

#[test]
fn ragged_source_fails_the_read() {
    let workspace = TestWorkspace::new();
    workspace.write("people.csv", "Id,Name\n1\n");
    let settings =
        workspace.write_settings("people.yml", "people.csv", &[("Id", "TEXT"), ("Name", "TEXT")]);

    shape_import()
        .args(["read", "--settings", settings.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("record 2 has 1 field(s)"));
}
