//! End-to-end tests for the bax-geo binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn bax_geo() -> Command {
    let mut cmd = Command::cargo_bin("bax-geo").unwrap();
    cmd.env_remove("BOOKAX_GEO_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn distance_berlin_munich() {
    bax_geo()
        .args(["distance", "52.52", "13.405", "48.1351", "11.582"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" km"));
}

#[test]
fn distance_json_output() {
    let output = bax_geo()
        .args(["--format", "json", "distance", "40.7128", "-74.006", "34.0522", "-118.2437"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let km = value["distance_km"].as_f64().unwrap();
    assert!(km > 3900.0 && km < 4000.0);
}

#[test]
fn within_exit_codes() {
    bax_geo()
        .args(["within", "52.52", "13.405", "52.53", "13.41", "--radius", "5"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("within"));

    bax_geo()
        .args(["within", "52.52", "13.405", "48.1351", "11.582", "--radius", "100"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("outside"));
}

#[test]
fn validate_boundaries() {
    bax_geo().args(["validate", "-90", "-180"]).assert().success();
    bax_geo().args(["validate", "90.0001", "0"]).assert().code(1).stdout("invalid\n");
}

#[test]
fn wkt_default_and_custom_precision() {
    bax_geo()
        .args(["wkt", "52.52", "13.405"])
        .assert()
        .success()
        .stdout("SRID=4326;POINT(13.4050 52.5200)\n");

    bax_geo()
        .args(["wkt", "52.5200123", "13.4050456", "--precision", "6"])
        .assert()
        .success()
        .stdout("SRID=4326;POINT(13.405046 52.520012)\n");
}

#[test]
fn wkt_precision_out_of_range_is_rejected() {
    for precision in ["16", "18446744073709551615"] {
        bax_geo()
            .args(["wkt", "1", "2", "--precision", precision])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("--precision"));
    }
}

#[test]
fn wkt_precision_from_config() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[wkt]\nprecision = 2").unwrap();

    bax_geo()
        .arg("--config")
        .arg(config.path())
        .args(["wkt", "52.5200123", "13.4050456"])
        .assert()
        .success()
        .stdout("SRID=4326;POINT(13.41 52.52)\n");
}

#[test]
fn broken_config_is_reported() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[wkt]\nprecision = 99").unwrap();

    bax_geo()
        .arg("--config")
        .arg(config.path())
        .args(["wkt", "1", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("wkt.precision"));
}

#[test]
fn parse_wkt_and_geojson() {
    bax_geo()
        .args(["parse", "SRID=4326;POINT(13.405 52.52)"])
        .assert()
        .success()
        .stdout("latitude=52.52 longitude=13.405\n");

    bax_geo()
        .args(["parse", r#"{"type":"Point","coordinates":[13.405,52.52]}"#])
        .assert()
        .success()
        .stdout("latitude=52.52 longitude=13.405\n");
}

#[test]
fn parse_garbage_fails_quietly() {
    bax_geo()
        .args(["parse", "not a point"])
        .assert()
        .code(1)
        .stdout("no point\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn bbox_json_keys() {
    let output = bax_geo()
        .args(["-f", "json", "bbox", "52.52", "13.405", "--radius", "50"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["minLat"].as_f64().unwrap() < 52.52);
    assert!(value["maxLng"].as_f64().unwrap() > 13.405);
}

#[test]
fn nearby_from_file() {
    let mut rows = tempfile::NamedTempFile::new().unwrap();
    write!(
        rows,
        r#"[
            {{"id": 1, "location": {{"type": "Point", "coordinates": [13.4050, 52.5200]}}}},
            {{"id": 2, "location": "SRID=4326;POINT(11.5820 48.1351)"}},
            {{"id": 3, "location": "POINT(13.41 52.53)"}},
            {{"id": 4, "location": null}}
        ]"#
    )
    .unwrap();

    let output = bax_geo()
        .args(["-f", "json", "nearby"])
        .arg(rows.path())
        .args(["--lat", "52.52", "--lng", "13.405", "--radius", "10"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<i64> = value["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(value["stats"]["scanned"], 4);
    assert_eq!(value["stats"]["parsed"], 3);
}

#[test]
fn nearby_rejects_invalid_center() {
    bax_geo()
        .args(["nearby", "-", "--lat", "95", "--lng", "0"])
        .write_stdin("[]")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid coordinate"));
}
