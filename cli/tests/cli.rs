use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write test file");
}

#[test]
fn encode_auto_detects_json() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.json");
    write_file(&input, r#"{"name":"Ada","items":[{"id":1}]}"#);

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .assert()
        .success()
        .stdout("name,items[0].id\nAda,1");
}

#[test]
fn decode_auto_detects_csv() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.csv");
    write_file(&input, "name,age\nAda,37");

    let expected = "{\n  \"name\": \"Ada\",\n  \"age\": 37\n}";

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn decode_multiple_rows_yields_an_array() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.csv");
    write_file(&input, "a\n1\n2");

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .args(["--indent", "0"])
        .assert()
        .success()
        .stdout("[{\"a\":1},{\"a\":2}]");
}

#[test]
fn collection_flag_forces_an_array() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.csv");
    write_file(&input, "a\n1");

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .args(["--collection", "--indent", "0"])
        .assert()
        .success()
        .stdout("[{\"a\":1}]");
}

#[test]
fn encode_with_pipe_delimiter() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.json");
    write_file(&input, r#"{"a":"x,y","b":2}"#);

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .args(["--delimiter", "|"])
        .assert()
        .success()
        .stdout("a|b\nx,y|2");
}

#[test]
fn fixed_strategy_clamps_list_columns() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.json");
    write_file(&input, r#"{"items":[{"id":1},{"id":2}]}"#);

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .args(["--fixed", "1"])
        .assert()
        .success()
        .stdout("items[0].id\n1");
}

#[test]
fn encode_writes_file_and_reports() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.json");
    let output = dir.path().join("out.csv");
    write_file(&input, r#"{"a":1}"#);

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .args(["-o", output.to_str().expect("utf-8 path")])
        .assert()
        .success()
        .stdout(contains("Encoded"));

    assert_eq!(fs::read_to_string(&output).expect("output file"), "a\n1");
}

#[test]
fn unbalanced_quote_fails_with_location() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.csv");
    write_file(&input, "a\n\"oops");

    cargo_bin_cmd!("jsontab")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("unterminated quoted field"))
        .stderr(contains("line 2"));
}

#[test]
fn round_trip_through_both_modes() {
    let dir = TempDir::new().expect("tempdir");
    let json_in = dir.path().join("input.json");
    let csv_out = dir.path().join("table.csv");
    let json_out = dir.path().join("restored.json");
    write_file(
        &json_in,
        r#"{"name":"Ada","stats":{"hp":10},"items":[{"id":1},{"id":2}]}"#,
    );

    cargo_bin_cmd!("jsontab")
        .arg(&json_in)
        .args(["-o", csv_out.to_str().expect("utf-8 path")])
        .assert()
        .success();

    cargo_bin_cmd!("jsontab")
        .arg(&csv_out)
        .args(["--indent", "0", "-o", json_out.to_str().expect("utf-8 path")])
        .assert()
        .success();

    let restored = fs::read_to_string(&json_out).expect("restored file");
    assert_eq!(
        restored,
        r#"{"name":"Ada","stats":{"hp":10},"items":[{"id":1},{"id":2}]}"#
    );
}
