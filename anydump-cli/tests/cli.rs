use predicates::prelude::*;
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct SampleFile {
    _dir: TempDir,
    path: PathBuf,
}

fn write_sample(name: &str, contents: &str) -> Result<SampleFile, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(SampleFile { _dir: dir, path })
}

#[test]
fn dump_renders_document_with_two_space_indent() -> Result<(), Box<dyn Error>> {
    let sample = write_sample("doc.json", r#"{"a": 1, "b": [1, 2, {"c": 3}]}"#)?;
    let output = assert_cmd::Command::cargo_bin("anydump")?
        .args(["dump", sample.path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output)?;
    let expected = "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2,\n    {\n      \"c\": 3\n    }\n  ]\n}\n";
    assert_eq!(stdout, expected);
    Ok(())
}

#[test]
fn dump_reads_stdin() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("anydump")?
        .arg("dump")
        .write_stdin("[true, null]")
        .assert()
        .success()
        .stdout("[\n  true,\n  null\n]\n");
    Ok(())
}

#[test]
fn dump_ndjson_dumps_each_line() -> Result<(), Box<dyn Error>> {
    let sample = write_sample("events.ndjson", "{\"user\":\"alice\"}\n\n{\"user\":\"bob\"}\n")?;
    let output = assert_cmd::Command::cargo_bin("anydump")?
        .args(["dump", sample.path.to_str().unwrap(), "--ndjson"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output)?;
    assert_eq!(stdout, "{\n  \"user\": \"alice\"\n}\n{\n  \"user\": \"bob\"\n}\n");
    Ok(())
}

#[test]
fn dump_applies_limits() -> Result<(), Box<dyn Error>> {
    let output = assert_cmd::Command::cargo_bin("anydump")?
        .args(["dump", "-", "--max-sequence", "2", "--max-text", "3"])
        .write_stdin(r#"["abcdef", 2, 3, 4]"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value, serde_json::json!(["abc...", 2, "... (2 more)"]));
    Ok(())
}

#[test]
fn dump_writes_output_file() -> Result<(), Box<dyn Error>> {
    let sample = write_sample("doc.json", r#"{"k": "v"}"#)?;
    let out_path = sample.path.with_file_name("tree.txt");
    assert_cmd::Command::cargo_bin("anydump")?
        .args([
            "dump",
            sample.path.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(fs::read_to_string(&out_path)?, "{\n  \"k\": \"v\"\n}\n");
    Ok(())
}

#[test]
fn dump_rejects_invalid_json() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("anydump")?
        .arg("dump")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON document"));
    Ok(())
}

#[test]
fn dump_reports_bad_ndjson_line() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("anydump")?
        .args(["dump", "--ndjson"])
        .write_stdin("{\"ok\":1}\n{broken\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
    Ok(())
}

#[test]
fn dump_rejects_zero_limit() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("anydump")?
        .args(["dump", "--max-mapping", "0"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_mapping_entries"));
    Ok(())
}

#[test]
fn limits_prints_config_merged_with_flags() -> Result<(), Box<dyn Error>> {
    let config = write_sample("limits.toml", "max_text_chars = 64\n")?;
    assert_cmd::Command::cargo_bin("anydump")?
        .args([
            "limits",
            "--config",
            config.path.to_str().unwrap(),
            "--max-bytes",
            "8",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("max_text_chars = 64")
                .and(predicate::str::contains("max_bytes = 8"))
                .and(predicate::str::contains("max_object_chars = 100000000")),
        );
    Ok(())
}

#[test]
fn missing_input_file_fails() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("anydump")?
        .args(["dump", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
    Ok(())
}

#[test]
fn errors_exit_with_code_one_and_display_message() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("anydump")?
        .arg("dump")
        .write_stdin("[1,")
        .assert()
        .code(1)
        .stderr(
            predicate::str::starts_with("error: invalid JSON document")
                .and(predicate::str::contains("InvalidDocument").not()),
        );
    Ok(())
}
