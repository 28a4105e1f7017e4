//! Integration tests for the provas CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn provas() -> Command {
    let mut cmd = Command::cargo_bin("provas").unwrap();
    cmd.env_remove("PROVAS_CONFIG");
    cmd
}

#[test]
fn test_process_text_output() {
    provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# enem_2023_sample.txt (2023)"))
        .stdout(predicate::str::contains("enem_2023_sample_2023_Q91"))
        .stdout(predicate::str::contains("enem_2023_sample_2023_Q92"))
        .stdout(predicate::str::contains("B) O processo ocorre nos cloroplastos"))
        .stdout(predicate::str::contains("[invalid]"))
        .stdout(predicate::str::contains("Answer: B"))
        .stdout(predicate::str::contains("2 records"));
}

#[test]
fn test_process_json_output() {
    let output = provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .arg("-f")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let documents: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let documents = documents.as_array().unwrap();
    assert_eq!(documents.len(), 1);

    let document = &documents[0];
    assert_eq!(document["source_file"], "enem_2023_sample.txt");
    assert_eq!(document["year"], "2023");
    assert_eq!(document["stats"]["applied_strategy"], "question_based");
    assert!(document.get("chunks").is_none());

    let records = document["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "enem_2023_sample_2023_Q91");
    assert_eq!(records[0]["correct_alternative"], "B");
    assert_eq!(records[0]["alternatives"][2]["is_valid"], false);
}

#[test]
fn test_process_markdown_output() {
    provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .arg("-f")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("## enem_2023_sample_2023_Q91"))
        .stdout(predicate::str::contains("*(unreadable)*"))
        .stdout(predicate::str::contains("*Total records: 2*"));
}

#[test]
fn test_include_chunks_in_json() {
    let output = provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .arg("-f")
        .arg("json")
        .arg("--include-chunks")
        .output()
        .unwrap();
    assert!(output.status.success());

    let documents: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let chunks = documents[0]["chunks"].as_array().unwrap();
    assert!(chunks.len() >= 2);
}

#[test]
fn test_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("records.json");

    provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .arg("-f")
        .arg("json")
        .arg("-o")
        .arg(&output_path)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output_path).unwrap();
    let documents: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(documents[0]["records"].as_array().unwrap().len(), 2);
}

#[test]
fn test_year_flag_and_headerless_identifier() {
    provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("apostila_revisao.txt"))
        .arg("--year")
        .arg("2019")
        .assert()
        .success()
        .stdout(predicate::str::contains("# apostila_revisao.txt (2019)"))
        .stdout(predicate::str::contains("apostila_revisao_2019_CHUNK_1"));
}

#[test]
fn test_unknown_year_without_flag() {
    provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("apostila_revisao.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("apostila_revisao_unknown_CHUNK_1"));
}

#[test]
fn test_directory_input_processes_every_text_file() {
    provas()
        .arg("process")
        .arg("-i")
        .arg("tests/fixtures")
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("# apostila_revisao.txt"))
        .stdout(predicate::str::contains("# enem_2023_sample.txt"))
        .stdout(predicate::str::contains("3 records"));
}

#[test]
fn test_missing_input_fails() {
    provas()
        .arg("process")
        .arg("-i")
        .arg("tests/fixtures/nao_existe.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_inverted_chunk_sizes_fail() {
    provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .arg("--min-chunk")
        .arg("500")
        .arg("--max-chunk")
        .arg("400")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Min chunk size"));
}

#[test]
fn test_unknown_strategy_fails() {
    provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .arg("-s")
        .arg("random")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown segmentation strategy"));
}

#[test]
fn test_config_file_sets_strategy_and_format() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("provas.toml");
    fs::write(
        &config_path,
        "[segmentation]\nstrategy = \"adaptive_size\"\n\n[output]\nformat = \"json\"\npretty_json = false\n",
    )
    .unwrap();

    let output = provas()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("enem_2023_sample.txt"))
        .arg("-c")
        .arg(&config_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim().lines().count(), 1);
    let documents: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(documents[0]["stats"]["requested_strategy"], "adaptive_size");
    assert_eq!(documents[0]["stats"]["applied_strategy"], "adaptive_size");
}

#[test]
fn test_list_strategies() {
    provas()
        .arg("list")
        .arg("strategies")
        .assert()
        .success()
        .stdout(predicate::str::contains("question_based"))
        .stdout(predicate::str::contains("contextual_overlap"))
        .stdout(predicate::str::contains("mixed"));
}

#[test]
fn test_list_areas() {
    provas()
        .arg("list")
        .arg("areas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Matemática"))
        .stdout(predicate::str::contains("Ciências Humanas"));
}

#[test]
fn test_generate_then_validate_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("provas.toml");

    provas()
        .arg("generate-config")
        .arg("-o")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("generated successfully"));

    provas()
        .arg("validate")
        .arg("-c")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("question_based"));
}

#[test]
fn test_validate_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[segmentation]\noverlap_window_size = 5000\n").unwrap();

    provas()
        .arg("validate")
        .arg("-c")
        .arg(&config_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}
