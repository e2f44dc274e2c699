// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

const TURK_CSV: &str = concat!(
    "HITId,Input.image_url,Answer.annotation_data\n",
    "h1,https://s3.amazonaws.com/dimroc-public/ucf/3.jpg,\"[{\"\"left\"\":10,\"\"top\"\":20}]\"\n",
);

/// The binary with settings isolated from the caller's environment.
fn crowdcount() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("crowdcount")?;
    cmd.env_remove("FLOYD")
        .env_remove("CROWDCOUNT_ROOT")
        .env_remove("CROWDCOUNT_ENVIRONMENT");
    Ok(cmd)
}

fn write_ucf_fixture(root: &Path, n: usize) -> Result<(), Box<dyn std::error::Error>> {
    let dir = root.join("data").join("annotations");
    std::fs::create_dir_all(&dir)?;
    let table: serde_json::Map<String, serde_json::Value> = (1..=n)
        .map(|i| (format!("data/ucf/{}.jpg", i), serde_json::json!([[i, 20]])))
        .collect();
    std::fs::write(dir.join("ucf.json"), serde_json::to_string(&table)?)?;
    Ok(())
}

#[test]
fn test_datasets() -> Result<(), Box<dyn std::error::Error>> {
    crowdcount()?
        .arg("datasets")
        .assert()
        .success()
        .stdout("ucf\nmall\nshakecam\n");
    Ok(())
}

#[test]
fn test_path_local() -> Result<(), Box<dyn std::error::Error>> {
    crowdcount()?
        .args(["path", "mall", "--index", "12"])
        .assert()
        .success()
        .stdout("data/mall/frames/seq_000012.jpg\n");
    Ok(())
}

#[test]
fn test_path_floyd() -> Result<(), Box<dyn std::error::Error>> {
    crowdcount()?
        .args(["--floyd", "path", "ucf", "--index", "3"])
        .assert()
        .success()
        .stdout("/data/ucf/3.jpg\n");
    Ok(())
}

#[test]
fn test_path_floyd_marker() -> Result<(), Box<dyn std::error::Error>> {
    crowdcount()?
        .env("FLOYD", "1")
        .args(["path", "ucf", "--index", "3"])
        .assert()
        .success()
        .stdout("/data/ucf/3.jpg\n");
    Ok(())
}

#[test]
fn test_path_large_shakecam_index() -> Result<(), Box<dyn std::error::Error>> {
    crowdcount()?
        .args(["path", "shakecam", "--index", "1509843600123"])
        .assert()
        .success()
        .stdout("data/shakecam/shakeshack-1509843600123.jpg\n");
    Ok(())
}

#[test]
fn test_path_unknown_dataset() -> Result<(), Box<dyn std::error::Error>> {
    crowdcount()?
        .args(["path", "venice"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("UnknownDataset"));
    Ok(())
}

#[test]
fn test_get() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    write_ucf_fixture(temp_dir.path(), 3)?;

    crowdcount()?
        .arg("--root")
        .arg(temp_dir.path())
        .args(["get", "data/ucf/2.jpg"])
        .assert()
        .success()
        .stdout("[[2.0,20.0]]\n");

    crowdcount()?
        .arg("--root")
        .arg(temp_dir.path())
        .args(["get", "data/ucf/9.jpg"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("KeyNotFound"));
    Ok(())
}

#[test]
fn test_split_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    write_ucf_fixture(temp_dir.path(), 20)?;
    let output = temp_dir.path().join("split.json");

    crowdcount()?
        .env("CROWDCOUNT_ROOT", temp_dir.path())
        .arg("split")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicates::str::contains("total"))
        .stderr(predicates::str::contains("mall.json not found"));

    let split: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(split["train"].as_array().map(Vec::len), Some(18));
    assert_eq!(split["test"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_turk_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let csv = temp_dir.path().join("batch.csv");
    std::fs::write(&csv, TURK_CSV)?;

    let out = crowdcount()?.arg("turk").arg(&csv).output()?;
    assert!(out.status.success());

    let table: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(table["data/ucf/3.jpg"], serde_json::json!([[10.0, 20.0]]));
    Ok(())
}

#[test]
fn test_turk_to_annotation_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let csv = temp_dir.path().join("batch.csv");
    std::fs::write(&csv, TURK_CSV)?;

    crowdcount()?
        .arg("turk")
        .arg(&csv)
        .arg("--output")
        .arg(temp_dir.path().join("data/annotations/ucf.json"))
        .assert()
        .success();

    crowdcount()?
        .arg("--root")
        .arg(temp_dir.path())
        .args(["get", "data/ucf/3.jpg"])
        .assert()
        .success()
        .stdout("[[10.0,20.0]]\n");
    Ok(())
}
