// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::path::Path;

use logsmith::LogBuilder;
use logsmith::SetupPolicy;
use logsmith::config::LogConfig;
use logsmith::kv::field;
use logsmith::trap::CollectTrap;
use serde_json::Value;
use tempfile::TempDir;

fn read_lines(path: impl AsRef<Path>) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn read_json_lines(path: impl AsRef<Path>) -> Vec<Value> {
    read_lines(path)
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut files = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    files.sort();
    files
}

fn assert_bracketed_time(ts: &str) {
    // [YYYY-MM-DD HH:MM:SS.mmm]
    assert_eq!(ts.len(), 25, "{ts}");
    for (i, c) in ts.char_indices() {
        let expected = match i {
            0 => Some('['),
            5 | 8 => Some('-'),
            11 => Some(' '),
            14 | 17 => Some(':'),
            20 => Some('.'),
            24 => Some(']'),
            _ => None,
        };
        match expected {
            Some(expected) => assert_eq!(c, expected, "{ts}"),
            None => assert!(c.is_ascii_digit(), "{ts}"),
        }
    }
}

#[test]
fn test_json_warn_level_with_caller() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "warn".to_string(),
        root_dir: temp_dir.path().join("logs"),
        filenames: vec!["app.log".to_string()],
        format: "json".to_string(),
        show_line: true,
        max_size: 10,
        max_backups: 3,
        max_age: 7,
        compress: false,
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    logger.debug("x");
    logger.warn_with("y", &[field("attempt", 3)]);
    let line = line!() - 1;
    logger.flush();

    let records = read_json_lines(temp_dir.path().join("logs/app.log"));
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["level"], "logger.warn");
    assert_eq!(record["msg"], "y");
    assert_eq!(record["attempt"], 3);
    assert_eq!(record["caller"], format!("tests/builder.rs:{line}"));
    assert!(record.get("stacktrace").is_none());
    assert_bracketed_time(record["ts"].as_str().unwrap());
}

#[test]
fn test_console_format() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "info".to_string(),
        root_dir: temp_dir.path().to_path_buf(),
        format: "console".to_string(),
        show_line: true,
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    logger.info_with("server started", &[field("port", 8080)]);
    let line = line!() - 1;
    logger.flush();

    let lines = read_lines(temp_dir.path().join("app.log"));
    assert_eq!(lines.len(), 1);

    let parts = lines[0].split('\t').collect::<Vec<_>>();
    assert_eq!(parts.len(), 5, "{}", lines[0]);
    assert_bracketed_time(parts[0]);
    assert_eq!(parts[1], "logger.info");
    assert_eq!(parts[2], format!("tests/builder.rs:{line}"));
    assert_eq!(parts[3], "server started");
    assert_eq!(parts[4], r#"{"port":8080}"#);
}

#[test]
fn test_unknown_format_selects_console() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        root_dir: temp_dir.path().to_path_buf(),
        format: "xml".to_string(),
        show_line: false,
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    logger.error("disk full");
    logger.flush();

    let lines = read_lines(temp_dir.path().join("app.log"));
    assert_eq!(lines.len(), 1);
    let parts = lines[0].split('\t').collect::<Vec<_>>();
    assert_eq!(parts[1..], ["logger.error", "disk full"]);
}

#[test]
fn test_without_caller() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        root_dir: temp_dir.path().to_path_buf(),
        format: "json".to_string(),
        show_line: false,
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    logger.info("no caller");
    logger.flush();

    let records = read_json_lines(temp_dir.path().join("app.log"));
    assert_eq!(records.len(), 1);
    assert!(records[0].get("caller").is_none());
}

#[test]
fn test_dpanic_level_captures_stacktrace() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "dpanic".to_string(),
        root_dir: temp_dir.path().to_path_buf(),
        format: "json".to_string(),
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    assert!(!logger.settings().development());

    logger.error("filtered out");
    // only panics in development mode
    logger.dpanic("invariant violated");
    logger.flush();

    let records = read_json_lines(temp_dir.path().join("app.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "logger.dpanic");
    assert!(!records[0]["stacktrace"].as_str().unwrap().is_empty());
}

#[test]
fn test_creates_missing_root_dir() {
    let temp_dir = TempDir::new().unwrap();
    let root_dir = temp_dir.path().join("logs");
    let config = LogConfig {
        root_dir: root_dir.clone(),
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    assert!(root_dir.is_dir());

    logger.info("hello");
    logger.flush();
    assert_eq!(read_lines(root_dir.join("app.log")).len(), 1);
}

#[test]
fn test_existing_root_dir() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("app.log"), "previous run\n").unwrap();
    let config = LogConfig {
        root_dir: temp_dir.path().to_path_buf(),
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    logger.info("current run");
    logger.flush();

    let lines = read_lines(temp_dir.path().join("app.log"));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "previous run");
}

#[test]
fn test_missing_grandparent_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let root_dir = temp_dir.path().join("var").join("logs");
    let config = LogConfig {
        root_dir: root_dir.clone(),
        ..LogConfig::default()
    };

    let err = LogBuilder::new(&config)
        .policy(SetupPolicy::FailFast)
        .build()
        .unwrap_err();
    assert_eq!(err.message(), "failed to create log root directory");
    assert_eq!(
        err.context("root_dir"),
        Some(root_dir.display().to_string().as_str())
    );
    assert!(!root_dir.exists());
}

#[test]
fn test_missing_grandparent_best_effort() {
    let temp_dir = TempDir::new().unwrap();
    let root_dir = temp_dir.path().join("var").join("logs");
    let config = LogConfig {
        root_dir: root_dir.clone(),
        ..LogConfig::default()
    };
    let trap = CollectTrap::default();

    let logger = LogBuilder::new(&config)
        .policy(SetupPolicy::BestEffort)
        .trap(trap.clone())
        .build()
        .unwrap();

    let messages = trap.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("failed to create log root directory"));

    logger.info("still logging");
    logger.flush();
    assert_eq!(read_lines(root_dir.join("app.log")).len(), 1);
}

#[test]
fn test_no_filename() {
    let temp_dir = TempDir::new().unwrap();
    for filenames in [vec![], vec![String::new()]] {
        let config = LogConfig {
            root_dir: temp_dir.path().to_path_buf(),
            filenames,
            ..LogConfig::default()
        };

        let err = LogBuilder::new(&config).build().unwrap_err();
        assert_eq!(err.message(), "no log filename configured");
    }
}

#[test]
fn test_first_filename_wins() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        root_dir: temp_dir.path().to_path_buf(),
        filenames: vec!["primary.log".to_string(), "secondary.log".to_string()],
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    logger.info("hello");
    logger.flush();

    assert_eq!(list_files(temp_dir.path()), ["primary.log"]);
}

#[test]
fn test_unknown_level_falls_back_to_info() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "verbose".to_string(),
        root_dir: temp_dir.path().to_path_buf(),
        format: "json".to_string(),
        ..LogConfig::default()
    };
    let trap = CollectTrap::default();

    let logger = LogBuilder::new(&config).trap(trap).build().unwrap();
    logger.debug("dropped");
    logger.info("kept");
    logger.flush();

    let records = read_json_lines(temp_dir.path().join("app.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "kept");
}

#[test]
fn test_builds_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let verbose = LogConfig {
        level: "dpanic".to_string(),
        root_dir: temp_dir.path().to_path_buf(),
        filenames: vec!["verbose.log".to_string()],
        format: "json".to_string(),
        show_line: true,
        ..LogConfig::default()
    };
    let plain = LogConfig {
        level: "info".to_string(),
        root_dir: temp_dir.path().to_path_buf(),
        filenames: vec!["plain.log".to_string()],
        format: "json".to_string(),
        show_line: false,
        ..LogConfig::default()
    };

    let first = LogBuilder::new(&verbose).build().unwrap();
    let second = LogBuilder::new(&plain).build().unwrap();
    assert!(first.settings().caller());
    assert!(!second.settings().caller());
    assert_eq!(second.settings().stacktrace(), None);

    second.error("plain error");
    second.flush();

    let records = read_json_lines(temp_dir.path().join("plain.log"));
    assert_eq!(records.len(), 1);
    assert!(records[0].get("caller").is_none());
    assert!(records[0].get("stacktrace").is_none());
}

// each record is a little over 4 KiB
fn write_records(config: &LogConfig, count: usize) {
    let logger = LogBuilder::new(config).build().unwrap();
    let payload = "A".repeat(4096);
    for i in 0..count {
        logger.info_with(&payload, &[field("seq", i)]);
    }
    logger.flush();
}

fn write_past_one_megabyte(config: &LogConfig) {
    write_records(config, 300);
}

#[test]
fn test_rotates_at_max_size() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        root_dir: temp_dir.path().to_path_buf(),
        max_size: 1,
        compress: false,
        ..LogConfig::default()
    };

    write_past_one_megabyte(&config);

    let files = list_files(temp_dir.path());
    assert_eq!(files.len(), 2, "{files:?}");
    assert_eq!(files[1], "app.log");
    assert!(files[0].starts_with("app-") && files[0].ends_with(".log"));

    let backup = fs::metadata(temp_dir.path().join(&files[0])).unwrap();
    assert!(backup.len() <= 1024 * 1024);
}

#[test]
fn test_compresses_rotated_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        root_dir: temp_dir.path().to_path_buf(),
        max_size: 1,
        compress: true,
        ..LogConfig::default()
    };

    write_past_one_megabyte(&config);

    let files = list_files(temp_dir.path());
    assert_eq!(files.len(), 2, "{files:?}");
    assert!(files[0].starts_with("app-") && files[0].ends_with(".log.gz"));
    assert_eq!(files[1], "app.log");
}

#[test]
fn test_keeps_at_most_max_backups() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "info".to_string(),
        root_dir: temp_dir.path().join("logs"),
        filenames: vec!["app.log".to_string()],
        format: "json".to_string(),
        show_line: true,
        max_size: 1,
        max_backups: 3,
        max_age: 7,
        compress: false,
    };

    // about 5.3 MB, five rotations
    write_records(&config, 1300);

    let files = list_files(&config.root_dir);
    let backups = files
        .iter()
        .filter(|name| name.starts_with("app-"))
        .collect::<Vec<_>>();
    assert_eq!(backups.len(), 3, "{files:?}");
    assert!(backups.iter().all(|name| name.ends_with(".log")));
    assert_eq!(files.len(), 4, "{files:?}");
}

#[test]
fn test_removes_backups_past_max_age() {
    let temp_dir = TempDir::new().unwrap();
    let stale = "app-2020-01-01T00-00-00.000.log";
    fs::write(temp_dir.path().join(stale), "stale\n").unwrap();
    let config = LogConfig {
        root_dir: temp_dir.path().to_path_buf(),
        max_size: 1,
        max_backups: 0,
        max_age: 7,
        compress: false,
        ..LogConfig::default()
    };

    write_past_one_megabyte(&config);

    let files = list_files(temp_dir.path());
    assert!(!files.iter().any(|name| name == stale), "{files:?}");
    assert_eq!(files.len(), 2, "{files:?}");
    assert_eq!(files[1], "app.log");
}
