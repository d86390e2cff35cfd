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
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use logsmith_append_file::FileBuilder;
use logsmith_core::Append;
use logsmith_core::record::Level;
use logsmith_core::record::Record;
use logsmith_layout_json::JsonLayout;
use tempfile::TempDir;

fn list_files(dir: &Path, prefix: &str) -> Vec<String> {
    let mut files = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let filename = entry.file_name().to_str()?.to_string();
            filename.starts_with(prefix).then_some(filename)
        })
        .collect::<Vec<_>>();
    files.sort();
    files
}

fn append_entries(file: &impl Append, count: usize) {
    for i in 0..count {
        let message = format!("Log entry {}: {}", i, "A".repeat(50));
        let record = Record::builder()
            .level(Level::Info)
            .message(&message)
            .build();
        file.append(&record).unwrap();
        file.flush().unwrap();
    }
}

#[test]
fn test_backup_count_limit() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let max_backups = 4;

    let file = FileBuilder::new(temp_dir.path().join("service.log"))
        .max_file_size(200)
        .max_backups(max_backups)
        .build()
        .unwrap();
    append_entries(&file, 50);

    let files = list_files(temp_dir.path(), "service");
    assert!(files.contains(&"service.log".to_string()), "{files:?}");
    assert_eq!(files.len(), max_backups + 1, "{files:?}");
}

#[test]
fn test_backups_are_compressed() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");

    let file = FileBuilder::new(temp_dir.path().join("service.log"))
        .max_file_size(200)
        .max_backups(2)
        .compress(true)
        .build()
        .unwrap();
    append_entries(&file, 20);
    drop(file);

    let files = list_files(temp_dir.path(), "service");
    let backups = files
        .iter()
        .filter(|name| *name != "service.log")
        .collect::<Vec<_>>();
    assert_eq!(backups.len(), 2, "{files:?}");

    for backup in backups {
        assert!(backup.ends_with(".log.gz"), "{backup}");
        let mut content = String::new();
        GzDecoder::new(fs::File::open(temp_dir.path().join(backup)).unwrap())
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.lines().all(|line| line.contains("Log entry")));
    }
}

#[test]
fn test_existing_file_is_continued() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("nested").join("dir").join("app.log");

    let file = FileBuilder::new(&path)
        .layout(JsonLayout::default())
        .build()
        .unwrap();
    append_entries(&file, 1);
    drop(file);

    let file = FileBuilder::new(&path)
        .layout(JsonLayout::default())
        .build()
        .unwrap();
    append_entries(&file, 2);
    drop(file);

    let content = fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Log entry 0"));
    assert!(lines[2].contains("Log entry 1"));
}

#[test]
fn test_existing_size_counts_towards_rotation() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");
    fs::write(&path, "x".repeat(190)).unwrap();

    let file = FileBuilder::new(&path).max_file_size(200).build().unwrap();
    append_entries(&file, 1);
    drop(file);

    let files = list_files(temp_dir.path(), "app");
    assert_eq!(files.len(), 2, "{files:?}");
    assert!(fs::read_to_string(&path).unwrap().contains("Log entry 0"));
}
