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

//! Changing the working directory is process-wide, so this case lives in its own test binary.

use std::env;
use std::fs;

use logsmith::config::Configuration;
use tempfile::TempDir;

#[test]
fn test_default_configuration_builds_in_fresh_directory() {
    let temp_dir = TempDir::new().unwrap();
    env::set_current_dir(temp_dir.path()).unwrap();

    let config = Configuration::default();
    let logger = logsmith::initialize_log(Some(&config)).unwrap();
    logger.info("first start");
    logger.flush();

    let content = fs::read_to_string(temp_dir.path().join("logs").join("app.log")).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("first start"));
}
