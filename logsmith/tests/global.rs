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

//! The default configuration is process-wide, so this case lives in its own test binary.

use logsmith::config::Configuration;
use logsmith::global;
use tempfile::TempDir;

#[test]
fn test_initialize_with_default_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Configuration::default();
    config.log.level = "error".to_string();
    config.log.root_dir = temp_dir.path().to_path_buf();
    config.log.filenames = vec!["default.log".to_string()];
    config.log.format = "json".to_string();

    global::set_config(config.clone()).unwrap();
    assert_eq!(global::config(), &config);
    assert!(global::set_config(Configuration::default()).is_err());

    let logger = logsmith::initialize_log(None).unwrap();
    logger.warn("dropped");
    logger.error("kept");
    logger.flush();

    let content = std::fs::read_to_string(temp_dir.path().join("default.log")).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(r#""level":"logger.error""#), "{}", lines[0]);
}
