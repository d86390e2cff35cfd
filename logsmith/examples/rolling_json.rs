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

//! An example of logging JSON lines to a size-rotated file.

use logsmith::LogBuilder;
use logsmith::config::LogConfig;
use logsmith::kv::field;

fn main() {
    let config = LogConfig {
        level: "debug".to_string(),
        root_dir: "logs".into(),
        filenames: vec!["my_app.log".to_string()],
        format: "json".to_string(),
        max_size: 1,
        max_backups: 5,
        ..LogConfig::default()
    };

    let logger = LogBuilder::new(&config).build().unwrap();
    let logger = logger.named("worker").with([field("pid", std::process::id())]);

    for i in 0..20_000 {
        logger.debug_with("Hello debug!", &[field("seq", i)]);
        logger.info_with("Hello info!", &[field("seq", i)]);
        if i % 1000 == 0 {
            logger.warn_with("Hello warn!", &[field("seq", i)]);
            logger.error_with("Hello error!", &[field("seq", i)]);
        }
    }

    logger.flush();
}
