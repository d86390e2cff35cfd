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

//! An example of building the logger from a configuration file and routing the `log` crate to
//! it.
//!
//! ```shell
//! LOGSMITH_CONFIG=app.toml cargo run --example from_config_file
//! cargo run --example from_config_file -- app.yaml
//! ```

use logsmith::config::Configuration;

fn main() {
    // falls back to the built-in defaults if the variable is unset
    let config = match std::env::args().nth(1) {
        Some(path) => Configuration::load(path).unwrap(),
        None => logsmith::global::config().clone(),
    };

    let logger = logsmith::install(Some(&config)).unwrap();

    log::error!("Hello error!");
    log::warn!("Hello warn!");
    log::info!(port = 8080; "Hello info!");
    log::debug!("Hello debug!");
    log::trace!("Hello trace!");

    logger.flush();
}
