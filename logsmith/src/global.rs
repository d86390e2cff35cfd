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

//! The process-wide default configuration.
//!
//! [`initialize_log`](crate::initialize_log) falls back to [`config`] when no configuration is
//! passed. The default configuration is either installed explicitly with [`set_config`], or
//! loaded on first use from the file named by the `LOGSMITH_CONFIG` environment variable.

use std::env;
use std::ffi::OsString;
use std::sync::OnceLock;

use logsmith_core::Error;
use logsmith_core::Trap;
use logsmith_core::trap::DefaultTrap;

use crate::config::Configuration;

/// The environment variable naming the default configuration file.
pub const CONFIG_ENV: &str = "LOGSMITH_CONFIG";

static CONFIG: OnceLock<Configuration> = OnceLock::new();

/// Install the process-wide default configuration.
///
/// If the default configuration has already been set or loaded, the function returns the
/// configuration back.
pub fn set_config(config: Configuration) -> Result<(), Configuration> {
    CONFIG.set(config)
}

/// Return the process-wide default configuration.
///
/// On first use without [`set_config`], the file named by `LOGSMITH_CONFIG` is loaded. If the
/// variable is unset, the built-in defaults are used. If the file cannot be loaded, the error
/// is reported to stderr and the built-in defaults are used.
pub fn config() -> &'static Configuration {
    CONFIG.get_or_init(|| load_from(env::var_os(CONFIG_ENV), &DefaultTrap::default()))
}

fn load_from(path: Option<OsString>, trap: &dyn Trap) -> Configuration {
    let Some(path) = path else {
        return Configuration::default();
    };

    match Configuration::load(&path) {
        Ok(config) => config,
        Err(err) => {
            let err = Error::from(err)
                .with_context("path", path.to_string_lossy())
                .with_context("fallback", "built-in defaults");
            trap.trap(&err);
            Configuration::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use logsmith_core::trap::CollectTrap;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_from_configured_path() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("app.yaml");
        fs::write(&good, "log:\n  level: debug\n  format: json\n").unwrap();
        let bad = temp_dir.path().join("app.ini");
        fs::write(&bad, "level=debug").unwrap();
        let trap = CollectTrap::default();

        let config = load_from(Some(good.into_os_string()), &trap);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, "json");

        let config = load_from(Some(bad.into_os_string()), &trap);
        assert_eq!(config, Configuration::default());

        assert_eq!(load_from(None, &trap), Configuration::default());

        let messages = trap.messages();
        assert_eq!(messages.len(), 1, "{messages:?}");
        assert!(messages[0].starts_with("failed to load log configuration"));
        assert!(messages[0].contains("app.ini"));
    }
}
