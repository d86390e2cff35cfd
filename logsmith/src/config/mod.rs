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

//! Declarative log configuration.
//!
//! A [`Configuration`] is usually read from a file with [`Configuration::load`]:
//!
//! ```toml
//! [log]
//! level = "info"
//! root_dir = "./logs"
//! filename = "app.log"
//! format = "json"
//! show_line = true
//! max_backups = 3
//! max_size = 500 # megabytes
//! max_age = 28 # days
//! compress = true
//! ```
//!
//! Every key is optional; missing keys take the values of [`LogConfig::default`].

use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

mod error;
mod loader;

pub use self::error::ConfigError;

/// The application configuration, of which logging is one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// The `log` section.
    pub log: LogConfig,
}

/// How to build a logger: which records to keep, where to write them and how to rotate files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of `debug`, `info`, `warn`, `error`, `dpanic`, `panic` and `fatal`.
    ///
    /// Anything else selects `info`.
    pub level: String,
    /// The directory log files are written to.
    ///
    /// A missing directory is created, but not its missing parents.
    pub root_dir: PathBuf,
    /// Candidate log file names; the first one names the active log file.
    ///
    /// Accepts either a single string or a list.
    #[serde(rename = "filename", deserialize_with = "one_or_many")]
    pub filenames: Vec<String>,
    /// `json` for JSON lines; anything else selects the console layout.
    pub format: String,
    /// Whether records carry the `file:line` of the log call.
    pub show_line: bool,
    /// The maximum number of rotated files to keep; `0` keeps all of them.
    pub max_backups: usize,
    /// The size in megabytes at which the log file is rotated; `0` selects 100 megabytes.
    pub max_size: usize,
    /// The maximum age in days of rotated files; `0` keeps them regardless of age.
    pub max_age: u32,
    /// Whether rotated files are gzip-compressed.
    pub compress: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            root_dir: PathBuf::from("./logs"),
            filenames: vec!["app.log".to_string()],
            format: "console".to_string(),
            show_line: true,
            max_backups: 3,
            max_size: 500,
            max_age: 28,
            compress: true,
        }
    }
}

/// The encoding of log records, derived from [`LogConfig::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Tab-separated text.
    Console,
}

impl LogConfig {
    /// The encoding selected by [`format`](LogConfig::format).
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith::config::LogConfig;
    /// use logsmith::config::LogFormat;
    ///
    /// let mut config = LogConfig::default();
    /// assert_eq!(config.log_format(), LogFormat::Console);
    /// config.format = "json".to_string();
    /// assert_eq!(config.log_format(), LogFormat::Json);
    /// ```
    pub fn log_format(&self) -> LogFormat {
        if self.format == "json" {
            LogFormat::Json
        } else {
            LogFormat::Console
        }
    }

    /// The active log file name, if any is configured.
    pub fn filename(&self) -> Option<&str> {
        self.filenames
            .first()
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = Configuration::from_toml_str(
            r#"
            [log]
            level = "warn"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.log_format(), LogFormat::Json);
        assert_eq!(config.log.root_dir, PathBuf::from("./logs"));
        assert_eq!(config.log.filenames, vec!["app.log".to_string()]);
        assert_eq!(config.log.max_size, 500);
        assert!(config.log.compress);
    }

    #[test]
    fn test_filename_accepts_string_or_list() {
        let config = Configuration::from_toml_str("[log]\nfilename = \"server.log\"").unwrap();
        assert_eq!(config.log.filename(), Some("server.log"));

        let config =
            Configuration::from_toml_str("[log]\nfilename = [\"a.log\", \"b.log\"]").unwrap();
        assert_eq!(config.log.filenames, vec!["a.log", "b.log"]);
        assert_eq!(config.log.filename(), Some("a.log"));

        let config = Configuration::from_toml_str("[log]\nfilename = []").unwrap();
        assert_eq!(config.log.filename(), None);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = Configuration::from_toml_str("").unwrap();
        assert_eq!(config, Configuration::default());
    }
}
