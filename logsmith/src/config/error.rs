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

use std::io;
use std::path::PathBuf;

use logsmith_core::Error;

/// The error type raised while loading a [`Configuration`](crate::config::Configuration).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path of the configuration file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The configuration is not valid TOML.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// The configuration is not valid JSON.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration is not valid YAML.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The configuration file extension is none of `toml`, `json`, `yaml` and `yml`.
    #[error("unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::new("failed to load log configuration").with_source(err)
    }
}
