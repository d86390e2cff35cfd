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

//! Logsmith builds a leveled, structured logger writing to size-rotated files from a
//! declarative configuration.
//!
//! # Overview
//!
//! A [`config::LogConfig`] names the minimum level, the output format (`json` or `console`),
//! the directory and file to write to, and the rotation policy. [`LogBuilder`] translates it
//! into a ready-to-use [`Logger`]:
//!
//! * The level string selects the minimum level; `dpanic`, `panic` and `fatal` also turn on
//!   stack traces from that level up.
//! * `show_line` annotates every record with the `dir/file:line` of its call site.
//! * Timestamps render as `[YYYY-MM-DD HH:MM:SS.mmm]` and levels as `logger.<level>`.
//! * The file rotates once it reaches `max_size` megabytes; old files are pruned by count
//!   and age, and optionally gzip-compressed.
//!
//! # Examples
//!
//! ```
//! use logsmith::config::Configuration;
//! use logsmith::kv::field;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = Configuration::from_toml_str(&format!(
//!     r#"
//! [log]
//! level = "info"
//! root_dir = "{}"
//! filename = "server.log"
//! format = "json"
//! max_size = 10
//! "#,
//!     dir.path().display()
//! ))
//! .unwrap();
//!
//! let logger = logsmith::initialize_log(Some(&config)).unwrap();
//! logger.info_with("listening", &[field("port", 8080)]);
//! logger.flush();
//!
//! let content = std::fs::read_to_string(dir.path().join("server.log")).unwrap();
//! assert!(content.contains(r#""msg":"listening","port":8080"#));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use logsmith_core::Error;
pub use logsmith_core::Logger;
pub use logsmith_core::LoggerOption;
pub use logsmith_core::kv;
pub use logsmith_core::record;

/// Dispatch log records to various targets.
pub mod append {
    pub use logsmith_append_file as file;
    pub use logsmith_append_file::File;
    pub use logsmith_core::append::*;
}

/// Bridge logsmith with other logging frameworks.
pub mod bridge {
    /// Bridge logsmith with [`log`].
    ///
    /// [`log`]: https://docs.rs/log/
    #[cfg(feature = "bridge-log")]
    pub mod log {
        pub use logsmith_bridge_log::*;
    }
}

/// Core components of the logsmith logging framework.
pub mod core {
    pub use logsmith_core::logger::*;
}

/// Layouts for formatting log records.
pub mod layout {
    pub use logsmith_core::layout::*;
    pub use logsmith_layout_console::ConsoleLayout;
    pub use logsmith_layout_json::JsonLayout;
}

/// Traps for processing errors.
pub mod trap {
    pub use logsmith_core::trap::*;
}

pub mod config;
pub mod global;

mod builder;
mod encoding;

#[cfg(feature = "bridge-log")]
pub use self::builder::install;
pub use self::builder::LogBuilder;
pub use self::builder::SetupPolicy;
pub use self::builder::initialize_log;
