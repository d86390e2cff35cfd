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

//! Appender for writing log records to a file rotated by size.
//!
//! Once the active file would grow past its size limit, it is renamed to a timestamped backup
//! such as `app-2024-08-10T13-05-09.421.log` and a fresh file takes its place. Backups can be
//! bounded by count and by age, and gzip-compressed.
//!
//! # Example
//!
//!```
//! use logsmith_append_file::FileBuilder;
//! use logsmith_core::Logger;
//! use logsmith_core::logger::Core;
//! use logsmith_core::record::Level;
//! use logsmith_layout_json::JsonLayout;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let file = FileBuilder::new(dir.path().join("app.log"))
//!     .layout(JsonLayout::default())
//!     .max_file_size(10 * 1024 * 1024)
//!     .max_backups(3)
//!     .max_age(28)
//!     .compress(true)
//!     .build()
//!     .unwrap();
//!
//! let core = Core::builder().filter(Level::Info).append(file).build();
//! let logger = Logger::new(core, []);
//! logger.info("This log will be written to a rolling file.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use self::append::File;
pub use self::append::FileBuilder;
pub use self::rolling::DEFAULT_MAX_FILE_SIZE;
pub use self::rolling::RollingFileWriter;
pub use self::rolling::RollingFileWriterBuilder;

mod append;
mod backup;
mod clock;
mod rolling;
