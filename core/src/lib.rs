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

//! Core structs and functions for Logsmith.
//!
//! A [`Logger`] is a cheap, cloneable handle over a shared [`Core`]. The core decides which
//! levels are enabled and forwards accepted records to an [`Append`] implementation, which in
//! turn formats them with a [`Layout`]. Per-logger behavior such as caller annotation and stack
//! trace capture is selected with [`LoggerOption`]s.
//!
//! # Examples
//!
//! ```
//! use logsmith_core::Logger;
//! use logsmith_core::LoggerOption;
//! use logsmith_core::append::Testing;
//! use logsmith_core::logger::Core;
//! use logsmith_core::record::Level;
//!
//! let testing = Testing::default();
//! let core = Core::builder()
//!     .filter(Level::Info)
//!     .append(testing.clone())
//!     .build();
//! let logger = Logger::new(core, [LoggerOption::AddCaller]);
//!
//! logger.debug("dropped");
//! logger.info("kept");
//! assert_eq!(testing.lines().len(), 1);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod append;
pub mod kv;
pub mod layout;
pub mod logger;
pub mod record;
pub mod trap;

mod error;

pub use self::append::Append;
pub use self::error::Error;
pub use self::layout::Layout;
pub use self::logger::Logger;
pub use self::logger::LoggerOption;
pub use self::trap::Trap;
