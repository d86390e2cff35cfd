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

use std::sync::Arc;

use crate::Trap;
use crate::kv::Field;
use crate::record::Level;
use crate::trap::DefaultTrap;

/// A behavior switch applied when constructing a [`Logger`](crate::Logger).
///
/// Options are applied in order; a later option overrides an earlier one of the same kind,
/// except for [`LoggerOption::Fields`] which accumulates.
#[derive(Debug)]
#[non_exhaustive]
pub enum LoggerOption {
    /// Annotate every record with the file and line of the log call.
    AddCaller,
    /// Enable or disable caller annotation.
    WithCaller(bool),
    /// Capture a stack trace for records at or above the given level.
    AddStacktrace(Level),
    /// Development mode: records at [`Level::DPanic`] panic after being written.
    Development,
    /// Bind fields to every record of the logger.
    Fields(Vec<Field>),
    /// Report errors raised while writing records to the given trap.
    ///
    /// Default to [`DefaultTrap`].
    ErrorTrap(Box<dyn Trap>),
}

/// The resolved behavior of a [`Logger`](crate::Logger).
#[derive(Debug, Clone)]
pub struct LoggerSettings {
    pub(super) caller: bool,
    pub(super) stacktrace: Option<Level>,
    pub(super) development: bool,
    pub(super) name: Option<String>,
    pub(super) fields: Vec<Field>,
    pub(super) trap: Arc<dyn Trap>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            caller: false,
            stacktrace: None,
            development: false,
            name: None,
            fields: vec![],
            trap: Arc::new(DefaultTrap::default()),
        }
    }
}

impl LoggerSettings {
    /// Whether records are annotated with their caller.
    pub fn caller(&self) -> bool {
        self.caller
    }

    /// The level at and above which stack traces are captured.
    pub fn stacktrace(&self) -> Option<Level> {
        self.stacktrace
    }

    /// Whether the logger runs in development mode.
    pub fn development(&self) -> bool {
        self.development
    }

    /// The name of the logger, segments joined with `.`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The fields bound to the logger.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(super) fn apply(&mut self, option: LoggerOption) {
        match option {
            LoggerOption::AddCaller => self.caller = true,
            LoggerOption::WithCaller(enabled) => self.caller = enabled,
            LoggerOption::AddStacktrace(level) => self.stacktrace = Some(level),
            LoggerOption::Development => self.development = true,
            LoggerOption::Fields(fields) => self.fields.extend(fields),
            LoggerOption::ErrorTrap(trap) => self.trap = Arc::from(trap),
        }
    }
}
