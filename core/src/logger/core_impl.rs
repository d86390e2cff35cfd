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
use crate::Append;
use crate::Error;
use crate::logger::CoreBuilder;
use crate::record::Level;
use crate::record::LevelFilter;
use crate::record::Record;

/// A level filter combined with the appenders accepted records are dispatched to.
#[derive(Debug)]
pub struct Core {
    filter: LevelFilter,
    appends: Vec<Box<dyn Append>>,
}

impl Core {
    pub(super) fn new(filter: LevelFilter, appends: Vec<Box<dyn Append>>) -> Self {
        debug_assert!(!appends.is_empty(), "A Core must have at least one appender");
        Self { filter, appends }
    }

    /// Create a new [`CoreBuilder`].
    pub fn builder() -> CoreBuilder<false> {
        CoreBuilder::new()
    }

    /// The levels accepted by this core.
    pub fn filter(&self) -> LevelFilter {
        self.filter
    }

    /// Whether records at the given level are accepted.
    pub fn enabled(&self, level: Level) -> bool {
        self.filter.test(level)
    }

    /// Dispatch the record to every appender.
    ///
    /// The level is not checked again; callers are expected to consult [`Core::enabled`] first.
    pub fn write(&self, record: &Record) -> Result<(), Error> {
        for append in &self.appends {
            append.append(record)?;
        }
        Ok(())
    }

    /// Flush every appender.
    pub fn flush(&self) -> Result<(), Error> {
        for append in &self.appends {
            append.flush()?;
        }
        Ok(())
    }
}
