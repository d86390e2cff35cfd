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
use crate::logger::Core;
use crate::record::LevelFilter;

/// A builder for [`Core`].
///
/// A core needs at least one appender; `build` is only available once `append` was called.
#[must_use = "call `build` to construct the core"]
#[derive(Debug)]
pub struct CoreBuilder<const APPEND: bool> {
    filter: LevelFilter,
    appends: Vec<Box<dyn Append>>,
}

impl CoreBuilder<false> {
    pub(super) fn new() -> Self {
        CoreBuilder {
            filter: LevelFilter::All,
            appends: vec![],
        }
    }
}

impl CoreBuilder<true> {
    /// Build the [`Core`].
    pub fn build(self) -> Core {
        Core::new(self.filter, self.appends)
    }
}

impl<const APPEND: bool> CoreBuilder<APPEND> {
    /// Set the levels accepted by the core.
    ///
    /// Default to [`LevelFilter::All`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_core::append::Testing;
    /// use logsmith_core::logger::Core;
    /// use logsmith_core::record::Level;
    ///
    /// let core = Core::builder()
    ///     .filter(Level::Warn)
    ///     .append(Testing::default())
    ///     .build();
    /// assert!(!core.enabled(Level::Info));
    /// ```
    pub fn filter(mut self, filter: impl Into<LevelFilter>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Add an appender to the core.
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> CoreBuilder<true> {
        self.appends.push(append.into());
        CoreBuilder {
            filter: self.filter,
            appends: self.appends,
        }
    }
}
