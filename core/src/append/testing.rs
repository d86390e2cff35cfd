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
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::layout::PlainTextLayout;
use crate::record::Record;

/// An appender that keeps formatted records in memory, for use in tests.
///
/// Clones share the same buffer.
///
/// # Examples
///
/// ```
/// use logsmith_core::append::Testing;
/// use logsmith_core::layout::PlainTextLayout;
///
/// let test_appender = Testing::default().with_layout(PlainTextLayout::default());
/// assert!(test_appender.lines().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Testing {
    layout: Arc<dyn Layout>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl Default for Testing {
    fn default() -> Self {
        Self {
            layout: Arc::new(PlainTextLayout::default()),
            lines: Arc::default(),
        }
    }
}

impl Testing {
    /// Set the layout for the [`Testing`] appender.
    ///
    /// Default to [`PlainTextLayout`].
    pub fn with_layout(mut self, layout: impl Layout) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    /// Return a snapshot of the formatted records appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Append for Testing {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let bytes = self.layout.format(record)?;
        self.lock().push(String::from_utf8_lossy(&bytes).into_owned());
        Ok(())
    }
}
