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

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use logsmith_core::Error;
use logsmith_core::Layout;
use logsmith_core::Trap;
use logsmith_core::append::Append;
use logsmith_core::layout::PlainTextLayout;
use logsmith_core::record::Record;

use crate::rolling::RollingFileWriter;
use crate::rolling::RollingFileWriterBuilder;

/// A builder to configure and create an [`File`] appender.
#[derive(Debug)]
pub struct FileBuilder {
    builder: RollingFileWriterBuilder,
    layout: Box<dyn Layout>,
}

impl FileBuilder {
    /// Create a new file appender builder writing to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            builder: RollingFileWriterBuilder::new(path),
            layout: Box::new(PlainTextLayout::default()),
        }
    }

    /// Build the [`File`] appender.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The log directory cannot be created.
    /// * The log file cannot be opened.
    pub fn build(self) -> Result<File, Error> {
        let FileBuilder { builder, layout } = self;
        let writer = builder.build()?;
        Ok(File::new(writer, layout))
    }

    /// Set the layout for the logs.
    ///
    /// Default to [`PlainTextLayout`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_append_file::FileBuilder;
    /// use logsmith_layout_json::JsonLayout;
    ///
    /// let builder = FileBuilder::new("logs/app.log");
    /// builder.layout(JsonLayout::default());
    /// ```
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the trap for handling errors raised while rotating files.
    ///
    /// Default to [`DefaultTrap`](logsmith_core::trap::DefaultTrap).
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_append_file::FileBuilder;
    /// use logsmith_core::trap::DefaultTrap;
    ///
    /// let builder = FileBuilder::new("logs/app.log");
    /// builder.trap(DefaultTrap::default());
    /// ```
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.builder = self.builder.trap(trap);
        self
    }

    /// Roll over the log file once writing a record would push it past `n` bytes.
    ///
    /// `0` selects the default of 100 megabytes.
    pub fn max_file_size(mut self, n: usize) -> Self {
        self.builder = self.builder.max_file_size(n);
        self
    }

    /// Set the maximum number of backups to keep; `0` keeps every backup.
    pub fn max_backups(mut self, n: usize) -> Self {
        self.builder = self.builder.max_backups(n);
        self
    }

    /// Set the maximum age of a backup in days; `0` disables age-based removal.
    pub fn max_age(mut self, days: u32) -> Self {
        self.builder = self.builder.max_age(days);
        self
    }

    /// Whether to gzip-compress backups.
    pub fn compress(mut self, compress: bool) -> Self {
        self.builder = self.builder.compress(compress);
        self
    }

    /// Whether backup names use the system time zone instead of UTC.
    pub fn local_time(mut self, local_time: bool) -> Self {
        self.builder = self.builder.local_time(local_time);
        self
    }
}

/// An appender that writes log records to a size-rotated file.
#[derive(Debug)]
pub struct File {
    writer: Mutex<RollingFileWriter>,
    layout: Box<dyn Layout>,
}

impl File {
    fn new(writer: RollingFileWriter, layout: Box<dyn Layout>) -> Self {
        let writer = Mutex::new(writer);
        Self { writer, layout }
    }

    fn writer(&self) -> MutexGuard<'_, RollingFileWriter> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Append for File {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        let mut writer = self.writer();
        writer.write_all(&bytes).map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut writer = self.writer();
        writer.flush().map_err(Error::from_io_error)?;
        Ok(())
    }
}

impl Drop for File {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(|e| e.into_inner());
        let _ = writer.flush();
    }
}
