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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use jiff::SignedDuration;
use jiff::tz::TimeZone;
use logsmith_core::Error;
use logsmith_core::Trap;
use logsmith_core::trap::DefaultTrap;

use crate::backup;
use crate::backup::BackupNaming;
use crate::backup::Retention;
use crate::clock::Clock;

/// The maximum size of a log file when none is configured: 100 megabytes.
pub const DEFAULT_MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// A writer that rotates its file once it reaches a size limit.
///
/// The active file is renamed to a timestamped backup next to it, and a fresh file is created
/// in its place. Backups are then trimmed by age and count, and optionally gzip-compressed.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    writer: File,
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            let err = Error::new("failed to flush file writer on dropped").with_source(err);
            self.state.trap.trap(&err);
        }
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len();
        if len > self.state.max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write length {len} exceeds maximum file size {}",
                    self.state.max_size
                ),
            ));
        }

        // a failed rotation keeps writing to the old file, so its size keeps counting
        if self.state.should_rollover_on_size(len)
            && self.state.refresh_writer(&mut self.writer)
        {
            self.state.current_filesize = 0;
        }

        self.writer
            .write(buf)
            .inspect(|&n| self.state.current_filesize += n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub struct RollingFileWriterBuilder {
    // required
    path: PathBuf,

    // has default
    max_size: usize,
    max_backups: usize,
    max_age_days: u32,
    compress: bool,
    local_time: bool,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RollingFileWriterBuilder {
    /// Creates a new [`RollingFileWriterBuilder`] writing to the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size: DEFAULT_MAX_FILE_SIZE,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
            local_time: false,
            clock: Clock::DefaultClock,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the trap for errors raised while maintaining backups.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the maximum size of a log file in bytes.
    ///
    /// `0` selects [`DEFAULT_MAX_FILE_SIZE`].
    #[must_use]
    pub fn max_file_size(mut self, n: usize) -> Self {
        self.max_size = if n == 0 { DEFAULT_MAX_FILE_SIZE } else { n };
        self
    }

    /// Set the maximum number of backups to keep.
    ///
    /// `0` keeps every backup.
    #[must_use]
    pub fn max_backups(mut self, n: usize) -> Self {
        self.max_backups = n;
        self
    }

    /// Set the maximum age of a backup in days, judged by the timestamp in its name.
    ///
    /// `0` never removes a backup for its age.
    #[must_use]
    pub fn max_age(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    /// Whether to gzip-compress backups.
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Whether backup names use the system time zone instead of UTC.
    #[must_use]
    pub fn local_time(mut self, local_time: bool) -> Self {
        self.local_time = local_time;
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RollingFileWriter`].
    ///
    /// # Errors
    ///
    /// Return an error if the directory of the log file cannot be created, or if the log file
    /// cannot be opened.
    pub fn build(self) -> Result<RollingFileWriter, Error> {
        let Self {
            path,
            max_size,
            max_backups,
            max_age_days,
            compress,
            local_time,
            clock,
            trap,
        } = self;

        if path.file_name().is_none() {
            return Err(Error::new("log file path must name a file")
                .with_context("path", path.display()));
        }

        let max_age = match max_age_days {
            0 => None,
            days => Some(SignedDuration::from_hours(24 * i64::from(days))),
        };
        let tz = if local_time {
            TimeZone::system()
        } else {
            TimeZone::UTC
        };
        let retention = Retention {
            max_backups,
            max_age,
            compress,
        };

        let (state, writer) = State::new(path, max_size, retention, tz, clock, trap)?;
        Ok(RollingFileWriter { state, writer })
    }
}

#[derive(Debug)]
struct State {
    path: PathBuf,
    naming: BackupNaming,
    current_filesize: usize,
    max_size: usize,
    retention: Retention,
    tz: TimeZone,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl State {
    fn new(
        path: PathBuf,
        max_size: usize,
        retention: Retention,
        tz: TimeZone,
        clock: Clock,
        trap: Box<dyn Trap>,
    ) -> Result<(Self, File), Error> {
        let naming = BackupNaming::new(&path)?;
        fs::create_dir_all(naming.dir()).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("dir", naming.dir().display())
                .with_source(err)
        })?;

        // continue with the existing log file, if any
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                Error::new("failed to open log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })?;
        let current_filesize = file
            .metadata()
            .map_err(|err| {
                Error::new("failed to read log file metadata")
                    .with_context("path", path.display())
                    .with_source(err)
            })?
            .len() as usize;

        let state = State {
            path,
            naming,
            current_filesize,
            max_size,
            retention,
            tz,
            clock,
            trap,
        };
        Ok((state, file))
    }

    fn create_log_writer(&self) -> Result<File, Error> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|err| {
                Error::new("failed to create log file")
                    .with_context("path", self.path.display())
                    .with_source(err)
            })
    }

    fn rotate_log_writer(&self) -> Result<File, Error> {
        let now = self.clock.now();
        let backup_path = self.naming.next_backup_path(now, &self.tz)?;
        fs::rename(&self.path, &backup_path).map_err(|err| {
            Error::new("failed to archive log")
                .with_context("path", self.path.display())
                .with_context("backup", backup_path.display())
                .with_source(err)
        })?;

        let file = self.create_log_writer()?;

        if let Err(err) = backup::maintain(&self.naming, &self.tz, self.retention, now) {
            let err = Error::new("failed to maintain log backups").with_source(err);
            self.trap.trap(&err);
        }

        Ok(file)
    }

    /// Swap in a fresh file; return whether the rotation happened.
    fn refresh_writer(&self, file: &mut File) -> bool {
        if let Err(err) = file.flush() {
            let err = Error::new("failed to flush previous writer").with_source(err);
            self.trap.trap(&err);
        }

        match self.rotate_log_writer() {
            Ok(new_file) => {
                *file = new_file;
                true
            }
            Err(err) => {
                let err = Error::new("failed to rotate log writer").with_source(err);
                self.trap.trap(&err);
                false
            }
        }
    }

    fn should_rollover_on_size(&self, len: usize) -> bool {
        self.current_filesize + len > self.max_size
    }
}
