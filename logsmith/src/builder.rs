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
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use jiff::tz::TimeZone;
use logsmith_append_file::File;
use logsmith_append_file::FileBuilder;
use logsmith_core::Error;
use logsmith_core::Layout;
use logsmith_core::Logger;
use logsmith_core::LoggerOption;
use logsmith_core::Trap;
use logsmith_core::logger::Core;
use logsmith_core::record::Level;
use logsmith_core::trap::DefaultTrap;
use logsmith_layout_console::ConsoleLayout;
use logsmith_layout_json::JsonLayout;

use crate::config::Configuration;
use crate::config::LogConfig;
use crate::config::LogFormat;
use crate::encoding;
use crate::global;

const BYTES_PER_MEGABYTE: usize = 1024 * 1024;

/// What to do when the log root directory cannot be created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetupPolicy {
    /// Fail the build.
    #[default]
    FailFast,
    /// Report the error to the trap and go on; the file writer then tries to create the whole
    /// directory tree itself.
    BestEffort,
}

/// Build a logger from the given configuration, or from the process-wide default
/// configuration if none is given.
///
/// This is a shortcut for [`LogBuilder::new`] followed by [`LogBuilder::build`].
///
/// # Errors
///
/// See [`LogBuilder::build`].
///
/// # Examples
///
/// ```
/// use logsmith::config::Configuration;
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut config = Configuration::default();
/// config.log.root_dir = dir.path().join("logs");
///
/// let logger = logsmith::initialize_log(Some(&config)).unwrap();
/// logger.info("service started");
/// ```
pub fn initialize_log(config: Option<&Configuration>) -> Result<Logger, Error> {
    let config = match config {
        Some(config) => config,
        None => global::config(),
    };
    LogBuilder::new(&config.log).build()
}

/// Build a logger like [`initialize_log`], then install it as the default logger and as the
/// global logger of the `log` crate.
///
/// # Errors
///
/// Return an error if the logger cannot be built, or if either global logger has already been
/// set.
///
/// The `log` global logger is installed first. If it is already taken, nothing is installed.
/// If only the default logger is already taken, the `log` global logger stays installed, since
/// the `log` crate cannot uninstall it.
#[cfg(feature = "bridge-log")]
pub fn install(config: Option<&Configuration>) -> Result<Logger, Error> {
    let logger = initialize_log(config)?;

    logsmith_bridge_log::try_setup(logger.clone())
        .map_err(|err| Error::new("log global logger has been already setup").with_source(err))?;
    logsmith_core::logger::set_default_logger(logger.clone())
        .map_err(|_| Error::new("logsmith default logger has been already setup"))?;

    Ok(logger)
}

/// Translates a [`LogConfig`] into a ready-to-use [`Logger`].
///
/// Every build is independent: options derived from one configuration never leak into a
/// logger built from another.
///
/// # Examples
///
/// ```
/// use logsmith::LogBuilder;
/// use logsmith::SetupPolicy;
/// use logsmith::config::LogConfig;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = LogConfig {
///     level: "warn".to_string(),
///     root_dir: dir.path().join("logs"),
///     format: "json".to_string(),
///     ..LogConfig::default()
/// };
///
/// let logger = LogBuilder::new(&config)
///     .policy(SetupPolicy::FailFast)
///     .build()
///     .unwrap();
/// logger.warn("disk usage above 80%");
/// ```
#[derive(Debug)]
#[must_use = "call `build` to construct the logger"]
pub struct LogBuilder<'a> {
    config: &'a LogConfig,
    policy: SetupPolicy,
    tz: Option<TimeZone>,
    trap: Arc<dyn Trap>,
}

impl<'a> LogBuilder<'a> {
    /// Create a builder for the given configuration.
    pub fn new(config: &'a LogConfig) -> Self {
        Self {
            config,
            policy: SetupPolicy::default(),
            tz: None,
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Set what to do when the log root directory cannot be created.
    ///
    /// Default to [`SetupPolicy::FailFast`].
    pub fn policy(mut self, policy: SetupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the time zone record timestamps are rendered in.
    ///
    /// Default to the system time zone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Set the trap for errors that do not fail the build, and for errors raised by the built
    /// logger.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Build the logger.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The root directory is missing and cannot be created, under [`SetupPolicy::FailFast`].
    /// * No log file name is configured.
    /// * The log file cannot be opened.
    pub fn build(self) -> Result<Logger, Error> {
        let level = self.resolve_level();

        let mut options = vec![];
        if let Some(threshold) = stacktrace_threshold(level) {
            options.push(LoggerOption::AddStacktrace(threshold));
        }
        if self.config.show_line {
            options.push(LoggerOption::AddCaller);
        }

        self.ensure_root_dir()?;
        let layout = self.layout();
        let file = self.file(layout)?;

        let core = Core::builder().filter(level).append(file).build();
        options.push(LoggerOption::ErrorTrap(Box::new(SharedTrap(self.trap))));
        Ok(Logger::new(core, options))
    }

    fn resolve_level(&self) -> Level {
        let value = self.config.level.as_str();
        match parse_level(value) {
            Some(level) => level,
            None => {
                if !value.is_empty() {
                    let err = Error::new("unrecognized log level, falling back to info")
                        .with_context("level", value);
                    self.trap.trap(&err);
                }
                Level::Info
            }
        }
    }

    fn ensure_root_dir(&self) -> Result<(), Error> {
        let root_dir = self.config.root_dir.as_path();
        if root_dir.as_os_str().is_empty() || root_dir.exists() {
            return Ok(());
        }

        match fs::create_dir(root_dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(err) => {
                let err = Error::new("failed to create log root directory")
                    .with_context("root_dir", root_dir.display())
                    .with_source(err);
                match self.policy {
                    SetupPolicy::FailFast => Err(err),
                    SetupPolicy::BestEffort => {
                        self.trap.trap(&err);
                        Ok(())
                    }
                }
            }
        }
    }

    fn layout(&self) -> Box<dyn Layout> {
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let encoder = encoding::encoder_config(tz);
        match self.config.log_format() {
            LogFormat::Json => Box::new(JsonLayout::default().encoder(encoder)),
            LogFormat::Console => Box::new(ConsoleLayout::default().encoder(encoder)),
        }
    }

    fn file_path(&self) -> Result<PathBuf, Error> {
        let filename = self
            .config
            .filename()
            .ok_or_else(|| Error::new("no log filename configured"))?;
        Ok(self.config.root_dir.join(filename))
    }

    fn file(&self, layout: Box<dyn Layout>) -> Result<File, Error> {
        let config = self.config;
        FileBuilder::new(self.file_path()?)
            .layout(layout)
            .max_file_size(config.max_size.saturating_mul(BYTES_PER_MEGABYTE))
            .max_backups(config.max_backups)
            .max_age(config.max_age)
            .compress(config.compress)
            .trap(SharedTrap(self.trap.clone()))
            .build()
    }
}

/// Resolve a configured level name; only exact lowercase names are recognized.
fn parse_level(value: &str) -> Option<Level> {
    Level::ALL.into_iter().find(|level| level.name() == value)
}

/// The most severe levels capture a stack trace from their own level up.
fn stacktrace_threshold(level: Level) -> Option<Level> {
    match level {
        Level::DPanic | Level::Panic | Level::Fatal => Some(level),
        Level::Debug | Level::Info | Level::Warn | Level::Error => None,
    }
}

/// One trap shared by the builder, the logger and the file writer.
#[derive(Debug)]
struct SharedTrap(Arc<dyn Trap>);

impl Trap for SharedTrap {
    fn trap(&self, err: &Error) {
        self.0.trap(err);
    }
}
