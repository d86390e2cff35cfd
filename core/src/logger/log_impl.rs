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

use std::backtrace::Backtrace;
use std::panic::Location;
use std::process;
use std::sync::Arc;
use std::sync::OnceLock;

use crate::kv::Field;
use crate::logger::Core;
use crate::logger::LoggerOption;
use crate::logger::LoggerSettings;
use crate::record::Caller;
use crate::record::Level;
use crate::record::Record;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Return the default global logger instance, if one has been set.
pub fn default_logger() -> Option<&'static Logger> {
    DEFAULT_LOGGER.get()
}

/// Set the default global logger instance.
///
/// If the default logger has already been set, the function returns the logger back.
pub fn set_default_logger(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// A leveled, structured logger.
///
/// Cloning a logger is cheap: clones share the same [`Core`].
///
/// Besides writing the record, some levels carry extra behavior:
///
/// * [`Level::DPanic`] panics after writing when the logger is in development mode.
/// * [`Level::Panic`] panics after writing.
/// * [`Level::Fatal`] flushes the core and exits the process with status 1 after writing.
///
/// These happen even if the core does not accept the level.
#[derive(Debug, Clone)]
pub struct Logger {
    core: Arc<Core>,
    settings: Arc<LoggerSettings>,
}

impl Logger {
    /// Create a logger writing through `core`, with the given options applied in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_core::Logger;
    /// use logsmith_core::LoggerOption;
    /// use logsmith_core::append::Testing;
    /// use logsmith_core::logger::Core;
    /// use logsmith_core::record::Level;
    ///
    /// let core = Core::builder().append(Testing::default()).build();
    /// let logger = Logger::new(
    ///     core,
    ///     [
    ///         LoggerOption::AddCaller,
    ///         LoggerOption::AddStacktrace(Level::Error),
    ///     ],
    /// );
    /// assert!(logger.settings().caller());
    /// ```
    pub fn new(core: Core, options: impl IntoIterator<Item = LoggerOption>) -> Self {
        let mut settings = LoggerSettings::default();
        for option in options {
            settings.apply(option);
        }
        Self {
            core: Arc::new(core),
            settings: Arc::new(settings),
        }
    }

    /// Derive a logger sharing this logger's core, with more options applied.
    pub fn with_options(&self, options: impl IntoIterator<Item = LoggerOption>) -> Self {
        let mut settings = LoggerSettings::clone(&self.settings);
        for option in options {
            settings.apply(option);
        }
        Self {
            core: self.core.clone(),
            settings: Arc::new(settings),
        }
    }

    /// Derive a logger that adds the given fields to every record.
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.with_options([LoggerOption::Fields(fields.into_iter().collect())])
    }

    /// Derive a logger with a name segment appended; segments are joined with `.`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_core::Logger;
    /// use logsmith_core::append::Testing;
    /// use logsmith_core::logger::Core;
    ///
    /// let core = Core::builder().append(Testing::default()).build();
    /// let logger = Logger::new(core, []).named("http").named("router");
    /// assert_eq!(logger.settings().name(), Some("http.router"));
    /// ```
    pub fn named(&self, name: &str) -> Self {
        let mut settings = LoggerSettings::clone(&self.settings);
        settings.name = match settings.name.take() {
            None => Some(name.to_string()),
            Some(prefix) if name.is_empty() => Some(prefix),
            Some(prefix) => Some(format!("{prefix}.{name}")),
        };
        Self {
            core: self.core.clone(),
            settings: Arc::new(settings),
        }
    }

    /// The resolved behavior of this logger.
    pub fn settings(&self) -> &LoggerSettings {
        &self.settings
    }

    /// The core this logger writes through.
    pub fn core(&self) -> &Core {
        &self.core
    }

    /// Whether a record at the given level would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    /// Log a message with fields at the given level, annotated with the caller of this method.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl AsRef<str>, fields: &[Field]) {
        let caller = Caller::from(Location::caller());
        self.log_with_caller(level, message.as_ref(), fields, Some(caller));
    }

    /// Log a message with an explicitly provided caller.
    ///
    /// This is the entry point for bridges that obtain the call site from another logging
    /// facade. The caller is only attached if the logger annotates records with callers.
    #[track_caller]
    pub fn log_with_caller(
        &self,
        level: Level,
        message: &str,
        fields: &[Field],
        caller: Option<Caller<'_>>,
    ) {
        if self.core.enabled(level) {
            let settings = &self.settings;
            let stacktrace = settings
                .stacktrace
                .filter(|threshold| level >= *threshold)
                .map(|_| Backtrace::force_capture().to_string());

            let record = Record::builder()
                .level(level)
                .name(settings.name.as_deref())
                .caller(caller.filter(|_| settings.caller))
                .message(message)
                .context(&settings.fields)
                .fields(fields)
                .stacktrace(stacktrace.as_deref())
                .build();

            if let Err(err) = self.core.write(&record) {
                settings.trap.trap(&err);
            }
        }

        match level {
            Level::DPanic if self.settings.development => panic!("{message}"),
            Level::Panic => panic!("{message}"),
            Level::Fatal => {
                self.flush();
                process::exit(1);
            }
            _ => {}
        }
    }

    /// Log a message at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Level::Debug, message, &[]);
    }

    /// Log a message with fields at [`Level::Debug`].
    #[track_caller]
    pub fn debug_with(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Debug, message, fields);
    }

    /// Log a message at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, message, &[]);
    }

    /// Log a message with fields at [`Level::Info`].
    #[track_caller]
    pub fn info_with(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Info, message, fields);
    }

    /// Log a message at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(Level::Warn, message, &[]);
    }

    /// Log a message with fields at [`Level::Warn`].
    #[track_caller]
    pub fn warn_with(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Warn, message, fields);
    }

    /// Log a message at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Level::Error, message, &[]);
    }

    /// Log a message with fields at [`Level::Error`].
    #[track_caller]
    pub fn error_with(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Error, message, fields);
    }

    /// Log a message at [`Level::DPanic`]; panics afterwards in development mode.
    #[track_caller]
    pub fn dpanic(&self, message: impl AsRef<str>) {
        self.log(Level::DPanic, message, &[]);
    }

    /// Log a message with fields at [`Level::DPanic`]; panics afterwards in development mode.
    #[track_caller]
    pub fn dpanic_with(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::DPanic, message, fields);
    }

    /// Log a message at [`Level::Panic`], then panic.
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>) -> ! {
        self.log(Level::Panic, message, &[]);
        unreachable!("logging at panic level always panics")
    }

    /// Log a message with fields at [`Level::Panic`], then panic.
    #[track_caller]
    pub fn panic_with(&self, message: impl AsRef<str>, fields: &[Field]) -> ! {
        self.log(Level::Panic, message, fields);
        unreachable!("logging at panic level always panics")
    }

    /// Log a message at [`Level::Fatal`], then exit the process.
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.log(Level::Fatal, message, &[]);
        unreachable!("logging at fatal level always exits")
    }

    /// Log a message with fields at [`Level::Fatal`], then exit the process.
    #[track_caller]
    pub fn fatal_with(&self, message: impl AsRef<str>, fields: &[Field]) -> ! {
        self.log(Level::Fatal, message, fields);
        unreachable!("logging at fatal level always exits")
    }

    /// Flush all appenders of the core. Errors are reported to the logger's trap.
    pub fn flush(&self) {
        if let Err(err) = self.core.flush() {
            self.settings.trap.trap(&err);
        }
    }
}
