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

//! A bridge to forward logs from the `log` crate to a `logsmith` logger.
//!
//! Levels map as `Error -> error`, `Warn -> warn`, `Info -> info`, and both `Debug` and
//! `Trace` to `debug`. The file and line of the `log` record become the caller, and its
//! key-values become fields.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use std::borrow::Cow;

use logsmith_core::Logger;
use logsmith_core::kv::Field;
use logsmith_core::kv::Key;
use logsmith_core::kv::Value;
use logsmith_core::kv::field;
use logsmith_core::record::Caller;
use logsmith_core::record::Level;
use logsmith_core::record::LevelFilter;

/// A [`log::Log`] implementation writing through a [`Logger`].
#[derive(Debug, Clone)]
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    /// Create a bridge forwarding to `logger`.
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// The logger records are forwarded to.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The most verbose `log` level the logger accepts.
    pub fn max_level(&self) -> log::LevelFilter {
        match self.logger.core().filter() {
            LevelFilter::Off => log::LevelFilter::Off,
            LevelFilter::All => log::LevelFilter::Trace,
            LevelFilter::MoreSevereEqual(level) => match level {
                Level::Debug => log::LevelFilter::Trace,
                Level::Info => log::LevelFilter::Info,
                Level::Warn => log::LevelFilter::Warn,
                Level::Error => log::LevelFilter::Error,
                // nothing from the log crate is this severe
                Level::DPanic | Level::Panic | Level::Fatal => log::LevelFilter::Off,
            },
        }
    }
}

/// Map a `log` level to a `logsmith` level.
pub fn level_from_log(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

fn value_from_log(value: &log::kv::Value) -> Value {
    if let Some(v) = value.to_bool() {
        Value::Bool(v)
    } else if let Some(v) = value.to_i64() {
        Value::I64(v)
    } else if let Some(v) = value.to_u64() {
        Value::U64(v)
    } else if let Some(v) = value.to_f64() {
        Value::F64(v)
    } else if let Some(v) = value.to_borrowed_str() {
        Value::from(v.to_string())
    } else {
        Value::display(value)
    }
}

struct FieldCollector {
    fields: Vec<Field>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for FieldCollector {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        let key = Key::from(key.as_str().to_string());
        self.fields.push(field(key, value_from_log(&value)));
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.logger.enabled(level_from_log(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let level = level_from_log(record.level());
        if !self.logger.enabled(level) {
            return;
        }

        let message = match record.args().as_str() {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(record.args().to_string()),
        };
        let caller = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => None,
        };

        let mut collector = FieldCollector { fields: vec![] };
        // the collector never fails
        let _ = record.key_values().visit(&mut collector);

        self.logger
            .log_with_caller(level, &message, &collector.fields, caller);
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_boxed_logger`] to install a [`LogBridge`], so that all logs
/// from the log crate are forwarded to `logger`. The global maximum log level is set to the
/// most verbose level the logger accepts.
///
/// This should be called early in the execution of a Rust program. Any log events that occur
/// before initialization will be ignored.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use logsmith_core::Logger;
/// use logsmith_core::append::Stderr;
/// use logsmith_core::logger::Core;
///
/// let logger = Logger::new(Core::builder().append(Stderr::default()).build(), []);
/// if let Err(err) = logsmith_bridge_log::try_setup(logger) {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup(logger: Logger) -> Result<(), log::SetLoggerError> {
    let bridge = LogBridge::new(logger);
    let max_level = bridge.max_level();
    log::set_boxed_logger(Box::new(bridge))?;
    log::set_max_level(max_level);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup`] for details.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup(logger: Logger) {
    try_setup(logger).expect(
        "logsmith_bridge_log::setup must be called before the log crate global logger initialized",
    )
}
