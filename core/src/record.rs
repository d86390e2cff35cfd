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

//! Log records, levels and caller locations.

use std::fmt;
use std::panic::Location;
use std::str::FromStr;
use std::time::SystemTime;

use crate::Error;
use crate::kv::Field;

/// The payload of a log directive.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: SystemTime,

    // the metadata
    level: Level,
    name: Option<&'a str>,
    caller: Option<Caller<'a>>,

    // the payload
    message: &'a str,

    // structural logging: fields bound to the logger, then fields of the call site
    context: &'a [Field],
    fields: &'a [Field],

    stacktrace: Option<&'a str>,
}

impl<'a> Record<'a> {
    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.now
    }

    /// The severity of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The name of the logger that emitted the record, if any.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    /// The call site, if the logger annotates records with callers.
    pub fn caller(&self) -> Option<Caller<'a>> {
        self.caller
    }

    /// The message body.
    pub fn message(&self) -> &'a str {
        self.message
    }

    /// All structured fields: the logger's bound fields first, then the call site's.
    pub fn fields(&self) -> impl Iterator<Item = &'a Field> + use<'a> {
        let (context, fields) = (self.context, self.fields);
        context.iter().chain(fields.iter())
    }

    /// Whether the record carries any structured field.
    pub fn has_fields(&self) -> bool {
        !self.context.is_empty() || !self.fields.is_empty()
    }

    /// The captured stack trace, if any.
    pub fn stacktrace(&self) -> Option<&'a str> {
        self.stacktrace
    }

    /// Create a builder initialized with the current record's values.
    pub fn to_builder(&self) -> RecordBuilder<'a> {
        RecordBuilder {
            record: self.clone(),
        }
    }

    /// Returns a new builder.
    pub fn builder() -> RecordBuilder<'a> {
        RecordBuilder::default()
    }
}

/// A builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    record: Record<'a>,
}

impl Default for RecordBuilder<'_> {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                now: SystemTime::now(),
                level: Level::Info,
                name: None,
                caller: None,
                message: "",
                context: &[],
                fields: &[],
                stacktrace: None,
            },
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Set [`time`](Record::time).
    pub fn time(mut self, now: SystemTime) -> Self {
        self.record.now = now;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`name`](Record::name).
    pub fn name(mut self, name: Option<&'a str>) -> Self {
        self.record.name = name;
        self
    }

    /// Set [`caller`](Record::caller).
    pub fn caller(mut self, caller: Option<Caller<'a>>) -> Self {
        self.record.caller = caller;
        self
    }

    /// Set [`message`](Record::message).
    pub fn message(mut self, message: &'a str) -> Self {
        self.record.message = message;
        self
    }

    /// Set the fields bound to the emitting logger.
    pub fn context(mut self, context: &'a [Field]) -> Self {
        self.record.context = context;
        self
    }

    /// Set the fields given at the call site.
    pub fn fields(mut self, fields: &'a [Field]) -> Self {
        self.record.fields = fields;
        self
    }

    /// Set [`stacktrace`](Record::stacktrace).
    pub fn stacktrace(mut self, stacktrace: Option<&'a str>) -> Self {
        self.record.stacktrace = stacktrace;
        self
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record<'a> {
        self.record
    }
}

/// The source location of a log call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Caller<'a> {
    file: &'a str,
    line: u32,
}

impl<'a> Caller<'a> {
    /// Create a caller from a file path and a line number.
    pub fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }

    /// The full path of the source file.
    pub fn file(&self) -> &'a str {
        self.file
    }

    /// The line in the source file.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Display the caller as `dir/file:line`, keeping only the last directory of the path.
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_core::record::Caller;
    ///
    /// let caller = Caller::new("crates/server/src/main.rs", 42);
    /// assert_eq!(caller.trimmed().to_string(), "src/main.rs:42");
    /// ```
    pub fn trimmed(&self) -> TrimmedCaller<'a> {
        TrimmedCaller(*self)
    }
}

impl From<&'static Location<'static>> for Caller<'static> {
    fn from(location: &'static Location<'static>) -> Self {
        Caller::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// See [`Caller::trimmed`].
#[derive(Clone, Copy, Debug)]
pub struct TrimmedCaller<'a>(Caller<'a>);

impl fmt::Display for TrimmedCaller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.0.file;
        let is_sep = |c: char| c == '/' || c == '\\';
        let start = match file.rfind(is_sep) {
            Some(last) => file[..last].rfind(is_sep).map_or(0, |i| i + 1),
            None => 0,
        };
        write!(f, "{}:{}", &file[start..], self.0.line)
    }
}

/// The severity of a record, from the most verbose to the most severe.
///
/// `DPanic`, `Panic` and `Fatal` carry behavior beyond writing the record: see
/// [`Logger`](crate::Logger) for details.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Designates lower priority information, usually disabled in production.
    Debug,
    /// Designates useful information.
    Info,
    /// Designates hazardous situations that deserve attention.
    Warn,
    /// Designates errors that a human should look at.
    Error,
    /// Designates particularly important errors; panics in development mode.
    DPanic,
    /// Designates an unrecoverable error; the logger panics after writing.
    Panic,
    /// Designates a fatal error; the logger exits the process after writing.
    Fatal,
}

impl Level {
    /// All levels, from the most verbose to the most severe.
    pub const ALL: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    /// Return the lowercase name of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.name()) {
                return Ok(level);
            }
        }

        Err(Error::new(format!("malformed level: {s:?}")))
    }
}

/// The levels a [`Core`](crate::logger::Core) accepts.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum LevelFilter {
    /// Disables all levels.
    Off,
    /// Enables if the target level is more severe than or equal to the filter level.
    MoreSevereEqual(Level),
    /// Enables all levels.
    All,
}

impl LevelFilter {
    /// Checks the given level if satisfies the filter condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_core::record::Level;
    /// use logsmith_core::record::LevelFilter;
    ///
    /// let level_filter = LevelFilter::MoreSevereEqual(Level::Warn);
    ///
    /// assert_eq!(level_filter.test(Level::Debug), false);
    /// assert_eq!(level_filter.test(Level::Info), false);
    /// assert_eq!(level_filter.test(Level::Warn), true);
    /// assert_eq!(level_filter.test(Level::Fatal), true);
    /// ```
    pub fn test(&self, level: Level) -> bool {
        match self {
            LevelFilter::Off => false,
            LevelFilter::MoreSevereEqual(l) => level >= *l,
            LevelFilter::All => true,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        LevelFilter::MoreSevereEqual(level)
    }
}
