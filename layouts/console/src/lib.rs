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

//! A layout that formats log records as tab-separated text for humans.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub extern crate colored;

use std::fmt::Write;

use colored::Color;
use colored::ColoredString;
use colored::Colorize;
use jiff::tz::TimeZone;
use logsmith_core::Error;
use logsmith_core::kv::FieldsMap;
use logsmith_core::layout::EncoderConfig;
use logsmith_core::layout::Layout;
use logsmith_core::record::Level;
use logsmith_core::record::Record;

/// A layout that formats log records as tab-separated text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00	info	src/main.rs:51	listening	{"port":8080}
/// 2024-08-11T22:44:57.172219+08:00	warn	http	src/router.rs:9	slow request	{"elapsed_ms":1200}
/// ```
///
/// Columns are the timestamp, the level, the logger name (if named), the caller (if the record
/// carries one), the message, and the structured fields as a JSON object (if any). A captured
/// stack trace follows on the next lines.
///
/// Levels are not colored by default; see [`with_color`](ConsoleLayout::with_color).
///
/// # Examples
///
/// ```
/// use logsmith_layout_console::ConsoleLayout;
///
/// let layout = ConsoleLayout::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleLayout {
    encoder: EncoderConfig,
    colors: LevelColor,
    color: bool,
}

impl ConsoleLayout {
    /// Set the time and level encoders.
    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logsmith_layout_console::ConsoleLayout;
    ///
    /// let layout = ConsoleLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.encoder = self.encoder.timezone(tz);
        self
    }

    /// Color the level column, for output to a terminal.
    pub fn with_color(mut self) -> Self {
        self.color = true;
        self
    }

    /// Customize the color of the fatal, panic and dpanic levels. Default to bright red.
    ///
    /// No effect unless [`with_color`](ConsoleLayout::with_color) is set.
    pub fn fatal_color(mut self, color: Color) -> Self {
        self.colors.fatal = color;
        self
    }

    /// Customize the color of the error level. Default to red.
    ///
    /// No effect unless [`with_color`](ConsoleLayout::with_color) is set.
    pub fn error_color(mut self, color: Color) -> Self {
        self.colors.error = color;
        self
    }

    /// Customize the color of the warn level. Default to yellow.
    ///
    /// No effect unless [`with_color`](ConsoleLayout::with_color) is set.
    pub fn warn_color(mut self, color: Color) -> Self {
        self.colors.warn = color;
        self
    }

    /// Customize the color of the info level. Default to green.
    ///
    /// No effect unless [`with_color`](ConsoleLayout::with_color) is set.
    pub fn info_color(mut self, color: Color) -> Self {
        self.colors.info = color;
        self
    }

    /// Customize the color of the debug level. Default to blue.
    ///
    /// No effect unless [`with_color`](ConsoleLayout::with_color) is set.
    pub fn debug_color(mut self, color: Color) -> Self {
        self.colors.debug = color;
        self
    }

    fn format_record_level(&self, level: Level) -> ColoredString {
        let text = ColoredString::from(self.encoder.encode_level(level));
        if self.color {
            text.color(self.colors.color(level))
        } else {
            text
        }
    }
}

impl Layout for ConsoleLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut text = self.encoder.encode_time(record.time())?;

        let level = self.format_record_level(record.level());
        write!(&mut text, "\t{level}").map_err(Error::from_fmt_error)?;
        if let Some(name) = record.name() {
            write!(&mut text, "\t{name}").map_err(Error::from_fmt_error)?;
        }
        if let Some(caller) = record.caller() {
            write!(&mut text, "\t{}", caller.trimmed()).map_err(Error::from_fmt_error)?;
        }
        write!(&mut text, "\t{}", record.message()).map_err(Error::from_fmt_error)?;

        if record.has_fields() {
            let fields = serde_json::to_string(&FieldsMap::new(record.fields()))
                .map_err(|err| Error::new("failed to serialize fields").with_source(err))?;
            write!(&mut text, "\t{fields}").map_err(Error::from_fmt_error)?;
        }

        if let Some(stacktrace) = record.stacktrace() {
            write!(&mut text, "\n{stacktrace}").map_err(Error::from_fmt_error)?;
        }

        Ok(text.into_bytes())
    }
}

/// Colors for different log levels.
#[derive(Debug, Clone)]
struct LevelColor {
    fatal: Color,
    error: Color,
    warn: Color,
    info: Color,
    debug: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            fatal: Color::BrightRed,
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::Blue,
        }
    }
}

impl LevelColor {
    fn color(&self, level: Level) -> Color {
        match level {
            Level::Fatal | Level::Panic | Level::DPanic => self.fatal,
            Level::Error => self.error,
            Level::Warn => self.warn,
            Level::Info => self.info,
            Level::Debug => self.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::SystemTime;

    use logsmith_core::kv::field;
    use logsmith_core::record::Caller;

    use super::*;

    fn format(layout: &ConsoleLayout, record: &Record) -> String {
        String::from_utf8(layout.format(record).unwrap()).unwrap()
    }

    fn time() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(1_723_387_497_172)
    }

    #[test]
    fn test_message_only() {
        let layout = ConsoleLayout::default().timezone(TimeZone::UTC);
        let record = Record::builder()
            .time(time())
            .level(Level::Info)
            .message("listening")
            .build();

        assert_eq!(
            format(&layout, &record),
            "2024-08-11T14:44:57.172000+00:00\tinfo\tlistening"
        );
    }

    #[test]
    fn test_all_columns() {
        let layout = ConsoleLayout::default().timezone(TimeZone::UTC);
        let fields = [field("elapsed_ms", 1200), field("path", "/users")];
        let record = Record::builder()
            .time(time())
            .level(Level::Warn)
            .name(Some("http"))
            .caller(Some(Caller::new("/work/app/src/router.rs", 9)))
            .message("slow request")
            .fields(&fields)
            .stacktrace(Some("0: router::serve"))
            .build();

        insta::assert_snapshot!(
            format(&layout, &record).replace('\t', " | "),
            @r#"
        2024-08-11T14:44:57.172000+00:00 | warn | http | src/router.rs:9 | slow request | {"elapsed_ms":1200,"path":"/users"}
        0: router::serve
        "#
        );
    }

    #[test]
    fn test_colored_level() {
        colored::control::set_override(true);
        let layout = ConsoleLayout::default()
            .timezone(TimeZone::UTC)
            .with_color()
            .error_color(Color::Magenta);
        let record = Record::builder()
            .time(time())
            .level(Level::Error)
            .message("boom")
            .build();

        let text = format(&layout, &record);
        assert!(text.contains("\u{1b}[35merror\u{1b}[0m"), "{text:?}");
    }
}
