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
use std::fmt::Write;
use std::time::SystemTime;

use crate::Error;
use crate::Layout;
use crate::record::Record;

/// A layout that formats log record as plain text without any dependencies.
///
/// Output format:
///
/// ```text
/// 1742174183318826000   WARN src/main.rs:13 queue is almost full depth=93
/// 1742174183318846000  ERROR src/main.rs:14 queue is full depth=100
/// ```
///
/// Timestamps are nanoseconds since the Unix epoch; the caller is omitted when the record has
/// none.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct PlainTextLayout {}

impl Layout for PlainTextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut text = String::new();

        let time = record.time();
        match time.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(dur) => write!(&mut text, "{}", dur.as_nanos()),
            Err(err) => write!(&mut text, "-{}", err.duration().as_nanos()),
        }
        .map_err(Error::from_fmt_error)?;

        let level = record.level().name().to_ascii_uppercase();
        write!(&mut text, " {level:>6}").map_err(Error::from_fmt_error)?;
        if let Some(name) = record.name() {
            write!(&mut text, " {name}:").map_err(Error::from_fmt_error)?;
        }
        if let Some(caller) = record.caller() {
            write!(&mut text, " {}", caller.trimmed()).map_err(Error::from_fmt_error)?;
        }
        write!(&mut text, " {}", record.message()).map_err(Error::from_fmt_error)?;

        for field in record.fields() {
            write!(&mut text, " {}={}", field.key(), field.value())
                .map_err(Error::from_fmt_error)?;
        }

        if let Some(stacktrace) = record.stacktrace() {
            write!(&mut text, "\n{stacktrace}").map_err(Error::from_fmt_error)?;
        }

        Ok(text.into_bytes())
    }
}
