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

use std::fmt;
use std::time::SystemTime;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::record::Level;

/// Renders the observed time of a record, in the given time zone.
pub type TimeEncoder = fn(Timestamp, &TimeZone) -> String;

/// Renders the level of a record.
pub type LevelEncoder = fn(Level) -> String;

/// The time and level encoders shared by layouts.
///
/// Default to RFC 3339 timestamps with microsecond precision in the system time zone, and
/// lowercase level names.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use logsmith_core::layout::EncoderConfig;
/// use logsmith_core::record::Level;
///
/// let config = EncoderConfig::default()
///     .timezone(TimeZone::UTC)
///     .level_encoder(|level| level.name().to_uppercase());
/// assert_eq!(config.encode_level(Level::Warn), "WARN");
/// ```
#[derive(Clone)]
pub struct EncoderConfig {
    time: TimeEncoder,
    level: LevelEncoder,
    tz: Option<TimeZone>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time: rfc3339_time,
            level: lowercase_level,
            tz: None,
        }
    }
}

impl fmt::Debug for EncoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderConfig")
            .field("tz", &self.tz)
            .finish_non_exhaustive()
    }
}

impl EncoderConfig {
    /// Set the time encoder.
    pub fn time_encoder(mut self, encoder: TimeEncoder) -> Self {
        self.time = encoder;
        self
    }

    /// Set the level encoder.
    pub fn level_encoder(mut self, encoder: LevelEncoder) -> Self {
        self.level = encoder;
        self
    }

    /// Set the time zone timestamps are rendered in.
    ///
    /// Default to the system time zone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Render a record's observed time.
    pub fn encode_time(&self, time: SystemTime) -> Result<String, Error> {
        let ts = Timestamp::try_from(time)
            .map_err(|err| Error::new("record time is out of range").with_source(err))?;
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        Ok((self.time)(ts, &tz))
    }

    /// Render a record's level.
    pub fn encode_level(&self, level: Level) -> String {
        (self.level)(level)
    }
}

fn rfc3339_time(ts: Timestamp, tz: &TimeZone) -> String {
    format!("{:.6}", ts.display_with_offset(tz.to_offset(ts)))
}

fn lowercase_level(level: Level) -> String {
    level.name().to_string()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_default_encoders() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_742_174_183_318);
        let config = EncoderConfig::default().timezone(TimeZone::UTC);

        insta::assert_snapshot!(config.encode_time(time).unwrap(), @"2025-03-17T01:16:23.318000+00:00");
        assert_eq!(config.encode_level(Level::DPanic), "dpanic");
    }
}
