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

use jiff::Timestamp;
use jiff::tz::TimeZone;
use logsmith_core::layout::EncoderConfig;
use logsmith_core::record::Level;

/// Encoders rendering times as `[2024-08-10 13:05:09.421]` and levels as `logger.info`.
pub(crate) fn encoder_config(tz: TimeZone) -> EncoderConfig {
    EncoderConfig::default()
        .timezone(tz)
        .time_encoder(bracketed_time)
        .level_encoder(prefixed_level)
}

fn bracketed_time(ts: Timestamp, tz: &TimeZone) -> String {
    let zdt = ts.to_zoned(tz.clone());
    format!(
        "[{}.{:03}]",
        zdt.strftime("%Y-%m-%d %H:%M:%S"),
        zdt.millisecond()
    )
}

fn prefixed_level(level: Level) -> String {
    format!("logger.{}", level.name())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::SystemTime;

    use super::*;

    #[test]
    fn test_bracketed_time() {
        let config = encoder_config(TimeZone::UTC);
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_723_295_109_007);
        insta::assert_snapshot!(config.encode_time(time).unwrap(), @"[2024-08-10 13:05:09.007]");

        let config = encoder_config(TimeZone::fixed(jiff::tz::offset(8)));
        insta::assert_snapshot!(config.encode_time(time).unwrap(), @"[2024-08-10 21:05:09.007]");
    }

    #[test]
    fn test_prefixed_level() {
        let config = encoder_config(TimeZone::UTC);
        let names = Level::ALL.map(|level| config.encode_level(level));
        assert_eq!(
            names,
            [
                "logger.debug",
                "logger.info",
                "logger.warn",
                "logger.error",
                "logger.dpanic",
                "logger.panic",
                "logger.fatal",
            ]
        );
    }
}
