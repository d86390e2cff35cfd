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

//! A JSON layout for formatting log records.

#![cfg_attr(docsrs, feature(doc_cfg))]

use jiff::tz::TimeZone;
use logsmith_core::Error;
use logsmith_core::kv::FieldsMap;
use logsmith_core::layout::EncoderConfig;
use logsmith_core::layout::Layout;
use logsmith_core::record::Record;
use serde::Serialize;

/// A JSON layout for formatting log records, one object per line.
///
/// Keys come in a fixed order: `level`, `ts`, `logger` (if the logger is named), `caller` (if
/// the record carries one), `msg`, then the structured fields in the order they were bound and
/// given, and `stacktrace` last (if captured).
///
/// Output format:
///
/// ```json
/// {"level":"info","ts":"2024-08-11T22:44:57.172051+08:00","caller":"src/main.rs:51","msg":"Hello info!"}
/// {"level":"error","ts":"2024-08-11T22:44:57.172187+08:00","logger":"http","caller":"src/main.rs:52","msg":"Hello error!","status":503}
/// ```
///
/// # Examples
///
/// ```
/// use logsmith_layout_json::JsonLayout;
///
/// let json_layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    encoder: EncoderConfig,
}

impl JsonLayout {
    /// Set the time and level encoders.
    ///
    /// # Examples
    ///
    /// ```
    /// use logsmith_core::layout::EncoderConfig;
    /// use logsmith_layout_json::JsonLayout;
    ///
    /// let encoder = EncoderConfig::default().level_encoder(|level| level.name().to_uppercase());
    /// let layout = JsonLayout::default().encoder(encoder);
    /// ```
    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logsmith_layout_json::JsonLayout;
    ///
    /// let layout = JsonLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.encoder = self.encoder.timezone(tz);
        self
    }
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    level: String,
    ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    logger: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    msg: &'a str,
    #[serde(flatten)]
    fields: FieldsMap<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stacktrace: Option<&'a str>,
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let record_line = RecordLine {
            level: self.encoder.encode_level(record.level()),
            ts: self.encoder.encode_time(record.time())?,
            logger: record.name(),
            caller: record.caller().map(|caller| caller.trimmed().to_string()),
            msg: record.message(),
            fields: FieldsMap::new(record.fields()),
            stacktrace: record.stacktrace(),
        };

        serde_json::to_vec(&record_line)
            .map_err(|err| Error::new("failed to serialize record").with_source(err))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::SystemTime;

    use logsmith_core::kv::field;
    use logsmith_core::record::Caller;
    use logsmith_core::record::Level;

    use super::*;

    fn format(layout: &JsonLayout, record: &Record) -> String {
        String::from_utf8(layout.format(record).unwrap()).unwrap()
    }

    fn time() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(1_723_387_497_172)
    }

    #[test]
    fn test_minimal_record() {
        let layout = JsonLayout::default().timezone(TimeZone::UTC);
        let record = Record::builder()
            .time(time())
            .level(Level::Info)
            .message("Hello info!")
            .build();

        insta::assert_snapshot!(
            format(&layout, &record),
            @r#"{"level":"info","ts":"2024-08-11T14:44:57.172000+00:00","msg":"Hello info!"}"#
        );
    }

    #[test]
    fn test_full_record_key_order() {
        let layout = JsonLayout::default().timezone(TimeZone::UTC);
        let context = [field("service", "api")];
        let fields = [field("status", 503), field("retry", true)];
        let record = Record::builder()
            .time(time())
            .level(Level::Error)
            .name(Some("http.router"))
            .caller(Some(Caller::new("/work/app/src/main.rs", 52)))
            .message("Hello error!")
            .context(&context)
            .fields(&fields)
            .stacktrace(Some("0: main"))
            .build();

        insta::assert_snapshot!(
            format(&layout, &record),
            @r#"{"level":"error","ts":"2024-08-11T14:44:57.172000+00:00","logger":"http.router","caller":"src/main.rs:52","msg":"Hello error!","service":"api","status":503,"retry":true,"stacktrace":"0: main"}"#
        );
    }

    #[test]
    fn test_custom_encoders() {
        let encoder = EncoderConfig::default()
            .timezone(TimeZone::UTC)
            .time_encoder(|ts, tz| ts.to_zoned(tz.clone()).strftime("%s").to_string())
            .level_encoder(|level| level.name().to_uppercase());
        let layout = JsonLayout::default().encoder(encoder);
        let record = Record::builder()
            .time(time())
            .level(Level::Warn)
            .message("custom")
            .build();

        insta::assert_snapshot!(
            format(&layout, &record),
            @r#"{"level":"WARN","ts":"1723387497","msg":"custom"}"#
        );
    }
}
