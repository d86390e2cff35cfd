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

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::GzEncoder;
use jiff::SignedDuration;
use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use logsmith_core::Error;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const COMPRESS_SUFFIX: &str = ".gz";

/// Derives backup file names from the path of the active log file.
///
/// `<dir>/app.log` is backed up as `<dir>/app-2024-08-10T13-05-09.421.log`, and as
/// `<dir>/app-2024-08-10T13-05-09.421.log.gz` once compressed.
#[derive(Debug, Clone)]
pub(crate) struct BackupNaming {
    dir: PathBuf,
    stem: String,
    ext: String,
}

impl BackupNaming {
    pub(crate) fn new(path: &Path) -> Result<Self, Error> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::new("log file name must be valid UTF-8").with_context("path", path.display())
            })?;

        let (stem, ext) = match filename.rfind('.') {
            None | Some(0) => (filename, ""),
            Some(pos) => filename.split_at(pos),
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(BackupNaming {
            dir,
            stem: stem.to_string(),
            ext: ext.to_string(),
        })
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn backup_path(&self, ts: Timestamp, tz: &TimeZone) -> PathBuf {
        let zdt = ts.to_zoned(tz.clone());
        let filename = format!(
            "{}-{}.{:03}{}",
            self.stem,
            zdt.strftime(BACKUP_TIME_FORMAT),
            zdt.millisecond(),
            self.ext
        );
        self.dir.join(filename)
    }

    /// Parse the timestamp out of a backup file name, and whether the backup is compressed.
    ///
    /// Return `None` if the name does not belong to a backup of this log file.
    pub(crate) fn parse(&self, filename: &str, tz: &TimeZone) -> Option<(Timestamp, bool)> {
        let rest = filename.strip_prefix(self.stem.as_str())?.strip_prefix('-')?;
        let (rest, compressed) = match rest.strip_suffix(COMPRESS_SUFFIX) {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let rest = rest.strip_suffix(self.ext.as_str())?;

        let (datetime, millis) = rest.rsplit_once('.')?;
        if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let millis = millis.parse::<i64>().ok()?;
        let datetime = DateTime::strptime(BACKUP_TIME_FORMAT, datetime).ok()?;
        let ts = datetime.to_zoned(tz.clone()).ok()?.timestamp();
        let ts = ts.checked_add(SignedDuration::from_millis(millis)).ok()?;
        Some((ts, compressed))
    }

    fn is_taken(&self, path: &Path) -> bool {
        fs::exists(path).unwrap_or(false) || fs::exists(compressed_path(path)).unwrap_or(false)
    }

    /// The first backup path not taken yet, starting at `ts` and moving forward a millisecond
    /// at a time.
    pub(crate) fn next_backup_path(&self, ts: Timestamp, tz: &TimeZone) -> Result<PathBuf, Error> {
        let mut ts = ts;
        loop {
            let path = self.backup_path(ts, tz);
            if !self.is_taken(&path) {
                return Ok(path);
            }
            ts = ts
                .checked_add(SignedDuration::from_millis(1))
                .map_err(|err| Error::new("backup timestamp out of range").with_source(err))?;
        }
    }
}

#[derive(Debug)]
pub(crate) struct Backup {
    pub(crate) path: PathBuf,
    pub(crate) timestamp: Timestamp,
    pub(crate) compressed: bool,
}

/// List the backups of a log file, newest first.
pub(crate) fn list_backups(naming: &BackupNaming, tz: &TimeZone) -> Result<Vec<Backup>, Error> {
    let read_dir = fs::read_dir(naming.dir()).map_err(|err| {
        Error::new("failed to read log dir")
            .with_context("dir", naming.dir().display())
            .with_source(err)
    })?;

    let mut backups = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let metadata = entry.metadata().ok()?;
            // the writer only creates files, not directories or symlinks
            if !metadata.is_file() {
                return None;
            }

            let filename = entry.file_name();
            let (timestamp, compressed) = naming.parse(filename.to_str()?, tz)?;
            Some(Backup {
                path: entry.path(),
                timestamp,
                compressed,
            })
        })
        .collect::<Vec<_>>();

    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(backups)
}

/// How many backups to keep, for how long, and whether to compress them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Retention {
    pub(crate) max_backups: usize,
    pub(crate) max_age: Option<SignedDuration>,
    pub(crate) compress: bool,
}

/// Apply the retention policy to the backups of a log file.
///
/// Backups older than the maximum age are removed first, then the oldest backups beyond the
/// maximum count, then the remaining backups are compressed.
pub(crate) fn maintain(
    naming: &BackupNaming,
    tz: &TimeZone,
    retention: Retention,
    now: Timestamp,
) -> Result<(), Error> {
    let mut backups = list_backups(naming, tz)?;

    if let Some(max_age) = retention.max_age {
        let cutoff = now
            .checked_sub(max_age)
            .map_err(|err| Error::new("backup age cutoff out of range").with_source(err))?;
        let (expired, kept): (Vec<_>, Vec<_>) =
            backups.into_iter().partition(|b| b.timestamp < cutoff);
        for backup in &expired {
            remove_backup(backup)?;
        }
        backups = kept;
    }

    if retention.max_backups > 0 && backups.len() > retention.max_backups {
        for backup in backups.drain(retention.max_backups..) {
            remove_backup(&backup)?;
        }
    }

    if retention.compress {
        for backup in backups.iter().filter(|b| !b.compressed) {
            compress_file(&backup.path)?;
        }
    }

    Ok(())
}

fn remove_backup(backup: &Backup) -> Result<(), Error> {
    fs::remove_file(&backup.path).map_err(|err| {
        Error::new("failed to remove old log backup")
            .with_context("path", backup.path.display())
            .with_source(err)
    })
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, then remove the original.
pub(crate) fn compress_file(path: &Path) -> Result<(), Error> {
    let gz_path = compressed_path(path);
    let compress = || -> io::Result<()> {
        let mut reader = BufReader::new(File::open(path)?);
        let output = File::create(&gz_path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::remove_file(path)
    };

    compress().map_err(|err| {
        Error::new("failed to compress log backup")
            .with_context("path", path.display())
            .with_source(err)
    })
}
