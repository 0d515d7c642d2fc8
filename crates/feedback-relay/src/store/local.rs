//! Local fallback sink for feedback-relay.
//!
//! Appends records to an on-disk CSV file with a header row written on first
//! creation. The file is the sink of last resort: when it cannot be written,
//! the submission is lost and the caller is told so.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{FeedbackRecord, FeedbackStatus, COLUMNS};

/// Append-only CSV sink.
///
/// Each record is serialized in memory and written with a single append-mode
/// write while a per-sink lock is held, so concurrent submissions never
/// interleave partial lines.
#[derive(Debug)]
pub struct CsvSink {
    /// Path to the CSV file.
    path: PathBuf,
    /// Rotate the file once it reaches this many bytes. 0 disables rotation.
    rotate_max_bytes: u64,
    /// Serializes the size check and append of one record.
    write_lock: Mutex<()>,
}

impl CsvSink {
    /// Create a sink writing to the given path.
    ///
    /// Creates the parent directories if they don't exist. The file itself is
    /// only created on the first append.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories cannot be created.
    pub fn new(path: impl AsRef<Path>, rotate_max_bytes: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        Ok(Self {
            path,
            rotate_max_bytes,
            write_lock: Mutex::new(()),
        })
    }

    /// Get the path to the CSV file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record to the file.
    ///
    /// Writes the header row first if the file does not exist or is empty,
    /// and rotates the file beforehand when the size bound is exceeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written. There is no further
    /// fallback behind this sink.
    pub fn append(&self, record: &FeedbackRecord) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::internal("feedback file lock poisoned"))?;

        self.rotate_if_needed()?;

        let needs_header = std::fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let mut wtr = csv::Writer::from_writer(Vec::new());
        if needs_header {
            wtr.write_record(&COLUMNS)?;
        }
        wtr.write_record(&record.to_row())?;
        let buf = wtr
            .into_inner()
            .map_err(|e| Error::internal(format!("CSV buffer flush failed: {e}")))?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(&buf)?;

        debug!("Appended feedback record to {}", self.path.display());
        Ok(())
    }

    /// Rename the file to a timestamped archive when it has outgrown the
    /// configured bound. The next append starts a fresh file with a header.
    fn rotate_if_needed(&self) -> Result<()> {
        if self.rotate_max_bytes == 0 {
            return Ok(());
        }

        let Ok(meta) = std::fs::metadata(&self.path) else {
            return Ok(());
        };
        if meta.len() < self.rotate_max_bytes {
            return Ok(());
        }

        let archived = self.archive_path(Utc::now());
        std::fs::rename(&self.path, &archived)?;
        info!(
            "Rotated feedback file to {} ({} bytes)",
            archived.display(),
            meta.len()
        );
        Ok(())
    }

    /// Archive name for a rotation happening at `now`.
    fn archive_path(&self, now: DateTime<Utc>) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("feedback");
        let name = format!("{stem}-{}.csv", now.format("%Y%m%d%H%M%S%3f"));
        self.path.with_file_name(name)
    }

    /// Read the most recent records, newest first.
    ///
    /// Malformed rows are skipped with a warning rather than failing the
    /// whole read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn read_recent(&self, limit: usize) -> Result<Vec<FeedbackRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            match Self::row_to_record(&row) {
                Some(record) => records.push(record),
                None => warn!("Skipping malformed feedback row: {:?}", row),
            }
        }

        let skip = records.len().saturating_sub(limit);
        let mut recent: Vec<FeedbackRecord> = records.into_iter().skip(skip).collect();
        recent.reverse();
        Ok(recent)
    }

    /// Get statistics about the local file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn stats(&self) -> Result<LocalStats> {
        if !self.path.exists() {
            return Ok(LocalStats {
                total_records: 0,
                file_size_bytes: 0,
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;
        let total_records = rdr.records().filter(std::result::Result::is_ok).count() as u64;
        let file_size_bytes = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);

        Ok(LocalStats {
            total_records,
            file_size_bytes,
        })
    }

    /// Convert a CSV row to a record.
    fn row_to_record(row: &csv::StringRecord) -> Option<FeedbackRecord> {
        if row.len() != COLUMNS.len() {
            return None;
        }

        let timestamp = DateTime::parse_from_rfc3339(row.get(0)?)
            .ok()?
            .with_timezone(&Utc);

        Some(FeedbackRecord {
            timestamp,
            name: row.get(1)?.to_string(),
            email: row.get(2)?.to_string(),
            message: row.get(3)?.to_string(),
            status: FeedbackStatus::parse(row.get(4)?),
        })
    }
}

/// Statistics about the local fallback file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStats {
    /// Number of records in the current file.
    pub total_records: u64,
    /// Size of the current file in bytes.
    pub file_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "feedback_relay_local_{}_{name}.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn cleanup(path: &Path) {
        let _ = std::fs::remove_file(path);
    }

    fn test_record(message: &str) -> FeedbackRecord {
        FeedbackRecord::new("Ada", "ada@example.com", message)
    }

    #[test]
    fn test_append_creates_file_with_header() {
        let path = temp_path("header");
        let sink = CsvSink::new(&path, 0).unwrap();

        sink.append(&test_record("Great tool!")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Timestamp,Name,Email,Message,Status");
        assert!(lines[1].contains("Ada"));
        assert!(lines[1].ends_with(",new"));

        cleanup(&path);
    }

    #[test]
    fn test_header_written_only_once() {
        let path = temp_path("header_once");
        let sink = CsvSink::new(&path, 0).unwrap();

        sink.append(&test_record("first")).unwrap();
        sink.append(&test_record("second")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header_count = content
            .lines()
            .filter(|l| *l == "Timestamp,Name,Email,Message,Status")
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        cleanup(&path);
    }

    #[test]
    fn test_new_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!(
            "feedback_relay_local_{}_nested",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("deep").join("feedback.csv");

        let sink = CsvSink::new(&path, 0).unwrap();
        sink.append(&test_record("hi")).unwrap();
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_message_with_commas_and_newlines_round_trips() {
        let path = temp_path("quoting");
        let sink = CsvSink::new(&path, 0).unwrap();

        let message = "line one, with comma\nline two, \"quoted\"";
        sink.append(&test_record(message)).unwrap();

        let records = sink.read_recent(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, message);
        assert_eq!(records[0].name, "Ada");
        assert_eq!(records[0].status, FeedbackStatus::New);

        cleanup(&path);
    }

    #[test]
    fn test_read_recent_empty_when_missing() {
        let path = temp_path("missing");
        let sink = CsvSink::new(&path, 0).unwrap();

        assert!(sink.read_recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_read_recent_limit_and_order() {
        let path = temp_path("recent");
        let sink = CsvSink::new(&path, 0).unwrap();

        for i in 0..5 {
            sink.append(&test_record(&format!("message {i}"))).unwrap();
        }

        let recent = sink.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        // Newest first
        assert_eq!(recent[0].message, "message 4");
        assert_eq!(recent[1].message, "message 3");

        cleanup(&path);
    }

    #[test]
    fn test_rotation_archives_current_file() {
        let dir = std::env::temp_dir().join(format!(
            "feedback_relay_local_{}_rotate",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("feedback.csv");

        // Any non-empty file exceeds a 1-byte bound, so the second append
        // rotates the first one out.
        let sink = CsvSink::new(&path, 1).unwrap();
        sink.append(&test_record("first")).unwrap();
        sink.append(&test_record("second")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2); // fresh header + one row
        assert!(content.contains("second"));
        assert!(!content.contains("first"));

        let archives: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                name.starts_with("feedback-") && name.ends_with(".csv")
            })
            .collect();
        assert_eq!(archives.len(), 1);

        let archived = std::fs::read_to_string(archives[0].path()).unwrap();
        assert!(archived.contains("first"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rotation_disabled_with_zero_bound() {
        let path = temp_path("no_rotate");
        let sink = CsvSink::new(&path, 0).unwrap();

        for i in 0..10 {
            sink.append(&test_record(&format!("message {i}"))).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 11);

        cleanup(&path);
    }

    #[test]
    fn test_archive_path_shape() {
        let sink = CsvSink::new(temp_path("archive_shape"), 0).unwrap();
        let now = DateTime::parse_from_rfc3339("2026-08-07T10:30:00.123Z")
            .unwrap()
            .with_timezone(&Utc);

        let archived = sink.archive_path(now);
        let name = archived.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("feedback_relay_local_"));
        assert!(name.contains("20260807103000123"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_stats() {
        let path = temp_path("stats");
        let sink = CsvSink::new(&path, 0).unwrap();

        assert_eq!(sink.stats().unwrap().total_records, 0);

        sink.append(&test_record("one")).unwrap();
        sink.append(&test_record("two")).unwrap();

        let stats = sink.stats().unwrap();
        assert_eq!(stats.total_records, 2);
        assert!(stats.file_size_bytes > 0);

        cleanup(&path);
    }

    #[test]
    fn test_concurrent_appends_produce_well_formed_lines() {
        let path = temp_path("concurrent");
        let sink = Arc::new(CsvSink::new(&path, 0).unwrap());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    sink.append(&test_record(&format!("concurrent message {i}")))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = sink.read_recent(100).unwrap();
        assert_eq!(records.len(), 50);
        for record in &records {
            assert_eq!(record.name, "Ada");
            assert!(record.message.starts_with("concurrent message "));
        }

        cleanup(&path);
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let path = temp_path("malformed");
        let sink = CsvSink::new(&path, 0).unwrap();

        sink.append(&test_record("good")).unwrap();

        // Tack on a truncated row by hand.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"not-a-timestamp,only,three\n").unwrap();

        let records = sink.read_recent(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "good");

        cleanup(&path);
    }
}
