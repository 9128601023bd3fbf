//! Append-only CSV record of every answered request.
//!
//! Each line is `"timestamp","site","ip","input","output"`. Double quotes
//! inside a field are replaced by single quotes rather than escaped, which is
//! the format existing log consumers read.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use thiserror::Error;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("Failed to write interaction log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Interaction log writer stopped: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub timestamp: OffsetDateTime,
    pub site: Box<str>,
    pub ip: Box<str>,
    pub input: Box<str>,
    pub output: Box<str>,
}

impl InteractionRecord {
    pub fn now(site: &str, ip: &str, input: &str, output: &str) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            site: site.into(),
            ip: ip.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn to_csv_line(&self) -> Result<String, LogError> {
        let timestamp = self.timestamp.to_offset(time::UtcOffset::UTC).format(TIMESTAMP_FORMAT)?;
        Ok(format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"\n",
            timestamp,
            sanitize(&self.site),
            sanitize(&self.ip),
            sanitize(&self.input),
            sanitize(&self.output),
        ))
    }
}

fn sanitize(field: &str) -> String {
    field.replace('"', "'")
}

#[async_trait]
pub trait InteractionLog: Send + Sync {
    async fn append(&self, record: &InteractionRecord) -> Result<(), LogError>;
}

pub struct CsvFileLog {
    path: PathBuf,
}

impl CsvFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InteractionLog for CsvFileLog {
    async fn append(&self, record: &InteractionRecord) -> Result<(), LogError> {
        let line = record.to_csv_line()?;
        let path = self.path.clone();

        // One write per record on an O_APPEND handle keeps concurrent lines whole.
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(line.as_bytes())
        })
        .await??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::datetime;

    use super::*;

    fn record(input: &str, output: &str) -> InteractionRecord {
        InteractionRecord {
            timestamp: datetime!(2025-03-14 09:26:53.589 UTC),
            site: "A".into(),
            ip: "203.0.113.7".into(),
            input: input.into(),
            output: output.into(),
        }
    }

    #[test]
    fn formats_iso_timestamp_with_milliseconds() {
        let line = record("hi", "hello").to_csv_line().unwrap();
        assert_eq!(
            line,
            "\"2025-03-14T09:26:53.589Z\",\"A\",\"203.0.113.7\",\"hi\",\"hello\"\n"
        );
    }

    #[test]
    fn replaces_double_quotes_with_single_quotes() {
        let mut record = record("say \"hi\"", "He said \"no\".");
        record.ip = "\"proxy\"".into();
        let line = record.to_csv_line().unwrap();
        assert_eq!(
            line,
            "\"2025-03-14T09:26:53.589Z\",\"A\",\"'proxy'\",\"say 'hi'\",\"He said 'no'.\"\n"
        );
    }

    #[test]
    fn keeps_embedded_newlines_and_commas() {
        let line = record("a, b\nc", "ok").to_csv_line().unwrap();
        assert!(line.contains("\"a, b\nc\""));
        assert!(line.ends_with("\"ok\"\n"));
    }

    #[tokio::test]
    async fn appends_without_header_or_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvFileLog::new(dir.path().join("interaction_logs.csv"));

        log.append(&record("first", "1")).await.unwrap();
        log.append(&record("second", "2")).await.unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("\"first\",\"1\""));
        assert!(lines[1].ends_with("\"second\",\"2\""));
    }

    #[tokio::test]
    async fn concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(CsvFileLog::new(dir.path().join("interaction_logs.csv")));

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let log = log.clone();
                tokio::spawn(async move {
                    let input = format!("question {i} {}", "x".repeat(512));
                    log.append(&record(&input, "answer")).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 32);
        for line in lines {
            assert!(line.starts_with("\"2025-03-14T09:26:53.589Z\",\"A\""));
            assert!(line.ends_with("\"answer\""));
        }
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvFileLog::new(dir.path().join("missing").join("interaction_logs.csv"));
        assert!(matches!(log.append(&record("a", "b")).await, Err(LogError::Io(_))));
    }
}
