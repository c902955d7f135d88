//! Report files and their naming
//!
//! Every command that writes a file stamps the filename with the invocation
//! time. The timestamp is an explicit parameter so the formatting stays
//! deterministic under test; callers capture `Local::now()` exactly once.

use crate::error::Result;
use chrono::NaiveDateTime;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Timestamp layout shared by the CSV report filenames.
const CSV_STAMP: &str = "%d-%m-%Y__%H-%M-%S";

/// Timestamp layout for the course-catalog JSON export.
const JSON_STAMP: &str = "%Y%m%d_%H%M%S";

pub fn assignments_path(output_dir: &Path, at: NaiveDateTime) -> PathBuf {
    output_dir.join(format!("course_assignments_{}.csv", at.format(CSV_STAMP)))
}

pub fn filtered_groups_path(output_dir: &Path, at: NaiveDateTime) -> PathBuf {
    output_dir.join(format!("filtered_groups_{}.csv", at.format(CSV_STAMP)))
}

pub fn groups_export_path(output_dir: &Path, subdomain: &str, at: NaiveDateTime) -> PathBuf {
    output_dir.join(format!(
        "{}_all_groups_{}.csv",
        subdomain,
        at.format(CSV_STAMP)
    ))
}

pub fn catalog_path(output_dir: &Path, subdomain: &str, at: NaiveDateTime) -> PathBuf {
    output_dir.join(format!(
        "{}_courses_{}.json",
        subdomain,
        at.format(JSON_STAMP)
    ))
}

/// CSV writer that flushes after every row, so a halted run leaves behind
/// every row that was actually attempted.
pub struct ReportWriter {
    writer: csv::Writer<File>,
}

impl ReportWriter {
    pub fn create(path: &Path, header: &[&str]) -> Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(header)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn write_row<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        self.writer.flush()?;
        Ok(())
    }
}
