//! Tabular input records
//!
//! Courses and groups arrive as CSV exports from the platform. Headers are
//! required; column order is irrelevant and extra columns are ignored. A row
//! missing an expected field fails the whole load — partially-transformed
//! input cannot be trusted, so nothing downstream runs.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// A learning unit, tagged with the grade and language it targets.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CourseRecord {
    #[serde(rename = "Course ID")]
    pub id: i64,
    #[serde(rename = "Grade")]
    pub grade: String,
    #[serde(rename = "Language")]
    pub language: String,
}

/// A cohort of learners sharing a grade and instruction language.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GroupRecord {
    #[serde(rename = "Group ID")]
    pub id: String,
    #[serde(rename = "Group Name")]
    pub name: String,
    #[serde(rename = "Grade")]
    pub grade: String,
    #[serde(rename = "Language")]
    pub language: String,
}

/// A group row before naming-convention filtering, as exported by
/// `list-groups`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RawGroupRecord {
    #[serde(rename = "Group ID")]
    pub id: String,
    #[serde(rename = "Group Name")]
    pub name: String,
}

pub fn read_courses(path: &Path) -> Result<Vec<CourseRecord>> {
    read_table(path)
}

pub fn read_groups(path: &Path) -> Result<Vec<GroupRecord>> {
    read_table(path)
}

pub fn read_raw_groups(path: &Path) -> Result<Vec<RawGroupRecord>> {
    read_table(path)
}

fn read_table<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::Input(format!("{}: {}", path.display(), e)))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| Error::Input(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_courses_with_reordered_and_extra_columns() {
        let file = write_csv("Language,Extra,Course ID,Grade\nEN,x,7,G1\nFR,y,9,G2\n");
        let courses = read_courses(file.path()).unwrap();
        assert_eq!(
            courses,
            vec![
                CourseRecord {
                    id: 7,
                    grade: "G1".into(),
                    language: "EN".into()
                },
                CourseRecord {
                    id: 9,
                    grade: "G2".into(),
                    language: "FR".into()
                },
            ]
        );
    }

    #[test]
    fn missing_column_fails_the_load() {
        let file = write_csv("Course ID,Language\n7,EN\n");
        let err = read_courses(file.path()).unwrap_err();
        assert!(err.to_string().contains("Grade"), "got: {err}");
    }

    #[test]
    fn non_integer_course_id_fails_the_load() {
        let file = write_csv("Course ID,Grade,Language\nseven,G1,EN\n");
        assert!(read_courses(file.path()).is_err());
    }

    #[test]
    fn reads_groups() {
        let file = write_csv("Group ID,Group Name,Grade,Language\ng-1,100-G1-EN-A,G1,EN\n");
        let groups = read_groups(file.path()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "g-1");
        assert_eq!(groups[0].name, "100-G1-EN-A");
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = read_courses(Path::new("/nonexistent/courses.csv")).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }
}
