//! Group listing and naming-convention filtering
//!
//! Group display names follow `<school id>-<grade>-<language>-<free text>`.
//! `extract` keeps only the rows that parse, carrying the grade and language
//! into the output so the assignment pipeline can join on them.

use crate::api::PlatformApi;
use crate::error::Result;
use crate::records;
use crate::report::{self, ReportWriter};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Grades recognized by the naming convention. Order matters: the regex
/// alternation tries these left to right.
pub const VALID_GRADES: &[&str] = &[
    "KG1", "KG2", "KG3", "G1", "G2", "G3", "G4", "G5", "G6", "G7", "G8", "G9", "G10", "G11H",
    "G11SC", "G12SG", "G12LH", "G12SV", "G12SE",
];

/// Instruction languages recognized by the naming convention.
pub const VALID_LANGUAGES: &[&str] = &["EN", "FR", "AR"];

/// Fields parsed out of a conforming group name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGroupName {
    pub school_id: String,
    pub grade: String,
    pub language: String,
}

/// Compiled matcher for the group naming convention.
pub struct NamingConvention {
    pattern: Regex,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new()
    }
}

impl NamingConvention {
    pub fn new() -> Self {
        let pattern = format!(
            r"^(\d+)-({})-({})-.*$",
            VALID_GRADES.join("|"),
            VALID_LANGUAGES.join("|")
        );
        Self {
            // The pattern is built from static alternations; it always compiles.
            pattern: Regex::new(&pattern).expect("naming convention pattern"),
        }
    }

    pub fn parse(&self, name: &str) -> Option<ParsedGroupName> {
        let captures = self.pattern.captures(name)?;
        Some(ParsedGroupName {
            school_id: captures[1].to_string(),
            grade: captures[2].to_string(),
            language: captures[3].to_string(),
        })
    }
}

/// Filter a raw groups CSV down to the rows whose names parse, writing
/// `Group ID, Group Name, Grade, Language` to a timestamped file.
///
/// Returns the output path and the number of rows kept.
pub fn extract(input: &Path, output_dir: &Path, at: NaiveDateTime) -> Result<(PathBuf, usize)> {
    let groups = records::read_raw_groups(input)?;
    let convention = NamingConvention::new();

    let output = report::filtered_groups_path(output_dir, at);
    let mut writer =
        ReportWriter::create(&output, &["Group ID", "Group Name", "Grade", "Language"])?;

    let mut kept = 0;
    for group in &groups {
        match convention.parse(&group.name) {
            Some(parsed) => {
                writer.write_row([
                    group.id.as_str(),
                    group.name.as_str(),
                    parsed.grade.as_str(),
                    parsed.language.as_str(),
                ])?;
                kept += 1;
            }
            None => debug!("group name does not match convention: {}", group.name),
        }
    }

    Ok((output, kept))
}

/// Export every group on the instance as a `Group ID, Group Name` CSV.
pub async fn export(
    api: &dyn PlatformApi,
    subdomain: &str,
    output_dir: &Path,
    at: NaiveDateTime,
) -> Result<(PathBuf, usize)> {
    let groups = api.list_groups().await?;

    let output = report::groups_export_path(output_dir, subdomain, at);
    let mut writer = ReportWriter::create(&output, &["Group ID", "Group Name"])?;
    for group in &groups {
        writer.write_row([group.id.to_string().as_str(), group.name.as_str()])?;
    }

    Ok((output, groups.len()))
}

/// Count the groups on the instance.
pub async fn count(api: &dyn PlatformApi) -> Result<usize> {
    Ok(api.list_groups().await?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GroupId, GroupSummary, MockPlatformApi};
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn parses_conforming_names() {
        let convention = NamingConvention::new();
        let parsed = convention.parse("1045-G12SV-FR-Section A").unwrap();
        assert_eq!(
            parsed,
            ParsedGroupName {
                school_id: "1045".into(),
                grade: "G12SV".into(),
                language: "FR".into(),
            }
        );
    }

    #[test]
    fn grade_prefixes_do_not_shadow_longer_grades() {
        let convention = NamingConvention::new();
        // "G1" is listed before "G10"; the trailing dash must force the
        // longer alternative to win.
        let parsed = convention.parse("7-G10-AR-x").unwrap();
        assert_eq!(parsed.grade, "G10");
        let parsed = convention.parse("7-G11SC-EN-x").unwrap();
        assert_eq!(parsed.grade, "G11SC");
    }

    #[test]
    fn rejects_nonconforming_names() {
        let convention = NamingConvention::new();
        assert!(convention.parse("no-numbers-here").is_none());
        assert!(convention.parse("12-G13-EN-x").is_none());
        assert!(convention.parse("12-G1-DE-x").is_none());
        assert!(convention.parse("12-G1-EN").is_none());
        assert!(convention.parse("G1-EN-12-x").is_none());
    }

    #[test]
    fn extract_keeps_only_matching_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("groups.csv");
        std::fs::write(
            &input,
            "Group ID,Group Name\n\
             g-1,100-G1-EN-Morning\n\
             g-2,Staff Room\n\
             g-3,205-KG2-AR-Afternoon\n",
        )
        .unwrap();

        let (output, kept) = extract(&input, dir.path(), stamp()).unwrap();
        assert_eq!(kept, 2);

        let content = std::fs::read_to_string(output).unwrap();
        assert_eq!(
            content,
            "Group ID,Group Name,Grade,Language\n\
             g-1,100-G1-EN-Morning,G1,EN\n\
             g-3,205-KG2-AR-Afternoon,KG2,AR\n"
        );
    }

    #[tokio::test]
    async fn export_writes_every_group() {
        let api = MockPlatformApi::new();
        api.set_groups(vec![
            GroupSummary {
                id: GroupId::Number(1),
                name: "Alpha".into(),
            },
            GroupSummary {
                id: GroupId::Text("g-2".into()),
                name: "Beta".into(),
            },
        ]);
        let dir = tempfile::tempdir().unwrap();

        let (output, total) = export(&api, "demo", dir.path(), stamp()).await.unwrap();
        assert_eq!(total, 2);
        let content = std::fs::read_to_string(output).unwrap();
        assert_eq!(content, "Group ID,Group Name\n1,Alpha\ng-2,Beta\n");
    }

    #[tokio::test]
    async fn count_reports_group_total() {
        let api = MockPlatformApi::new();
        api.set_groups(vec![GroupSummary {
            id: GroupId::Number(1),
            name: "Alpha".into(),
        }]);
        assert_eq!(count(&api).await.unwrap(), 1);
    }
}
