//! Group course assignment pipeline
//!
//! Matches courses to groups with an equality join on (grade, language),
//! submits each non-empty match set to the platform, and records one report
//! row per submission attempt. Groups with no matching courses are skipped
//! outright: no request, no row.
//!
//! Re-running against a live instance re-submits everything and may duplicate
//! server-side state. The platform offers no idempotent variant of this call.

use crate::api::{CourseAssignment, PlatformApi, SubmissionOutcome};
use crate::error::Result;
use crate::records::{CourseRecord, GroupRecord};
use crate::report::ReportWriter;
use std::collections::HashMap;
use tracing::{debug, error, info};

/// Header of the assignment report CSV.
pub const REPORT_HEADER: [&str; 4] = ["Group ID", "Group Name", "Courses Assigned", "Result"];

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Halt on the first rejected submission instead of continuing.
    pub stop_on_first_error: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            stop_on_first_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentResult {
    Success,
    Failure { status: u16, body: String },
}

impl AssignmentResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, AssignmentResult::Failure { .. })
    }
}

impl std::fmt::Display for AssignmentResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentResult::Success => write!(f, "Success"),
            AssignmentResult::Failure { status, body } => write!(f, "Fail ({status}: {body})"),
        }
    }
}

/// One report row: a submission that was actually attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub group_id: String,
    pub group_name: String,
    pub courses_assigned: usize,
    pub result: AssignmentResult,
}

/// Where report rows go. Rows must be durable as soon as `write` returns, so
/// a halted run leaves every attempted row behind.
pub trait ReportSink {
    fn write(&mut self, outcome: &GroupOutcome) -> Result<()>;
}

impl ReportSink for ReportWriter {
    fn write(&mut self, outcome: &GroupOutcome) -> Result<()> {
        let assigned = outcome.courses_assigned.to_string();
        let result = outcome.result.to_string();
        self.write_row([
            outcome.group_id.as_str(),
            outcome.group_name.as_str(),
            assigned.as_str(),
            result.as_str(),
        ])
    }
}

#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub outcomes: Vec<GroupOutcome>,
    pub skipped: usize,
    pub halted: bool,
}

impl PipelineSummary {
    pub fn first_failure(&self) -> Option<&GroupOutcome> {
        self.outcomes.iter().find(|o| o.result.is_failure())
    }
}

/// Run the pipeline over fully-loaded course and group tables.
///
/// The match index is built once, keyed by (grade, language), with course
/// input order preserved inside each bucket. Groups are processed strictly in
/// input order; each submission is awaited before the next begins.
pub async fn assign(
    courses: &[CourseRecord],
    groups: &[GroupRecord],
    api: &dyn PlatformApi,
    sink: &mut dyn ReportSink,
    options: &PipelineOptions,
) -> Result<PipelineSummary> {
    let mut index: HashMap<(&str, &str), Vec<i64>> = HashMap::new();
    for course in courses {
        index
            .entry((course.grade.as_str(), course.language.as_str()))
            .or_default()
            .push(course.id);
    }

    let mut summary = PipelineSummary::default();

    for group in groups {
        let matched = index
            .get(&(group.grade.as_str(), group.language.as_str()))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if matched.is_empty() {
            debug!(
                "no courses match group {} ({}, {}), skipping",
                group.id, group.grade, group.language
            );
            summary.skipped += 1;
            continue;
        }

        let request: Vec<CourseAssignment> = matched
            .iter()
            .map(|&id| CourseAssignment::with_default_priority(id))
            .collect();

        let result = match api.assign_courses(&group.id, &request).await? {
            SubmissionOutcome::Accepted => AssignmentResult::Success,
            SubmissionOutcome::Rejected { status, body } => {
                AssignmentResult::Failure { status, body }
            }
        };

        let outcome = GroupOutcome {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            courses_assigned: request.len(),
            result,
        };

        // The row lands in the report before any halt decision.
        sink.write(&outcome)?;
        info!(
            "Group ID: {}, Group Name: {}, Courses Assigned: {}, Result: {}",
            outcome.group_id, outcome.group_name, outcome.courses_assigned, outcome.result
        );

        let failed = outcome.result.is_failure();
        if failed {
            error!(
                "submission failed for group {}: {}",
                outcome.group_id, outcome.result
            );
        }
        summary.outcomes.push(outcome);

        if failed && options.stop_on_first_error {
            summary.halted = true;
            break;
        }
    }

    Ok(summary)
}
