//! In-memory platform double for tests
//!
//! Records every call and replays queued responses, so pipeline tests can
//! assert exactly which submissions were attempted and in what order.

use crate::api::{
    CatalogResponse, CourseAssignment, GroupSummary, PlatformApi, SubmissionOutcome,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockPlatformApi {
    outcomes: Arc<Mutex<VecDeque<SubmissionOutcome>>>,
    calls: Arc<Mutex<Vec<RecordedSubmission>>>,
    groups: Arc<Mutex<Vec<GroupSummary>>>,
    catalog: Arc<Mutex<Option<CatalogResponse>>>,
    fail_reads: Arc<Mutex<bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub group_id: String,
    pub courses: Vec<CourseAssignment>,
}

impl MockPlatformApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next submission. When the queue is empty,
    /// submissions are accepted.
    pub fn queue_outcome(&self, outcome: SubmissionOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn set_groups(&self, groups: Vec<GroupSummary>) {
        *self.groups.lock().unwrap() = groups;
    }

    pub fn set_catalog(&self, catalog: CatalogResponse) {
        *self.catalog.lock().unwrap() = Some(catalog);
    }

    /// Make `list_groups` and `course_catalog` fail with a remote error.
    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }

    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformApi for MockPlatformApi {
    async fn assign_courses(
        &self,
        group_id: &str,
        courses: &[CourseAssignment],
    ) -> Result<SubmissionOutcome> {
        self.calls.lock().unwrap().push(RecordedSubmission {
            group_id: group_id.to_string(),
            courses: courses.to_vec(),
        });
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SubmissionOutcome::Accepted);
        Ok(outcome)
    }

    async fn list_groups(&self) -> Result<Vec<GroupSummary>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(Error::Remote {
                status: 500,
                body: "mock failure".to_string(),
            });
        }
        Ok(self.groups.lock().unwrap().clone())
    }

    async fn course_catalog(&self) -> Result<CatalogResponse> {
        if *self.fail_reads.lock().unwrap() {
            return Err(Error::Remote {
                status: 500,
                body: "mock failure".to_string(),
            });
        }
        Ok(self.catalog.lock().unwrap().clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_submissions_in_order() {
        let api = MockPlatformApi::new();
        api.assign_courses("g-1", &[CourseAssignment::with_default_priority(1)])
            .await
            .unwrap();
        api.assign_courses("g-2", &[]).await.unwrap();

        let calls = api.submissions();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].group_id, "g-1");
        assert_eq!(calls[1].group_id, "g-2");
    }

    #[tokio::test]
    async fn replays_queued_outcomes_then_accepts() {
        let api = MockPlatformApi::new();
        api.queue_outcome(SubmissionOutcome::Rejected {
            status: 400,
            body: "bad".into(),
        });

        let first = api.assign_courses("g", &[]).await.unwrap();
        let second = api.assign_courses("g", &[]).await.unwrap();
        assert!(matches!(first, SubmissionOutcome::Rejected { status: 400, .. }));
        assert_eq!(second, SubmissionOutcome::Accepted);
    }
}
