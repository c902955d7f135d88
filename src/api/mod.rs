//! Platform API abstraction
//!
//! Trait-based abstraction over the e-learning platform's REST interface so
//! commands can be tested without a live instance. The platform is a fixed
//! black box: JSON bodies in, HTTP status codes out.

pub mod http;
pub mod mock;

pub use http::HttpPlatformClient;
pub use mock::MockPlatformApi;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Priority tag attached to every course-to-group assignment entry.
pub const DEFAULT_PRIORITY: &str = "Default";

/// One entry of an assignment request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CourseAssignment {
    #[serde(rename = "CourseId")]
    pub course_id: i64,
    #[serde(rename = "Priority")]
    pub priority: String,
}

impl CourseAssignment {
    pub fn with_default_priority(course_id: i64) -> Self {
        Self {
            course_id,
            priority: DEFAULT_PRIORITY.to_string(),
        }
    }
}

/// What the platform said about one assignment submission.
///
/// A rejection is a per-group outcome, not a transport failure; transport
/// failures surface as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Rejected { status: u16, body: String },
}

/// Opaque group identifier; the platform is inconsistent about whether it
/// serializes these as numbers or strings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GroupId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupId::Number(n) => write!(f, "{n}"),
            GroupId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Group as returned by `GET /api/v1/Groups`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GroupSummary {
    #[serde(rename = "GroupId")]
    pub id: GroupId,
    #[serde(rename = "GroupName", default)]
    pub name: String,
}

/// Raw payload of `GET /api/v3/admin/categoriesAndCourses`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(rename = "Offers", default)]
    pub offers: Vec<RawCategory>,
    #[serde(rename = "CourseItems", default)]
    pub course_items: Vec<RawCourseItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Names", default)]
    pub names: serde_json::Value,
    #[serde(rename = "Logo", default)]
    pub logo: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCourseItem {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "ParentId")]
    pub parent_id: i64,
    #[serde(rename = "ContentLanguage", default)]
    pub content_language: String,
    #[serde(rename = "ParentCourseId", default)]
    pub parent_course_id: Option<i64>,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Logo", default)]
    pub logo: serde_json::Value,
    #[serde(rename = "IsCertificate", default)]
    pub is_certificate: bool,
    #[serde(rename = "NumPublishedLessons", default)]
    pub num_published_lessons: i64,
    #[serde(rename = "NumPublishedKCs", default)]
    pub num_published_kcs: i64,
}

/// Remote operations used by the commands. One method per endpoint.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Submit `(course, priority)` pairs for one group. Returns the
    /// platform's verdict; transport problems are errors.
    async fn assign_courses(
        &self,
        group_id: &str,
        courses: &[CourseAssignment],
    ) -> Result<SubmissionOutcome>;

    /// Fetch every group on the instance.
    async fn list_groups(&self) -> Result<Vec<GroupSummary>>;

    /// Fetch the published course catalog.
    async fn course_catalog(&self) -> Result<CatalogResponse>;
}
