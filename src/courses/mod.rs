//! Published course catalog export
//!
//! Pulls the admin catalog endpoint and reshapes it into the JSON layout the
//! content team consumes: a flat `Categories` list and a `Courses` list with
//! deep-link URLs and HTML-safe descriptions.

use crate::api::{CatalogResponse, PlatformApi, RawCategory, RawCourseItem};
use crate::error::Result;
use crate::report;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, PartialEq)]
pub struct CatalogExport {
    #[serde(rename = "Categories")]
    pub categories: Vec<CategoryExport>,
    #[serde(rename = "Courses")]
    pub courses: Vec<CourseExport>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CategoryExport {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Names")]
    pub names: serde_json::Value,
    #[serde(rename = "Logo")]
    pub logo: serde_json::Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CourseExport {
    #[serde(rename = "CourseID")]
    pub course_id: i64,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "CategoryID")]
    pub category_id: i64,
    #[serde(rename = "ContentLanguage")]
    pub content_language: String,
    #[serde(rename = "ParentCourseId")]
    pub parent_course_id: Option<i64>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Logo")]
    pub logo: serde_json::Value,
    #[serde(rename = "IsCertificate")]
    pub is_certificate: bool,
    #[serde(rename = "NumPublishedLessons")]
    pub num_published_lessons: i64,
    #[serde(rename = "NumPublishedKCs")]
    pub num_published_kcs: i64,
}

fn category_export(raw: RawCategory) -> CategoryExport {
    CategoryExport {
        id: raw.id,
        names: raw.names,
        logo: raw.logo,
    }
}

fn course_export(base_url: &str, raw: RawCourseItem) -> CourseExport {
    CourseExport {
        url: format!("{}/#/course/{}/item/null", base_url, raw.id),
        course_id: raw.id,
        category_id: raw.parent_id,
        content_language: raw.content_language,
        parent_course_id: raw.parent_course_id,
        // Course names are single-line labels; descriptions keep their line
        // structure as <br> so they render in the viewer.
        name: raw.name.replace('\n', " "),
        description: raw.description.replace('\n', "<br>"),
        logo: raw.logo,
        is_certificate: raw.is_certificate,
        num_published_lessons: raw.num_published_lessons,
        num_published_kcs: raw.num_published_kcs,
    }
}

/// Reshape the raw catalog payload into the export layout.
pub fn transform(base_url: &str, raw: CatalogResponse) -> CatalogExport {
    CatalogExport {
        categories: raw.offers.into_iter().map(category_export).collect(),
        courses: raw
            .course_items
            .into_iter()
            .map(|item| course_export(base_url, item))
            .collect(),
    }
}

/// Fetch the catalog and write the export JSON to a timestamped file.
///
/// Returns the output path and the (category, course) counts.
pub async fn fetch(
    api: &dyn PlatformApi,
    base_url: &str,
    subdomain: &str,
    output_dir: &Path,
    at: NaiveDateTime,
) -> Result<(PathBuf, usize, usize)> {
    let raw = api.course_catalog().await?;
    let export = transform(base_url, raw);
    let (categories, courses) = (export.categories.len(), export.courses.len());

    let output = report::catalog_path(output_dir, subdomain, at);
    let file = std::fs::File::create(&output)?;
    serde_json::to_writer_pretty(file, &export)?;

    Ok((output, categories, courses))
}
