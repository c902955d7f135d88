//! HTTP client for the platform API, with bounded retry
//!
//! Retries apply only to transient failures: 5xx responses, connect errors
//! and timeouts. 4xx responses mean the request itself is wrong and are never
//! retried. Retry is off by default to preserve the historical behavior.

use crate::api::{
    CatalogResponse, CourseAssignment, GroupSummary, PlatformApi, SubmissionOutcome,
};
use crate::config::Settings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

pub struct HttpPlatformClient {
    client: Client,
    base_url: String,
    token: String,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl HttpPlatformClient {
    pub fn new(instance_url: &str, token: String, settings: &Settings) -> Result<Self> {
        // Fails early on a malformed instance URL, before any file is touched.
        let parsed = Url::parse(instance_url)?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(Error::Environment(format!(
                "instance URL must be http(s) with a host: {instance_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: instance_url.trim_end_matches('/').to_string(),
            token,
            max_retries: settings.retries,
            retry_delay_ms: settings.retry_delay_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First label of the instance host, used to stamp export filenames.
    pub fn subdomain(&self) -> Result<String> {
        let url = Url::parse(&self.base_url)?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::Environment(format!("no host in {}", self.base_url)))?;
        Ok(host.split('.').next().unwrap_or(host).to_string())
    }

    async fn send_with_retry<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0u32;
        loop {
            let result = build().send().await;
            let retryable = match &result {
                Ok(response) => response.status().is_server_error(),
                Err(e) => e.is_timeout() || e.is_connect(),
            };

            if retryable && attempt < self.max_retries {
                attempt += 1;
                let delay = self.retry_delay_ms * 2u64.pow(attempt - 1);
                match &result {
                    Ok(response) => warn!(
                        "transient status {} (attempt {}/{}), retrying in {}ms",
                        response.status(),
                        attempt,
                        self.max_retries,
                        delay
                    ),
                    Err(e) => warn!(
                        "transient request error (attempt {}/{}), retrying in {}ms: {}",
                        attempt, self.max_retries, delay, e
                    ),
                }
                sleep(Duration::from_millis(delay)).await;
                continue;
            }

            return result.map_err(Error::from);
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self
            .send_with_retry(|| {
                self.client
                    .get(&url)
                    .bearer_auth(&self.token)
                    .header("Accept", "application/json")
            })
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformClient {
    async fn assign_courses(
        &self,
        group_id: &str,
        courses: &[CourseAssignment],
    ) -> Result<SubmissionOutcome> {
        let url = format!("{}/api/v1/Groups/{}/Courses", self.base_url, group_id);
        debug!("POST {} ({} courses)", url, courses.len());

        let response = self
            .send_with_retry(|| self.client.post(&url).bearer_auth(&self.token).json(courses))
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(SubmissionOutcome::Accepted),
            status => {
                let body = response.text().await.unwrap_or_default();
                Ok(SubmissionOutcome::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn list_groups(&self) -> Result<Vec<GroupSummary>> {
        let url = format!("{}/api/v1/Groups", self.base_url);
        debug!("GET {}", url);
        self.get_json(url).await
    }

    async fn course_catalog(&self) -> Result<CatalogResponse> {
        let url = format!(
            "{}/api/v3/admin/categoriesAndCourses?publishedCourses=true",
            self.base_url
        );
        debug!("GET {}", url);
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(instance: &str) -> Result<HttpPlatformClient> {
        HttpPlatformClient::new(instance, "token".into(), &Settings::default())
    }

    /// Serve one canned status per connection, then 200 for any extras.
    /// Returns the base URL and a hit counter.
    async fn serve_statuses(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            let mut statuses = statuses.into_iter();
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let status = statuses.next().unwrap_or(200);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let body = "canned";
                let response = format!(
                    "HTTP/1.1 {status} X\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn retrying_settings(retries: u32) -> Settings {
        Settings {
            retries,
            retry_delay_ms: 1,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn bad_request_is_never_retried() {
        let (base, hits) = serve_statuses(vec![400]).await;
        let client =
            HttpPlatformClient::new(&base, "token".into(), &retrying_settings(3)).unwrap();

        let outcome = client
            .assign_courses("g-1", &[CourseAssignment::with_default_priority(1)])
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected { status: 400, .. }
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_error_is_retried_until_it_clears() {
        let (base, hits) = serve_statuses(vec![500, 500, 204]).await;
        let client =
            HttpPlatformClient::new(&base, "token".into(), &retrying_settings(2)).unwrap();

        let outcome = client
            .assign_courses("g-1", &[CourseAssignment::with_default_priority(1)])
            .await
            .unwrap();

        assert_eq!(outcome, SubmissionOutcome::Accepted);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_last_response() {
        let (base, hits) = serve_statuses(vec![500, 500, 500]).await;
        let client =
            HttpPlatformClient::new(&base, "token".into(), &retrying_settings(1)).unwrap();

        let outcome = client
            .assign_courses("g-1", &[CourseAssignment::with_default_priority(1)])
            .await
            .unwrap();

        // retries + 1 attempts, then the 500 comes back as a rejection.
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(matches!(
            outcome,
            SubmissionOutcome::Rejected { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn reads_do_not_retry_without_opt_in() {
        let (base, hits) = serve_statuses(vec![500]).await;
        let client =
            HttpPlatformClient::new(&base, "token".into(), &Settings::default()).unwrap();

        let err = client.list_groups().await.unwrap_err();
        assert!(matches!(err, Error::Remote { status: 500, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let client = client("https://yhub.example.org/").unwrap();
        assert_eq!(client.base_url(), "https://yhub.example.org");
    }

    #[test]
    fn subdomain_is_first_host_label() {
        let client = client("https://yhub.example.org").unwrap();
        assert_eq!(client.subdomain().unwrap(), "yhub");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(client("ftp://example.org").is_err());
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(client("not a url").is_err());
    }
}
