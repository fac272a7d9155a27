//! HTTP client for the reader service's list and save endpoints.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use feedcast_shared::{FeedcastError, ListPage, Result, SaveRequest};

/// User-Agent string for reader requests.
const USER_AGENT: &str = concat!("feedcast/", env!("CARGO_PKG_VERSION"));

/// Timeout for individual reader requests.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the read-it-later service API.
pub struct ReaderClient {
    base_url: String,
    token: String,
    client: Client,
}

impl ReaderClient {
    /// Create a new client against `base_url`, authenticating with `token`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        // Validate early so a config typo fails before the first request.
        Url::parse(base_url).map_err(|e| {
            FeedcastError::config(format!("invalid reader base URL '{base_url}': {e}"))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FeedcastError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Fetch every document updated after `updated_after` in `location`,
    /// following the page cursor until the provider reports none.
    ///
    /// Records are returned as raw JSON values; shape validation happens
    /// downstream so one odd record cannot abort the fetch.
    #[instrument(skip_all, fields(location = %location))]
    pub async fn list_documents(
        &self,
        updated_after: DateTime<Utc>,
        location: &str,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/list/", self.base_url);
        let mut results: Vec<Value> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(header::AUTHORIZATION, self.auth_header())
                .query(&[
                    ("updatedAfter", updated_after.to_rfc3339().as_str()),
                    ("location", location),
                ]);

            if let Some(ref c) = cursor {
                request = request.query(&[("pageCursor", c.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| FeedcastError::Network(format!("{url}: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FeedcastError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: ListPage = response
                .json()
                .await
                .map_err(|e| FeedcastError::parse(format!("{url}: {e}")))?;

            pages += 1;
            debug!(page = pages, records = page.results.len(), "list page fetched");
            results.extend(page.results);

            match page.next_page_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(pages, records = results.len(), "document list complete");
        Ok(results)
    }

    /// POST a composed document to the save endpoint.
    ///
    /// The service signals success with HTTP 201; anything else is an
    /// [`FeedcastError::Api`] carrying the status and raw body. On success
    /// the raw response body is returned for the caller to surface.
    #[instrument(skip_all, fields(title = %request.title))]
    pub async fn save_document(&self, request: &SaveRequest) -> Result<String> {
        let url = format!("{}/save/", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.auth_header())
            .json(request)
            .send()
            .await
            .map_err(|e| FeedcastError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status != StatusCode::CREATED {
            return Err(FeedcastError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!("document saved");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{
        body_partial_json, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn updated_after() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 4, 6, 0, 0).unwrap()
    }

    fn client_for(server: &MockServer) -> ReaderClient {
        ReaderClient::new(&server.uri(), "test-token").unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = ReaderClient::new("not a url", "t");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn pager_follows_cursor_until_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/list/"))
            .and(query_param_is_missing("pageCursor"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "title": "a" }, { "title": "b" }],
                "nextPageCursor": "c2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/list/"))
            .and(query_param("pageCursor", "c2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "title": "c" }],
                "nextPageCursor": "c3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/list/"))
            .and(query_param("pageCursor", "c3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "title": "d" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let docs = client.list_documents(updated_after(), "feed").await.unwrap();

        // All three pages' results, in order: 2 non-terminal pages → 3 requests.
        let titles: Vec<&str> = docs.iter().map(|d| d["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_sends_token_and_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/list/"))
            .and(header("Authorization", "Token test-token"))
            .and(query_param("location", "feed"))
            .and(query_param("updatedAfter", updated_after().to_rfc3339()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "results": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let docs = client.list_documents(updated_after(), "feed").await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn list_error_status_aborts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/list/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .list_documents(updated_after(), "feed")
            .await
            .unwrap_err();

        match err {
            FeedcastError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_succeeds_on_created() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/save/"))
            .and(header("Authorization", "Token test-token"))
            .and(body_partial_json(json!({
                "tags": ["Summary"],
                "location": "feed"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "id": 99, "url": "https://example" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body = client.save_document(&sample_request()).await.unwrap();
        assert!(body.contains("99"));
    }

    #[tokio::test]
    async fn save_surfaces_status_and_body_on_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/save/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"detail":"bad html"}"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.save_document(&sample_request()).await.unwrap_err();

        match err {
            FeedcastError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("bad html"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    fn sample_request() -> SaveRequest {
        SaveRequest {
            url: "https://example.com/podcast2026-08-05T06:00:00Z".into(),
            title: "Feed summary on 2026.08.05".into(),
            should_clean_html: true,
            html: "<html><body><h1>INTRODUCTION</h1></body></html>".into(),
            tags: vec!["Summary".into()],
            published_date: updated_after(),
            location: "feed".into(),
            category: "article".into(),
        }
    }
}
