use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::issues::{Issue, SearchResponse};
use crate::utils::constants::SEARCH_FIELDS;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("request to JIRA failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JIRA responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Issues returned by one search, plus the size of the full result set.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub issues: Vec<Issue>,
    pub total: u32,
}

/// The slice of an issue tracker a report needs.
pub trait IssueTracker {
    type Session;

    async fn authenticate(
        &self,
        server: &str,
        username: &str,
        api_token: &str,
    ) -> Result<Self::Session, TrackerError>;

    async fn search(
        &self,
        session: &Self::Session,
        jql: &str,
        start_at: u32,
        max_results: u32,
    ) -> Result<SearchPage, TrackerError>;
}

/// Credentials that passed `/myself`, reused for every following call.
pub struct Session {
    base_url: String,
    username: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct Myself {
    #[serde(rename = "displayName", default)]
    display_name: String,
}

pub struct JiraClient {
    client: Client,
}

impl JiraClient {
    pub fn new() -> Result<Self, TrackerError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl IssueTracker for JiraClient {
    type Session = Session;

    async fn authenticate(
        &self,
        server: &str,
        username: &str,
        api_token: &str,
    ) -> Result<Session, TrackerError> {
        let base_url = server.trim_end_matches('/').to_string();
        let url = format!("{}/rest/api/2/myself", base_url);

        let response = self
            .client
            .get(url)
            .basic_auth(username, Some(api_token))
            .send()
            .await?;
        let myself = ensure_success(response).await?.json::<Myself>().await?;

        info!(server = %base_url, user = %myself.display_name, "logged in to JIRA");
        Ok(Session {
            base_url,
            username: username.to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// Follows JIRA's server-side page size until `max_results` issues are
    /// collected or the result set runs out.
    async fn search(
        &self,
        session: &Session,
        jql: &str,
        start_at: u32,
        max_results: u32,
    ) -> Result<SearchPage, TrackerError> {
        let url = format!("{}/rest/api/2/search", session.base_url);
        let wanted = max_results as usize;
        let mut issues: Vec<Issue> = Vec::new();
        let mut next = start_at;
        let mut total = 0;

        while issues.len() < wanted {
            let remaining = (wanted - issues.len()).to_string();
            let offset = next.to_string();
            let response = self
                .client
                .get(&url)
                .basic_auth(&session.username, Some(&session.api_token))
                .query(&[
                    ("jql", jql),
                    ("startAt", offset.as_str()),
                    ("maxResults", remaining.as_str()),
                    ("fields", SEARCH_FIELDS),
                ])
                .send()
                .await?;
            let page = ensure_success(response).await?.json::<SearchResponse>().await?;

            let received = page.issues.len() as u32;
            debug!(start_at = page.start_at, received, total = page.total, "fetched search page");
            total = page.total;
            issues.extend(page.issues);
            next += received;

            if received == 0 || next >= total {
                break;
            }
        }

        issues.truncate(wanted);
        Ok(SearchPage { issues, total })
    }
}

async fn ensure_success(response: Response) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TrackerError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{basic_auth, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(server: &MockServer) -> Session {
        Session {
            base_url: server.uri(),
            username: "dana@example.com".into(),
            api_token: "secret".into(),
        }
    }

    fn issue_json(key: &str) -> Value {
        json!({
            "key": key,
            "fields": {
                "project": { "key": "PRJ" },
                "issuetype": { "name": "Story" },
                "summary": format!("Summary of {key}")
            }
        })
    }

    #[tokio::test]
    async fn authenticate_uses_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/myself"))
            .and(basic_auth("dana@example.com", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accountId": "abc",
                "displayName": "Dana Smith"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = JiraClient::new().unwrap();
        let server_url = format!("{}/", server.uri());
        let session = client
            .authenticate(&server_url, "dana@example.com", "secret")
            .await
            .unwrap();

        assert_eq!(session.base_url, server.uri());
        assert_eq!(session.username, "dana@example.com");
    }

    #[tokio::test]
    async fn authenticate_rejects_bad_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/myself"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client = JiraClient::new().unwrap();
        let err = client
            .authenticate(&server.uri(), "dana@example.com", "wrong")
            .await
            .err()
            .unwrap();

        match err {
            TrackerError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn search_follows_pages_until_total() {
        let server = MockServer::start().await;
        let jql = "project = PRJ AND sprint = 1 AND type in (story,bug,task)";
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", jql))
            .and(query_param("startAt", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": 0,
                "maxResults": 2,
                "total": 3,
                "issues": [issue_json("PRJ-1"), issue_json("PRJ-2")]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("startAt", "2"))
            .and(query_param("maxResults", "1998"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": 2,
                "maxResults": 2,
                "total": 3,
                "issues": [issue_json("PRJ-3")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = JiraClient::new().unwrap();
        let page = client.search(&session(&server), jql, 0, 2000).await.unwrap();

        let keys: Vec<_> = page.issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PRJ-1", "PRJ-2", "PRJ-3"]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn search_stops_at_max_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("maxResults", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": 0,
                "maxResults": 2,
                "total": 10,
                "issues": [issue_json("PRJ-1"), issue_json("PRJ-2")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = JiraClient::new().unwrap();
        let page = client
            .search(&session(&server), "project = PRJ", 0, 2)
            .await
            .unwrap();

        assert_eq!(page.issues.len(), 2);
        assert_eq!(page.total, 10);
    }

    #[tokio::test]
    async fn search_surfaces_rejected_jql() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorMessages": ["Error in the JQL Query"],
                "errors": {}
            })))
            .mount(&server)
            .await;

        let client = JiraClient::new().unwrap();
        let err = client
            .search(&session(&server), "project = ", 0, 2000)
            .await
            .err()
            .unwrap();

        match err {
            TrackerError::Status { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert!(body.contains("Error in the JQL Query"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn search_handles_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": 0,
                "maxResults": 50,
                "total": 0,
                "issues": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = JiraClient::new().unwrap();
        let page = client
            .search(&session(&server), "project = PRJ", 0, 2000)
            .await
            .unwrap();

        assert!(page.issues.is_empty());
        assert_eq!(page.total, 0);
    }
}
