//! GitHub REST API client for the GitGauge CLI.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use gitgauge_core::{
    CommitInfo, Contributor, GaugeError, PullRequestInfo, PullRequestState, ReadmeProbe,
    ReleaseInfo, Result,
};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Public GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size requested from list endpoints.
const PER_PAGE: usize = 100;

/// Upper bound on pages fetched per list endpoint.
const MAX_PAGES: u32 = 3;

/// Repository metadata reduced to the signals scoring needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoMetadata {
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Watcher/subscriber count.
    pub watchers: u64,
    /// Whether the wiki is enabled.
    pub has_wiki: bool,
    /// Whether a non-empty homepage is configured.
    pub has_website: bool,
    /// Repository creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Repository description, when set.
    pub description: Option<String>,
    /// Whether a license is declared.
    pub has_license: bool,
}

/// Open and closed issue counts with pull requests filtered out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    /// Open issue count.
    pub open: u64,
    /// Closed issue count.
    pub closed: u64,
}

/// Data-source abstraction over the GitHub REST API.
///
/// Every method performs one independent fetch; failures abort the whole
/// analysis upstream, so none of these retries or degrades partially.
pub trait GithubApi {
    /// Fetch repository metadata.
    fn fetch_repository<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RepoMetadata>> + Send + 'a>>;

    /// Fetch open/closed issue counts (pull requests excluded).
    fn fetch_issues<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IssueCounts>> + Send + 'a>>;

    /// Fetch recent pull requests.
    fn fetch_pull_requests<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PullRequestInfo>>> + Send + 'a>>;

    /// Fetch contributors with contribution counts.
    fn fetch_contributors<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Contributor>>> + Send + 'a>>;

    /// Fetch recent commits.
    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CommitInfo>>> + Send + 'a>>;

    /// Fetch published releases.
    fn fetch_releases<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ReleaseInfo>>> + Send + 'a>>;

    /// Fetch language byte counts.
    fn fetch_languages<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<BTreeMap<String, u64>>> + Send + 'a>>;

    /// Probe the README; a missing README is a valid probe, not an error.
    fn fetch_readme<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ReadmeProbe>> + Send + 'a>>;
}

/// Reqwest-backed GitHub API client with an optional bearer token.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Build a client against the given API root with an optional token.
    pub fn with_base_url(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("gitgauge-cli")
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.as_deref() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header("Accept", "application/vnd.github+json");
        let response = self.authorize(request).send().await.map_err(transport_error)?;
        let response = interpret_status(response)?;
        response.json::<T>().await.map_err(transport_error)
    }

    async fn fetch_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let page_string = page.to_string();
            let per_page_string = PER_PAGE.to_string();
            let request = self
                .client
                .get(format!("{}{path}", self.base_url))
                .header("Accept", "application/vnd.github+json")
                .query(query)
                .query(&[
                    ("per_page", per_page_string.as_str()),
                    ("page", page_string.as_str()),
                ]);
            let response = self.authorize(request).send().await.map_err(transport_error)?;
            let response = interpret_status(response)?;
            let batch: Vec<T> = response.json().await.map_err(transport_error)?;
            let batch_len = batch.len();
            items.extend(batch);
            if batch_len < PER_PAGE {
                break;
            }
        }
        Ok(items)
    }

    async fn repository(&self, owner: &str, name: &str) -> Result<RepoMetadata> {
        let wire: RepoResponse = self.fetch_json(&format!("/repos/{owner}/{name}")).await?;
        Ok(RepoMetadata {
            stars: wire.stargazers_count,
            forks: wire.forks_count,
            watchers: wire.subscribers_count.unwrap_or(wire.watchers_count),
            has_wiki: wire.has_wiki,
            has_website: wire
                .homepage
                .as_deref()
                .map(|homepage| !homepage.trim().is_empty())
                .unwrap_or(false),
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            description: wire.description,
            has_license: wire.license.is_some(),
        })
    }

    async fn issues(&self, owner: &str, name: &str) -> Result<IssueCounts> {
        let wire: Vec<IssueResponse> = self
            .fetch_paged(&format!("/repos/{owner}/{name}/issues"), &[("state", "all")])
            .await?;
        let mut counts = IssueCounts::default();
        // The issues endpoint also lists pull requests; skip those.
        for issue in wire.into_iter().filter(|issue| issue.pull_request.is_none()) {
            if issue.state == "open" {
                counts.open += 1;
            } else {
                counts.closed += 1;
            }
        }
        Ok(counts)
    }

    async fn pull_requests(&self, owner: &str, name: &str) -> Result<Vec<PullRequestInfo>> {
        let wire: Vec<PullResponse> = self
            .fetch_paged(&format!("/repos/{owner}/{name}/pulls"), &[("state", "all")])
            .await?;
        Ok(wire
            .into_iter()
            .map(|pull| PullRequestInfo {
                state: if pull.state == "open" {
                    PullRequestState::Open
                } else {
                    PullRequestState::Closed
                },
                merged_at: pull.merged_at,
            })
            .collect())
    }

    async fn contributors(&self, owner: &str, name: &str) -> Result<Vec<Contributor>> {
        let wire: Vec<ContributorResponse> = self
            .fetch_paged(&format!("/repos/{owner}/{name}/contributors"), &[])
            .await?;
        Ok(wire
            .into_iter()
            .map(|contributor| Contributor {
                id: contributor.id,
                contributions: contributor.contributions,
            })
            .collect())
    }

    async fn commits(&self, owner: &str, name: &str) -> Result<Vec<CommitInfo>> {
        let wire: Vec<CommitResponse> = self
            .fetch_paged(&format!("/repos/{owner}/{name}/commits"), &[])
            .await?;
        Ok(wire
            .into_iter()
            .map(|commit| CommitInfo {
                author_date: commit.commit.author.and_then(|author| author.date),
            })
            .collect())
    }

    async fn releases(&self, owner: &str, name: &str) -> Result<Vec<ReleaseInfo>> {
        let wire: Vec<ReleaseResponse> = self
            .fetch_paged(&format!("/repos/{owner}/{name}/releases"), &[])
            .await?;
        Ok(wire
            .into_iter()
            .map(|release| ReleaseInfo {
                created_at: release.created_at,
            })
            .collect())
    }

    async fn languages(&self, owner: &str, name: &str) -> Result<BTreeMap<String, u64>> {
        self.fetch_json(&format!("/repos/{owner}/{name}/languages"))
            .await
    }

    async fn readme(&self, owner: &str, name: &str) -> Result<ReadmeProbe> {
        let request = self
            .client
            .get(format!("{}/repos/{owner}/{name}/readme", self.base_url))
            .header("Accept", "application/vnd.github.raw+json");
        let response = self.authorize(request).send().await.map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ReadmeProbe::default());
        }
        let response = interpret_status(response)?;
        let content = response.text().await.map_err(transport_error)?;
        Ok(ReadmeProbe {
            present: true,
            length: content.chars().count(),
        })
    }
}

impl GithubApi for GithubClient {
    fn fetch_repository<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RepoMetadata>> + Send + 'a>> {
        Box::pin(self.repository(owner, name))
    }

    fn fetch_issues<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IssueCounts>> + Send + 'a>> {
        Box::pin(self.issues(owner, name))
    }

    fn fetch_pull_requests<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PullRequestInfo>>> + Send + 'a>> {
        Box::pin(self.pull_requests(owner, name))
    }

    fn fetch_contributors<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Contributor>>> + Send + 'a>> {
        Box::pin(self.contributors(owner, name))
    }

    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CommitInfo>>> + Send + 'a>> {
        Box::pin(self.commits(owner, name))
    }

    fn fetch_releases<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ReleaseInfo>>> + Send + 'a>> {
        Box::pin(self.releases(owner, name))
    }

    fn fetch_languages<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<BTreeMap<String, u64>>> + Send + 'a>> {
        Box::pin(self.languages(owner, name))
    }

    fn fetch_readme<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ReadmeProbe>> + Send + 'a>> {
        Box::pin(self.readme(owner, name))
    }
}

/// Interpret a GitHub response status, mapping rate limiting explicitly.
fn interpret_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
        && rate_limit_exhausted(response.headers())
    {
        return Err(GaugeError::RateLimited {
            reset_minutes: reset_minutes(response.headers(), Utc::now()),
        });
    }
    let url = response.url().clone();
    Err(GaugeError::Upstream(format!(
        "GitHub API returned {status} for {url}"
    )))
}

fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == "0")
        .unwrap_or(false)
}

/// Approximate minutes until the rate limit resets, at least one.
fn reset_minutes(headers: &HeaderMap, now: DateTime<Utc>) -> u64 {
    let reset_epoch = headers
        .get("x-ratelimit-reset")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok());
    let Some(reset_epoch) = reset_epoch else {
        return 1;
    };
    let seconds = reset_epoch - now.timestamp();
    if seconds <= 0 {
        return 1;
    }
    (seconds as u64).div_ceil(60).max(1)
}

fn transport_error(error: reqwest::Error) -> GaugeError {
    GaugeError::Upstream(error.to_string())
}

/// Repository metadata wire format.
#[derive(Debug, Deserialize)]
struct RepoResponse {
    stargazers_count: u64,
    forks_count: u64,
    watchers_count: u64,
    subscribers_count: Option<u64>,
    has_wiki: bool,
    homepage: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    license: Option<LicenseResponse>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LicenseResponse {
    #[allow(dead_code)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    state: String,
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    state: String,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ContributorResponse {
    id: u64,
    contributions: u64,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    commit: CommitDetailResponse,
}

#[derive(Debug, Deserialize)]
struct CommitDetailResponse {
    author: Option<CommitAuthorResponse>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthorResponse {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::{GithubApi, GithubClient, reset_minutes};
    use chrono::{TimeZone, Utc};
    use gitgauge_core::GaugeError;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::json;

    fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::with_base_url(&server.base_url(), None).expect("client")
    }

    #[tokio::test]
    async fn repository_fetch_maps_metadata() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge");
                then.status(200).json_body(json!({
                    "stargazers_count": 1500,
                    "forks_count": 120,
                    "watchers_count": 1500,
                    "subscribers_count": 90,
                    "has_wiki": true,
                    "homepage": "https://gauge.example",
                    "created_at": "2022-01-01T00:00:00Z",
                    "updated_at": "2024-05-30T00:00:00Z",
                    "license": {"name": "MIT License"},
                    "description": "Repository quality gauge"
                }));
            })
            .await;

        let metadata = client_for(&server)
            .fetch_repository("octo", "gauge")
            .await
            .expect("metadata");
        assert_eq!(metadata.stars, 1500);
        assert_eq!(metadata.watchers, 90);
        assert!(metadata.has_website);
        assert!(metadata.has_license);
    }

    #[tokio::test]
    async fn blank_homepage_is_not_a_website() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge");
                then.status(200).json_body(json!({
                    "stargazers_count": 0,
                    "forks_count": 0,
                    "watchers_count": 0,
                    "subscribers_count": null,
                    "has_wiki": false,
                    "homepage": "",
                    "created_at": "2024-01-01T00:00:00Z",
                    "updated_at": "2024-01-02T00:00:00Z",
                    "license": null,
                    "description": null
                }));
            })
            .await;

        let metadata = client_for(&server)
            .fetch_repository("octo", "gauge")
            .await
            .expect("metadata");
        assert!(!metadata.has_website);
        assert!(!metadata.has_license);
        assert_eq!(metadata.watchers, 0);
    }

    #[tokio::test]
    async fn issues_exclude_pull_requests() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge/issues");
                then.status(200).json_body(json!([
                    {"state": "open"},
                    {"state": "closed"},
                    {"state": "closed"},
                    {"state": "open", "pull_request": {"url": "x"}}
                ]));
            })
            .await;

        let counts = client_for(&server)
            .fetch_issues("octo", "gauge")
            .await
            .expect("counts");
        assert_eq!(counts.open, 1);
        assert_eq!(counts.closed, 2);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_dedicated_error() {
        let server = MockServer::start_async().await;
        let reset = (Utc::now().timestamp() + 600).to_string();
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/repos/octo/gauge/contributors");
                then.status(403)
                    .header("x-ratelimit-remaining", "0")
                    .header("x-ratelimit-reset", reset.as_str())
                    .json_body(json!({"message": "API rate limit exceeded"}));
            })
            .await;

        let error = client_for(&server)
            .fetch_contributors("octo", "gauge")
            .await
            .expect_err("rate limited");
        match error {
            GaugeError::RateLimited { reset_minutes } => {
                assert!((1..=11).contains(&reset_minutes));
            }
            other => panic!("expected rate limit error, got {other}"),
        }
    }

    #[tokio::test]
    async fn plain_forbidden_is_an_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge/releases");
                then.status(403).json_body(json!({"message": "forbidden"}));
            })
            .await;

        let error = client_for(&server)
            .fetch_releases("octo", "gauge")
            .await
            .expect_err("forbidden");
        match error {
            GaugeError::Upstream(message) => assert!(message.contains("403")),
            other => panic!("expected upstream error, got {other}"),
        }
    }

    #[tokio::test]
    async fn missing_readme_is_an_absent_probe() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge/readme");
                then.status(404).json_body(json!({"message": "Not Found"}));
            })
            .await;

        let probe = client_for(&server)
            .fetch_readme("octo", "gauge")
            .await
            .expect("probe");
        assert!(!probe.present);
        assert_eq!(probe.length, 0);
    }

    #[tokio::test]
    async fn readme_length_counts_characters() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge/readme");
                then.status(200).body("# GitGauge\n\nA quality gauge.");
            })
            .await;

        let probe = client_for(&server)
            .fetch_readme("octo", "gauge")
            .await
            .expect("probe");
        assert!(probe.present);
        assert_eq!(probe.length, 28);
    }

    #[tokio::test]
    async fn languages_map_byte_counts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge/languages");
                then.status(200)
                    .json_body(json!({"Rust": 7500, "Shell": 2500}));
            })
            .await;

        let languages = client_for(&server)
            .fetch_languages("octo", "gauge")
            .await
            .expect("languages");
        assert_eq!(languages.get("Rust").copied(), Some(7500));
        assert_eq!(languages.get("Shell").copied(), Some(2500));
    }

    #[tokio::test]
    async fn commits_map_author_dates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/gauge/commits");
                then.status(200).json_body(json!([
                    {"commit": {"author": {"date": "2024-05-30T10:00:00Z"}}},
                    {"commit": {"author": null}}
                ]));
            })
            .await;

        let commits = client_for(&server)
            .fetch_commits("octo", "gauge")
            .await
            .expect("commits");
        assert_eq!(commits.len(), 2);
        assert!(commits[0].author_date.is_some());
        assert!(commits[1].author_date.is_none());
    }

    #[test]
    fn reset_minutes_rounds_up_and_floors_at_one() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("now");

        let mut headers = HeaderMap::new();
        let reset = (now.timestamp() + 90).to_string();
        headers.insert("x-ratelimit-reset", HeaderValue::from_str(&reset).expect("header"));
        assert_eq!(reset_minutes(&headers, now), 2);

        let mut stale = HeaderMap::new();
        let past = (now.timestamp() - 10).to_string();
        stale.insert("x-ratelimit-reset", HeaderValue::from_str(&past).expect("header"));
        assert_eq!(reset_minutes(&stale, now), 1);

        assert_eq!(reset_minutes(&HeaderMap::new(), now), 1);
    }
}
