//! Source download from hosted GitHub repositories
//!
//! Architecture: Gateway - the only module that talks to the network
//! - Walks the repository contents API breadth-first from the root
//! - Hands back `SourceText` values; extraction and evaluation stay in `analyzer`
//! - Which paths are worth downloading is decided by the caller's selector

use crate::domain::identifiers::SourceText;
use crate::domain::violations::{NamingError, NamingResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// A repository on github.com, optionally pinned to a branch, tag or commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub reference: Option<String>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: owner.into(), name: name.into(), reference: None }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)?;
        if let Some(reference) = &self.reference {
            write!(f, "@{reference}")?;
        }
        Ok(())
    }
}

impl FromStr for RepoRef {
    type Err = NamingError;

    /// Accepts `https://github.com/owner/repo`, with or without scheme, `.git`
    /// suffix or a `/tree/<ref>` tail
    fn from_str(link: &str) -> Result<Self, Self::Err> {
        let invalid =
            || NamingError::invalid_input(format!("'{link}' is not a GitHub repository link"));

        let (_, rest) = link.trim().split_once("github.com/").ok_or_else(invalid)?;
        let mut segments = rest.split('/').filter(|segment| !segment.is_empty());

        let owner = segments.next().ok_or_else(invalid)?;
        let name = segments.next().map(|name| name.trim_end_matches(".git")).ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }

        let mut repo = Self::new(owner, name);
        if segments.next() == Some("tree") {
            let reference: Vec<&str> = segments.collect();
            if !reference.is_empty() {
                repo = repo.with_reference(reference.join("/"));
            }
        }

        Ok(repo)
    }
}

/// Connection settings for the contents API
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API root, e.g. `https://api.github.com` or a GitHub Enterprise `/api/v3` URL
    pub api_url: String,
    /// Sent as a bearer token; anonymous requests are rate limited harder
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self { api_url: DEFAULT_API_URL.to_string(), token: None, timeout: Duration::from_secs(30) }
    }
}

impl GithubConfig {
    /// Defaults overridden by `GITHUB_API_URL` and `GITHUB_TOKEN`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(api_url) = std::env::var("GITHUB_API_URL").ok().filter(|v| !v.is_empty()) {
            config.api_url = api_url;
        }
        config.token = std::env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty());
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One row of a directory listing
#[derive(Debug, Clone, Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    kind: EntryKind,
    download_url: Option<String>,
}

/// Reads repository files through the GitHub contents API
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: Client,
    api_url: Url,
}

impl GithubSource {
    pub fn new(config: GithubConfig) -> NamingResult<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| {
            NamingError::config(format!("Invalid API URL '{}': {e}", config.api_url))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| NamingError::config("GitHub token contains invalid characters"))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("identifier-lint/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| NamingError::remote(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_url })
    }

    /// Download every selected file, in breadth-first listing order
    ///
    /// `select` sees repository-relative paths and whether each is a directory;
    /// rejected directories are never listed. Stops after `limit` files.
    pub async fn fetch_sources<F>(
        &self,
        repo: &RepoRef,
        select: F,
        limit: Option<usize>,
    ) -> NamingResult<Vec<SourceText>>
    where
        F: Fn(&Path, bool) -> bool,
    {
        let limit = limit.unwrap_or(usize::MAX);
        let mut queue: VecDeque<ContentEntry> = self.list_directory(repo, "").await?.into();
        let mut sources = Vec::new();

        while let Some(entry) = queue.pop_front() {
            if sources.len() >= limit {
                break;
            }

            match entry.kind {
                EntryKind::Dir if select(Path::new(&entry.path), true) => {
                    queue.extend(self.list_directory(repo, &entry.path).await?);
                }
                EntryKind::File if select(Path::new(&entry.path), false) => {
                    let Some(download_url) = &entry.download_url else {
                        tracing::warn!("No download URL for {}, skipping", entry.path);
                        continue;
                    };
                    let content = self.download(download_url).await?;
                    sources.push(SourceText::new(entry.path, content));
                }
                _ => tracing::trace!("Skipping {}", entry.path),
            }
        }

        tracing::info!("Fetched {} source files from {}", sources.len(), repo);
        Ok(sources)
    }

    async fn list_directory(&self, repo: &RepoRef, dir: &str) -> NamingResult<Vec<ContentEntry>> {
        let url = self.contents_url(repo, dir)?;
        tracing::debug!("Listing {}", url);
        self.get_json(url).await
    }

    fn contents_url(&self, repo: &RepoRef, dir: &str) -> NamingResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                NamingError::config(format!("API URL '{}' cannot take a path", self.api_url))
            })?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "contents"])
            .extend(dir.split('/').filter(|segment| !segment.is_empty()));

        if let Some(reference) = &repo.reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> NamingResult<T> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| NamingError::remote(format!("GET {url} failed: {e}")))?;

        check_status(&url, response.status())?;
        response
            .json()
            .await
            .map_err(|e| NamingError::remote(format!("Unexpected response from {url}: {e}")))
    }

    async fn download(&self, download_url: &str) -> NamingResult<String> {
        let url = Url::parse(download_url).map_err(|e| {
            NamingError::remote(format!("Invalid download URL '{download_url}': {e}"))
        })?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| NamingError::remote(format!("GET {url} failed: {e}")))?;

        check_status(&url, response.status())?;
        response
            .text()
            .await
            .map_err(|e| NamingError::remote(format!("Failed to read {url}: {e}")))
    }
}

fn check_status(url: &Url, status: StatusCode) -> NamingResult<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => {
            Err(NamingError::remote(format!("{url} not found (private repository or wrong ref?)")))
        }
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(NamingError::remote(format!(
            "{url} refused with {status}; set GITHUB_TOKEN to raise the rate limit"
        ))),
        _ => Err(NamingError::remote(format!("{url} returned {status}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[rstest]
    #[case("https://github.com/octo/demo", RepoRef::new("octo", "demo"))]
    #[case("github.com/octo/demo.git", RepoRef::new("octo", "demo"))]
    #[case("https://github.com/octo/demo/", RepoRef::new("octo", "demo"))]
    #[case(
        "https://github.com/octo/demo/tree/release/1.2",
        RepoRef::new("octo", "demo").with_reference("release/1.2")
    )]
    fn test_repo_links(#[case] link: &str, #[case] expected: RepoRef) {
        assert_eq!(link.parse::<RepoRef>().unwrap(), expected);
    }

    #[rstest]
    #[case("https://gitlab.com/octo/demo")]
    #[case("https://github.com/octo")]
    #[case("https://github.com/octo/.git")]
    fn test_rejected_repo_links(#[case] link: &str) {
        let err = link.parse::<RepoRef>().unwrap_err();
        assert!(matches!(err, NamingError::InvalidInput { .. }));
    }

    fn entry(server: &MockServer, path: &str, kind: &str) -> serde_json::Value {
        let download_url = (kind == "file").then(|| format!("{}/raw/{path}", server.uri()));
        json!({
            "name": path.rsplit('/').next().unwrap(),
            "path": path,
            "type": kind,
            "download_url": download_url,
        })
    }

    async fn mount_listing(server: &MockServer, route: &str, entries: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries))
            .mount(server)
            .await;
    }

    async fn mount_raw(server: &MockServer, file: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/raw/{file}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    async fn demo_repository() -> MockServer {
        let server = MockServer::start().await;

        let root = json!([
            entry(&server, "src", "dir"),
            entry(&server, "setup.py", "file"),
            entry(&server, "README.md", "file"),
            entry(&server, "vendor", "dir"),
        ]);
        mount_listing(&server, "/repos/octo/demo/contents", root).await;
        mount_listing(
            &server,
            "/repos/octo/demo/contents/src",
            json!([entry(&server, "src/app.py", "file"), entry(&server, "src/lib", "submodule")]),
        )
        .await;
        mount_raw(&server, "setup.py", "totalcount = 1\n").await;
        mount_raw(&server, "src/app.py", "userName = totalcount\n").await;

        server
    }

    fn source_for(server: &MockServer) -> GithubSource {
        GithubSource::new(GithubConfig { api_url: server.uri(), ..Default::default() }).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_selected_files_breadth_first() {
        let server = demo_repository().await;
        let source = source_for(&server);

        let select = |path: &Path, is_dir: bool| {
            if is_dir {
                path != Path::new("vendor")
            } else {
                path.extension().is_some_and(|ext| ext == "py")
            }
        };
        let sources =
            source.fetch_sources(&RepoRef::new("octo", "demo"), select, None).await.unwrap();

        assert_eq!(
            sources,
            vec![
                SourceText::new("setup.py", "totalcount = 1\n"),
                SourceText::new("src/app.py", "userName = totalcount\n"),
            ]
        );
    }

    #[tokio::test]
    async fn test_limit_stops_downloads() {
        let server = demo_repository().await;
        let source = source_for(&server);

        let sources = source
            .fetch_sources(
                &RepoRef::new("octo", "demo"),
                |path: &Path, is_dir: bool| is_dir || path.extension().is_some_and(|e| e == "py"),
                Some(1),
            )
            .await
            .unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].path, Path::new("setup.py"));
    }

    #[tokio::test]
    async fn test_reference_and_token_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents"))
            .and(query_param("ref", "v2"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let source = GithubSource::new(GithubConfig {
            api_url: server.uri(),
            token: Some("secret".to_string()),
            ..Default::default()
        })
        .unwrap();
        let repo = RepoRef::new("octo", "demo").with_reference("v2");

        let sources = source.fetch_sources(&repo, |_: &Path, _: bool| true, None).await.unwrap();
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_missing_repository_is_a_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source_for(&server)
            .fetch_sources(&RepoRef::new("octo", "gone"), |_: &Path, _: bool| true, None)
            .await
            .unwrap_err();

        assert!(matches!(err, NamingError::Remote { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_contents_url_keeps_enterprise_prefix() {
        let source = GithubSource::new(GithubConfig {
            api_url: "https://git.example.com/api/v3".to_string(),
            ..Default::default()
        })
        .unwrap();
        let repo = RepoRef::new("octo", "demo");

        assert_eq!(
            source.contents_url(&repo, "src/app").unwrap().as_str(),
            "https://git.example.com/api/v3/repos/octo/demo/contents/src/app"
        );
    }
}
