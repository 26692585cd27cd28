use crate::core::RepositoryDetailsSource;
use crate::domain::model::{RepositoryDetails, RepositoryPath};
use crate::utils::error::{AnalyzerError, Result};
use url::Url;

const GITHUB_PREFIX: &str = "https://github.com/";

/// 解析 `https://github.com/{owner}/{repo}` 形式的網址
pub fn parse_repository_url(raw: &str) -> Result<RepositoryPath> {
    let raw = raw.trim();
    let invalid = || AnalyzerError::InvalidRepositoryUrlError {
        url: raw.to_string(),
    };

    if !raw.starts_with(GITHUB_PREFIX) {
        return Err(invalid());
    }

    let url = Url::parse(raw).map_err(|_| invalid())?;
    let mut segments = url
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|s| !s.is_empty());

    let owner = segments.next().ok_or_else(invalid)?;
    let name = segments.next().ok_or_else(invalid)?;
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() {
        return Err(invalid());
    }

    Ok(RepositoryPath {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Looks up repository metadata used to prefill a project record.
pub struct RepositoryDetailsFetcher<S: RepositoryDetailsSource> {
    source: S,
    token: Option<String>,
}

impl<S: RepositoryDetailsSource> RepositoryDetailsFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn fetch(&self, repo_url: &str) -> Result<RepositoryDetails> {
        let path = parse_repository_url(repo_url)?;
        self.source.fetch_details(&path, self.token.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_parse_repository_url() {
        let path = parse_repository_url("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(path.owner, "rust-lang");
        assert_eq!(path.name, "cargo");

        let path = parse_repository_url(" https://github.com/octocat/hello.git/ ").unwrap();
        assert_eq!(path.full_name(), "octocat/hello");

        let path = parse_repository_url("https://github.com/octocat/hello/tree/main").unwrap();
        assert_eq!(path.full_name(), "octocat/hello");
    }

    #[test]
    fn test_parse_repository_url_rejects_other_hosts() {
        for url in [
            "http://github.com/octocat/hello",
            "https://gitlab.com/octocat/hello",
            "github.com/octocat/hello",
            "https://github.com/octocat",
            "https://github.com/",
            "",
        ] {
            assert!(
                matches!(
                    parse_repository_url(url),
                    Err(AnalyzerError::InvalidRepositoryUrlError { .. })
                ),
                "expected {} to be rejected",
                url
            );
        }
    }

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RepositoryDetailsSource for CountingSource {
        async fn fetch_details(
            &self,
            path: &RepositoryPath,
            token: Option<&str>,
        ) -> Result<RepositoryDetails> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RepositoryDetails {
                full_name: path.full_name(),
                description: token.map(str::to_string),
                html_url: format!("{}{}", GITHUB_PREFIX, path.full_name()),
                language: None,
                created_at: None,
                last_commit_at: None,
            })
        }
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_request() {
        let source = CountingSource::default();
        let fetcher = RepositoryDetailsFetcher::new(source.clone());

        assert!(fetcher.fetch("https://example.com/a/b").await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_token_is_forwarded() {
        let source = CountingSource::default();
        let fetcher = RepositoryDetailsFetcher::new(source.clone()).with_token("tok");

        let details = fetcher.fetch("https://github.com/octocat/hello").await.unwrap();
        assert_eq!(details.full_name, "octocat/hello");
        assert_eq!(details.description.as_deref(), Some("tok"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
