//! GitHub REST API client

use crate::adapters::http::{build_http_client, join_url, status_error, GITHUB_ACCEPT};
use crate::domain::model::{RepositoryDetails, RepositoryPath, RepositorySummary};
use crate::domain::ports::{
    ConfigProvider, ContentFetcher, RepositoryDetailsSource, RepositoryEnumerator,
};
use crate::utils::error::{AnalyzerError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Contents API item; only the name is consumed.
#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    full_name: String,
    description: Option<String>,
    html_url: String,
    language: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    commit: CommitData,
}

#[derive(Debug, Deserialize)]
struct CommitData {
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    per_page: usize,
    max_pages: usize,
}

impl GitHubClient {
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            per_page: 100,
            max_pages: 1,
        }
    }

    pub fn with_pagination(mut self, per_page: usize, max_pages: usize) -> Self {
        self.per_page = per_page.clamp(1, 100);
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self::new(build_http_client(config)?, config.github_api_base())
            .with_pagination(config.per_page(), config.max_pages()))
    }

    fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = join_url(&self.api_base, path);
        tracing::debug!("Making GitHub API request to: {}", url);

        let request = self.client.get(url).header(header::ACCEPT, GITHUB_ACCEPT);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn latest_commit_date(
        &self,
        path: &RepositoryPath,
        token: Option<&str>,
    ) -> Result<Option<DateTime<Utc>>> {
        let response = self
            .get(&format!("repos/{}/commits", path.full_name()), token)
            .query(&[("per_page", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(&response));
        }

        let commits: Vec<CommitItem> = serde_json::from_str(&response.text().await?)?;
        Ok(commits
            .into_iter()
            .next()
            .and_then(|c| c.commit.author)
            .and_then(|a| a.date))
    }
}

#[async_trait]
impl RepositoryEnumerator for GitHubClient {
    async fn list_repositories(
        &self,
        username: &str,
        token: &str,
    ) -> Result<Vec<RepositorySummary>> {
        let mut repositories = Vec::new();
        let per_page = self.per_page.to_string();

        for page in 1..=self.max_pages {
            let mut query = vec![("sort", "updated".to_string()), ("per_page", per_page.clone())];
            if page > 1 {
                query.push(("page", page.to_string()));
            }

            let response = self
                .get(&format!("users/{}/repos", username), Some(token))
                .query(&query)
                .send()
                .await?;

            tracing::debug!("Repository listing page {} status: {}", page, response.status());

            if response.status() == StatusCode::NOT_FOUND {
                return Err(AnalyzerError::UserNotFoundError {
                    username: username.to_string(),
                });
            }
            if !response.status().is_success() {
                return Err(status_error(&response));
            }

            let items: Vec<RepositorySummary> = serde_json::from_str(&response.text().await?)?;
            let fetched = items.len();
            repositories.extend(items);

            if fetched < self.per_page {
                break;
            }
            if page == self.max_pages {
                tracing::warn!(
                    "⚠️ Repository listing for {} stopped after {} page(s); {} repositories analyzed, more may exist",
                    username,
                    self.max_pages,
                    repositories.len()
                );
            }
        }

        Ok(repositories)
    }
}

#[async_trait]
impl ContentFetcher for GitHubClient {
    async fn list_root_entries(&self, owner: &str, repo: &str, token: &str) -> Result<Vec<String>> {
        let response = self
            .get(&format!("repos/{}/{}/contents", owner, repo), Some(token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(&response));
        }

        let items: Vec<ContentItem> = serde_json::from_str(&response.text().await?)?;
        Ok(items.into_iter().map(|i| i.name.to_lowercase()).collect())
    }
}

#[async_trait]
impl RepositoryDetailsSource for GitHubClient {
    async fn fetch_details(
        &self,
        path: &RepositoryPath,
        token: Option<&str>,
    ) -> Result<RepositoryDetails> {
        tracing::info!("Fetching repository details for {}", path.full_name());

        let response = self
            .get(&format!("repos/{}", path.full_name()), token)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("Repository lookup returned {}", response.status());
            return Err(AnalyzerError::RepositoryNotFoundError {
                path: path.full_name(),
            });
        }

        let repo: RepositoryResponse = serde_json::from_str(&response.text().await?)?;

        // 最後一次 commit 時間只是補充資訊，失敗時不影響結果
        let last_commit_at = match self.latest_commit_date(path, token).await {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!("Could not fetch last commit for {}: {}", path.full_name(), e);
                None
            }
        };

        Ok(RepositoryDetails {
            full_name: repo.full_name,
            description: repo.description,
            html_url: repo.html_url,
            language: repo.language,
            created_at: repo.created_at,
            last_commit_at,
        })
    }
}
