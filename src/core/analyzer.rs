use crate::core::{ContentFetcher, RepositoryEnumerator, TokenProvider};
use crate::domain::model::{
    AnalysisAggregate, AnalysisReport, InspectionOutcome, PracticeSignals, RepositorySummary,
};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::validate_username;
use std::time::Instant;

/// GitHub 個人檔案分析管道：取得 token → 列出儲存庫 → 逐一檢查 → 彙總報告
pub struct ProfileAnalyzer<T: TokenProvider, E: RepositoryEnumerator, F: ContentFetcher> {
    tokens: T,
    enumerator: E,
    contents: F,
}

impl<T: TokenProvider, E: RepositoryEnumerator, F: ContentFetcher> ProfileAnalyzer<T, E, F> {
    pub fn new(tokens: T, enumerator: E, contents: F) -> Self {
        Self {
            tokens,
            enumerator,
            contents,
        }
    }

    pub async fn analyze(&self, username: &str) -> Result<AnalysisReport> {
        let username = validate_username(username)?;
        let started = Instant::now();
        tracing::info!("🔍 Analyzing GitHub profile: {}", username);

        let token = self
            .tokens
            .resolve_token()
            .await
            .map_err(authentication_failure)?;
        tracing::debug!("GitHub token resolved");

        let repositories = self
            .enumerator
            .list_repositories(&username, &token)
            .await
            .map_err(|e| enumeration_failure(&username, e))?;
        let total = repositories.len();
        tracing::info!("📂 {}: Found {} repositories", username, total);

        // 依序處理，每個儲存庫的請求完成後才處理下一個
        let mut aggregate = AnalysisAggregate::new();
        let mut skipped = 0usize;
        for (index, repo) in repositories.into_iter().enumerate() {
            aggregate.record_repository(&repo);

            tracing::debug!("Inspecting {}/{}: {}", index + 1, total, repo.name);
            let outcome = self.inspect(&username, &repo, &token).await;
            if matches!(outcome, InspectionOutcome::Skipped { .. }) {
                skipped += 1;
            }
            aggregate.record_inspection(&outcome);
        }

        let report = aggregate.into_report(&username);
        tracing::info!(
            "✅ {}: Analysis finished in {:?} ({} repositories, {} technologies, {} inspections skipped)",
            username,
            started.elapsed(),
            report.projects.total,
            report.technologies.len(),
            skipped
        );
        Ok(report)
    }

    /// Never fails: listing errors degrade to [`InspectionOutcome::Skipped`].
    pub async fn inspect(
        &self,
        owner: &str,
        repo: &RepositorySummary,
        token: &str,
    ) -> InspectionOutcome {
        match self.contents.list_root_entries(owner, &repo.name, token).await {
            Ok(entries) => InspectionOutcome::Inspected(PracticeSignals::from_entries(&entries)),
            Err(e) => {
                tracing::warn!(
                    "⚠️ Skipping practice checks for {}/{}: {}",
                    owner,
                    repo.name,
                    e
                );
                InspectionOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn authentication_failure(err: AnalyzerError) -> AnalyzerError {
    match err {
        e @ AnalyzerError::AuthenticationError { .. } => e,
        other => AnalyzerError::AuthenticationError {
            message: other.to_string(),
        },
    }
}

fn enumeration_failure(username: &str, err: AnalyzerError) -> AnalyzerError {
    match err {
        e @ (AnalyzerError::UserNotFoundError { .. } | AnalyzerError::RateLimitError { .. }) => e,
        other => AnalyzerError::EnumerationError {
            username: username.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockTokens {
        fail: bool,
    }

    #[async_trait]
    impl TokenProvider for MockTokens {
        async fn resolve_token(&self) -> Result<String> {
            if self.fail {
                Err(AnalyzerError::HttpStatusError {
                    status: 500,
                    url: "http://backend/api/github-token".to_string(),
                })
            } else {
                Ok("token".to_string())
            }
        }
    }

    #[derive(Clone)]
    struct MockGitHub {
        repos: Option<Vec<RepositorySummary>>,
        contents: HashMap<String, Vec<String>>,
        listing_calls: Arc<AtomicUsize>,
    }

    impl MockGitHub {
        fn new(repos: Vec<RepositorySummary>) -> Self {
            Self {
                repos: Some(repos),
                contents: HashMap::new(),
                listing_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                repos: None,
                contents: HashMap::new(),
                listing_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_contents(mut self, repo: &str, entries: &[&str]) -> Self {
            self.contents.insert(
                repo.to_string(),
                entries.iter().map(|e| e.to_string()).collect(),
            );
            self
        }
    }

    #[async_trait]
    impl RepositoryEnumerator for MockGitHub {
        async fn list_repositories(
            &self,
            _username: &str,
            _token: &str,
        ) -> Result<Vec<RepositorySummary>> {
            self.repos
                .clone()
                .ok_or_else(|| AnalyzerError::HttpStatusError {
                    status: 502,
                    url: "users/x/repos".to_string(),
                })
        }
    }

    #[async_trait]
    impl ContentFetcher for MockGitHub {
        async fn list_root_entries(
            &self,
            _owner: &str,
            repo: &str,
            _token: &str,
        ) -> Result<Vec<String>> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            self.contents
                .get(repo)
                .cloned()
                .ok_or_else(|| AnalyzerError::HttpStatusError {
                    status: 500,
                    url: format!("repos/x/{}/contents", repo),
                })
        }
    }

    fn repo(id: u64, name: &str, fork: bool, language: Option<&str>, has_issues: bool) -> RepositorySummary {
        RepositorySummary {
            id,
            name: name.to_string(),
            language: language.map(str::to_string),
            fork,
            has_issues,
        }
    }

    #[tokio::test]
    async fn test_reference_example() {
        let github = MockGitHub::new(vec![
            repo(1, "server", false, Some("Go"), true),
            repo(2, "fork", true, Some("Go"), false),
        ])
        .with_contents("server", &["readme.md", "main.go"])
        .with_contents("fork", &["test_util.go"]);

        let analyzer = ProfileAnalyzer::new(MockTokens { fail: false }, github.clone(), github);
        let report = analyzer.analyze("gopher").await.unwrap();

        assert_eq!(report.username, "gopher");
        assert_eq!(report.projects.total, 2);
        assert_eq!(report.projects.personal, 1);
        assert_eq!(report.projects.forked, 1);
        assert_eq!(report.technologies, vec!["Go"]);
        assert_eq!(report.practices.has_readme, 1);
        assert_eq!(report.practices.has_tests, 1);
        assert_eq!(report.practices.has_issues, 1);
    }

    #[tokio::test]
    async fn test_single_inspection_failure_degrades_gracefully() {
        // "broken" 沒有內容清單，模擬網路錯誤
        let github = MockGitHub::new(vec![
            repo(1, "a", false, Some("Rust"), true),
            repo(2, "broken", false, Some("C"), true),
            repo(3, "c", true, None, false),
        ])
        .with_contents("a", &["readme.md", "tests"])
        .with_contents("c", &["readme.md"]);

        let calls = github.listing_calls.clone();
        let analyzer = ProfileAnalyzer::new(MockTokens { fail: false }, github.clone(), github);
        let report = analyzer.analyze("someone").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.projects.total, 3);
        assert_eq!(report.practices.has_readme, 2);
        assert_eq!(report.practices.has_tests, 1);
        assert_eq!(report.practices.has_issues, 2);
        assert_eq!(report.technologies, vec!["Rust", "C"]);
    }

    #[tokio::test]
    async fn test_token_failure_is_fatal_before_any_inspection() {
        let github = MockGitHub::new(vec![repo(1, "a", false, None, false)]);
        let calls = github.listing_calls.clone();
        let analyzer = ProfileAnalyzer::new(MockTokens { fail: true }, github.clone(), github);

        let result = analyzer.analyze("someone").await;

        assert!(matches!(result, Err(AnalyzerError::AuthenticationError { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_fatal() {
        let github = MockGitHub::failing();
        let analyzer = ProfileAnalyzer::new(MockTokens { fail: false }, github.clone(), github);

        let result = analyzer.analyze("someone").await;

        assert!(matches!(
            result,
            Err(AnalyzerError::EnumerationError { username, .. }) if username == "someone"
        ));
    }

    #[tokio::test]
    async fn test_invalid_username_rejected_before_any_request() {
        let github = MockGitHub::new(vec![]);
        let analyzer = ProfileAnalyzer::new(MockTokens { fail: true }, github.clone(), github);

        assert!(matches!(
            analyzer.analyze("   ").await,
            Err(AnalyzerError::InvalidUsernameError { .. })
        ));
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let github = MockGitHub::new(vec![
            repo(1, "a", false, Some("Rust"), true),
            repo(2, "b", true, Some("Python"), false),
            repo(3, "c", false, Some("Rust"), true),
        ])
        .with_contents("a", &["readme.md"])
        .with_contents("b", &["test"])
        .with_contents("c", &[]);

        let analyzer = ProfileAnalyzer::new(MockTokens { fail: false }, github.clone(), github);
        let first = analyzer.analyze("someone").await.unwrap();
        let second = analyzer.analyze("someone").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.technologies, vec!["Rust", "Python"]);
    }

    #[tokio::test]
    async fn test_counter_invariants_hold_for_mixed_inputs() {
        let mut repos = Vec::new();
        let languages = [Some("Go"), None, Some(""), Some("Go"), Some("Rust"), Some("  ")];
        for i in 0..30u64 {
            repos.push(repo(
                i,
                &format!("r{}", i),
                i % 3 == 0,
                languages[(i as usize) % languages.len()],
                i % 2 == 0,
            ));
        }
        let mut github = MockGitHub::new(repos);
        for i in 0..30u64 {
            if i % 4 != 0 {
                github = github.with_contents(&format!("r{}", i), &["readme.md", "test"]);
            }
        }

        let analyzer = ProfileAnalyzer::new(MockTokens { fail: false }, github.clone(), github);
        let report = analyzer.analyze("someone").await.unwrap();

        let p = report.projects;
        assert_eq!(p.total, 30);
        assert_eq!(p.personal + p.forked, p.total);
        assert!(report.practices.has_readme <= p.total);
        assert!(report.practices.has_tests <= p.total);
        assert!(report.practices.has_issues <= p.total);
        assert_eq!(report.technologies, vec!["Go", "Rust"]);
    }
}
