use crate::adapters::http::{build_http_client, join_url};
use crate::config::toml_config::DEFAULT_TOKEN_PATH;
use crate::domain::ports::{ConfigProvider, TokenProvider};
use crate::utils::error::{AnalyzerError, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// 透過後端 session 取得 GitHub token
pub struct BackendTokenResolver {
    client: Client,
    api_base: String,
    token_path: String,
    session_cookie: Option<String>,
}

impl BackendTokenResolver {
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            session_cookie: None,
        }
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let api_base = config
            .backend_api_base()
            .ok_or_else(|| AnalyzerError::MissingConfigError {
                field: "backend.api_base".to_string(),
            })?;

        let mut resolver = Self::new(build_http_client(config)?, api_base)
            .with_token_path(config.token_path());
        if let Some(cookie) = config.session_cookie() {
            resolver = resolver.with_session_cookie(cookie);
        }
        Ok(resolver)
    }
}

#[async_trait]
impl TokenProvider for BackendTokenResolver {
    async fn resolve_token(&self) -> Result<String> {
        let url = join_url(&self.api_base, &self.token_path);
        tracing::debug!("Requesting GitHub token from backend: {}", url);

        let mut request = self.client.get(&url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Token endpoint response status: {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AnalyzerError::AuthenticationError {
                message: "session is not authenticated".to_string(),
            });
        }
        if !status.is_success() {
            return Err(AnalyzerError::AuthenticationError {
                message: format!("token endpoint returned HTTP {}", status.as_u16()),
            });
        }

        let body = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&body)?;

        match parsed.token {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(AnalyzerError::AuthenticationError {
                message: "token endpoint returned an empty token".to_string(),
            }),
        }
    }
}

/// 直接使用預先提供的 token（例如 GITHUB_TOKEN）
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn resolve_token(&self) -> Result<String> {
        if self.token.trim().is_empty() {
            return Err(AnalyzerError::AuthenticationError {
                message: "configured GitHub token is empty".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}

/// 依配置選擇 token 來源，有靜態 token 時優先使用
pub enum TokenSource {
    Static(StaticTokenProvider),
    Backend(BackendTokenResolver),
}

impl TokenSource {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        match config.github_token() {
            Some(token) => {
                tracing::debug!("Using configured GitHub token");
                Ok(TokenSource::Static(StaticTokenProvider::new(token)))
            }
            None => Ok(TokenSource::Backend(BackendTokenResolver::from_config(config)?)),
        }
    }
}

#[async_trait]
impl TokenProvider for TokenSource {
    async fn resolve_token(&self) -> Result<String> {
        match self {
            TokenSource::Static(provider) => provider.resolve_token().await,
            TokenSource::Backend(resolver) => resolver.resolve_token().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_backend_token_is_returned_with_session_cookie() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/github-token")
                .header("cookie", "SESSION=abc123");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"token": "gho_secret"}));
        });

        let resolver = BackendTokenResolver::new(Client::new(), server.base_url())
            .with_session_cookie("SESSION=abc123");

        let token = resolver.resolve_token().await.unwrap();

        token_mock.assert();
        assert_eq!(token, "gho_secret");
    }

    #[tokio::test]
    async fn test_unauthenticated_session_is_authentication_error() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(GET).path("/api/github-token");
            then.status(401);
        });

        let resolver = BackendTokenResolver::new(Client::new(), server.base_url());
        let result = resolver.resolve_token().await;

        token_mock.assert();
        assert!(matches!(
            result,
            Err(AnalyzerError::AuthenticationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/github-token");
            then.status(200).json_body(serde_json::json!({"token": ""}));
        });

        let resolver = BackendTokenResolver::new(Client::new(), server.base_url());
        assert!(matches!(
            resolver.resolve_token().await,
            Err(AnalyzerError::AuthenticationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_static_token_provider() {
        assert_eq!(
            StaticTokenProvider::new("ghp_x").resolve_token().await.unwrap(),
            "ghp_x"
        );
        assert!(StaticTokenProvider::new("  ").resolve_token().await.is_err());
    }

    #[test]
    fn test_token_source_prefers_static_token() {
        let mut config = crate::config::toml_config::AnalyzerConfig::default();
        config.github.token = Some("ghp_static".to_string());
        config.backend.api_base = Some("http://localhost:8080".to_string());
        assert!(matches!(
            TokenSource::from_config(&config),
            Ok(TokenSource::Static(_))
        ));

        config.github.token = None;
        assert!(matches!(
            TokenSource::from_config(&config),
            Ok(TokenSource::Backend(_))
        ));

        config.backend.api_base = None;
        assert!(matches!(
            TokenSource::from_config(&config),
            Err(AnalyzerError::MissingConfigError { .. })
        ));
    }
}
