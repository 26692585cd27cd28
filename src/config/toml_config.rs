use crate::adapters::github::DEFAULT_API_BASE;
use crate::core::ConfigProvider;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_TOKEN_PATH: &str = "/api/github-token";
pub const DEFAULT_USER_AGENT: &str = concat!("gh-profile-analyzer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub backend: BackendConfig,
    pub github: GitHubConfig,
    pub logging: LoggingConfig,
}

/// 後端（發放 GitHub token 的服務）設定
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_base: Option<String>,
    pub session_cookie: Option<String>,
    pub token_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            session_cookie: None,
            token_path: DEFAULT_TOKEN_PATH.to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub per_page: usize,
    pub max_pages: usize,
    pub user_agent: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            per_page: 100,
            max_pages: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: None,
        }
    }
}

// 憑證不可出現在日誌中
fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "***")
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_base", &self.api_base)
            .field("session_cookie", &redacted(&self.session_cookie))
            .field("token_path", &self.token_path)
            .finish()
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_base", &self.api_base)
            .field("token", &redacted(&self.token))
            .field("per_page", &self.per_page)
            .field("max_pages", &self.max_pages)
            .field("user_agent", &self.user_agent)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl AnalyzerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyzerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        Ok(config.normalized())
    }

    /// 沒有設定檔時，從環境變數建立配置
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.backend.api_base = std::env::var("API_URL").ok();
        config.backend.session_cookie = std::env::var("SESSION_COOKIE").ok();
        config.github.token = std::env::var("GITHUB_TOKEN").ok();
        if let Ok(api_base) = std::env::var("GITHUB_API_URL") {
            config.github.api_base = api_base;
        }
        config.normalized()
    }

    /// 替換環境變數 (例如 ${GITHUB_TOKEN})，未設定的變數替換為空字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalyzerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        Ok(result.to_string())
    }

    /// Empty optional strings (e.g. from unset variables) become `None`.
    fn normalized(mut self) -> Self {
        fn clean(value: &mut Option<String>) {
            if value.as_deref().map(str::trim).is_some_and(str::is_empty) {
                *value = None;
            }
        }
        clean(&mut self.backend.api_base);
        clean(&mut self.backend.session_cookie);
        clean(&mut self.github.token);
        clean(&mut self.logging.level);
        self
    }

    /// 分析需要 token 來源：靜態 token 或後端
    pub fn require_token_source(&self) -> Result<()> {
        if self.github.token.is_none() && self.backend.api_base.is_none() {
            return Err(AnalyzerError::MissingConfigError {
                field: "github.token or backend.api_base".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("github.api_base", &self.github.api_base)?;
        if let Some(api_base) = &self.backend.api_base {
            validate_url("backend.api_base", api_base)?;
        }
        validate_non_empty_string("backend.token_path", &self.backend.token_path)?;
        validate_range("github.per_page", self.github.per_page, 1, 100)?;
        validate_positive_number("github.max_pages", self.github.max_pages, 1)?;
        validate_non_empty_string("github.user_agent", &self.github.user_agent)?;
        if let Some(timeout) = self.github.timeout_seconds {
            validate_positive_number("github.timeout_seconds", timeout as usize, 1)?;
        }
        Ok(())
    }
}

impl ConfigProvider for AnalyzerConfig {
    fn backend_api_base(&self) -> Option<&str> {
        self.backend.api_base.as_deref()
    }

    fn session_cookie(&self) -> Option<&str> {
        self.backend.session_cookie.as_deref()
    }

    fn token_path(&self) -> &str {
        &self.backend.token_path
    }

    fn github_api_base(&self) -> &str {
        &self.github.api_base
    }

    fn github_token(&self) -> Option<&str> {
        self.github.token.as_deref()
    }

    fn per_page(&self) -> usize {
        self.github.per_page
    }

    fn max_pages(&self) -> usize {
        self.github.max_pages
    }

    fn user_agent(&self) -> &str {
        &self.github.user_agent
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.github.timeout_seconds
    }
}

impl Validate for AnalyzerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
