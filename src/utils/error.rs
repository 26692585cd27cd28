use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    #[error("GitHub user not found: {username}")]
    UserNotFoundError { username: String },

    #[error("GitHub API rate limit exceeded while requesting {url}")]
    RateLimitError { url: String },

    #[error("Failed to list repositories for {username}: {message}")]
    EnumerationError { username: String, message: String },

    #[error("Invalid GitHub username: '{username}'")]
    InvalidUsernameError { username: String },

    #[error("Invalid GitHub repository URL: {url}")]
    InvalidRepositoryUrlError { url: String },

    #[error("Repository not found: {path}")]
    RepositoryNotFoundError { path: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Enumeration,
    Network,
    NotFound,
    Configuration,
    Validation,
    Internal,
}

/// 錯誤嚴重程度，CLI 以此決定退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AnalyzerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyzerError::AuthenticationError { .. } => ErrorCategory::Authentication,
            AnalyzerError::EnumerationError { .. } | AnalyzerError::RateLimitError { .. } => {
                ErrorCategory::Enumeration
            }
            AnalyzerError::HttpError(_) | AnalyzerError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            AnalyzerError::UserNotFoundError { .. }
            | AnalyzerError::RepositoryNotFoundError { .. } => ErrorCategory::NotFound,
            AnalyzerError::ConfigError { .. }
            | AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::InvalidConfigValueError { .. }
            | AnalyzerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AnalyzerError::InvalidUsernameError { .. }
            | AnalyzerError::InvalidRepositoryUrlError { .. }
            | AnalyzerError::ValidationError { .. } => ErrorCategory::Validation,
            AnalyzerError::SerializationError(_) | AnalyzerError::IoError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Enumeration => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalyzerError::AuthenticationError { .. } => {
                "Failed to analyze profile: could not obtain a GitHub access token. Please log in and try again.".to_string()
            }
            AnalyzerError::UserNotFoundError { username } => format!(
                "Failed to analyze profile: GitHub user '{}' does not exist.",
                username
            ),
            AnalyzerError::RateLimitError { .. } => {
                "Failed to analyze profile: the GitHub API rate limit was reached. Please try again later.".to_string()
            }
            AnalyzerError::EnumerationError { .. }
            | AnalyzerError::HttpError(_)
            | AnalyzerError::HttpStatusError { .. } => {
                "Failed to analyze profile. Please check if the username is correct and try again.".to_string()
            }
            AnalyzerError::InvalidUsernameError { username } => {
                format!("'{}' is not a valid GitHub username.", username)
            }
            AnalyzerError::InvalidRepositoryUrlError { .. } => {
                "Invalid GitHub repository URL".to_string()
            }
            AnalyzerError::RepositoryNotFoundError { .. } => {
                "Failed to fetch repository details: Repository not found".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        if let AnalyzerError::RateLimitError { .. } = self {
            return "Wait for the rate limit window to reset, then retry";
        }
        match self.category() {
            ErrorCategory::Authentication => {
                "Check the backend session cookie or set GITHUB_TOKEN"
            }
            ErrorCategory::Enumeration => {
                "Check that the username exists and the GitHub API is reachable, then retry"
            }
            ErrorCategory::Network => "Check network connectivity and the configured API base URLs",
            ErrorCategory::NotFound => "Verify the spelling of the username or repository",
            ErrorCategory::Configuration => "Review the configuration file and CLI overrides",
            ErrorCategory::Validation => "Correct the input and run the command again",
            ErrorCategory::Internal => "Re-run with --verbose and report the log output",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
