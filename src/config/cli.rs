use crate::app::OutputFormat;
use crate::config::toml_config::AnalyzerConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "gh-profile-analyzer")]
#[command(about = "Analyze the public repositories of a GitHub user")]
pub struct CliConfig {
    /// Path to TOML configuration file (defaults to environment variables)
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, global = true, default_value = "text", help = "Output format: text or json")]
    pub format: OutputFormat,

    /// Backend base URL issuing GitHub tokens
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, global = true)]
    pub github_api: Option<String>,

    /// GitHub token; bypasses the backend token endpoint
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Maximum number of repository pages to fetch
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Analyze a GitHub user's repositories
    Analyze { username: String },
    /// Fetch details of a single repository by URL
    Repo { url: String },
}

impl CliConfig {
    /// 載入設定檔（或環境變數），再套用命令列覆蓋
    pub fn load_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None => AnalyzerConfig::from_env(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AnalyzerConfig) {
        if let Some(api_base) = &self.api_base {
            config.backend.api_base = Some(api_base.clone());
        }
        if let Some(github_api) = &self.github_api {
            config.github.api_base = github_api.clone();
        }
        if let Some(token) = &self.token {
            config.github.token = Some(token.clone());
        }
        if let Some(max_pages) = self.max_pages {
            config.github.max_pages = max_pages;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_command() {
        let cli = CliConfig::try_parse_from([
            "gh-profile-analyzer",
            "analyze",
            "octocat",
            "--format",
            "json",
            "--max-pages",
            "3",
        ])
        .unwrap();

        assert!(matches!(&cli.command, Command::Analyze { username } if username == "octocat"));
        assert_eq!(cli.format, OutputFormat::Json);

        let mut config = AnalyzerConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.github.max_pages, 3);
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = CliConfig::try_parse_from([
            "gh-profile-analyzer",
            "--token",
            "ghp_cli",
            "--github-api",
            "http://127.0.0.1:9000",
            "repo",
            "https://github.com/octocat/hello",
        ])
        .unwrap();

        let mut config =
            AnalyzerConfig::from_toml_str("[github]\ntoken = \"ghp_file\"\n").unwrap();
        cli.apply_overrides(&mut config);

        assert_eq!(config.github.token.as_deref(), Some("ghp_cli"));
        assert_eq!(config.github.api_base, "http://127.0.0.1:9000");
        assert!(matches!(cli.command, Command::Repo { .. }));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(CliConfig::try_parse_from([
            "gh-profile-analyzer",
            "--format",
            "yaml",
            "analyze",
            "octocat",
        ])
        .is_err());
    }
}
