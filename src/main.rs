use clap::Parser;
use gh_profile_analyzer::app::{render_details, render_report};
use gh_profile_analyzer::config::Command;
use gh_profile_analyzer::core::repo_details::RepositoryDetailsFetcher;
use gh_profile_analyzer::core::session::{AnalysisState, RunOutcome};
use gh_profile_analyzer::utils::error::ErrorSeverity;
use gh_profile_analyzer::utils::{logger, validation::Validate};
use gh_profile_analyzer::{
    AnalysisSession, AnalyzerConfig, AnalyzerError, CliConfig, GitHubClient, ProfileAnalyzer,
    TokenSource,
};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &AnalyzerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.severity()));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config: AnalyzerConfig = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None);
            fail(&e);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(cli.verbose, config.logging.level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.logging.level.as_deref());
    }

    tracing::info!("Starting gh-profile-analyzer");
    tracing::debug!("Resolved configuration: {:?}", config.github);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    match &cli.command {
        Command::Analyze { username } => {
            if let Err(e) = config.require_token_source() {
                fail(&e);
            }

            let github = GitHubClient::from_config(&config).unwrap_or_else(|e| fail(&e));
            let tokens = TokenSource::from_config(&config).unwrap_or_else(|e| fail(&e));
            let analyzer = ProfileAnalyzer::new(tokens, github.clone(), github);
            let session = AnalysisSession::new();

            match session.run(&analyzer, username).await {
                RunOutcome::Rejected => {
                    eprintln!("❌ Please enter a GitHub username");
                    std::process::exit(1);
                }
                RunOutcome::Completed(AnalysisState::Success { report, .. }) => {
                    println!("{}", render_report(&report, cli.format)?);
                }
                RunOutcome::Completed(AnalysisState::Failed {
                    message,
                    severity,
                    suggestion,
                    ..
                }) => {
                    eprintln!("❌ {}", message);
                    eprintln!("💡 {}", suggestion);
                    std::process::exit(exit_code(severity));
                }
                other => {
                    tracing::warn!("Analysis ended without a result: {:?}", other);
                    std::process::exit(1);
                }
            }
        }
        Command::Repo { url } => {
            let github = GitHubClient::from_config(&config).unwrap_or_else(|e| fail(&e));
            let mut fetcher = RepositoryDetailsFetcher::new(github);
            if let Some(token) = &config.github.token {
                fetcher = fetcher.with_token(token.clone());
            }

            match fetcher.fetch(url).await {
                Ok(details) => println!("{}", render_details(&details, cli.format)?),
                Err(e) => fail(&e),
            }
        }
    }

    Ok(())
}
