pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GitHubClient, TokenSource};
pub use config::AnalyzerConfig;
pub use crate::core::{analyzer::ProfileAnalyzer, session::AnalysisSession};
pub use domain::model::{AnalysisReport, RepositoryDetails};
pub use utils::error::{AnalyzerError, Result};
