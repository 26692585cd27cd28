pub mod analyzer;
pub mod repo_details;
pub mod session;

pub use crate::domain::model::{
    AnalysisAggregate, AnalysisReport, InspectionOutcome, PracticeSignals, RepositoryDetails,
    RepositoryPath, RepositorySummary,
};
pub use crate::domain::ports::{
    ConfigProvider, ContentFetcher, RepositoryDetailsSource, RepositoryEnumerator, TokenProvider,
};
pub use crate::utils::error::Result;
