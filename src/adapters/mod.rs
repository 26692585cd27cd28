// Adapters layer: HTTP implementations of the domain ports (backend token endpoint, GitHub REST API).

pub mod github;
pub mod http;
pub mod token;

pub use github::GitHubClient;
pub use token::{BackendTokenResolver, StaticTokenProvider, TokenSource};
