use crate::domain::model::{RepositoryDetails, RepositoryPath, RepositorySummary};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 取得呼叫 GitHub API 用的存取權杖
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn resolve_token(&self) -> Result<String>;
}

/// 列出使用者的儲存庫（依最近更新排序）
#[async_trait]
pub trait RepositoryEnumerator: Send + Sync {
    async fn list_repositories(&self, username: &str, token: &str)
        -> Result<Vec<RepositorySummary>>;
}

/// 取得儲存庫根目錄的檔案與資料夾名稱
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn list_root_entries(&self, owner: &str, repo: &str, token: &str)
        -> Result<Vec<String>>;
}

#[async_trait]
pub trait RepositoryDetailsSource: Send + Sync {
    async fn fetch_details(
        &self,
        path: &RepositoryPath,
        token: Option<&str>,
    ) -> Result<RepositoryDetails>;
}

pub trait ConfigProvider: Send + Sync {
    fn backend_api_base(&self) -> Option<&str>;
    fn session_cookie(&self) -> Option<&str>;
    fn token_path(&self) -> &str;
    fn github_api_base(&self) -> &str;
    fn github_token(&self) -> Option<&str>;
    fn per_page(&self) -> usize;
    fn max_pages(&self) -> usize;
    fn user_agent(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}
