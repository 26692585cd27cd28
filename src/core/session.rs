use crate::core::analyzer::ProfileAnalyzer;
use crate::core::{ContentFetcher, RepositoryEnumerator, TokenProvider};
use crate::domain::model::AnalysisReport;
use crate::utils::error::{ErrorSeverity, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// 分析流程狀態：Idle → Loading → {Success, Failed}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisState {
    Idle,
    Loading { run_id: u64, username: String },
    Success { run_id: u64, report: AnalysisReport },
    Failed {
        run_id: u64,
        username: String,
        message: String,
        severity: ErrorSeverity,
        suggestion: &'static str,
    },
}

impl AnalysisState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Success { .. } | AnalysisState::Failed { .. })
    }
}

/// Handle for one accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    pub run_id: u64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Blank username; state untouched.
    Rejected,
    /// A newer submission started before this run finished; its result was dropped.
    Superseded { run_id: u64 },
    Completed(AnalysisState),
}

/// 保存目前的分析狀態，並丟棄被較新提交取代的結果
#[derive(Debug)]
pub struct AnalysisSession {
    latest_run: AtomicU64,
    state: Mutex<AnalysisState>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            latest_run: AtomicU64::new(0),
            state: Mutex::new(AnalysisState::Idle),
        }
    }

    pub fn state(&self) -> AnalysisState {
        self.lock_state().clone()
    }

    pub fn submit(&self, username: &str) -> Option<RunTicket> {
        let username = username.trim();
        if username.is_empty() {
            tracing::debug!("Ignoring blank username submission");
            return None;
        }

        let mut state = self.lock_state();
        let run_id = self.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        *state = AnalysisState::Loading {
            run_id,
            username: username.to_string(),
        };
        tracing::debug!("Run {} started for {}", run_id, username);

        Some(RunTicket {
            run_id,
            username: username.to_string(),
        })
    }

    /// Applies a finished run. Returns `false` when the ticket is stale.
    pub fn complete(&self, ticket: &RunTicket, result: Result<AnalysisReport>) -> bool {
        let mut state = self.lock_state();
        if ticket.run_id != self.latest_run.load(Ordering::SeqCst) {
            tracing::info!(
                "Discarding stale result of run {} for {}",
                ticket.run_id,
                ticket.username
            );
            return false;
        }

        *state = match result {
            Ok(report) => AnalysisState::Success {
                run_id: ticket.run_id,
                report,
            },
            Err(e) => {
                tracing::error!(
                    "❌ Analysis of {} failed: {} (Category: {:?})",
                    ticket.username,
                    e,
                    e.category()
                );
                AnalysisState::Failed {
                    run_id: ticket.run_id,
                    username: ticket.username.clone(),
                    message: e.user_friendly_message(),
                    severity: e.severity(),
                    suggestion: e.recovery_suggestion(),
                }
            }
        };
        true
    }

    pub async fn run<T, E, F>(&self, analyzer: &ProfileAnalyzer<T, E, F>, username: &str) -> RunOutcome
    where
        T: TokenProvider,
        E: RepositoryEnumerator,
        F: ContentFetcher,
    {
        let Some(ticket) = self.submit(username) else {
            return RunOutcome::Rejected;
        };

        let result = analyzer.analyze(&ticket.username).await;
        if self.complete(&ticket, result) {
            RunOutcome::Completed(self.state())
        } else {
            RunOutcome::Superseded {
                run_id: ticket.run_id,
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AnalysisState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
