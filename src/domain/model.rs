use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 使用者儲存庫清單中的一筆記錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub has_issues: bool,
}

/// 從根目錄清單推導出的開發實踐訊號
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSignals {
    pub has_readme: bool,
    pub has_tests: bool,
}

impl PracticeSignals {
    /// Names are matched case-insensitively; callers may pass raw listing names.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut signals = Self::default();
        for entry in entries {
            let name = entry.as_ref().to_lowercase();
            if name == "readme.md" {
                signals.has_readme = true;
            }
            if name.contains("test") {
                signals.has_tests = true;
            }
        }
        signals
    }
}

/// 單一儲存庫的檢查結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectionOutcome {
    Inspected(PracticeSignals),
    Skipped { reason: String },
}

impl InspectionOutcome {
    /// Skipped repositories count as having no signals.
    pub fn signals(&self) -> PracticeSignals {
        match self {
            InspectionOutcome::Inspected(signals) => *signals,
            InspectionOutcome::Skipped { .. } => PracticeSignals::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCounts {
    pub total: usize,
    pub personal: usize,
    pub forked: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeCounts {
    pub has_readme: usize,
    pub has_tests: usize,
    pub has_issues: usize,
}

/// 單次分析的累加器，每次分析各自建立
#[derive(Debug, Default)]
pub struct AnalysisAggregate {
    technologies: Vec<String>,
    seen: HashSet<String>,
    projects: ProjectCounts,
    practices: PracticeCounts,
}

impl AnalysisAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the counts every repository contributes, regardless of inspection.
    pub fn record_repository(&mut self, repo: &RepositorySummary) {
        self.projects.total += 1;
        if repo.fork {
            self.projects.forked += 1;
        } else {
            self.projects.personal += 1;
        }

        if let Some(language) = repo.language.as_deref().map(str::trim) {
            if !language.is_empty() && self.seen.insert(language.to_string()) {
                self.technologies.push(language.to_string());
            }
        }

        if repo.has_issues {
            self.practices.has_issues += 1;
        }
    }

    pub fn record_inspection(&mut self, outcome: &InspectionOutcome) {
        let signals = outcome.signals();
        if signals.has_readme {
            self.practices.has_readme += 1;
        }
        if signals.has_tests {
            self.practices.has_tests += 1;
        }
    }

    pub fn projects(&self) -> ProjectCounts {
        self.projects
    }

    pub fn practices(&self) -> PracticeCounts {
        self.practices
    }

    pub fn into_report(self, username: &str) -> AnalysisReport {
        AnalysisReport {
            username: username.to_string(),
            technologies: self.technologies,
            projects: self.projects,
            practices: self.practices,
        }
    }
}

/// 分析完成後的不可變報告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub username: String,
    pub technologies: Vec<String>,
    pub projects: ProjectCounts,
    pub practices: PracticeCounts,
}

/// owner/name pair parsed from a `https://github.com/...` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPath {
    pub owner: String,
    pub name: String,
}

impl RepositoryPath {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// 用於填寫專案欄位的儲存庫詳細資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_commit_at: Option<DateTime<Utc>>,
}
