use crate::domain::model::{AnalysisReport, RepositoryDetails};
use crate::utils::error::{AnalyzerError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AnalyzerError::ValidationError {
                message: format!("Unsupported output format '{}'. Valid formats: text, json", other),
            }),
        }
    }
}

pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(report.to_string()),
    }
}

pub fn render_details(details: &RepositoryDetails, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(details)?),
        OutputFormat::Text => Ok(details.to_string()),
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.projects.total;

        writeln!(f, "{}'s GitHub Profile Analysis", self.username)?;
        writeln!(f)?;
        writeln!(f, "Technologies")?;
        if self.technologies.is_empty() {
            writeln!(f, "  (none)")?;
        } else {
            writeln!(f, "  {}", self.technologies.join(", "))?;
        }
        writeln!(f)?;
        writeln!(f, "Projects")?;
        writeln!(f, "  Total Projects:    {}", total)?;
        writeln!(f, "  Personal Projects: {}", self.projects.personal)?;
        writeln!(f, "  Forked Projects:   {}", self.projects.forked)?;
        writeln!(f)?;
        writeln!(f, "Development Practices")?;
        writeln!(
            f,
            "  Projects with README:         {} out of {} projects",
            self.practices.has_readme, total
        )?;
        writeln!(
            f,
            "  Projects with Tests:          {} out of {} projects",
            self.practices.has_tests, total
        )?;
        writeln!(
            f,
            "  Projects with Issue Tracking: {} out of {} projects",
            self.practices.has_issues, total
        )
    }
}

impl fmt::Display for RepositoryDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name:        {}", self.full_name)?;
        writeln!(
            f,
            "Description: {}",
            self.description.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "URL:         {}", self.html_url)?;
        writeln!(f, "Language:    {}", self.language.as_deref().unwrap_or("-"))?;
        if let Some(created) = self.created_at {
            writeln!(f, "Created:     {}", created.format("%Y-%m-%d"))?;
        }
        if let Some(last_commit) = self.last_commit_at {
            writeln!(f, "Last Commit: {}", last_commit.format("%-d.%-m.%Y"))?;
        }
        Ok(())
    }
}
