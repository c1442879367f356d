use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Screening outcome derived from the skill match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningStatus {
    Selected,
    Shortlisted,
    Rejected,
}

impl ScreeningStatus {
    pub const SELECTED_THRESHOLD: f64 = 60.0;
    pub const SHORTLISTED_THRESHOLD: f64 = 30.0;

    /// `≥60` selected, `30–60` shortlisted, anything lower rejected.
    pub fn from_percentage(percent: f64) -> Self {
        if percent >= Self::SELECTED_THRESHOLD {
            Self::Selected
        } else if percent >= Self::SHORTLISTED_THRESHOLD {
            Self::Shortlisted
        } else {
            Self::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selected => "Selected",
            Self::Shortlisted => "Shortlisted",
            Self::Rejected => "Rejected",
        }
    }
}

/// Everything the screener learned about one uploaded resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub file: String,
    pub name: String,
    pub email: String,
    /// Catalog skills present anywhere in the resume.
    pub skills_found: Vec<String>,
    /// Required skills present in the resume.
    pub skills_matched: Vec<String>,
    pub matched_percent: f64,
    pub status: ScreeningStatus,
    pub recommended_jobs: Vec<String>,
    /// Skill spans tagged by the token classifier, `"Not Found"` when none.
    pub ner_skills: String,
}

/// Where the batch report can be downloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLink {
    pub file_name: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResponse {
    pub required_skills: Vec<String>,
    pub results: Vec<CandidateResult>,
    pub report: Option<ReportLink>,
    pub generated_at: DateTime<Utc>,
}
