//! CSV report: one row per screened resume, written once per batch.

use std::path::Path;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::extraction::entities::NOT_FOUND;
use crate::screening::models::CandidateResult;

lazy_static! {
    static ref REPORT_NAME: Regex = Regex::new(r"^resume_report_[0-9a-f]{32}\.csv$").unwrap();
}

/// One CSV line. Column names are the report's public header.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "File")]
    file: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Skills Found")]
    skills_found: String,
    #[serde(rename = "Skills Matched")]
    skills_matched: String,
    #[serde(rename = "Matched %")]
    matched_percent: f64,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Recommended Jobs")]
    recommended_jobs: String,
}

impl<'a> From<&'a CandidateResult> for ReportRow<'a> {
    fn from(result: &'a CandidateResult) -> Self {
        Self {
            file: &result.file,
            name: &result.name,
            email: &result.email,
            skills_found: join_or_not_found(&result.skills_found),
            skills_matched: join_or_not_found(&result.skills_matched),
            matched_percent: result.matched_percent,
            status: result.status.as_str(),
            recommended_jobs: result.recommended_jobs.join(", "),
        }
    }
}

fn join_or_not_found(items: &[String]) -> String {
    if items.is_empty() {
        NOT_FOUND.to_string()
    } else {
        items.join(", ")
    }
}

/// A report written to disk, addressed by file name inside the report folder.
#[derive(Debug, Clone)]
pub struct SavedReport {
    pub file_name: String,
}

pub fn render_csv(results: &[CandidateResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for result in results {
        writer.serialize(ReportRow::from(result))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV report: {}", e.error()))
}

/// Writes `resume_report_<uuid>.csv` into `report_dir`.
pub async fn save_report(results: &[CandidateResult], report_dir: &Path) -> Result<SavedReport> {
    let csv_bytes = render_csv(results).context("Failed to render CSV report")?;

    tokio::fs::create_dir_all(report_dir)
        .await
        .with_context(|| format!("Failed to create report folder {}", report_dir.display()))?;

    let file_name = format!("resume_report_{}.csv", Uuid::new_v4().simple());
    let path = report_dir.join(&file_name);
    tokio::fs::write(&path, csv_bytes)
        .await
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    info!("Wrote report {} ({} rows)", path.display(), results.len());
    Ok(SavedReport { file_name })
}

/// Only names this module generates are accepted; anything else is `false`.
pub fn is_report_name(file_name: &str) -> bool {
    REPORT_NAME.is_match(file_name)
}

/// Reads a previously written report. `Ok(None)` when the name is not a
/// report name or the file does not exist.
pub async fn open_report(report_dir: &Path, file_name: &str) -> Result<Option<Vec<u8>>> {
    if !is_report_name(file_name) {
        return Ok(None);
    }
    let path = report_dir.join(file_name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read report {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::ScreeningStatus;

    fn result(file: &str, skills_found: &[&str], jobs: &[&str]) -> CandidateResult {
        CandidateResult {
            file: file.to_string(),
            name: "Lena Park".to_string(),
            email: "lena@example.com".to_string(),
            skills_found: skills_found.iter().map(|s| s.to_string()).collect(),
            skills_matched: vec![],
            matched_percent: 50.0,
            status: ScreeningStatus::Shortlisted,
            recommended_jobs: jobs.iter().map(|s| s.to_string()).collect(),
            ner_skills: NOT_FOUND.to_string(),
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let bytes = render_csv(&[result("cv.pdf", &["Git", "SQL"], &["DevOps Engineer"])]).unwrap();
        let csv_text = String::from_utf8(bytes).unwrap();
        let mut lines = csv_text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "File,Name,Email,Skills Found,Skills Matched,Matched %,Status,Recommended Jobs"
        );
        assert_eq!(
            lines.next().unwrap(),
            r#"cv.pdf,Lena Park,lena@example.com,"Git, SQL",Not Found,50.0,Shortlisted,DevOps Engineer"#
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_is_report_name() {
        assert!(is_report_name("resume_report_0123456789abcdef0123456789abcdef.csv"));
        assert!(!is_report_name("../resume_report_0123456789abcdef0123456789abcdef.csv"));
        assert!(!is_report_name("resume_report_xyz.csv"));
        assert!(!is_report_name("Cargo.toml"));
    }

    #[tokio::test]
    async fn test_save_then_open_report() {
        let dir = tempfile::tempdir().unwrap();
        let report_dir = dir.path().join("outputs");
        let saved = save_report(&[result("a.pdf", &[], &[])], &report_dir).await.unwrap();

        assert!(is_report_name(&saved.file_name));
        assert!(report_dir.join(&saved.file_name).exists());

        let bytes = open_report(&report_dir, &saved.file_name).await.unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("a.pdf,Lena Park"));
    }

    #[tokio::test]
    async fn test_open_unknown_report_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = "resume_report_00000000000000000000000000000000.csv";
        assert!(open_report(dir.path(), missing).await.unwrap().is_none());
        assert!(open_report(dir.path(), "../secret.csv").await.unwrap().is_none());
    }
}
