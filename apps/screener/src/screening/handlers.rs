//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::text::{clean_text, extract_pdf_text};
use crate::screening::models::{ReportLink, ScreeningResponse};
use crate::screening::pipeline::{required_skills_from_model_resume, screen_resume};
use crate::screening::report::{open_report, save_report};
use crate::screening::skills::parse_skill_list;
use crate::screening::uploads::{
    sanitize_relative_path, save_upload, UploadedFile, MODEL_RESUME_FILE,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Form model
// ────────────────────────────────────────────────────────────────────────────

/// Which upload field supplies the resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    File,
    Folder,
}

/// Where the required skills come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementSource {
    Skills,
    ModelResume,
}

/// The screening form after all multipart fields have been read.
#[derive(Debug, Default)]
pub struct ScreeningForm {
    pub mode: Option<UploadMode>,
    pub requirement: Option<RequirementSource>,
    pub skills: String,
    pub model_resume: Option<UploadedFile>,
    pub resume_file: Option<UploadedFile>,
    pub resume_folder: Vec<UploadedFile>,
}

impl ScreeningForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ScreeningForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "mode" => {
                    form.mode = match field.text().await?.trim() {
                        "file" => Some(UploadMode::File),
                        "folder" => Some(UploadMode::Folder),
                        _ => None,
                    }
                }
                "requirement_type" => {
                    form.requirement = match field.text().await?.trim() {
                        "skills" => Some(RequirementSource::Skills),
                        "model_resume" => Some(RequirementSource::ModelResume),
                        _ => None,
                    }
                }
                "skills" => form.skills = field.text().await?,
                "model_resume" | "resume_file" | "resume_folder" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await?;
                    if file_name.is_empty() {
                        continue;
                    }
                    let upload = UploadedFile { file_name, data };
                    match name.as_str() {
                        "model_resume" => form.model_resume = Some(upload),
                        "resume_file" => form.resume_file = Some(upload),
                        _ => form.resume_folder.push(upload),
                    }
                }
                other => warn!("Ignoring unknown form field '{other}'"),
            }
        }

        Ok(form)
    }

    /// The resumes selected by `mode`, PDFs only.
    pub fn resumes(self) -> Vec<UploadedFile> {
        let candidates: Vec<UploadedFile> = match self.mode {
            Some(UploadMode::File) => self.resume_file.into_iter().collect(),
            Some(UploadMode::Folder) => self.resume_folder,
            None => Vec::new(),
        };
        candidates.into_iter().filter(UploadedFile::is_pdf).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Multipart form: `mode`, `requirement_type`, `skills`, `model_resume`,
/// `resume_file`, `resume_folder`. Screens every uploaded PDF and writes a
/// CSV report when at least one resume was processed.
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut form = ScreeningForm::from_multipart(multipart).await?;
    let upload_dir = state.config.upload_dir.clone();

    let required_skills = match form.requirement {
        Some(RequirementSource::Skills) => parse_skill_list(&form.skills),
        Some(RequirementSource::ModelResume) => match form.model_resume.take() {
            Some(model_resume) if model_resume.is_pdf() => {
                save_upload(
                    &upload_dir,
                    std::path::Path::new(MODEL_RESUME_FILE),
                    &model_resume.data,
                )
                .await?;
                let text =
                    clean_text(&extract_pdf_text(MODEL_RESUME_FILE, model_resume.data).await);
                required_skills_from_model_resume(&text)
            }
            _ => Vec::new(),
        },
        None => Vec::new(),
    };

    let resumes = form.resumes();
    info!(
        "Screening {} resume(s) against {} required skill(s)",
        resumes.len(),
        required_skills.len()
    );

    let mut results = Vec::with_capacity(resumes.len());
    for resume in resumes {
        let Some(relative) = sanitize_relative_path(&resume.file_name) else {
            warn!("Skipping upload with unusable name '{}'", resume.file_name);
            continue;
        };
        save_upload(&upload_dir, &relative, &resume.data).await?;

        let text = clean_text(&extract_pdf_text(&resume.file_name, resume.data).await);
        let result = screen_resume(
            &resume.file_name,
            &text,
            &required_skills,
            state.classifier.as_ref(),
        )
        .await?;
        results.push(result);
    }

    let report = if results.is_empty() {
        None
    } else {
        let saved = save_report(&results, &state.config.report_dir).await?;
        Some(ReportLink {
            download_url: format!("/api/v1/reports/{}", saved.file_name),
            file_name: saved.file_name,
        })
    };

    Ok(Json(ScreeningResponse {
        required_skills,
        results,
        report,
        generated_at: Utc::now(),
    }))
}

/// GET /api/v1/reports/:file_name
///
/// Serves a generated CSV report as an attachment.
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = open_report(&state.config.report_dir, &file_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {file_name} not found")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
