//! Screening pipeline: turns the cleaned text of one resume into a `CandidateResult`.

use tracing::debug;

use crate::extraction::heuristics::extract_email;
use crate::extraction::ner::{predict_entities, NerError, TokenClassifier};
use crate::screening::models::{CandidateResult, ScreeningStatus};
use crate::screening::skills::{
    calculate_match_percentage, find_skills_in_resume, match_skills, recommend_jobs,
    MAX_RECOMMENDATIONS,
};

/// Required skills come from a typed list or from the skills found in a model resume.
/// The model resume goes through the catalog matcher, never the token classifier.
pub fn required_skills_from_model_resume(model_resume_text: &str) -> Vec<String> {
    find_skills_in_resume(model_resume_text)
}

/// Screens one resume.
///
/// 1. Name from the token classifier, with the regex fallback when it finds none
/// 2. Email from the regex extractor
/// 3. Catalog skills (for recommendations) and required skills (for the score)
/// 4. Percentage → status; top job recommendations
pub async fn screen_resume(
    file: &str,
    text: &str,
    required: &[String],
    classifier: &dyn TokenClassifier,
) -> Result<CandidateResult, NerError> {
    let entities = predict_entities(classifier, text).await?;
    let email = extract_email(text);

    let skills_found = find_skills_in_resume(text);
    let skills_matched = match_skills(text, required);
    let matched_percent = calculate_match_percentage(required, &skills_matched);
    let status = ScreeningStatus::from_percentage(matched_percent);

    let mut recommended_jobs = recommend_jobs(&skills_found);
    recommended_jobs.truncate(MAX_RECOMMENDATIONS);

    debug!(
        "{file}: {matched_percent}% of {} required skills → {}",
        required.len(),
        status.as_str()
    );

    Ok(CandidateResult {
        file: file.to_string(),
        name: entities.name,
        email,
        skills_found,
        skills_matched,
        matched_percent,
        status,
        recommended_jobs,
        ner_skills: entities.skills,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::entities::{TaggedToken, NOT_FOUND};
    use crate::extraction::ner::DisabledClassifier;
    use async_trait::async_trait;

    struct FailingClassifier;

    #[async_trait]
    impl TokenClassifier for FailingClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<TaggedToken>, NerError> {
            Err(NerError::Worker("boom".to_string()))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const RESUME: &str = "Name: Asha Verma Email: asha.verma@example.com Skills: Python, SQL, Docker, Git";

    #[tokio::test]
    async fn test_selected_candidate() {
        let required = owned(&["Python", "SQL", "Kubernetes"]);
        let result = screen_resume("asha.pdf", RESUME, &required, &DisabledClassifier)
            .await
            .unwrap();

        assert_eq!(result.file, "asha.pdf");
        assert_eq!(result.name, "Asha Verma");
        assert_eq!(result.email, "asha.verma@example.com");
        assert_eq!(result.skills_matched, owned(&["Python", "SQL"]));
        assert_eq!(result.matched_percent, 66.67);
        assert_eq!(result.status, ScreeningStatus::Selected);
        // "email" contains "ai", so the AI catalog entry matches too.
        assert_eq!(
            result.skills_found,
            owned(&["Python", "AI", "Git", "Docker", "SQL"])
        );
        assert_eq!(
            result.recommended_jobs,
            owned(&["Python Developer", "Data Scientist", "ML Engineer"])
        );
        assert_eq!(result.ner_skills, NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shortlisted_candidate() {
        let required = owned(&["Python", "Java", "Oracle"]);
        let result = screen_resume("a.pdf", RESUME, &required, &DisabledClassifier)
            .await
            .unwrap();
        assert_eq!(result.matched_percent, 33.33);
        assert_eq!(result.status, ScreeningStatus::Shortlisted);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_with_not_found_fields() {
        let required = owned(&["Python"]);
        let result = screen_resume("empty.pdf", "", &required, &DisabledClassifier)
            .await
            .unwrap();
        assert_eq!(result.name, NOT_FOUND);
        assert_eq!(result.email, NOT_FOUND);
        assert!(result.skills_found.is_empty());
        assert_eq!(result.status, ScreeningStatus::Rejected);
        assert!(result.recommended_jobs[0].starts_with("No skills detected"));
    }

    #[tokio::test]
    async fn test_no_requirements_scores_zero() {
        let result = screen_resume("a.pdf", RESUME, &[], &DisabledClassifier)
            .await
            .unwrap();
        assert_eq!(result.matched_percent, 0.0);
        assert_eq!(result.status, ScreeningStatus::Rejected);
    }

    #[tokio::test]
    async fn test_classifier_failure_propagates() {
        let result = screen_resume("a.pdf", RESUME, &[], &FailingClassifier).await;
        assert!(matches!(result, Err(NerError::Worker(_))));
    }

    #[test]
    fn test_model_resume_requirements_use_catalog() {
        let required = required_skills_from_model_resume("Expert in Java, Spring and Oracle DBMS");
        assert_eq!(required, owned(&["Java", "DBMS", "Oracle", "Spring"]));
    }
}
