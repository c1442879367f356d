//! Skill catalog: the static skill → job table, skill matching and job recommendation.
//!
//! Matching is case-insensitive substring membership: a skill counts as present
//! when its lowercase form occurs anywhere in the lowercase resume text.

/// Maximum number of job titles recommended per candidate.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Skill → job titles, in catalog order. The keys double as the master skill list.
pub const JOB_TABLE: &[(&str, &[&str])] = &[
    ("Python", &["Python Developer", "Data Scientist", "ML Engineer"]),
    ("Java", &["Java Developer", "Backend Engineer"]),
    ("C++", &["C++ Developer", "Embedded Engineer"]),
    ("Machine Learning", &["ML Engineer", "AI Researcher", "Data Scientist"]),
    ("AI", &["AI Engineer", "Research Scientist"]),
    ("DVC", &["MLOps Engineer", "Data Engineer"]),
    ("Git", &["DevOps Engineer", "Software Engineer"]),
    ("Docker", &["DevOps Engineer", "Cloud Engineer"]),
    ("HTML", &["Frontend Developer", "Web Designer"]),
    ("JavaScript", &["Frontend Developer", "Full Stack Developer"]),
    ("JSP", &["Java Developer", "Web Developer"]),
    ("Servlet", &["Java Web Developer"]),
    ("DBMS", &["Database Administrator", "Backend Developer"]),
    ("SQL", &["Database Engineer", "BI Developer"]),
    ("Oracle", &["Oracle DBA", "Data Engineer"]),
    ("Spring", &["Java Spring Developer", "Backend Engineer"]),
];

pub fn master_skills() -> impl Iterator<Item = &'static str> {
    JOB_TABLE.iter().map(|(skill, _)| *skill)
}

fn jobs_for(skill: &str) -> &'static [&'static str] {
    JOB_TABLE
        .iter()
        .find(|(known, _)| *known == skill)
        .map(|(_, jobs)| *jobs)
        .unwrap_or(&[])
}

/// Every catalog skill mentioned in `text`, in catalog order.
pub fn find_skills_in_resume(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    master_skills()
        .filter(|skill| text_lower.contains(&skill.to_lowercase()))
        .map(String::from)
        .collect()
}

/// The subset of `required` mentioned in `text`, in `required` order.
pub fn match_skills(text: &str, required: &[String]) -> Vec<String> {
    let text_lower = text.to_lowercase();
    required
        .iter()
        .filter(|skill| text_lower.contains(&skill.to_lowercase()))
        .cloned()
        .collect()
}

/// Share of required skills found, as a percentage rounded to two decimals.
/// Exact ties round to even (1 of 32 is 3.12). An empty requirement set scores 0.
pub fn calculate_match_percentage(required: &[String], found: &[String]) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    let ratio = found.len() as f64 / required.len() as f64 * 100.0;
    (ratio * 100.0).round_ties_even() / 100.0
}

/// Splits a comma-separated skill list, trimming entries and dropping blanks.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Up to three distinct job titles for the given skills, in skill order.
/// Falls back to a single advisory sentence when the table yields nothing.
pub fn recommend_jobs(skills: &[String]) -> Vec<String> {
    let mut jobs: Vec<&str> = Vec::new();
    for &job in skills.iter().flat_map(|skill| jobs_for(skill)) {
        if !jobs.contains(&job) {
            jobs.push(job);
        }
    }

    if !jobs.is_empty() {
        return jobs
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(String::from)
            .collect();
    }

    if skills.is_empty() {
        vec!["No skills detected. Please update your resume with relevant skills.".to_string()]
    } else {
        vec![format!(
            "Based on your skills ({}), consider entry-level roles.",
            skills.join(", ")
        )]
    }
}
