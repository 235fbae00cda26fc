//! Skill matcher: compares a resume's skills against a job description's skills.

use std::collections::HashSet;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    /// Rounded percentage, e.g. "33%".
    pub match_score: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Splits `jd_skills` into those present in `resume_skills` and those absent.
///
/// Comparison is case-insensitive; output keeps the job description's casing and order.
/// An empty job-description list scores "0%".
pub fn match_skills(resume_skills: &[String], jd_skills: &[String]) -> SkillMatch {
    let have: HashSet<String> = resume_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = jd_skills
        .iter()
        .cloned()
        .partition(|skill| have.contains(&skill.trim().to_lowercase()));

    let match_score = if jd_skills.is_empty() {
        "0%".to_string()
    } else {
        let pct = matched_skills.len() as f64 / jd_skills.len() as f64 * 100.0;
        format!("{}%", pct.round() as u32)
    };

    SkillMatch {
        match_score,
        matched_skills,
        missing_skills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_match_keeps_jd_casing() {
        let result = match_skills(
            &skills(&["python", "React"]),
            &skills(&["Python", "AWS", "SQL"]),
        );
        assert_eq!(result.matched_skills, vec!["Python"]);
        assert_eq!(result.missing_skills, vec!["AWS", "SQL"]);
        assert_eq!(result.match_score, "33%");
    }

    #[test]
    fn test_empty_jd_scores_zero() {
        let result = match_skills(&skills(&["Rust", "Go"]), &[]);
        assert_eq!(result.match_score, "0%");
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_empty_resume_misses_everything() {
        let jd = skills(&["Rust", "Kafka"]);
        let result = match_skills(&[], &jd);
        assert_eq!(result.match_score, "0%");
        assert_eq!(result.missing_skills, jd);
    }

    #[test]
    fn test_full_match_is_100() {
        let result = match_skills(&skills(&["SQL", "aws"]), &skills(&["AWS", "sql"]));
        assert_eq!(result.match_score, "100%");
    }

    #[test]
    fn test_rounding_half_up() {
        // 1 of 8 = 12.5% → 13%
        let jd = skills(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let result = match_skills(&skills(&["A"]), &jd);
        assert_eq!(result.match_score, "13%");
    }

    #[test]
    fn test_partition_covers_jd_and_is_disjoint() {
        let cases: Vec<(Vec<String>, Vec<String>)> = vec![
            (skills(&["python", "docker"]), skills(&["Python", "Docker", "K8s", "python"])),
            (skills(&[]), skills(&["Go"])),
            (skills(&["x", "y", "z"]), skills(&["X", "w", "Z", "v"])),
        ];
        for (resume, jd) in cases {
            let result = match_skills(&resume, &jd);
            let lower = |v: &[String]| -> HashSet<String> {
                v.iter().map(|s| s.to_lowercase()).collect()
            };
            let matched = lower(&result.matched_skills);
            let missing = lower(&result.missing_skills);
            let union: HashSet<_> = matched.union(&missing).cloned().collect();
            assert_eq!(union, lower(&jd));
            assert!(matched.is_disjoint(&missing));
            assert_eq!(
                result.matched_skills.len() + result.missing_skills.len(),
                jd.len()
            );
        }
    }
}
