//! Static resume analyzer: deterministic, rule-based checks with no external calls.

/// Section markers checked in order, paired with the label used in feedback lines.
const SECTION_MARKERS: &[(&str, &str)] = &[
    ("summary", "Summary"),
    ("education", "Education"),
    ("experience", "Experience"),
    ("skills", "Skills"),
];

pub const DEFAULT_ACTION_VERBS: &[&str] = &[
    "achieved",
    "built",
    "created",
    "delivered",
    "designed",
    "developed",
    "implemented",
    "improved",
    "increased",
    "launched",
    "led",
    "managed",
    "optimized",
    "reduced",
    "resolved",
    "streamlined",
];

pub const DEFAULT_TECH_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "rust",
    "machine learning",
    "rest api",
];

/// Rule-based resume checker. Vocabularies are fixed at construction.
#[derive(Debug, Clone)]
pub struct StaticAnalyzer {
    action_verbs: Vec<String>,
    tech_keywords: Vec<String>,
}

impl Default for StaticAnalyzer {
    fn default() -> Self {
        Self::new(
            DEFAULT_ACTION_VERBS.iter().copied(),
            DEFAULT_TECH_KEYWORDS.iter().copied(),
        )
    }
}

impl StaticAnalyzer {
    pub fn new<V, K>(action_verbs: V, tech_keywords: K) -> Self
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            action_verbs: action_verbs
                .into_iter()
                .map(|v| v.as_ref().to_lowercase())
                .collect(),
            tech_keywords: tech_keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Feedback lines in fixed order: one per section marker, the action-verb count,
    /// then the technical keywords found.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut feedback = Vec::with_capacity(SECTION_MARKERS.len() + 2);

        for (marker, label) in SECTION_MARKERS {
            if lower.contains(marker) {
                feedback.push(format!("✔ {label} section found."));
            } else {
                feedback.push(format!(
                    "✘ {label} section not found. Consider adding one."
                ));
            }
        }

        feedback.push(format!(
            "Action verbs used: {}",
            self.count_action_verbs(&lower)
        ));

        let keywords = self.matched_keywords(&lower);
        let listed = if keywords.is_empty() {
            "None".to_string()
        } else {
            keywords.join(", ")
        };
        feedback.push(format!("Technical keywords found: {listed}"));

        feedback
    }

    /// Whole-word occurrences of any action verb.
    fn count_action_verbs(&self, lower: &str) -> usize {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .filter(|word| self.action_verbs.iter().any(|v| v == word))
            .count()
    }

    fn matched_keywords(&self, lower: &str) -> Vec<&str> {
        self.tech_keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME_NO_EXPERIENCE: &str = "\
        SUMMARY\nBackend developer who built and optimized services.\n\
        EDUCATION\nB.Tech Computer Science\n\
        SKILLS\nPython, SQL, Docker";

    #[test]
    fn test_missing_experience_section() {
        let feedback = StaticAnalyzer::default().analyze(RESUME_NO_EXPERIENCE);
        let not_found = feedback.iter().filter(|l| l.contains("not found")).count();
        let found = feedback
            .iter()
            .filter(|l| l.ends_with("section found."))
            .count();
        assert_eq!(not_found, 1);
        assert_eq!(found, 3);
        assert!(feedback[2].starts_with("✘ Experience"));
    }

    #[test]
    fn test_output_order_and_length() {
        let feedback = StaticAnalyzer::default().analyze(RESUME_NO_EXPERIENCE);
        assert_eq!(feedback.len(), 6);
        assert!(feedback[0].contains("Summary"));
        assert!(feedback[1].contains("Education"));
        assert!(feedback[2].contains("Experience"));
        assert!(feedback[3].contains("Skills"));
        assert!(feedback[4].starts_with("Action verbs used"));
        assert!(feedback[5].starts_with("Technical keywords found"));
    }

    #[test]
    fn test_action_verbs_are_whole_word_and_case_insensitive() {
        let analyzer = StaticAnalyzer::new(["led", "built"], Vec::<String>::new());
        // "Led" and "BUILT" count; "ledger" and "rebuilt" do not.
        let feedback = analyzer.analyze("Led a team. BUILT a ledger. Rebuilt nothing. led again");
        assert_eq!(feedback[4], "Action verbs used: 3");
    }

    #[test]
    fn test_keywords_substring_match() {
        let analyzer = StaticAnalyzer::new(Vec::<String>::new(), ["Java", "Go", "Kubernetes"]);
        let feedback = analyzer.analyze("Worked with JavaScript and Kubernetes clusters");
        assert_eq!(feedback[5], "Technical keywords found: java, kubernetes");
    }

    #[test]
    fn test_no_keywords_reports_none() {
        let feedback = StaticAnalyzer::default().analyze("Summary: enthusiastic florist");
        assert_eq!(feedback[5], "Technical keywords found: None");
    }

    #[test]
    fn test_analysis_is_pure() {
        let analyzer = StaticAnalyzer::default();
        assert_eq!(
            analyzer.analyze(RESUME_NO_EXPERIENCE),
            analyzer.analyze(RESUME_NO_EXPERIENCE)
        );
    }
}
