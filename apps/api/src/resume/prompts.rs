// Resume analysis LLM prompt templates.
// Placeholders are substituted with `str::replace`; document text is always substituted last.

pub const SKILL_EXTRACTION_PROMPT: &str = r#"Extract the professional skills from the {document_kind} below.

Include programming languages, frameworks, tools, platforms, methodologies and domain skills.
Use the shortest common name for each skill (e.g. "AWS", not "Amazon Web Services experience").
Do not include soft skills unless they are explicitly listed as requirements.

DOCUMENT:
{document_text}

Return ONLY a JSON array of strings, for example: ["Python", "SQL", "Docker"]"#;

pub const RESUME_FEEDBACK_SYSTEM: &str = "\
You are an experienced technical recruiter and resume reviewer. \
You MUST respond with valid JSON only, no markdown fences, no explanations. \
Be specific and actionable; refer to concrete content from the resume.";

pub const RESUME_FEEDBACK_PROMPT: &str = r#"Review the following resume and give structured feedback.

RESUME:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "overallImpression": "2-3 sentence assessment",
  "strengths": ["string"],
  "weaknesses": ["string"],
  "formattingSuggestions": ["string"],
  "missingSections": ["string"],
  "atsTips": ["string"]
}

Return ONLY the JSON object, nothing else, no code fences."#;

pub const MATCH_ADVICE_PROMPT: &str = r#"A candidate's resume was compared with a job description.

Skills the candidate already has that the job asks for: {matched_skills}
Skills the job asks for that the resume does not show: {missing_skills}
Match score: {match_score}

Write 3-5 sentences of practical advice for tailoring the resume to this job:
which strengths to foreground, and how to address or learn the missing skills.

Return ONLY a JSON object of the form {"feedback": "your advice"}"#;
