// Prompt templates for the completion service.

/// Résumé critique. Replace `{resume_text}` before sending.
const FEEDBACK_TEMPLATE: &str = r#"You are an experienced technical recruiter reviewing a candidate's resume.

Give concise, actionable feedback on the resume below. Cover:
- Overall structure and readability
- Strength of the bullet points (impact, metrics, action verbs)
- Skills or experience that seem missing or under-sold
- Formatting or wording problems

Write plain text with short paragraphs or bullet points. Do not rewrite the resume.

RESUME:
{resume_text}"#;

/// Cover letter draft. Replace `{resume_text}` and `{job_description}`.
const COVER_LETTER_TEMPLATE: &str = r#"You are helping a job seeker write a cover letter.

Using only facts found in the resume below, write a professional cover letter of three to four paragraphs.
Do not invent employers, titles, dates or skills.
If a job description is given, tailor the letter to it; otherwise keep it general.
Return only the letter text, starting with the greeting.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}"#;

pub fn feedback_prompt(resume_text: &str) -> String {
    FEEDBACK_TEMPLATE.replace("{resume_text}", resume_text.trim())
}

pub fn cover_letter_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let job_description = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .unwrap_or("(none provided)");
    COVER_LETTER_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text.trim())
}
