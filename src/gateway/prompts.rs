// src/gateway/prompts.rs
//! Prompt templates sent to the chat-completion gateway

use crate::types::{AnalysisType, HrAnalysisRequest};

const ATS_SYSTEM_PROMPT: &str = r#"You are an expert ATS (Applicant Tracking System) analyzer. Analyze resumes for ATS compatibility and provide detailed scoring.

You MUST respond with valid JSON in this exact format:
{
  "overallScore": 85,
  "categories": {
    "formatting": { "score": 90, "feedback": "Good use of standard headings" },
    "keywords": { "score": 80, "feedback": "Missing some industry keywords" },
    "structure": { "score": 85, "feedback": "Clear chronological format" },
    "contact": { "score": 95, "feedback": "Complete contact information" }
  },
  "suggestions": ["Add quantifiable achievements", "Include more action verbs"],
  "missingKeywords": ["project management", "agile methodology"],
  "strengths": ["Strong technical skills section", "Clear experience timeline"]
}"#;

const JOB_MATCH_SYSTEM_PROMPT: &str = r#"You are an expert HR recruiter and job matching specialist. Analyze how well a candidate matches a job vacancy.

You MUST respond with valid JSON in this exact format:
{
  "matchScore": 85,
  "categories": {
    "skills": { "score": 90, "matched": ["React", "TypeScript"], "missing": ["GraphQL"] },
    "experience": { "score": 80, "feedback": "4 years vs 5 years required" },
    "education": { "score": 85, "feedback": "BS in Computer Science matches" },
    "culture": { "score": 88, "feedback": "Remote work experience aligns" }
  },
  "recommendation": "strong",
  "strengths": ["Strong frontend experience", "Leadership background"],
  "concerns": ["Slightly below experience requirement"],
  "interviewQuestions": ["Describe your GraphQL learning plan", "Tell us about team leadership"]
}
recommendation must be one of: "strong", "consider", "pass""#;

const SALARY_SYSTEM_PROMPT: &str = r#"You are a compensation and salary analytics expert. Predict salary ranges based on role, location, experience, and skills.

You MUST respond with valid JSON in this exact format:
{
  "predictedSalary": {
    "min": 80000,
    "median": 95000,
    "max": 120000,
    "currency": "USD"
  },
  "factors": [
    { "factor": "Location (San Francisco)", "impact": "+15%", "reasoning": "High cost of living area" },
    { "factor": "5 years experience", "impact": "+10%", "reasoning": "Above entry level" },
    { "factor": "React expertise", "impact": "+5%", "reasoning": "In-demand skill" }
  ],
  "marketInsights": "The market for this role is competitive with high demand",
  "negotiationTips": ["Highlight your unique project experience", "Emphasize leadership skills"],
  "benefits": ["Health insurance", "Stock options", "Remote work flexibility"]
}"#;

const CAREER_SYSTEM_PROMPT: &str = r#"You are an expert career counselor and HR advisor. Provide actionable career guidance, job market insights, and professional development advice.

Respond in a helpful, conversational manner. Be specific and practical with your advice."#;

pub const DEFAULT_CAREER_QUESTION: &str = "How can I improve my career prospects?";

pub const OCR_SYSTEM_PROMPT: &str = r#"You are an expert OCR (Optical Character Recognition) system. Your task is to extract ALL text content from the provided document page image.

Instructions:
- Extract every piece of text visible in the document
- Preserve the structure and formatting as much as possible (sections, bullet points, etc.)
- Include headers, contact information, job titles, company names, dates, skills, education details
- If the document appears to be a resume/CV, organize the text in a logical resume format
- Do NOT add any commentary or analysis - just extract the raw text
- If text is unclear, make your best attempt to read it
- Return ONLY the extracted text, nothing else"#;

/// System and user prompt for one analysis request
pub fn analysis_prompts(analysis_type: AnalysisType, request: &HrAnalysisRequest) -> (&'static str, String) {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    match analysis_type {
        AnalysisType::AtsScore => (
            ATS_SYSTEM_PROMPT,
            format!(
                "Analyze this resume for ATS compatibility:\n\n{}",
                field(&request.resume_text)
            ),
        ),
        AnalysisType::JobMatch => (
            JOB_MATCH_SYSTEM_PROMPT,
            format!(
                "Match this resume to the job description:\n\nRESUME:\n{}\n\nJOB DESCRIPTION:\n{}",
                field(&request.resume_text),
                field(&request.job_description)
            ),
        ),
        AnalysisType::SalaryPredict => (
            SALARY_SYSTEM_PROMPT,
            format!(
                "Predict salary for:\nJob Title: {}\nLocation: {}\nExperience: {}\nSkills: {}",
                field(&request.job_title),
                field(&request.location),
                field(&request.experience),
                request.skills.as_deref().unwrap_or_default().join(", ")
            ),
        ),
        AnalysisType::CareerInsight => (
            CAREER_SYSTEM_PROMPT,
            request
                .question
                .clone()
                .filter(|q| !q.is_empty())
                .unwrap_or_else(|| DEFAULT_CAREER_QUESTION.to_string()),
        ),
    }
}

pub fn ocr_page_instruction(page_number: usize) -> String {
    format!(
        "Extract all text from page {} of this document. Return only the extracted text content.",
        page_number
    )
}
