// src/types/records.rs
//! Dashboard records: candidates, job postings, screening outcomes and metrics

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    New,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 6] = [
        CandidateStatus::New,
        CandidateStatus::Screening,
        CandidateStatus::Interview,
        CandidateStatus::Offer,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::New => "new",
            CandidateStatus::Screening => "screening",
            CandidateStatus::Interview => "interview",
            CandidateStatus::Offer => "offer",
            CandidateStatus::Hired => "hired",
            CandidateStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown candidate status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full-time" | "full_time" | "fulltime" => Ok(JobType::FullTime),
            "part-time" | "part_time" | "parttime" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            "remote" => Ok(JobType::Remote),
            other => anyhow::bail!("Unknown job type: {}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Urgent,
    Paused,
    Closed,
}

impl JobStatus {
    /// Open postings still collecting applications
    pub fn is_open(&self) -> bool {
        matches!(self, JobStatus::Active | JobStatus::Urgent)
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(JobStatus::Active),
            "urgent" => Ok(JobStatus::Urgent),
            "paused" => Ok(JobStatus::Paused),
            "closed" => Ok(JobStatus::Closed),
            other => anyhow::bail!("Unknown job status: {}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub status: CandidateStatus,
    pub match_score: u8,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub location: String,
    pub applied_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
}

impl Candidate {
    /// Text submitted for screening: the stored resume, or a profile built from the record
    pub fn screening_text(&self) -> String {
        if let Some(resume) = self
            .resume_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        {
            return resume.to_string();
        }

        let mut profile = format!("Name: {}\nCurrent role: {}\n", self.name, self.role);
        if !self.experience.is_empty() {
            profile.push_str(&format!("Experience: {}\n", self.experience));
        }
        if !self.education.is_empty() {
            profile.push_str(&format!("Education: {}\n", self.education));
        }
        if !self.location.is_empty() {
            profile.push_str(&format!("Location: {}\n", self.location));
        }
        if !self.skills.is_empty() {
            profile.push_str(&format!("Skills: {}\n", self.skills.join(", ")));
        }
        profile
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub salary: String,
    pub status: JobStatus,
    pub candidates: u32,
    pub days_open: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningRecommendation {
    StrongYes,
    Yes,
    Maybe,
    No,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    pub candidate_id: String,
    pub overall_score: u8,
    pub technical_score: u8,
    pub experience_score: u8,
    pub education_score: u8,
    pub recommendation: ScreeningRecommendation,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub summary: String,
    pub screened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_candidates: usize,
    pub active_jobs: usize,
    pub interviews_scheduled: usize,
    pub offers_extended: usize,
    pub average_time_to_hire: f64,
    pub applications_trend: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(resume: Option<&str>) -> Candidate {
        Candidate {
            id: "cand-001".to_string(),
            name: "Ada Park".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            role: "Backend Engineer".to_string(),
            status: CandidateStatus::Screening,
            match_score: 88,
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            experience: "6 years".to_string(),
            education: "BS Computer Science".to_string(),
            location: "Lyon".to_string(),
            applied_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            resume_text: resume.map(str::to_string),
        }
    }

    #[test]
    fn test_candidate_status_parsing() {
        assert_eq!(
            "Interview".parse::<CandidateStatus>().unwrap(),
            CandidateStatus::Interview
        );
        assert_eq!(" hired ".parse::<CandidateStatus>().unwrap(), CandidateStatus::Hired);
        assert!("archived".parse::<CandidateStatus>().is_err());
    }

    #[test]
    fn test_job_type_serializes_kebab_case() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, "\"full-time\"");
        assert_eq!("part_time".parse::<JobType>().unwrap(), JobType::PartTime);
    }

    #[test]
    fn test_recommendation_serializes_snake_case() {
        let json = serde_json::to_string(&ScreeningRecommendation::StrongYes).unwrap();
        assert_eq!(json, "\"strong_yes\"");
    }

    #[test]
    fn test_screening_text_prefers_resume() {
        let c = candidate(Some("Seasoned Rust developer"));
        assert_eq!(c.screening_text(), "Seasoned Rust developer");
    }

    #[test]
    fn test_screening_text_synthesizes_profile() {
        let c = candidate(Some("   "));
        let text = c.screening_text();
        assert!(text.contains("Name: Ada Park"));
        assert!(text.contains("Skills: Rust, PostgreSQL"));
        assert!(text.contains("Experience: 6 years"));
    }

    #[test]
    fn test_candidate_json_uses_camel_case() {
        let value = serde_json::to_value(candidate(None)).unwrap();
        assert_eq!(value["matchScore"], 88);
        assert_eq!(value["appliedDate"], "2026-01-10");
        assert!(value.get("resumeText").is_none());
    }
}
