// src/directory.rs
//! Candidate and job directories: search, CSV import and dashboard metrics

use crate::types::{Candidate, CandidateStatus, DashboardMetrics, Job, JobStatus, JobType};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const LIST_SEPARATOR: char = ';';
const TREND_WINDOW_DAYS: i64 = 30;

fn matches_query(query: &str, fields: &[&str]) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || fields
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
}

/// Candidates whose name or role contains `query`, optionally limited to one status
pub fn filter_candidates<'a>(
    candidates: &'a [Candidate],
    query: &str,
    status: Option<CandidateStatus>,
) -> Vec<&'a Candidate> {
    candidates
        .iter()
        .filter(|c| status.map_or(true, |s| c.status == s))
        .filter(|c| matches_query(query, &[&c.name, &c.role]))
        .collect()
}

/// Jobs whose title or department contains `query`
pub fn filter_jobs<'a>(jobs: &'a [Job], query: &str) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|j| matches_query(query, &[&j.title, &j.department]))
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateRow {
    id: String,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    role: String,
    status: String,
    #[serde(default)]
    match_score: u8,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    experience: String,
    #[serde(default)]
    education: String,
    #[serde(default)]
    location: String,
    applied_date: NaiveDate,
    #[serde(default)]
    resume_text: Option<String>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = anyhow::Error;

    fn try_from(row: CandidateRow) -> Result<Self> {
        Ok(Candidate {
            status: row.status.parse()?,
            skills: split_list(&row.skills),
            resume_text: row.resume_text.filter(|text| !text.trim().is_empty()),
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            role: row.role,
            match_score: row.match_score,
            experience: row.experience,
            education: row.education,
            location: row.location,
            applied_date: row.applied_date,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobRow {
    id: String,
    title: String,
    department: String,
    #[serde(default)]
    location: String,
    #[serde(rename = "type")]
    job_type: String,
    #[serde(default)]
    salary: String,
    status: String,
    #[serde(default)]
    candidates: u32,
    #[serde(default)]
    days_open: u32,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requirements: String,
}

impl TryFrom<JobRow> for Job {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self> {
        Ok(Job {
            job_type: row.job_type.parse::<JobType>()?,
            status: row.status.parse::<JobStatus>()?,
            requirements: split_list(&row.requirements),
            id: row.id,
            title: row.title,
            department: row.department,
            location: row.location,
            salary: row.salary,
            candidates: row.candidates,
            days_open: row.days_open,
            description: row.description,
        })
    }
}

/// Parse CSV rows into records, skipping (and logging) rows that do not convert
fn parse_rows<R, T>(content: &str) -> Vec<T>
where
    R: for<'de> Deserialize<'de>,
    T: TryFrom<R, Error = anyhow::Error>,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut error_count = 0;

    for (index, result) in reader.deserialize::<R>().enumerate() {
        // Header is line 1
        let line = index + 2;
        match result.map_err(anyhow::Error::from).and_then(T::try_from) {
            Ok(record) => records.push(record),
            Err(e) => {
                error_count += 1;
                warn!("Skipping CSV line {}: {}", line, e);
            }
        }
    }

    info!("Imported {} records ({} skipped)", records.len(), error_count);
    records
}

pub fn parse_candidates_csv(content: &str) -> Vec<Candidate> {
    parse_rows::<CandidateRow, Candidate>(content)
}

pub fn parse_jobs_csv(content: &str) -> Vec<Job> {
    parse_rows::<JobRow, Job>(content)
}

pub async fn load_candidates_csv(path: &Path) -> Result<Vec<Candidate>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read candidates from {}", path.display()))?;
    Ok(parse_candidates_csv(&content))
}

pub async fn load_jobs_csv(path: &Path) -> Result<Vec<Job>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read jobs from {}", path.display()))?;
    Ok(parse_jobs_csv(&content))
}

impl DashboardMetrics {
    pub fn compute(candidates: &[Candidate], jobs: &[Job], as_of: NaiveDate) -> Self {
        let count_status = |status: CandidateStatus| {
            candidates.iter().filter(|c| c.status == status).count()
        };

        let closed: Vec<u32> = jobs
            .iter()
            .filter(|j| j.status == JobStatus::Closed)
            .map(|j| j.days_open)
            .collect();
        let average_time_to_hire = if closed.is_empty() {
            0.0
        } else {
            closed.iter().map(|&d| f64::from(d)).sum::<f64>() / closed.len() as f64
        };

        let window = Duration::days(TREND_WINDOW_DAYS);
        let applied_between = |start: NaiveDate, end: NaiveDate| {
            candidates
                .iter()
                .filter(|c| c.applied_date > start && c.applied_date <= end)
                .count()
        };
        let current = applied_between(as_of - window, as_of);
        let previous = applied_between(as_of - window - window, as_of - window);
        let applications_trend = if previous == 0 {
            0.0
        } else {
            (current as f64 - previous as f64) / previous as f64 * 100.0
        };

        DashboardMetrics {
            total_candidates: candidates.len(),
            active_jobs: jobs.iter().filter(|j| j.status.is_open()).count(),
            interviews_scheduled: count_status(CandidateStatus::Interview),
            offers_extended: count_status(CandidateStatus::Offer),
            average_time_to_hire,
            applications_trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES_CSV: &str = "\
id,name,email,phone,role,status,matchScore,skills,experience,education,location,appliedDate,resumeText
c1,Ada Park,ada@example.com,+1 555 0100,Backend Engineer,interview,88,Rust; PostgreSQL ;,6 years,BS CS,Lyon,2026-09-20,
c2,Ben Ortiz,ben@example.com,,Product Designer,offer,74,Figma;Research,4 years,BA Design,Remote,2026-09-05,Designer with a focus on research
c3,Chloe Lin,chloe@example.com,,Data Engineer,archived,60,Spark,3 years,MS,Paris,2026-08-01,
c4,Dev Rao,dev@example.com,,Frontend Engineer,new,70,React,2 years,BS,Berlin,2026-08-10,
";

    const JOBS_CSV: &str = "\
id,title,department,location,type,salary,status,candidates,daysOpen,description,requirements
j1,Senior Backend Engineer,Engineering,Lyon,full-time,$150k,urgent,12,10,Own the API,Rust;SQL
j2,Designer,Design,Remote,contract,$90k,closed,30,20,,
j3,Data Analyst,Data,Paris,part-time,$70k,closed,8,41,,
j4,Intern,Engineering,Paris,internship,$30k,active,3,5,,
";

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    #[test]
    fn test_candidates_csv_import() {
        let candidates = parse_candidates_csv(CANDIDATES_CSV);
        // c3 has an unknown status
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].skills, vec!["Rust", "PostgreSQL"]);
        assert_eq!(candidates[0].resume_text, None);
        assert_eq!(
            candidates[1].resume_text.as_deref(),
            Some("Designer with a focus on research")
        );
        assert_eq!(candidates[2].status, CandidateStatus::New);
    }

    #[test]
    fn test_jobs_csv_import() {
        let jobs = parse_jobs_csv(JOBS_CSV);
        assert_eq!(jobs.len(), 4);
        assert_eq!(jobs[0].job_type, JobType::FullTime);
        assert_eq!(jobs[0].requirements, vec!["Rust", "SQL"]);
        assert!(jobs[1].requirements.is_empty());
    }

    #[test]
    fn test_filter_candidates() {
        let candidates = parse_candidates_csv(CANDIDATES_CSV);

        let engineers = filter_candidates(&candidates, "ENGINEER", None);
        assert_eq!(engineers.len(), 2);

        let interviewing = filter_candidates(&candidates, "engineer", Some(CandidateStatus::Interview));
        assert_eq!(interviewing.len(), 1);
        assert_eq!(interviewing[0].id, "c1");

        assert_eq!(filter_candidates(&candidates, "ben", None).len(), 1);
        assert_eq!(filter_candidates(&candidates, "  ", None).len(), 3);
    }

    #[test]
    fn test_filter_jobs_by_title_or_department() {
        let jobs = parse_jobs_csv(JOBS_CSV);
        assert_eq!(filter_jobs(&jobs, "engineering").len(), 2);
        assert_eq!(filter_jobs(&jobs, "analyst").len(), 1);
        assert!(filter_jobs(&jobs, "sales").is_empty());
    }

    #[test]
    fn test_dashboard_metrics() {
        let candidates = parse_candidates_csv(CANDIDATES_CSV);
        let jobs = parse_jobs_csv(JOBS_CSV);

        let metrics = DashboardMetrics::compute(&candidates, &jobs, as_of());
        assert_eq!(metrics.total_candidates, 3);
        assert_eq!(metrics.active_jobs, 2);
        assert_eq!(metrics.interviews_scheduled, 1);
        assert_eq!(metrics.offers_extended, 1);
        assert_eq!(metrics.average_time_to_hire, 30.5);
        // Two applications in September against one in the month before
        assert_eq!(metrics.applications_trend, 100.0);
    }

    #[test]
    fn test_dashboard_metrics_empty() {
        let metrics = DashboardMetrics::compute(&[], &[], as_of());
        assert_eq!(metrics.total_candidates, 0);
        assert_eq!(metrics.average_time_to_hire, 0.0);
        assert_eq!(metrics.applications_trend, 0.0);
    }

    #[tokio::test]
    async fn test_load_jobs_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_jobs_csv(&dir.path().join("jobs.csv")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read jobs"));
    }
}
