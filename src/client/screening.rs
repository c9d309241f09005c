// src/client/screening.rs
//! Sequential batch screening of candidates against one job description

use super::api::{ClientError, HrApiClient};
use crate::types::{
    Candidate, JobMatchResult, MatchRecommendation, ScreeningRecommendation, ScreeningResult,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

const STRONG_YES_THRESHOLD: u8 = 90;

/// Scores one resume against a job description
#[rocket::async_trait]
pub trait CandidateScorer: Send + Sync {
    async fn score(&self, resume_text: &str, job_description: &str) -> Result<JobMatchResult, ClientError>;
}

#[rocket::async_trait]
impl CandidateScorer for HrApiClient {
    async fn score(&self, resume_text: &str, job_description: &str) -> Result<JobMatchResult, ClientError> {
        self.match_job(resume_text, job_description).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    RateLimited,
    QuotaExceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCandidate {
    pub candidate_id: String,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningReport {
    pub run_id: String,
    pub results: Vec<ScreeningResult>,
    pub skipped: Vec<SkippedCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted: Option<HaltReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halt_message: Option<String>,
    /// Candidates left unscreened because the run halted
    pub not_attempted: Vec<String>,
    pub requests_made: usize,
}

pub fn map_recommendation(result: &JobMatchResult) -> ScreeningRecommendation {
    match result.recommendation {
        MatchRecommendation::Strong if result.match_score >= STRONG_YES_THRESHOLD => {
            ScreeningRecommendation::StrongYes
        }
        MatchRecommendation::Strong => ScreeningRecommendation::Yes,
        MatchRecommendation::Consider => ScreeningRecommendation::Maybe,
        MatchRecommendation::Pass => ScreeningRecommendation::No,
    }
}

pub fn to_screening_result(
    candidate_id: &str,
    result: &JobMatchResult,
    screened_at: DateTime<Utc>,
) -> ScreeningResult {
    let label = match result.recommendation {
        MatchRecommendation::Strong => "Strong",
        MatchRecommendation::Consider => "Possible",
        MatchRecommendation::Pass => "Weak",
    };
    let mut summary = format!("{} match ({}%)", label, result.match_score);
    let feedback = result.categories.experience.feedback.trim();
    if !feedback.is_empty() {
        summary.push_str(": ");
        summary.push_str(feedback);
    }

    ScreeningResult {
        candidate_id: candidate_id.to_string(),
        overall_score: result.match_score,
        technical_score: result.categories.skills.score,
        experience_score: result.categories.experience.score,
        education_score: result.categories.education.score,
        recommendation: map_recommendation(result),
        strengths: result.strengths.clone(),
        concerns: result.concerns.clone(),
        summary,
        screened_at,
    }
}

pub struct BatchScreener<'a> {
    scorer: &'a dyn CandidateScorer,
    delay: Duration,
}

impl<'a> BatchScreener<'a> {
    pub fn new(scorer: &'a dyn CandidateScorer, delay: Duration) -> Self {
        Self { scorer, delay }
    }

    /// Screen candidates one at a time, pausing `delay` between requests.
    /// A rate or usage limit stops the run; other failures skip the candidate.
    pub async fn screen(&self, candidates: &[Candidate], job_description: &str) -> ScreeningReport {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("batch_screening", run_id = %run_id, total = candidates.len());

        async {
            let mut report = ScreeningReport {
                run_id: run_id.clone(),
                results: Vec::new(),
                skipped: Vec::new(),
                halted: None,
                halt_message: None,
                not_attempted: Vec::new(),
                requests_made: 0,
            };

            for (index, candidate) in candidates.iter().enumerate() {
                if index > 0 && !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }

                info!(
                    "Screening {}/{}: {} ({})",
                    index + 1,
                    candidates.len(),
                    candidate.name,
                    candidate.id
                );
                report.requests_made += 1;

                match self
                    .scorer
                    .score(&candidate.screening_text(), job_description)
                    .await
                {
                    Ok(result) => {
                        report
                            .results
                            .push(to_screening_result(&candidate.id, &result, Utc::now()));
                    }
                    Err(e) if e.is_limit() => {
                        error!("Stopping batch screening: {}", e);
                        report.halted = Some(match &e {
                            ClientError::QuotaExceeded => HaltReason::QuotaExceeded,
                            _ => HaltReason::RateLimited,
                        });
                        report.halt_message = Some(e.to_string());
                        report.not_attempted = candidates[index..]
                            .iter()
                            .map(|c| c.id.clone())
                            .collect();
                        break;
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", candidate.id, e);
                        report.skipped.push(SkippedCandidate {
                            candidate_id: candidate.id.clone(),
                            name: candidate.name.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }

            info!(
                "Batch screening finished: {} screened, {} skipped, halted: {:?}",
                report.results.len(),
                report.skipped.len(),
                report.halted
            );
            report
        }
        .instrument(span)
        .await
    }
}
