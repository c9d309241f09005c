// src/types/analysis.rs
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analyses multiplexed by the `hr-ai-analyze` function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    AtsScore,
    JobMatch,
    SalaryPredict,
    CareerInsight,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::AtsScore => "ats_score",
            AnalysisType::JobMatch => "job_match",
            AnalysisType::SalaryPredict => "salary_predict",
            AnalysisType::CareerInsight => "career_insight",
        }
    }

    /// Everything except the free-form career chat asks the gateway for a JSON object
    pub fn wants_json(&self) -> bool {
        !matches!(self, AnalysisType::CareerInsight)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAnalysisType(pub String);

impl FromStr for AnalysisType {
    type Err = InvalidAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ats_score" => Ok(AnalysisType::AtsScore),
            "job_match" => Ok(AnalysisType::JobMatch),
            "salary_predict" => Ok(AnalysisType::SalaryPredict),
            "career_insight" => Ok(AnalysisType::CareerInsight),
            other => Err(InvalidAnalysisType(other.to_string())),
        }
    }
}

/// Body of `POST /hr-ai-analyze`. `type` stays a raw string so unknown
/// values reach the handler and are reported like any other failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrAnalysisRequest {
    #[serde(rename = "type", default)]
    pub analysis_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl HrAnalysisRequest {
    pub fn new(analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type: analysis_type.as_str().to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(rename = "type")]
    pub analysis_type: AnalysisType,
    pub result: serde_json::Value,
}

// ===== Typed result shapes (client side) =====

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
}

/// Scores come back as whatever number the model wrote: fractions are
/// rounded, `"85%"` strings accepted, and the value clamped to 0-100.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Option::<RawScore>::deserialize(deserializer)? {
        Some(RawScore::Number(n)) => n,
        Some(RawScore::Text(text)) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(D::Error::custom)?,
        None => 0.0,
    };

    if !score.is_finite() {
        return Ok(0);
    }
    Ok(score.round().clamp(0.0, 100.0) as u8)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoredFeedback {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsCategories {
    pub formatting: ScoredFeedback,
    pub keywords: ScoredFeedback,
    pub structure: ScoredFeedback,
    pub contact: ScoredFeedback,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtsResult {
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_score: u8,
    pub categories: AtsCategories,
    pub suggestions: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsMatch {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobMatchCategories {
    pub skills: SkillsMatch,
    pub experience: ScoredFeedback,
    pub education: ScoredFeedback,
    pub culture: ScoredFeedback,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRecommendation {
    Strong,
    #[default]
    Consider,
    Pass,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobMatchResult {
    #[serde(deserialize_with = "deserialize_score")]
    pub match_score: u8,
    pub categories: JobMatchCategories,
    pub recommendation: MatchRecommendation,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub interview_questions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryRange {
    pub min: f64,
    pub median: f64,
    pub max: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryFactor {
    pub factor: String,
    pub impact: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalaryPrediction {
    pub predicted_salary: SalaryRange,
    pub factors: Vec<SalaryFactor>,
    pub market_insights: String,
    pub negotiation_tips: Vec<String>,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerInsight {
    pub response: String,
}
