// src/cli.rs
use crate::client::{extract_document_text, BatchScreener, HrApiClient, PageOcr};
use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::directory::{filter_candidates, filter_jobs, load_candidates_csv, load_jobs_csv};
use crate::gateway::prompts::DEFAULT_CAREER_QUESTION;
use crate::types::{CandidateStatus, DashboardMetrics};
use crate::web::start_web_server;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "talentai")]
#[command(about = "AI-assisted recruiting: CV analysis, OCR and candidate screening")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// A CV on disk, with optional pre-rendered page images for scanned PDFs
#[derive(Args, Debug)]
pub struct ResumeArgs {
    /// CV file (.pdf or .txt)
    pub resume: PathBuf,

    /// Page image used for OCR when the PDF has no text layer (repeatable)
    #[arg(long = "page-image")]
    pub page_images: Vec<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP functions server
    Serve,
    /// Score a CV for ATS compatibility
    Ats(ResumeArgs),
    /// Match a CV against a job description
    Match {
        #[command(flatten)]
        resume: ResumeArgs,
        /// File holding the job description
        #[arg(long)]
        job: PathBuf,
    },
    /// Predict a salary range
    Salary {
        #[arg(long)]
        title: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        experience: String,
        /// Comma-separated skills
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
    },
    /// Ask the career advisor a question
    Ask { question: Option<String> },
    /// Extract the text of a CV, falling back to OCR
    Extract(ResumeArgs),
    /// Screen candidates from a CSV against a job description
    Screen {
        #[arg(long)]
        candidates: PathBuf,
        #[arg(long)]
        job: PathBuf,
        /// Only screen candidates whose name or role matches
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        status: Option<CandidateStatus>,
    },
    /// Search candidates by name or role
    Candidates {
        csv_file: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        status: Option<CandidateStatus>,
    },
    /// Search jobs by title or department
    Jobs {
        csv_file: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Compute dashboard metrics from candidate and job CSVs
    Dashboard {
        #[arg(long)]
        candidates: PathBuf,
        #[arg(long)]
        jobs: PathBuf,
        /// Reference date for the application trend (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn read_job_description(path: &Path) -> Result<String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read job description {}", path.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("Job description {} is empty", path.display());
    }
    Ok(text)
}

async fn read_resume(args: &ResumeArgs, client: &HrApiClient) -> Result<String> {
    let ocr: &dyn PageOcr = client;
    let extracted = extract_document_text(&args.resume, &args.page_images, Some(ocr)).await?;
    info!(
        "Read {} characters from {} ({:?})",
        extracted.character_count,
        args.resume.display(),
        extracted.method
    );
    Ok(extracted.text)
}

pub async fn handle_command(cli: Cli, config: AppConfig) -> Result<()> {
    let api_base_url = config.settings.api_base_url.clone();
    let screening_delay = config.settings.screening_delay();

    let client = || HrApiClient::new(api_base_url.clone(), AppConfig::client_api_key());

    match cli.command {
        Command::Serve => start_web_server(config).await?,

        Command::Ats(args) => {
            let client = client()?;
            let resume = read_resume(&args, &client).await?;
            print_json(&client.analyze_ats(&resume).await?)?;
        }

        Command::Match { resume, job } => {
            let client = client()?;
            let job_description = read_job_description(&job).await?;
            let resume = read_resume(&resume, &client).await?;
            print_json(&client.match_job(&resume, &job_description).await?)?;
        }

        Command::Salary {
            title,
            location,
            experience,
            skills,
        } => {
            let prediction = client()?
                .predict_salary(&title, &location, &experience, &skills)
                .await?;
            print_json(&prediction)?;
        }

        Command::Ask { question } => {
            let question = question.unwrap_or_else(|| DEFAULT_CAREER_QUESTION.to_string());
            println!("{}", client()?.ask_career_insight(&question).await?);
        }

        Command::Extract(args) => {
            let client = client()?;
            let ocr: &dyn PageOcr = &client;
            let extracted = extract_document_text(&args.resume, &args.page_images, Some(ocr)).await?;
            print_json(&extracted)?;
        }

        Command::Screen {
            candidates,
            job,
            query,
            status,
        } => {
            let client = client()?;
            let job_description = read_job_description(&job).await?;
            let all = load_candidates_csv(&candidates).await?;
            let selected: Vec<_> = filter_candidates(&all, &query, status)
                .into_iter()
                .cloned()
                .collect();

            let screener = BatchScreener::new(&client, screening_delay);
            let report = screener.screen(&selected, &job_description).await;
            print_json(&report)?;

            if let Some(message) = &report.halt_message {
                anyhow::bail!("Screening halted: {}", message);
            }
        }

        Command::Candidates {
            csv_file,
            query,
            status,
        } => {
            let candidates = load_candidates_csv(&csv_file).await?;
            print_json(&filter_candidates(&candidates, &query, status))?;
        }

        Command::Jobs { csv_file, query } => {
            let jobs = load_jobs_csv(&csv_file).await?;
            print_json(&filter_jobs(&jobs, &query))?;
        }

        Command::Dashboard {
            candidates,
            jobs,
            as_of,
        } => {
            let candidates = load_candidates_csv(&candidates).await?;
            let jobs = load_jobs_csv(&jobs).await?;
            let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
            print_json(&DashboardMetrics::compute(&candidates, &jobs, as_of))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_match_with_page_images() {
        let cli = Cli::try_parse_from([
            "talentai",
            "match",
            "cv.pdf",
            "--job",
            "job.txt",
            "--page-image",
            "p1.png",
            "--page-image",
            "p2.png",
        ])
        .unwrap();

        match cli.command {
            Command::Match { resume, job } => {
                assert_eq!(resume.resume, PathBuf::from("cv.pdf"));
                assert_eq!(resume.page_images.len(), 2);
                assert_eq!(job, PathBuf::from("job.txt"));
            }
            _ => panic!("expected match command"),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_parse_salary_skills_list() {
        let cli = Cli::try_parse_from([
            "talentai",
            "salary",
            "--title",
            "Data Engineer",
            "--location",
            "Paris",
            "--experience",
            "5 years",
            "--skills",
            "Spark,SQL",
        ])
        .unwrap();

        match cli.command {
            Command::Salary { skills, .. } => assert_eq!(skills, vec!["Spark", "SQL"]),
            _ => panic!("expected salary command"),
        }
    }

    #[test]
    fn test_parse_status_and_date() {
        let cli = Cli::try_parse_from([
            "talentai",
            "candidates",
            "people.csv",
            "--status",
            "interview",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Candidates {
                status: Some(CandidateStatus::Interview),
                ..
            }
        ));

        let cli = Cli::try_parse_from([
            "talentai",
            "dashboard",
            "--candidates",
            "c.csv",
            "--jobs",
            "j.csv",
            "--as-of",
            "2026-10-01",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Dashboard { as_of: Some(_), .. }));
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.txt");
        std::fs::write(&path, "  \n").unwrap();
        assert!(read_job_description(&path).await.is_err());
    }
}
