// dashboard/src/main.rs
//! Recruiter dashboard: a terminal client for the matcher API

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};

mod client;
mod render;

use client::{ApiClient, NewJob};

#[derive(Parser, Debug)]
#[command(name = "matcher-dashboard", about = "Upload resumes, add jobs and review matches")]
struct Cli {
    /// Base URL of the matcher API
    #[arg(long, env = "API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a resume (PDF or TXT) and show the extracted profile
    Upload {
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Create a job from text or a JD file
    AddJob {
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "jd_file")]
        jd_text: Option<String>,
        /// Pre-fills title and skills through the API's extractor
        #[arg(long)]
        jd_file: Option<PathBuf>,
        /// Comma separated required skills
        #[arg(long)]
        required: Option<String>,
        /// Comma separated nice-to-have skills
        #[arg(long)]
        nice: Option<String>,
    },
    /// List jobs
    Jobs,
    /// Rank stored candidates for a job
    Match {
        job_id: String,
        #[arg(long, default_value_t = 5)]
        top_k: u32,
    },
    /// Evaluate one resume against one job description
    Evaluate {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        jd_file: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Show stored results for a job
    Results { job_id: String },
}

async fn add_job(
    api: &ApiClient,
    title: Option<String>,
    jd_text: Option<String>,
    jd_file: Option<PathBuf>,
    required: Option<String>,
    nice: Option<String>,
) -> Result<()> {
    let details = match (&jd_text, &jd_file) {
        (_, Some(path)) => {
            let details = api.extract_jd(path).await?;
            print!("{}", render::jd_details(&details));
            Some(details)
        }
        (Some(_), None) => None,
        (None, None) => bail!("Provide --jd-text or --jd-file"),
    };

    let (jd_text, extracted_title, extracted_required, extracted_nice) = match details {
        Some(d) => (d.raw_text, Some(d.title), d.required_skills, d.nice_to_have_skills),
        None => (jd_text.unwrap_or_default(), None, Vec::new(), Vec::new()),
    };

    let job = NewJob {
        title: title
            .or(extracted_title)
            .context("Provide --title (no JD file to extract one from)")?,
        jd_text,
        required_skills: required
            .as_deref()
            .map(render::split_list)
            .unwrap_or(extracted_required),
        nice_to_have_skills: nice
            .as_deref()
            .map(render::split_list)
            .unwrap_or(extracted_nice),
    };

    let created = api.create_job(&job).await?;
    println!("Created job {} ({})", created.title, created.job_id);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.api_url)?;

    match cli.command {
        Command::Upload { file, name } => {
            let candidate = api.upload_resume(&file, name.as_deref()).await?;
            print!("{}", render::candidate(&candidate));
        }
        Command::AddJob {
            title,
            jd_text,
            jd_file,
            required,
            nice,
        } => add_job(&api, title, jd_text, jd_file, required, nice).await?,
        Command::Jobs => {
            let jobs = api.list_jobs().await?;
            print!("{}", render::jobs(&jobs));
        }
        Command::Match { job_id, top_k } => {
            let results = api.match_job(&job_id, top_k).await?;
            print!("{}", render::match_results(&results));
        }
        Command::Evaluate {
            resume,
            jd_file,
            name,
        } => {
            let jd_text = jd_text_from_file(&api, &jd_file).await?;
            let result = api.evaluate(&resume, &jd_text, name.as_deref()).await?;
            print!("{}", render::match_results(std::slice::from_ref(&result)));
        }
        Command::Results { job_id } => {
            let results = api.results(&job_id).await?;
            print!("{}", render::match_results(&results));
        }
    }

    Ok(())
}

/// PDF or TXT job description, extracted server-side
async fn jd_text_from_file(api: &ApiClient, path: &Path) -> Result<String> {
    Ok(api.extract_jd(path).await?.raw_text)
}
