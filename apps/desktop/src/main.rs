use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, InterviewApi, PendingFile, SubmissionController, UploadForm,
};
use shared::{domain::InterviewId, protocol::{InterviewDraft, InterviewRecord}};

#[derive(Parser, Debug)]
#[command(about = "Customer interview analysis client")]
struct Args {
    /// Overrides the configured analysis service endpoint.
    #[arg(long)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload transcript files (.pdf or .txt) for analysis.
    Upload {
        files: Vec<PathBuf>,
        /// Product description used as analysis context.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List past analyses.
    List,
    /// Show one interview with its transcript and analysis.
    Show { id: i64 },
    /// Create an interview from a typed transcript.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        transcript: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }
    let api = InterviewApi::from_settings(&settings);

    match args.command {
        Command::Upload { files, description } => {
            let mut form = UploadForm::new();
            form.add_files(read_pending_files(&files)?);
            form.set_description(description);

            let mut controller = SubmissionController::new(api);
            controller.submit(&mut form).await?;

            println!("Submitted. {} analyses on record:", controller.interviews().len());
            for interview in controller.interviews() {
                print_summary(interview);
            }
        }
        Command::List => {
            for interview in &api.list_interviews().await? {
                print_summary(interview);
            }
        }
        Command::Show { id } => {
            let interview = api.fetch_interview(InterviewId(id)).await?;
            println!("[{}] {} ({})", interview.id.0, interview.title, interview.created_at);
            println!("\n{}", interview.transcript);
            if let Some(analysis) = &interview.analysis {
                println!("\nAnalysis:\n{analysis}");
            }
        }
        Command::Create { title, transcript } => {
            let interview = api
                .create_interview(&InterviewDraft { title, transcript })
                .await?;
            println!("Created interview {}", interview.id.0);
        }
    }

    Ok(())
}

fn read_pending_files(paths: &[PathBuf]) -> Result<Vec<PendingFile>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            Ok(PendingFile::new(display_name(path), bytes))
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(interview: &InterviewRecord) {
    let status = if interview.analysis.is_some() {
        "analyzed"
    } else {
        "pending"
    };
    println!(
        "[{}] {} ({}, {})",
        interview.id.0, interview.title, status, interview.created_at
    );
}
