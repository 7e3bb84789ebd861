use crate::commands::{run_load, run_match, run_preview, run_send};
use clap::{Args, Parser, Subcommand, ValueEnum};
use recruiter_outreach::config::AppConfig;
use recruiter_outreach::error::AppError;
use recruiter_outreach::telemetry;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "outreach",
    about = "Match recruiter contacts against your skills and send personalised outreach",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a recruiter CSV and show the first rows
    Load(LoadArgs),
    /// List recruiters whose role or skills mention any of your skills
    Match(MatchArgs),
    /// Render the outreach email for every matched recruiter
    Preview(PreviewArgs),
    /// Review matches and send emails one recipient at a time
    Send(SendArgs),
}

#[derive(Args, Debug)]
pub(crate) struct LoadArgs {
    /// Recruiter CSV export (header row required)
    #[arg(long)]
    pub(crate) contacts: PathBuf,
    /// Number of rows to preview
    #[arg(long, default_value_t = 5)]
    pub(crate) preview: usize,
}

#[derive(Args, Debug)]
pub(crate) struct QueryArgs {
    /// Recruiter CSV export (header row required)
    #[arg(long)]
    pub(crate) contacts: PathBuf,
    /// Your skills, comma separated (e.g. "python, react")
    #[arg(long)]
    pub(crate) skills: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    #[command(flatten)]
    pub(crate) query: QueryArgs,
    /// Output format for the match listing
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    #[command(flatten)]
    pub(crate) query: QueryArgs,
    /// Name used in the email signature (overrides OUTREACH_SENDER_NAME)
    #[arg(long)]
    pub(crate) sender_name: Option<String>,
    /// Custom template using {{ name }}, {{ company }}, {{ role }}, {{ skills_list }}, {{ sender_name }}
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SendArgs {
    #[command(flatten)]
    pub(crate) preview: PreviewArgs,
    /// Sender address used to log in to the relay (overrides OUTREACH_SENDER_EMAIL)
    #[arg(long)]
    pub(crate) sender_email: Option<String>,
    /// Resume attached to every email (PDF or DOCX)
    #[arg(long)]
    pub(crate) resume: Option<PathBuf>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Load(args) => run_load(args),
        Command::Match(args) => run_match(args),
        Command::Preview(args) => run_preview(args, &config),
        Command::Send(args) => run_send(args, &config),
    }
}
