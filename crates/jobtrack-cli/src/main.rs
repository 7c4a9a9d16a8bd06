use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::applications::{AddArgs, ListArgs, UpdateArgs};
use commands::documents::DocumentArgs;
use commands::Runtime;
use jobtrack_core::application::ApplicationStatus;
use jobtrack_infrastructure::TrackerConfig;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications, resumes and cover letters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List applications as JSON
    List(ListArgs),
    /// Add an application
    Add(AddArgs),
    /// Move an application to another status
    Status {
        id: String,
        #[arg(value_parser = commands::parse_status)]
        status: ApplicationStatus,
    },
    /// Edit fields of an application
    Update(UpdateArgs),
    /// Delete an application
    Delete { id: String },
    /// Manage resumes
    Resume {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Manage cover letters
    CoverLetter {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Pipeline statistics
    Stats {
        /// Months of history in the monthly breakdown (1-120)
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..=120))]
        months: u32,
    },
    /// Applications grouped by status
    Board,
    /// Sign in to the remote backend
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and switch to local data
    Logout,
}

#[derive(Subcommand)]
enum DocumentAction {
    /// Add a document
    Add(DocumentArgs),
    /// List documents as JSON
    List,
}

/// Logs go to stderr so JSON output on stdout stays clean. The filter comes
/// from `JOBTRACK_LOG`, then `RUST_LOG`, defaulting to `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("JOBTRACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = TrackerConfig::load()?;
    let runtime = Runtime::start(&config).await?;

    let result = match cli.command {
        Commands::List(args) => commands::applications::list(&runtime, args).await,
        Commands::Add(args) => commands::applications::add(&runtime, args).await,
        Commands::Status { id, status } => commands::applications::set_status(&runtime, &id, status).await,
        Commands::Update(args) => commands::applications::update(&runtime, args).await,
        Commands::Delete { id } => commands::applications::delete(&runtime, &id).await,
        Commands::Resume { action } => match action {
            DocumentAction::Add(args) => commands::documents::add_resume(&runtime, args).await,
            DocumentAction::List => commands::documents::list_resumes(&runtime).await,
        },
        Commands::CoverLetter { action } => match action {
            DocumentAction::Add(args) => commands::documents::add_cover_letter(&runtime, args).await,
            DocumentAction::List => commands::documents::list_cover_letters(&runtime).await,
        },
        Commands::Stats { months } => commands::insights::stats(&runtime, months).await,
        Commands::Board => commands::insights::board(&runtime).await,
        Commands::Login { email, password } => commands::auth::login(&runtime, &email, &password).await,
        Commands::Logout => commands::auth::logout(&runtime).await,
    };

    runtime.shutdown().await;
    result
}
