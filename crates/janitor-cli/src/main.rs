mod output;
mod sweep;

use clap::builder::BoolishValueParser;
use clap::error::ErrorKind;
use clap::Parser;
use janitor_core::config::DEFAULT_THRESHOLD_HOURS;
use janitor_core::{JanitorError, RawConfig};
use trello_api::ClientError;

/// Exit status for configuration problems detected before any board traffic.
const EXIT_CONFIG: i32 = 1;
/// Exit status for fatal board errors during the run.
const EXIT_FATAL: i32 = 2;

#[derive(Parser)]
#[command(
    name = "trello-janitor",
    about = "Archive or delete inactive Trello cards and reorder cards by similarity score",
    version
)]
struct Cli {
    /// Trello API key
    #[arg(long, env = "TRELLO_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Trello API token
    #[arg(long, env = "TRELLO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Trello REST base URL
    #[arg(long, env = "TRELLO_API_URL")]
    api_url: Option<String>,

    /// Comma-separated list ids whose stale cards are archived
    #[arg(long, env = "TRELLO_ARCHIVE_LIST")]
    archive_lists: Option<String>,

    /// Comma-separated list ids whose stale cards are deleted
    #[arg(long, env = "TRELLO_DELETE_LIST")]
    delete_lists: Option<String>,

    /// Comma-separated list ids whose cards are ordered by similarity score
    #[arg(long, env = "TRELLO_REORDER_LIST")]
    reorder_lists: Option<String>,

    /// Inactivity threshold in hours (fractional allowed)
    #[arg(long, env = "CARD_INACTIVITY_THRESHOLD_HOURS", default_value = DEFAULT_THRESHOLD_HOURS)]
    threshold_hours: String,

    /// Treat failed archive/delete/reposition requests as fatal
    #[arg(long, env = "JANITOR_STRICT_MUTATIONS", value_parser = BoolishValueParser::new())]
    strict_mutations: bool,

    /// Maximum number of cards processed at once (0 = unbounded)
    #[arg(long, env = "JANITOR_MAX_CONCURRENCY", default_value = "0")]
    max_concurrency: usize,

    /// Report what would change without touching the board
    #[arg(long, env = "JANITOR_DRY_RUN", value_parser = BoolishValueParser::new())]
    dry_run: bool,

    /// Print the run report as JSON
    #[arg(long, short = 'j')]
    json: bool,
}

impl Cli {
    fn raw_config(&self) -> RawConfig {
        RawConfig {
            key: self.key.clone(),
            token: self.token.clone(),
            api_url: self.api_url.clone(),
            archive_lists: self.archive_lists.clone(),
            delete_lists: self.delete_lists.clone(),
            reorder_lists: self.reorder_lists.clone(),
            threshold_hours: Some(self.threshold_hours.clone()),
            strict_mutations: self.strict_mutations,
            max_concurrency: self.max_concurrency,
            dry_run: self.dry_run,
        }
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    let is_config = err.chain().any(|cause| {
        matches!(cause.downcast_ref::<JanitorError>(), Some(e) if e.is_config())
            || matches!(
                cause.downcast_ref::<ClientError>(),
                Some(ClientError::InvalidBaseUrl(_))
            )
    });
    if is_config {
        EXIT_CONFIG
    } else {
        EXIT_FATAL
    }
}

/// Parse flags and environment. Help and version exit normally; any rejected
/// value is a configuration error.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn main() {
    let cli = parse_cli();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = sweep::run(cli.raw_config(), cli.json) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}
