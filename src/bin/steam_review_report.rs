use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use steam_review_report::app::App;
use steam_review_report::config::{ConfigLoader, ConfigOverrides};
use steam_review_report::credential::resolve_api_key;
use steam_review_report::domain::RatioPolicy;
use steam_review_report::error::ReportError;
use steam_review_report::output::{ConsoleProgress, JsonOutput, OutputMode, print_summary};
use steam_review_report::steam::StoreHttpClient;

#[derive(Parser)]
#[command(name = "steam-review-report")]
#[command(about = "Enrich Steam app ids with store metadata and review ratios, written as CSV")]
#[command(version, author)]
struct Cli {
    /// JSON config file (default: ./steam-review-report.json, then the user config dir)
    #[arg(long)]
    config: Option<String>,

    /// CSV file whose first column holds the app ids
    #[arg(long)]
    input: Option<String>,

    /// CSV report destination
    #[arg(long)]
    output: Option<String>,

    /// Language compared against all-language reviews
    #[arg(long)]
    language: Option<String>,

    /// Single character joining genres, publishers and languages
    #[arg(long)]
    delimiter: Option<String>,

    /// How ratios treat review summaries that fell back to sentinel counts
    #[arg(long, value_enum)]
    ratio_policy: Option<RatioPolicy>,

    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<ReportError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ReportError) -> u8 {
    match error {
        err if err.is_input_error() => 2,
        ReportError::MissingConfig(_)
        | ReportError::ConfigRead(_)
        | ReportError::ConfigParse(_)
        | ReportError::InvalidConfig(_)
        | ReportError::Credential(_) => 2,
        ReportError::StoreHttp(_) | ReportError::StoreStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let overrides = ConfigOverrides {
        input: cli.input,
        output: cli.output,
        target_language: cli.language,
        delimiter: cli.delimiter,
        ratio_policy: cli.ratio_policy,
    };
    let config = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;

    let api_key = resolve_api_key(cli.api_key)?;
    let client = StoreHttpClient::new(api_key, &config.store_base_url)?;
    let app = App::new(client, config);

    match output_mode {
        OutputMode::Json => {
            let summary = app.generate(&JsonOutput)?;
            JsonOutput::print_summary(&summary).into_diagnostic()?;
        }
        OutputMode::Human => {
            let summary = app.generate(&ConsoleProgress)?;
            print_summary(&summary);
        }
    }
    Ok(())
}
