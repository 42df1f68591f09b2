//! corpdir-import: load companies from a CSV file into the directory.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use corpdir_api::{config::DEFAULT_DATABASE_URL, import, telemetry};
use corpdir_db::Database;

#[derive(Parser)]
#[command(name = "corpdir-import")]
#[command(author, version, about = "Import companies from CSV into the company directory")]
struct Cli {
    /// CSV file with company_ko, company_en, company_ja, tag_ko, tag_en, tag_ja columns
    #[arg(short, long)]
    file: PathBuf,

    /// Database URL (default: $DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Parse the file and report what would be imported without writing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard =
        telemetry::init_tracing("corpdir_api=info,corpdir_db=warn", "corpdir-import.log");

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when some rows failed.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let input = File::open(&cli.file)
        .with_context(|| format!("Failed to open CSV file: {}", cli.file.display()))?;
    let rows = import::parse_csv(input)
        .with_context(|| format!("Failed to parse CSV file: {}", cli.file.display()))?;

    if cli.dry_run {
        for row in &rows {
            println!(
                "line {}: [{}] {}",
                row.line,
                row.display_language,
                serde_json::to_string(&row.request)?
            );
        }
        info!(subsystem = "import", row_count = rows.len(), "Dry run, nothing written");
        return Ok(true);
    }

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let summary = import::import_rows(&db.directory, rows).await;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(summary.failed == 0)
}
