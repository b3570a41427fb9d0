use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use comfy_table::Table;
use configuration::{Config, ConfigArgs, ReportSettings};
use core_types::{OutputFormat, Record, column_names, value_to_text};
use database::{Catalog, DatabaseManager, ROOMS, ReportQuery, STUDENTS, connect_options};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod prompt;

use prompt::Prompter;

/// Rows shown in the terminal preview; the report file always has all of them.
const PREVIEW_ROWS: usize = 20;

/// The main entry point: load the dormitory datasets and export one report.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays free for prompts and the preview.
    let (log_writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Credentials may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config.load().context("Failed to load configuration")?;

    run(cli, config).await
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Loads rooms and students into PostgreSQL and exports a report as JSON or XML.
///
/// Anything not given on the command line is asked for interactively.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Path to the rooms JSON file.
    #[arg(long)]
    rooms: Option<PathBuf>,

    /// Path to the students JSON file.
    #[arg(long)]
    students: Option<PathBuf>,

    /// Use the configured input paths without asking.
    #[arg(long, conflicts_with_all = ["rooms", "students"])]
    defaults: bool,

    /// The report to run (1-4).
    #[arg(long)]
    query: Option<usize>,

    /// The output format: json or xml (case-insensitive).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Directory receiving the report file. Overrides the configuration.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keep existing tables instead of dropping and recreating them.
    #[arg(long)]
    keep_tables: bool,
}

// ==============================================================================
// Pipeline
// ==============================================================================

/// Runs the whole pipeline on one connection, disconnecting on every path.
async fn run(cli: Cli, config: Config) -> Result<()> {
    let mut prompter = Prompter::stdio();
    let (rooms_path, students_path) = resolve_input_paths(&cli, &config.report, &mut prompter)?;

    let catalog = Catalog::standard();
    let mut db = DatabaseManager::new(connect_options(&config.database), catalog);
    db.connect()
        .await
        .context("Failed to connect to the database")?;

    let outcome = export_report(
        &cli,
        &config.report,
        &mut db,
        &mut prompter,
        &rooms_path,
        &students_path,
    )
    .await;

    let disconnected = db.disconnect().await;
    match outcome {
        Ok(()) => disconnected.context("Failed to disconnect from the database"),
        Err(e) => {
            if let Err(disconnect_err) = disconnected {
                tracing::warn!(error = %disconnect_err, "Disconnect after a failed run also failed.");
            }
            Err(e)
        }
    }
}

/// Flags win over prompting; a single flag fills in the configured default for the other file.
fn resolve_input_paths<R: BufRead, W: Write>(
    cli: &Cli,
    settings: &ReportSettings,
    prompter: &mut Prompter<R, W>,
) -> Result<(PathBuf, PathBuf)> {
    if cli.defaults {
        return Ok((settings.rooms_path.clone(), settings.students_path.clone()));
    }
    if cli.rooms.is_some() || cli.students.is_some() {
        let rooms = cli.rooms.clone().unwrap_or_else(|| settings.rooms_path.clone());
        let students = cli
            .students
            .clone()
            .unwrap_or_else(|| settings.students_path.clone());
        return Ok((rooms, students));
    }
    prompter.input_paths(&settings.rooms_path, &settings.students_path)
}

async fn export_report<R: BufRead, W: Write>(
    cli: &Cli,
    settings: &ReportSettings,
    db: &mut DatabaseManager,
    prompter: &mut Prompter<R, W>,
    rooms_path: &Path,
    students_path: &Path,
) -> Result<()> {
    // Rooms first: students reference them.
    let drop = !cli.keep_tables;
    for table in [ROOMS, STUDENTS] {
        db.create_table(table, drop)
            .await
            .with_context(|| format!("Failed to prepare table '{table}'"))?;
    }

    let rooms = report::load(rooms_path)?;
    let students = report::load(students_path)?;

    db.insert_values(&rooms, ROOMS)
        .await
        .context("Failed to insert rooms")?;
    db.insert_values(&students, STUDENTS)
        .await
        .context("Failed to insert students")?;

    let number = match cli.query {
        Some(number) => number,
        None => prompter.query_number(db.catalog().queries().len())?,
    };
    let format = match cli.format {
        Some(format) => format,
        None => prompter.output_format()?,
    };

    let (query, records) = db
        .run_report(number)
        .await
        .with_context(|| format!("Failed to run query {number}"))?;

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir.clone());
    report::prepare_output_dir(&output_dir)?;
    let path = report::output_path(&output_dir, query.number, format, Local::now().naive_local());
    report::write(&records, &path, format)?;

    print_preview(&query, &records);
    if records.is_empty() && format == OutputFormat::Xml {
        println!("No rows returned; no XML file was written.");
    } else {
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn print_preview(query: &ReportQuery, records: &[Record]) {
    println!("Query {}: {}", query.number, query.title);
    let Some(first) = records.first() else {
        println!("(no rows)");
        return;
    };

    let mut table = Table::new();
    table.set_header(column_names(first));
    for record in records.iter().take(PREVIEW_ROWS) {
        table.add_row(record.values().map(value_to_text).collect::<Vec<_>>());
    }
    println!("{table}");

    if records.len() > PREVIEW_ROWS {
        println!("... {} more rows", records.len() - PREVIEW_ROWS);
    }
}
