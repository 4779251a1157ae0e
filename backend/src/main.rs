//! Ledgerlift CLI - extract transactions from bank statement spreadsheets
//!
//! # Commands
//!
//! ```bash
//! ledgerlift extract statement.xls        # Print transactions as JSON
//! ledgerlift inspect statement.xlsx       # Show header detection details
//! ledgerlift aliases > aliases.json       # Dump the default alias table
//! ledgerlift serve                        # Start HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use ledgerlift::{AliasTable, ExtractorConfig, Settings, StatementExtractor};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ledgerlift")]
#[command(about = "Extract normalized transactions from bank statement spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract transactions and print them as JSON
    Extract {
        /// Statement file (.xls or .xlsx)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON alias table overriding the defaults
        #[arg(long)]
        aliases: Option<PathBuf>,

        /// Print totals to stderr
        #[arg(long)]
        summary: bool,
    },

    /// Show detected format, header row, column mapping and skipped rows
    Inspect {
        /// Statement file (.xls or .xlsx)
        input: PathBuf,

        /// JSON alias table overriding the defaults
        #[arg(long)]
        aliases: Option<PathBuf>,
    },

    /// Print the default alias table as JSON
    Aliases,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: LEDGERLIFT_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ledgerlift=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            aliases,
            summary,
        } => cmd_extract(&input, output.as_deref(), aliases.as_deref(), summary),

        Commands::Inspect { input, aliases } => cmd_inspect(&input, aliases.as_deref()),

        Commands::Aliases => cmd_aliases(),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(aliases: Option<&Path>) -> Result<(Settings, ExtractorConfig), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let config = settings.extractor_config(aliases)?;
    Ok((settings, config))
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    aliases: Option<&Path>,
    summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let (_, config) = load_config(aliases)?;
    let report = StatementExtractor::new(config).extract_report(input)?;

    if let Some(format) = report.format {
        eprintln!("   Format: {}", format);
    }
    if let Some(row) = report.header_row {
        eprintln!("   Header row: {}", row);
    }
    eprintln!("✅ Extracted {} transactions", report.records.len());
    if !report.skipped.is_empty() {
        eprintln!("   Skipped {} rows", report.skipped.len());
    }

    if summary {
        let totals = report.summary();
        eprintln!("\n📊 Summary");
        eprintln!("   Transactions: {}", totals.count);
        eprintln!("   Withdrawals:  {:.2}", totals.total_withdrawals);
        eprintln!("   Deposits:     {:.2}", totals.total_deposits);
        eprintln!("   Net:          {:.2}", totals.net);
    }

    let json = serde_json::to_string_pretty(&report.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_inspect(input: &Path, aliases: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔍 Inspecting: {}", input.display());

    let (settings, config) = load_config(aliases)?;
    let report = StatementExtractor::new(config).extract_report(input)?;

    println!(
        "Format:        {}",
        report.format.map(|f| f.to_string()).unwrap_or_else(|| "-".into())
    );
    println!(
        "Thresholds:    header > {}, field > {}",
        settings.header_threshold, settings.field_threshold
    );
    println!("Candidates:    {:?}", report.candidates);
    match report.header_row {
        Some(row) => println!("Header row:    {}", row),
        None => println!("Header row:    - (empty sheet)"),
    }
    println!("Mapping:");
    for (field, col) in report.mapping.fields() {
        println!("   {:<12} column {}", field, col);
    }
    println!("Records:       {}", report.records.len());
    if !report.skipped.is_empty() {
        println!("Skipped rows:");
        for skipped in &report.skipped {
            println!("   row {:<6} {}", skipped.row, skipped.reason);
        }
    }

    Ok(())
}

fn cmd_aliases() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AliasTable::default().to_json()?);
    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config) = load_config(None)?;
    ledgerlift::server::start_server(port.unwrap_or(settings.port), config).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
