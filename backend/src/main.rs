//! Lottosheet CLI - lottery games from a spreadsheet range
//!
//! # Commands
//!
//! ```bash
//! lottosheet serve                  # Start HTTP server (port 3000)
//! lottosheet games                  # Print the JSON envelope once
//! lottosheet grid                   # Dump the raw cells of the range
//! lottosheet validate saved.json    # Check a saved envelope
//! lottosheet fetch                  # Read games from SHEET_API_URL
//! ```
//!
//! Settings come from the environment (see `lottosheet::config`); flags win.

use clap::{Args, Parser, Subcommand};
use lottosheet::config::sheet_api_url_from_env;
use lottosheet::{
    draw_games, open_workbook, validate_envelope, Config, ConfigError, SheetApiClient,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lottosheet")]
#[command(about = "Serve 6/45 lottery games from a spreadsheet range", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default: $PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// Read the sheet once and print the JSON envelope
    Games {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Dump the raw cells of the configured range as JSON
    Grid {
        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// Validate a saved JSON envelope against the response schema
    Validate {
        /// Input JSON file
        input: PathBuf,
    },

    /// Fetch games from a deployed endpoint
    Fetch {
        /// Endpoint URL (default: $SHEET_API_URL)
        #[arg(short, long)]
        url: Option<String>,
    },
}

/// Where to read from; each flag overrides its environment variable.
#[derive(Args)]
struct SheetArgs {
    /// Workbook: directory of CSV sheets or a .json file
    #[arg(short, long)]
    workbook: Option<PathBuf>,

    /// Sheet name
    #[arg(short, long)]
    sheet: Option<String>,

    /// A1 range holding one game per row
    #[arg(short, long)]
    range: Option<String>,

    /// Drop games with repeated numbers
    #[arg(long)]
    strict: bool,
}

impl SheetArgs {
    /// Flags as setting overrides, so they replace (not follow) the
    /// environment values when the config is parsed.
    fn overrides(self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(workbook) = self.workbook {
            overrides.push(("LOTTOSHEET_WORKBOOK", workbook.to_string_lossy().into_owned()));
        }
        if let Some(sheet) = self.sheet {
            overrides.push(("LOTTOSHEET_SHEET", sheet));
        }
        if let Some(range) = self.range {
            overrides.push(("LOTTOSHEET_RANGE", range));
        }
        if self.strict {
            overrides.push(("LOTTOSHEET_REJECT_DUPLICATES", "true".to_string()));
        }
        overrides
    }

    fn load(self) -> Result<Config, ConfigError> {
        Config::from_env_with(&self.overrides())
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Settings are loaded per command: `validate` needs none, `fetch` only the URL.
async fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve { port, sheet } => {
            let mut overrides = sheet.overrides();
            if let Some(port) = port {
                overrides.push(("PORT", port.to_string()));
            }
            let config = Config::from_env_with(&overrides)?;
            lottosheet::server::start_server(&config).await?;
            Ok(())
        }

        Commands::Games { sheet, output, pretty } => {
            cmd_games(&sheet.load()?, output.as_deref(), pretty)
        }

        Commands::Grid { sheet } => cmd_grid(&sheet.load()?),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Fetch { url } => {
            let url = match url {
                Some(url) => url,
                None => sheet_api_url_from_env()?,
            };
            cmd_fetch(&url).await
        }
    }
}

fn cmd_games(
    config: &Config,
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Workbook: {}", config.workbook.display());
    eprintln!("   Sheet: {} ({})", config.draw.sheet, config.draw.range);

    let workbook = open_workbook(&config.workbook);
    let response = draw_games(workbook.as_ref(), &config.draw);

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        response.to_json()
    };
    write_output(&json, output)?;

    match response.error() {
        None => {
            eprintln!("✅ {} games", response.count().unwrap_or(0));
            Ok(())
        }
        Some(error) => Err(error.into()),
    }
}

fn cmd_grid(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = open_workbook(&config.workbook);
    let sheet = workbook
        .open_sheet(&config.draw.sheet)?
        .ok_or_else(|| format!("Sheet not found: {}", config.draw.sheet))?;

    let values = sheet.values(&config.draw.range);
    eprintln!("📋 {}!{} ({} × {})", sheet.name, config.draw.range, config.draw.range.height(), config.draw.range.width());
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let envelope: Value = serde_json::from_str(&content)?;

    if let Err(errors) = validate_envelope(&envelope) {
        eprintln!("\n❌ Envelope invalid:");
        for err in errors.iter().take(5) {
            eprintln!("   - {}", err);
        }
        std::process::exit(1);
    }

    eprintln!("✅ Envelope valid");
    Ok(())
}

async fn cmd_fetch(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = SheetApiClient::new(url);
    eprintln!("📡 Fetching: {}", client.url());

    let games = client.fetch_games().await?;
    eprintln!("✅ {} games", games.len());
    for game in &games {
        let numbers: Vec<String> = game.numbers.iter().map(u8::to_string).collect();
        println!("  게임 {}: {}", game.index, numbers.join(", "));
    }
    Ok(())
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
