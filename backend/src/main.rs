//! Smokestats CLI
//!
//! ```bash
//! smokestats serve --static-dir frontend/dist   # HTTP API + frontend (port 3000)
//! smokestats fetch                              # Print the decoded INE CSV
//! smokestats table --format csv                 # Wide table (json or csv)
//! smokestats regions                            # Region list
//! smokestats chart --regions "Andalucía,Total Nacional"
//! ```
//!
//! Every data command accepts `--input FILE` to read a local copy instead
//! of downloading.

use clap::{Args, Parser, Subcommand, ValueEnum};
use smokestats::{
    load_dashboard, server::start_server, server::ServerConfig, Dashboard, DatasetFetcher,
    FetchCache, FetchConfig, Fetcher, FileFetcher, HttpFetcher, PipelineOptions,
    RegionSelection, TextEncoding,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "smokestats")]
#[command(about = "Smoking in Spain by autonomous community (INE data)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Local CSV file used instead of the INE download
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Declared encoding of the data (utf-8, latin1, latin9, windows-1252, auto)
    #[arg(long, default_value = "auto")]
    encoding: TextEncoding,

    /// Download timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,
}

#[derive(Copy, Clone, ValueEnum)]
enum TableFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Built frontend directory to serve at /
        #[arg(long)]
        static_dir: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Download the dataset and print the decoded CSV
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the wide table (regions × periods)
    Table {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long, value_enum, default_value = "json")]
        format: TableFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the region list
    Regions {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the Vega-Lite chart spec
    Chart {
        #[command(flatten)]
        source: SourceArgs,

        /// Comma-separated regions selected initially
        #[arg(short, long, default_value = "")]
        regions: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl SourceArgs {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default().with_timeout(Duration::from_secs(self.timeout_secs))
    }

    fn options(&self) -> PipelineOptions {
        PipelineOptions {
            encoding: self.encoding,
            ..PipelineOptions::default()
        }
    }

    fn fetcher(&self) -> Result<DatasetFetcher, Box<dyn std::error::Error>> {
        Ok(match &self.input {
            Some(path) => DatasetFetcher::File(FileFetcher::new(path)),
            None => DatasetFetcher::Http(HttpFetcher::new(self.fetch_config())?),
        })
    }

    async fn dashboard(&self) -> Result<Dashboard, Box<dyn std::error::Error>> {
        let cache = FetchCache::new();
        let dashboard = load_dashboard(&cache, &self.fetcher()?, &self.options()).await?;
        Ok(dashboard)
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            static_dir,
            source,
        } => cmd_serve(port, static_dir, &source).await,

        Commands::Fetch { source, output } => cmd_fetch(&source, output.as_deref()).await,

        Commands::Table {
            source,
            format,
            output,
        } => cmd_table(&source, format, output.as_deref()).await,

        Commands::Regions { source } => cmd_regions(&source).await,

        Commands::Chart {
            source,
            regions,
            output,
        } => cmd_chart(&source, &regions, output.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    port: u16,
    static_dir: Option<PathBuf>,
    source: &SourceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig {
        port,
        static_dir,
        input: source.input.clone(),
        fetch: source.fetch_config(),
        pipeline: source.options(),
    };
    start_server(config).await
}

async fn cmd_fetch(source: &SourceArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let options = source.options();
    let url = options.source.csv_url();

    let bytes = source.fetcher()?.fetch(&url).await?;
    let (text, encoding) = smokestats::decode_content(&bytes, options.encoding)?;
    eprintln!("📥 {} bytes ({})", bytes.len(), encoding.label());

    write_output(&text, output)
}

async fn cmd_table(
    source: &SourceArgs,
    format: TableFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = source.dashboard().await?;
    eprintln!(
        "📊 {} regions × {} periods",
        dashboard.table.height(),
        dashboard.table.width()
    );

    let content = match format {
        TableFormat::Json => serde_json::to_string_pretty(&dashboard.table)?,
        TableFormat::Csv => dashboard.table.to_csv(b';')?,
    };
    write_output(&content, output)
}

async fn cmd_regions(source: &SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = source.dashboard().await?;
    for region in &dashboard.regions {
        println!("{}", region);
    }
    Ok(())
}

async fn cmd_chart(
    source: &SourceArgs,
    regions: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = source.dashboard().await?;
    let selection = RegionSelection::from_query(regions);

    for region in selection.iter().filter(|r| !dashboard.regions.contains(r)) {
        eprintln!("⚠️  Unknown region '{}' (it will match no series)", region);
    }

    let spec = dashboard.chart(&selection);
    write_output(&serde_json::to_string_pretty(&spec)?, output)
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
