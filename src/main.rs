use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dongban::config::Config;
use dongban::crawler::{CrawlOrchestrator, GoogleNewsFeed};
use dongban::output::{self, OutputPaths};
use dongban::parser::ContentExtractor;
use dongban::utils::split_keywords;

#[derive(Parser)]
#[command(
    name = "dongban",
    version,
    about = "Collects Korean shared-growth and fair-trade news from Google News",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every keyword and write the relevant articles
    Crawl {
        /// Comma-separated keywords, replacing the configured list
        #[arg(short, long)]
        keywords: Option<String>,

        /// Maximum feed entries consumed per keyword
        #[arg(short, long)]
        max_results: Option<usize>,

        /// Pause between keyword queries in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Directory for result files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip the JSON result file
        #[arg(long, default_value = "false")]
        no_json: bool,

        /// Skip the CSV result file
        #[arg(long, default_value = "false")]
        no_csv: bool,

        /// Fetch each article page and attach its text
        #[arg(long, default_value = "false")]
        with_content: bool,
    },

    /// Extract article text from a single page
    Extract {
        /// Article URL
        url: String,

        /// Maximum characters to keep
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());

    let (level, format) = match &config {
        Ok(config) => (config.logging.level.clone(), config.logging.format.clone()),
        Err(_) => ("info".to_string(), "text".to_string()),
    };
    let format = cli.log_format.clone().unwrap_or(format);
    if let Err(e) = setup_tracing(&format, &level, cli.verbose) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    let result = match config {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "dongban failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_env();
    Ok(config)
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().or_else(|_| {
        let directives = if verbose {
            "dongban=debug,info".to_string()
        } else {
            format!("dongban={level},warn")
        };
        tracing_subscriber::EnvFilter::try_new(directives)
    })?;

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .try_init()?;
        }
    }

    Ok(())
}

async fn run(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Crawl {
            keywords,
            max_results,
            delay_ms,
            output_dir,
            no_json,
            no_csv,
            with_content,
        } => {
            if let Some(keywords) = keywords {
                config.keywords = split_keywords(&keywords);
            }
            if let Some(max_results) = max_results {
                config.crawler.max_results_per_keyword = max_results;
            }
            if let Some(delay_ms) = delay_ms {
                config.crawler.keyword_delay_ms = delay_ms;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            config.output.write_json &= !no_json;
            config.output.write_csv &= !no_csv;
            config.content.enabled |= with_content;

            config.validate()?;
            crawl(&config).await
        }

        Commands::Extract { url, max_chars } => {
            if let Some(max_chars) = max_chars {
                config.content.max_chars = max_chars;
            }
            config.validate()?;
            extract(&config, &url).await
        }

        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{rendered}");
            Ok(())
        }
    }
}

async fn crawl(config: &Config) -> Result<()> {
    tracing::info!(
        keywords = config.keywords.len(),
        max_results = config.crawler.max_results_per_keyword,
        with_content = config.content.enabled,
        "Starting crawl"
    );

    let feed = GoogleNewsFeed::from_config(config).context("Failed to create feed client")?;
    let orchestrator = CrawlOrchestrator::from_config(feed, config);

    let mut result = orchestrator.run(&config.keywords).await;

    if config.content.enabled && !result.is_empty() {
        let extractor =
            ContentExtractor::from_config(config).context("Failed to create content extractor")?;
        result = extractor.enrich(result).await;
    }

    print!("{}", output::render_summary(&result));

    if result.is_empty() {
        tracing::warn!("No relevant articles found; try other keywords or run again later");
        return Ok(());
    }

    let paths = OutputPaths::from_config(&config.output, Local::now());
    let report = output::write_all(&paths, result.articles());
    for path in &report.written {
        println!("저장됨: {}", path.display());
    }
    if !report.is_success() {
        tracing::warn!(
            failed = report.errors.len(),
            "Some result files could not be written"
        );
    }

    Ok(())
}

async fn extract(config: &Config, url: &str) -> Result<()> {
    let extractor =
        ContentExtractor::from_config(config).context("Failed to create content extractor")?;

    let text = extractor
        .try_extract(url)
        .await
        .with_context(|| format!("Failed to extract {url}"))?;

    if text.is_empty() {
        tracing::warn!(url = %url, "No article text found");
    } else {
        println!("{text}");
    }

    Ok(())
}
