//! Sitelens main entry point
//!
//! Command-line interface: run the HTTP service, analyze a single URL, or
//! validate a configuration file.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sitelens::config::{load_config_with_hash, validate, Capabilities, Config};
use sitelens::output::{write_report, MarkdownRenderer};
use sitelens::server::{serve, AppState};
use sitelens::storage::MemoryResultStore;
use sitelens::{AnalysisRequest, ArticleRequest, Language, Orchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Sitelens: concurrent website analysis
///
/// Fetches a page once and runs SEO, UX, domain trust, page-speed and AI
/// analyses concurrently, folding them into one scored report.
#[derive(Parser, Debug)]
#[command(name = "sitelens")]
#[command(version)]
#[command(about = "Concurrent website analysis", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Overrides `server.bind-address`
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Analyze one URL and print the result
    Analyze {
        url: String,

        #[arg(long, value_enum, default_value_t = LanguageArg::En)]
        language: LanguageArg,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Run the AI article review on a text file and print it as JSON
    AnalyzeArticle {
        /// File holding the article text
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = LanguageArg::En)]
        language: LanguageArg,
    },

    /// Validate the configuration and show the effective settings
    CheckConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LanguageArg {
    En,
    Ar,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::Ar => Language::Ar,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_ref())?;
    let capabilities = Capabilities::from_config(&config);
    tracing::info!("Optional collaborators: {:?}", capabilities);

    match cli.command {
        Command::Serve { bind } => handle_serve(config, capabilities, bind).await,
        Command::Analyze {
            url,
            language,
            format,
            output,
        } => handle_analyze(&config, &capabilities, &url, language.into(), format, output).await,
        Command::AnalyzeArticle { file, language } => {
            handle_analyze_article(&config, &capabilities, &file, language.into()).await
        }
        Command::CheckConfig => {
            handle_check_config(&config, &capabilities);
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitelens=info,warn"),
            1 => EnvFilter::new("sitelens=debug,info"),
            2 => EnvFilter::new("sitelens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

async fn handle_serve(
    mut config: Config,
    capabilities: Capabilities,
    bind: Option<String>,
) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
        validate(&config)?;
    }

    let orchestrator = Orchestrator::new(&config, &capabilities)?;
    let state = AppState::new(
        orchestrator,
        Arc::new(MemoryResultStore::from_config(&config.cache)),
        Arc::new(MarkdownRenderer),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind_address))?;

    serve(listener, state).await.context("Server error")
}

async fn handle_analyze(
    config: &Config,
    capabilities: &Capabilities,
    url: &str,
    language: Language,
    format: Format,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let request = AnalysisRequest::new(url, language)?;
    let orchestrator = Orchestrator::new(config, capabilities)?;
    let result = orchestrator.analyze(&request).await?;

    match (format, output) {
        (Format::Json, Some(path)) => {
            std::fs::write(&path, serde_json::to_vec_pretty(&result)?)?;
            println!("Report written to {}", path.display());
        }
        (Format::Json, None) => println!("{}", serde_json::to_string_pretty(&result)?),
        (Format::Markdown, Some(path)) => {
            write_report(&MarkdownRenderer, &result, &path)?;
            println!("Report written to {}", path.display());
        }
        (Format::Markdown, None) => {
            println!("{}", sitelens::output::format_markdown_report(&result))
        }
    }

    Ok(())
}

async fn handle_analyze_article(
    config: &Config,
    capabilities: &Capabilities,
    file: &PathBuf,
    language: Language,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read article from {}", file.display()))?;
    let request = ArticleRequest::new(&text, language)?;
    let orchestrator = Orchestrator::new(config, capabilities)?;
    let analysis = orchestrator.analyze_article(&request).await;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// Prints the effective configuration
fn handle_check_config(config: &Config, capabilities: &Capabilities) {
    println!("=== Sitelens Configuration ===\n");

    println!("Server:");
    println!("  Bind address: {}", config.server.bind_address);
    println!("  Request deadline: {}s", config.server.request_deadline_secs);
    println!(
        "  Fetch failure policy: {:?}",
        config.server.fetch_failure_policy
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nFetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Max redirects: {}", config.fetch.max_redirects);
    println!("  Max body: {} bytes", config.fetch.max_body_bytes);

    println!("\nLinks:");
    println!("  Probe timeout: {}s", config.links.timeout_secs);
    println!("  Max concurrent probes: {}", config.links.max_concurrent_probes);
    println!("  Max links checked: {}", config.links.max_links_checked);

    println!("\nSEO extended checks: {}", config.seo.extended_checks);
    println!("Domain probe timeout: {}s", config.domain.probe_timeout_secs);

    println!("\nCollaborators:");
    println!(
        "  PageSpeed Insights: {}",
        enabled(capabilities.page_speed_enabled())
    );
    println!(
        "  Generative text ({}): {}",
        config.generative_text.model,
        enabled(capabilities.generative_text_enabled())
    );

    println!("\nResult cache:");
    println!("  TTL: {}s", config.cache.ttl_secs);
    println!("  Max entries: {}", config.cache.max_entries);

    println!("\n✓ Configuration is valid");
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled (no API key)"
    }
}
