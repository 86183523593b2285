//! GitHub crawler CLI - keyword search with proxy rotation.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use github_crawler::proxy::normalize_proxy;
use github_crawler::{CrawlerConfig, SearchCategory, SearchClient, SearchQuery};

/// GitHub crawler to search by keywords in desired GitHub section. Comes with proxy support.
#[derive(Parser)]
#[command(name = "github-crawler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Comma-separated list of keywords
    #[arg(short, long)]
    keywords: String,

    /// Type of search on GitHub
    #[arg(short = 't', long = "type", value_enum)]
    search_type: SearchType,

    /// Comma-separated list of proxies (e.g. 1.1.1.1:8080,socks5://2.2.2.2:1080).
    /// Without it, proxies are fetched from a public list.
    #[arg(short, long)]
    proxies: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Total fetch attempts
    #[arg(short, long, default_value = "5")]
    retries: u32,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchType {
    #[value(name = "Repositories")]
    Repositories,
    #[value(name = "Issues")]
    Issues,
    #[value(name = "Wikis")]
    Wikis,
}

impl From<SearchType> for SearchCategory {
    fn from(value: SearchType) -> Self {
        match value {
            SearchType::Repositories => SearchCategory::Repositories,
            SearchType::Issues => SearchCategory::Issues,
            SearchType::Wikis => SearchCategory::Wikis,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let keywords = split_list(&cli.keywords);
    if keywords.is_empty() {
        bail!("Error parsing keywords: no keyword given in '{}'", cli.keywords);
    }

    let config = crawler_config(&cli);

    let proxies = match &cli.proxies {
        Some(raw) => parse_proxies(raw, &config.rotator.default_scheme)?,
        None => Vec::new(),
    };

    let category = SearchCategory::from(cli.search_type);
    if matches!(cli.format, OutputFormat::Text) {
        eprintln!("Keywords: {:?}", keywords);
        eprintln!("Search Type: {}", category);
        eprintln!("Proxies: {:?}", proxies);
    }

    let client = SearchClient::with_config(config).context("Error initializing GitHub crawler")?;
    let query = search_query(keywords, category, proxies);

    let results = client.search(&query).await.context("Error during search")?;

    match cli.format {
        OutputFormat::Text => {
            println!("Search URLs:");
            for result in &results {
                println!("  {}", result.url);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}

/// Timeout and retry budget live here only; the query inherits them.
fn crawler_config(cli: &Cli) -> CrawlerConfig {
    CrawlerConfig {
        timeout_secs: cli.timeout,
        retries: cli.retries,
        ..Default::default()
    }
}

fn search_query(
    keywords: Vec<String>,
    category: SearchCategory,
    proxies: Vec<String>,
) -> SearchQuery {
    SearchQuery::new(keywords, category).with_proxies(proxies)
}

/// Splits a comma-separated argument, dropping blank items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses and validates a comma-separated proxy list.
fn parse_proxies(raw: &str, default_scheme: &str) -> Result<Vec<String>> {
    let proxies = split_list(raw);
    if proxies.is_empty() {
        bail!("Error parsing proxies: no proxy given in '{}'", raw);
    }

    for proxy in &proxies {
        let normalized = normalize_proxy(proxy, default_scheme);
        let url = url::Url::parse(&normalized)
            .with_context(|| format!("Error parsing proxies: invalid proxy '{}'", proxy))?;
        if url.host_str().is_none() {
            bail!("Error parsing proxies: missing host in '{}'", proxy);
        }
    }

    Ok(proxies)
}
