use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gnews::config::{find_config_file, load_config, Config};
use gnews::models::{locale, section_names, SearchQuery, Topic};
use gnews::news::{GoogleNews, ResolveMode};
use gnews::ui::{self, Status};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// gnews - Search Google News feeds and resolve article links
#[derive(Parser, Debug)]
#[command(name = "gnews")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search Google News feeds and resolve article links", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(flatten)]
    query: QueryArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every search command
#[derive(Args, Debug, Clone)]
struct QueryArgs {
    /// Language code or name (e.g. en, french)
    #[arg(long, short, global = true)]
    language: Option<String>,

    /// Country code or name (e.g. US, Germany)
    #[arg(long, short = 'C', global = true)]
    country: Option<String>,

    /// Maximum number of articles
    #[arg(long, short = 'n', global = true)]
    max_results: Option<usize>,

    /// Relative period such as 7d, 12h or 6m
    #[arg(long, short, global = true)]
    period: Option<String>,

    /// Publisher domains to exclude (repeatable)
    #[arg(long = "exclude", short = 'x', global = true)]
    exclude: Vec<String>,

    /// Proxy URL for this search (http and https)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Resolve links one at a time
    #[arg(long, global = true)]
    sequential: bool,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Table if stdout is a terminal, JSON otherwise
    Auto,
    Table,
    Json,
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search articles by keyword
    Search {
        keyword: String,

        /// Only articles published after this date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Only articles published before this date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Top stories
    Top,

    /// Headlines for a topic or section (see `gnews topics`)
    Topic { name: String },

    /// Headlines for a location
    Location { name: String },

    /// Articles from one site
    Site { domain: String },

    /// List topics, sections, languages and countries
    Topics,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("gnews={}", level)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_deref() == Some("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_query(command: &Commands, args: &QueryArgs, config: &Config) -> Result<Option<SearchQuery>> {
    let builder = match command {
        Commands::Search { keyword, .. } => SearchQuery::keyword(keyword.as_str()),
        Commands::Top => SearchQuery::top_news(),
        Commands::Topic { name } => SearchQuery::topic(name.as_str()),
        Commands::Location { name } => SearchQuery::location(name.as_str()),
        Commands::Site { domain } => SearchQuery::site(domain.as_str()),
        Commands::Topics | Commands::Config { .. } => return Ok(None),
    };

    let defaults = &config.defaults;
    let mut builder = builder
        .language(args.language.as_deref().unwrap_or(&defaults.language))
        .country(args.country.as_deref().unwrap_or(&defaults.country))
        .max_results(args.max_results.unwrap_or(defaults.max_results))
        .exclude_websites(args.exclude.iter().cloned());

    if let Some(period) = &args.period {
        builder = builder.period(period.as_str());
    }
    if let Commands::Search { start, end, .. } = command {
        if let Some(start) = start {
            builder = builder.start_date(*start);
        }
        if let Some(end) = end {
            builder = builder.end_date(*end);
        }
    }
    if let Some(proxy) = &args.proxy {
        builder = builder.proxy("http", proxy.as_str()).proxy("https", proxy.as_str());
    }

    Ok(Some(builder.build()?))
}

fn build_engine(cli: &Cli, config: &Config) -> Result<GoogleNews> {
    let mut builder = config.engine_builder();
    if let Some(timeout) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(timeout));
    }
    if cli.query.sequential {
        builder = builder.mode(ResolveMode::Sequential);
    }
    Ok(builder.build()?)
}

fn command_label(command: &Commands) -> String {
    match command {
        Commands::Search { keyword, .. } => format!("\"{}\"", keyword),
        Commands::Top => "top stories".to_string(),
        Commands::Topic { name } => format!("topic {}", name),
        Commands::Location { name } => format!("location {}", name),
        Commands::Site { domain } => format!("site {}", domain),
        Commands::Topics | Commands::Config { .. } => String::new(),
    }
}

async fn run_search(cli: &Cli, config: &Config, query: SearchQuery) -> Result<()> {
    let engine = Arc::new(build_engine(cli, config)?);

    let interrupt = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, closing session");
                engine.close();
            }
        })
    };

    let started = Instant::now();
    let result = engine.search(&query).await;
    interrupt.abort();
    let response = result.context("search failed")?;

    let format = match cli.output {
        OutputFormat::Auto if ui::is_terminal() => OutputFormat::Table,
        OutputFormat::Auto => OutputFormat::Json,
        other => other,
    };

    match format {
        OutputFormat::Json => println!("{}", ui::render_json(&response)?),
        OutputFormat::Plain => print!("{}", ui::render_plain(&response.articles)),
        OutputFormat::Table | OutputFormat::Auto => {
            if !cli.quiet {
                ui::print_search_header(
                    &command_label(&cli.command),
                    response.len(),
                    started.elapsed(),
                );
            }
            println!("{}", ui::articles_table(&response.articles));
        }
    }

    if !cli.quiet {
        ui::print_warnings(&response.warnings);
        if response.excluded > 0 {
            ui::print_status(
                Status::Info,
                &format!("{} articles excluded by domain", response.excluded),
            );
        }
    }
    Ok(())
}

fn print_topics() {
    println!("Topics:");
    for topic in Topic::ALL {
        println!("  {}", topic);
    }
    println!("\nSections:");
    for name in section_names() {
        println!("  {}", name);
    }
    println!("\nLanguages:");
    for (name, code) in locale::available_languages() {
        println!("  {:<24} {}", name, code);
    }
    println!("\nCountries:");
    for (name, code) in locale::available_countries() {
        println!("  {:<24} {}", name, code);
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(gnews::config::default_config_path)
        .context("no configuration directory available; pass --path")?;

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(&path)?;
    ui::print_status(
        Status::Success,
        &format!("Wrote default configuration to {}", path.display()),
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("failed to load configuration from {}", path.display()),
        None => "failed to load configuration".to_string(),
    })?;

    init_logging(&cli, &config);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    match &cli.command {
        Commands::Topics => print_topics(),
        Commands::Config {
            action: ConfigAction::Init { path, force },
        } => init_config(path.clone(), *force)?,
        Commands::Config {
            action: ConfigAction::Show,
        } => print!("{}", toml::to_string_pretty(&config)?),
        command => {
            if let Some(query) = build_query(command, &cli.query, &config)? {
                run_search(&cli, &config, query).await?;
            }
        }
    }

    Ok(())
}
