//! Unlinked main entry point
//!
//! This is the command-line interface for the Unlinked dead link checker.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use unlinked::config::load_effective_config;
use unlinked::output::print_summary;
use unlinked::{CancellationToken, CheckMode, Checker, Config, LinkStatus};

/// Unlinked: a concurrent dead link checker
///
/// Checks a list of URLs, or crawls a site to a bounded depth, and reports
/// every link that is dead, timed out, or failed.
#[derive(Parser, Debug)]
#[command(name = "unlinked")]
#[command(version)]
#[command(about = "A concurrent dead link checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    options: SharedOptions,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check each URL with a single request
    Check {
        /// URLs to check
        #[arg(value_name = "URL", required_unless_present = "stdin")]
        urls: Vec<String>,

        /// Read URLs from stdin, one per line
        #[arg(long)]
        stdin: bool,
    },

    /// Crawl a site and check every link found
    Crawl {
        /// Page to start crawling from
        #[arg(value_name = "URL")]
        url: String,

        /// Maximum link depth to follow from the start page
        #[arg(long)]
        max_depth: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct SharedOptions {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of requests in flight
    #[arg(short, long, global = true)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    /// Report redirects instead of following them
    #[arg(long, global = true)]
    no_follow_redirects: bool,

    /// Skip URLs matching this regular expression (repeatable)
    #[arg(long, global = true, value_name = "REGEX")]
    ignore: Vec<String>,

    /// Only follow links on this domain, `*.` wildcards allowed (repeatable)
    #[arg(long, global = true, value_name = "DOMAIN")]
    allow_domain: Vec<String>,

    /// User-Agent header to send
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Do not print a line per checked link
    #[arg(long, global = true)]
    no_progress: bool,
}

impl SharedOptions {
    /// Applies command-line flags on top of the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if self.no_follow_redirects {
            config.follow_redirects = false;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config.ignore_patterns.extend(self.ignore.iter().cloned());
        config
            .allowed_domains
            .extend(self.allow_domain.iter().cloned());
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(true) => ExitCode::FAILURE,
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
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
            0 => EnvFilter::new("unlinked=info,warn"),
            1 => EnvFilter::new("unlinked=debug,info"),
            2 => EnvFilter::new("unlinked=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the selected command; returns true if any link is broken
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = load_effective_config(cli.options.config.as_deref())
        .context("Failed to load configuration")?;
    cli.options.apply(&mut config);

    let urls = match cli.command {
        Command::Check { urls, stdin } => {
            config.mode = CheckMode::Single;
            let mut urls = urls;
            if stdin {
                urls.extend(read_stdin_urls().context("Failed to read URLs from stdin")?);
            }
            urls
        }
        Command::Crawl { url, max_depth } => {
            config.mode = CheckMode::Crawler;
            if let Some(depth) = max_depth {
                config.max_depth = depth;
            }
            vec![url]
        }
    };

    if urls.is_empty() {
        bail!("No URLs to check");
    }

    let mut checker = Checker::new(config).context("Invalid configuration")?;
    if !cli.options.no_progress && !cli.quiet {
        checker.set_progress_callback(print_progress);
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping in-flight checks");
            on_interrupt.cancel();
        }
    });

    let result = checker
        .check_urls(&urls, &cancel)
        .await
        .context("Link check failed")?;

    if !cli.quiet {
        println!();
        print_summary(&result);
    }

    Ok(result.has_broken())
}

/// Prints one progress line per checked link
fn print_progress(url: &str, status: LinkStatus) {
    let marker = if status.is_broken() { "✗" } else { "✓" };
    println!("{} {:<8} {}", marker, status.as_str(), url);
}

/// Reads URLs from stdin, skipping blank lines and `#` comments
fn read_stdin_urls() -> std::io::Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        urls.push(trimmed.to_string());
    }
    Ok(urls)
}
