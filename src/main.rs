use anyhow::Context;
use clap::Parser;
use pagesift::config::load_config;
use pagesift::Crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Configuration-driven web crawler
#[derive(Parser, Debug)]
#[command(name = "pagesift", version, about)]
struct Cli {
    /// Path to the JSON configuration file
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and print the crawl plan without fetching
    #[arg(long)]
    dry_run: bool,
}

fn setup_logging(cli: &Cli) {
    let default = if cli.quiet {
        "pagesift=warn"
    } else {
        match cli.verbose {
            0 => "pagesift=info,warn",
            1 => "pagesift=debug,info",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli);

    // Configuration problems are the only fatal startup errors.
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    if cli.dry_run {
        print_plan(&config);
        return Ok(());
    }

    let crawler = Crawler::new(config).context("failed to initialize crawler")?;
    let stop = crawler.stop_token();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, finishing current page");
            stop.cancel();
        }
    });

    // A crawl that started is reported, not failed: per-page faults are
    // already accounted for in the report, and a fatal sink error has been
    // logged with its cause.
    match crawler.run().await {
        Ok(report) => {
            println!(
                "Crawl complete: {} pages visited, {} failed, {} skipped, {} records written",
                report.pages_visited,
                report.pages_failed,
                report.pages_skipped,
                report.records_emitted,
            );
        }
        Err(e) => {
            tracing::error!("crawl aborted: {}", e);
        }
    }

    Ok(())
}

fn print_plan(config: &pagesift::Config) {
    println!("Targets:");
    for target in &config.target_urls {
        println!(
            "  {} (sub-pages only: {}, render: {})",
            target.url, target.options.only_scrape_sub_pages, target.options.render_pages,
        );
    }

    println!("Elements:");
    for (index, element) in config.elements.iter().enumerate() {
        println!("  {}", element.label(index));
    }

    let nav = &config.page_navigator;
    println!("Navigator:");
    println!(
        "  domains: {}",
        if nav.allowed_domains.is_empty() {
            "(all)".to_string()
        } else {
            nav.allowed_domains.join(", ")
        }
    );
    println!("  pattern: {}", nav.url_pattern.as_deref().unwrap_or("(none)"));
    println!("  sleep: {}s", nav.sleep_time);

    println!("Sinks:");
    if let Some(csv) = &config.data_saving.csv {
        println!("  csv -> {} (enabled: {})", csv.file_path, csv.enabled);
    }
    if let Some(sqlite) = &config.data_saving.sqlite {
        println!(
            "  sqlite -> {} table {} (enabled: {})",
            sqlite.file_path, sqlite.table, sqlite.enabled
        );
    }
    if config.data_saving.csv.is_none() && config.data_saving.sqlite.is_none() {
        println!("  (none)");
    }
}
