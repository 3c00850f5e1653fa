//! Crawl coordination
//!
//! One crawl session per seed URL, sessions run sequentially. Within a
//! session the coordinator drains the frontier one page at a time: politeness
//! delay, robots check, fetch, link discovery, extraction, emit. Faults are
//! isolated per page; a failed fetch or parse is logged and counted, never
//! propagated.

use crate::config::{Config, TargetUrl};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, NavigatorContext, PendingPage};
use crate::crawler::parser::extract_links;
use crate::crawler::robots::RobotsGate;
use crate::extract::{extract_record, resolve_output_order, ElementRule};
use crate::output::{build_sinks, Record, RecordSink};
use crate::{Result, SiftError};
use scraper::Html;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Summary of a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub pages_visited: usize,
    pub pages_failed: usize,
    pub pages_skipped: usize,
    pub links_discovered: usize,
    pub records_emitted: usize,
}

/// What one fetched page yielded
struct PageOutcome {
    links: Vec<Url>,
    record: Option<Record>,
}

pub struct Crawler {
    config: Config,
    rules: Vec<ElementRule>,
    output_order: Vec<String>,
    fetcher: Box<dyn Fetcher>,
    sinks: Vec<Box<dyn RecordSink>>,
    robots: Option<RobotsGate>,
    stop: CancellationToken,
}

impl Crawler {
    /// Builds a crawler with the production fetcher and the sinks declared
    /// in the configuration
    pub fn new(config: Config) -> Result<Self> {
        let user_agent = config.page_navigator.user_agent.clone();
        let fetcher = Box::new(HttpFetcher::new(&user_agent)?);
        let columns = {
            let labels = config.element_labels();
            resolve_output_order(&labels, &config.data_order)
        };
        let sinks = build_sinks(&config.data_saving, &columns)?;

        Self::with_parts(config, fetcher, sinks)
    }

    /// Builds a crawler around explicit collaborators; the seam tests and
    /// embedders use to substitute fetchers and sinks
    pub fn with_parts(
        config: Config,
        fetcher: Box<dyn Fetcher>,
        sinks: Vec<Box<dyn RecordSink>>,
    ) -> Result<Self> {
        let rules = ElementRule::build_all(&config.elements)?;
        let labels = config.element_labels();
        let output_order = resolve_output_order(&labels, &config.data_order);

        let robots = if config.page_navigator.ignore_robots_txt {
            None
        } else {
            Some(RobotsGate::new(&config.page_navigator.user_agent)?)
        };

        Ok(Self {
            config,
            rules,
            output_order,
            fetcher,
            sinks,
            robots,
            stop: CancellationToken::new(),
        })
    }

    /// Token that stops the crawl at the next page boundary when cancelled
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// Runs every configured crawl session to completion
    ///
    /// Fetch and extraction failures are counted, not propagated; the only
    /// errors surfaced here are fatal sink failures.
    pub async fn run(mut self) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();
        let context = NavigatorContext::compile(&self.config.page_navigator)?;
        let targets = self.config.target_urls.clone();

        let mut aborted = Ok(());
        for target in &targets {
            if self.stop.is_cancelled() {
                tracing::info!("stop requested, skipping remaining targets");
                break;
            }
            if let Err(e) = self.run_session(target, &context, &mut report).await {
                aborted = Err(e);
                break;
            }
        }

        // Flush even on an abort so records already accepted are not lost.
        for sink in &mut self.sinks {
            if let Err(e) = sink.flush() {
                tracing::error!("failed to flush {} sink: {}", sink.name(), e);
            }
        }
        aborted?;

        tracing::info!(
            "crawl finished: {} visited, {} failed, {} skipped, {} links, {} records",
            report.pages_visited,
            report.pages_failed,
            report.pages_skipped,
            report.links_discovered,
            report.records_emitted,
        );

        Ok(report)
    }

    async fn run_session(
        &mut self,
        target: &TargetUrl,
        context: &NavigatorContext,
        report: &mut CrawlReport,
    ) -> Result<()> {
        let seed = Url::parse(&target.url)?;
        tracing::info!("starting crawl session for {}", seed);

        let mut frontier = Frontier::new(context.clone(), seed);
        let mut first_fetch = true;

        while let Some(page) = frontier.next() {
            if self.stop.is_cancelled() {
                tracing::info!("stop requested, abandoning session");
                break;
            }

            if !first_fetch && !context.sleep.is_zero() {
                tokio::time::sleep(context.sleep).await;
            }
            first_fetch = false;

            if let Some(robots) = &mut self.robots {
                if !robots.is_allowed(&page.url).await {
                    tracing::info!("robots.txt disallows {}, skipping", page.url);
                    report.pages_skipped += 1;
                    continue;
                }
            }

            let fetched = match self.fetcher.fetch(&page.url, target.options.render_pages).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!("fetch failed: {}", e);
                    report.pages_failed += 1;
                    continue;
                }
            };

            report.pages_visited += 1;

            let skip_extraction = page.is_seed && target.options.only_scrape_sub_pages;
            let outcome = self.handle_page(&page, &fetched.body, skip_extraction);

            for link in outcome.links {
                if frontier.offer(link, page.depth + 1) {
                    report.links_discovered += 1;
                }
            }

            if let Some(record) = outcome.record {
                self.emit(&record, report)?;
            }
        }

        Ok(())
    }

    /// Parses and processes one fetched page
    ///
    /// Synchronous on purpose: the parsed document never crosses an await
    /// point.
    fn handle_page(&self, page: &PendingPage, body: &str, skip_extraction: bool) -> PageOutcome {
        let document = Html::parse_document(body);
        let links = extract_links(&document, &page.url);

        let record = if skip_extraction {
            tracing::debug!("seed {} scanned for links only", page.url);
            None
        } else {
            Some(extract_record(
                &document,
                &page.url,
                &self.rules,
                &self.output_order,
            ))
        };

        PageOutcome { links, record }
    }

    fn emit(&mut self, record: &Record, report: &mut CrawlReport) -> Result<()> {
        for sink in &mut self.sinks {
            if let Err(e) = sink.write(record) {
                if sink.is_fatal() {
                    tracing::error!("fatal {} sink failure: {}", sink.name(), e);
                    return Err(SiftError::Sink(e));
                }
                tracing::error!("{} sink failed for {}: {}", sink.name(), record.url, e);
            }
        }
        report.records_emitted += 1;
        Ok(())
    }
}
