//! Crawl engine: frontier management, fetching, robots compliance, and the
//! session coordinator

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod robots;

pub use coordinator::{CrawlReport, Crawler};
pub use fetcher::{FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierPhase, NavigatorContext, PendingPage};
pub use parser::extract_links;
pub use robots::RobotsGate;
