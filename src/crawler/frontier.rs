//! Crawl frontier: pending-URL queue with filtering and dedup
//!
//! The frontier owns the per-session lifecycle (seeded, draining, drained)
//! and applies the candidate filter chain in a fixed order: domain, pattern,
//! depth, then dedup. A URL rejected by any filter is dropped silently.

use crate::config::NavigatorSettings;
use crate::url::{domain_allowed, extract_domain};
use crate::ConfigError;
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// Compiled navigation settings shared by a crawl session
#[derive(Debug, Clone)]
pub struct NavigatorContext {
    pub allowed_domains: Vec<String>,
    pub url_pattern: Option<Regex>,
    pub max_depth: Option<u32>,
    pub sleep: Duration,
}

impl NavigatorContext {
    pub fn compile(settings: &NavigatorSettings) -> Result<Self, ConfigError> {
        let url_pattern = settings
            .url_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;

        let sleep = Duration::try_from_secs_f64(settings.sleep_time.max(0.0))
            .map_err(|e| {
                ConfigError::Validation(format!(
                    "sleep_time {} is out of range: {}",
                    settings.sleep_time, e
                ))
            })?;

        Ok(Self {
            allowed_domains: settings.allowed_domains.clone(),
            url_pattern,
            max_depth: settings.max_depth,
            sleep,
        })
    }
}

/// Where a crawl session stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierPhase {
    /// Seed accepted, nothing fetched yet
    Seeded,
    /// At least one page handed out, queue non-empty
    Draining,
    /// Queue exhausted; terminal
    Drained,
}

/// A URL waiting to be fetched
#[derive(Debug, Clone)]
pub struct PendingPage {
    pub url: Url,
    pub depth: u32,
    pub is_seed: bool,
}

/// FIFO frontier for one crawl session
///
/// The seed bypasses the filter chain; discovered links go through it. A URL
/// is handed out at most once per session regardless of how many pages link
/// to it.
pub struct Frontier {
    context: NavigatorContext,
    pending: VecDeque<PendingPage>,
    seen: HashSet<String>,
    phase: FrontierPhase,
}

impl Frontier {
    pub fn new(context: NavigatorContext, seed: Url) -> Self {
        let mut seen = HashSet::new();
        seen.insert(seed.to_string());

        let mut pending = VecDeque::new();
        pending.push_back(PendingPage {
            url: seed,
            depth: 0,
            is_seed: true,
        });

        Self {
            context,
            pending,
            seen,
            phase: FrontierPhase::Seeded,
        }
    }

    pub fn phase(&self) -> FrontierPhase {
        self.phase
    }

    /// Next page to fetch, or `None` once the session is drained
    pub fn next(&mut self) -> Option<PendingPage> {
        match self.pending.pop_front() {
            Some(page) => {
                self.phase = FrontierPhase::Draining;
                Some(page)
            }
            None => {
                self.phase = FrontierPhase::Drained;
                None
            }
        }
    }

    /// Offers a discovered link; returns whether it was enqueued
    ///
    /// Filter order: domain allow-list, URL pattern, depth limit, dedup.
    pub fn offer(&mut self, url: Url, depth: u32) -> bool {
        let Some(domain) = extract_domain(&url) else {
            return false;
        };
        if !domain_allowed(&self.context.allowed_domains, &domain) {
            tracing::trace!("domain {} not allowed, dropping {}", domain, url);
            return false;
        }

        if let Some(pattern) = &self.context.url_pattern {
            if !pattern.is_match(url.as_str()) {
                tracing::trace!("pattern miss, dropping {}", url);
                return false;
            }
        }

        if let Some(max) = self.context.max_depth {
            if depth > max {
                return false;
            }
        }

        if !self.seen.insert(url.to_string()) {
            return false;
        }

        self.pending.push_back(PendingPage {
            url,
            depth,
            is_seed: false,
        });
        true
    }

}
