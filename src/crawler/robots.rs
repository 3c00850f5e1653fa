//! robots.txt compliance
//!
//! Checked at fetch time, one robots.txt fetch per origin per crawl. An
//! unreachable or missing robots.txt allows everything.

use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use url::Url;

pub struct RobotsGate {
    client: reqwest::Client,
    user_agent: String,
    /// Cached robots.txt body per origin; `None` records a fetch miss
    cache: HashMap<String, Option<String>>,
}

impl RobotsGate {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
            cache: HashMap::new(),
        })
    }

    pub async fn is_allowed(&mut self, url: &Url) -> bool {
        let origin = url.origin().ascii_serialization();

        if !self.cache.contains_key(&origin) {
            let body = self.fetch_robots(&origin).await;
            self.cache.insert(origin.clone(), body);
        }

        match self.cache.get(&origin).and_then(|b| b.as_deref()) {
            Some(body) => DefaultMatcher::default().one_agent_allowed_by_robots(
                body,
                &self.user_agent,
                url.as_str(),
            ),
            None => true,
        }
    }

    async fn fetch_robots(&self, origin: &str) -> Option<String> {
        let robots_url = format!("{}/robots.txt", origin);

        match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => response.text().await.ok(),
            Ok(response) => {
                tracing::debug!("robots.txt at {} returned {}", robots_url, response.status());
                None
            }
            Err(e) => {
                tracing::debug!("robots.txt fetch failed for {}: {}", robots_url, e);
                None
            }
        }
    }
}
