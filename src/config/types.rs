use serde::Deserialize;

/// Main configuration structure for pagesift
///
/// Deserialized from a JSON document; see `load_config` for loading and
/// validation.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seed URLs to start crawling from
    pub target_urls: Vec<TargetUrl>,

    /// Declarative rules describing which data to extract from each page
    pub elements: Vec<RawElement>,

    /// Link-following settings; absent means dedup-only link following
    #[serde(default)]
    pub page_navigator: NavigatorSettings,

    /// Authoritative output field order; names not listed fall back to
    /// element declaration order
    #[serde(default)]
    pub data_order: Vec<String>,

    /// Output sink configuration
    #[serde(default)]
    pub data_saving: SavingConfig,
}

/// A seed URL with its per-target options
#[derive(Debug, Clone, Deserialize)]
pub struct TargetUrl {
    pub url: String,

    #[serde(default)]
    pub options: TargetOptions,
}

/// Per-target crawl options
#[derive(Debug, Clone, Deserialize)]
pub struct TargetOptions {
    /// When true, the seed page itself is only scanned for links and never
    /// contributes a record
    #[serde(default = "default_true")]
    pub only_scrape_sub_pages: bool,

    /// Request script-executed page rendering from the fetch collaborator
    #[serde(default)]
    pub render_pages: bool,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            only_scrape_sub_pages: true,
            render_pages: false,
        }
    }
}

/// Link-following settings for the page navigator
#[derive(Debug, Clone, Deserialize)]
pub struct NavigatorSettings {
    /// Domains discovered links may belong to; empty means allow-all
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Minimum delay between sequential fetches, in seconds
    #[serde(default = "default_sleep_time")]
    pub sleep_time: f64,

    /// Regex a discovered URL must match to be enqueued
    #[serde(default)]
    pub url_pattern: Option<String>,

    /// Maximum link-discovery depth from the seed; absent means unlimited
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Skip robots.txt checks entirely
    #[serde(default)]
    pub ignore_robots_txt: bool,

    /// User agent sent with requests and matched against robots.txt
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            allowed_domains: Vec::new(),
            sleep_time: default_sleep_time(),
            url_pattern: None,
            max_depth: None,
            ignore_robots_txt: false,
            user_agent: default_user_agent(),
        }
    }
}

/// Raw element-selection rule as it appears in the configuration document
///
/// Exactly one selection strategy must be populated: `css_selector`,
/// `tag` (+ `attributes`), or `search_hierarchy`. `xpath` is reserved and
/// rejected by validation. The raw form is converted into an
/// [`ElementRule`](crate::extract::ElementRule) after validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    /// Output field label; unnamed elements are labeled `element {index}`
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub css_selector: Option<String>,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub attributes: Vec<RawAttribute>,

    #[serde(default)]
    pub search_hierarchy: Vec<RawAttribute>,

    /// Reserved; presence is a configuration error
    #[serde(default)]
    pub xpath: Option<String>,

    #[serde(default)]
    pub data_parsing: DataParsing,
}

impl RawElement {
    /// Output field label for the element at `index`
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("element {}", index),
        }
    }
}

/// A single attribute requirement: name plus one or more value tokens
#[derive(Debug, Clone, Deserialize)]
pub struct RawAttribute {
    pub name: String,
    pub value: AttrValue,
}

/// Attribute value as written in the config: a single (possibly
/// space-separated) string or an explicit list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    One(String),
    Many(Vec<String>),
}

impl AttrValue {
    /// Individual value tokens; a space-separated string is equivalent to an
    /// explicit list
    pub fn tokens(&self) -> Vec<String> {
        match self {
            AttrValue::One(s) => s.split_whitespace().map(str::to_string).collect(),
            AttrValue::Many(v) => v
                .iter()
                .flat_map(|s| s.split_whitespace())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// How matched nodes are converted into field values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataParsing {
    /// Emit each node's normalized text content
    #[serde(default)]
    pub collect_text: bool,

    /// Emit each node's value for this attribute; nodes missing the
    /// attribute yield no value
    #[serde(default)]
    pub collect_attribute: Option<String>,
}

/// Output sink configuration; each sink is optional and they all receive
/// every record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavingConfig {
    #[serde(default)]
    pub csv: Option<CsvSinkConfig>,

    #[serde(default)]
    pub sqlite: Option<SqliteSinkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvSinkConfig {
    pub file_path: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// When true, a write failure on this sink aborts the crawl
    #[serde(default)]
    pub fatal: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliteSinkConfig {
    pub file_path: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub fatal: bool,
}

impl Config {
    /// Output field labels in element declaration order
    pub fn element_labels(&self) -> Vec<String> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| e.label(i))
            .collect()
    }
}

fn default_true() -> bool {
    true
}

fn default_sleep_time() -> f64 {
    1.0
}

fn default_user_agent() -> String {
    format!("pagesift/{}", env!("CARGO_PKG_VERSION"))
}

fn default_table() -> String {
    "records".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_value_tokens_from_string() {
        let value = AttrValue::One("price_color price_amount".to_string());
        assert_eq!(value.tokens(), vec!["price_color", "price_amount"]);
    }

    #[test]
    fn attr_value_tokens_from_list() {
        let value = AttrValue::Many(vec!["btn".to_string(), "active".to_string()]);
        assert_eq!(value.tokens(), vec!["btn", "active"]);
    }

    #[test]
    fn target_options_defaults() {
        let options = TargetOptions::default();
        assert!(options.only_scrape_sub_pages);
        assert!(!options.render_pages);
    }

    #[test]
    fn unnamed_element_gets_indexed_label() {
        let raw: RawElement = serde_json::from_str(r#"{"css_selector": ".x"}"#).unwrap();
        assert_eq!(raw.label(2), "element 2");
    }
}
