use crate::config::types::{Config, NavigatorSettings, RawElement, SavingConfig};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Upper bound on the politeness delay, in seconds
const MAX_SLEEP_TIME_SECS: f64 = 3600.0;

/// Validates the entire configuration
///
/// Any error here is fatal: the crawl never starts.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_urls(config)?;
    validate_navigator(&config.page_navigator)?;
    for (index, element) in config.elements.iter().enumerate() {
        validate_element(element, index)?;
    }
    validate_data_order(config)?;
    validate_saving(&config.data_saving)?;
    Ok(())
}

fn validate_target_urls(config: &Config) -> Result<(), ConfigError> {
    if config.target_urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one target URL is required".to_string(),
        ));
    }

    for target in &config.target_urls {
        let url = Url::parse(&target.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", target.url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}': only http and https schemes are supported",
                target.url
            )));
        }
    }

    Ok(())
}

fn validate_navigator(settings: &NavigatorSettings) -> Result<(), ConfigError> {
    if !settings.sleep_time.is_finite() || settings.sleep_time < 0.0 {
        return Err(ConfigError::Validation(format!(
            "sleep_time must be a finite number >= 0, got {}",
            settings.sleep_time
        )));
    }

    // An hour between fetches is already absurd; anything above it is a typo.
    if settings.sleep_time > MAX_SLEEP_TIME_SECS {
        return Err(ConfigError::Validation(format!(
            "sleep_time must be at most {} seconds, got {}",
            MAX_SLEEP_TIME_SECS, settings.sleep_time
        )));
    }

    if let Some(pattern) = &settings.url_pattern {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }

    if settings.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that exactly one selection strategy is populated on an element
fn validate_element(element: &RawElement, index: usize) -> Result<(), ConfigError> {
    let label = element.label(index);

    if element.xpath.is_some() {
        return Err(ConfigError::Validation(format!(
            "element '{}': xpath selection is reserved and not supported",
            label
        )));
    }

    let has_css = element.css_selector.is_some();
    let has_tag_attr = element.tag.is_some();
    let has_hierarchy = !element.search_hierarchy.is_empty();

    let strategies = [has_css, has_tag_attr, has_hierarchy]
        .iter()
        .filter(|&&present| present)
        .count();

    match strategies {
        0 => {
            return Err(ConfigError::Validation(format!(
                "element '{}': missing a selection strategy (css_selector, \
                 tag + attributes, or search_hierarchy)",
                label
            )));
        }
        1 => {}
        _ => {
            return Err(ConfigError::Validation(format!(
                "element '{}': more than one selection strategy specified; \
                 resolution would be ambiguous",
                label
            )));
        }
    }

    if !element.attributes.is_empty() && element.tag.is_none() {
        return Err(ConfigError::Validation(format!(
            "element '{}': attributes require a tag",
            label
        )));
    }

    if let Some(css) = &element.css_selector {
        Selector::parse(css)
            .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", css, e)))?;
    }

    for attr in element.attributes.iter().chain(&element.search_hierarchy) {
        if attr.name.is_empty() || attr.value.tokens().is_empty() {
            return Err(ConfigError::Validation(format!(
                "element '{}': attribute entries need a non-empty name and value",
                label
            )));
        }
    }

    Ok(())
}

/// Every name in data_order must refer to a declared element
fn validate_data_order(config: &Config) -> Result<(), ConfigError> {
    let labels = config.element_labels();
    for name in &config.data_order {
        if !labels.iter().any(|l| l == name) {
            return Err(ConfigError::Validation(format!(
                "unknown field name in data_order: '{}'",
                name
            )));
        }
    }
    Ok(())
}

fn validate_saving(saving: &SavingConfig) -> Result<(), ConfigError> {
    if let Some(csv) = &saving.csv {
        if csv.file_path.is_empty() {
            return Err(ConfigError::Validation(
                "csv sink file_path cannot be empty".to_string(),
            ));
        }
    }

    if let Some(sqlite) = &saving.sqlite {
        if sqlite.file_path.is_empty() {
            return Err(ConfigError::Validation(
                "sqlite sink file_path cannot be empty".to_string(),
            ));
        }
        if sqlite.table.is_empty() {
            return Err(ConfigError::Validation(
                "sqlite sink table cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
