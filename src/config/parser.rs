use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads, parses, and validates a configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use pagesift::config::load_config;
///
/// let config = load_config(Path::new("config.json")).unwrap();
/// println!("Targets: {}", config.target_urls.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
        {
            "target_urls": [
                {"url": "https://books.toscrape.com/",
                 "options": {"only_scrape_sub_pages": false}}
            ],
            "page_navigator": {
                "allowed_domains": ["books.toscrape.com"],
                "sleep_time": 0.5,
                "url_pattern": "catalogue/.*"
            },
            "elements": [
                {"name": "Book Name", "css_selector": "h3 a",
                 "data_parsing": {"collect_text": true}},
                {"name": "Book Price", "tag": "p",
                 "attributes": [{"name": "class", "value": "price_color"}],
                 "data_parsing": {"collect_text": true}}
            ],
            "data_order": ["Book Name", "Book Price"],
            "data_saving": {
                "csv": {"file_path": "./out.csv"}
            }
        }"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.target_urls.len(), 1);
        assert!(!config.target_urls[0].options.only_scrape_sub_pages);
        assert_eq!(config.elements.len(), 2);
        assert_eq!(config.data_order, vec!["Book Name", "Book Price"]);
        assert_eq!(config.page_navigator.sleep_time, 0.5);
        assert!(config.data_saving.csv.is_some());
        assert!(config.data_saving.sqlite.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_json() {
        let file = create_temp_config("this is not valid JSON {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        // element declares two strategies at once
        let config_content = r#"
        {
            "target_urls": [{"url": "https://example.com/"}],
            "elements": [
                {"name": "x", "css_selector": ".a", "tag": "div",
                 "attributes": [{"name": "class", "value": "a"}]}
            ]
        }"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_navigator_defaults_when_absent() {
        let config_content = r#"
        {
            "target_urls": [{"url": "https://example.com/"}],
            "elements": [{"name": "x", "css_selector": ".a"}]
        }"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(config.page_navigator.allowed_domains.is_empty());
        assert!(config.page_navigator.url_pattern.is_none());
        assert!(config.page_navigator.max_depth.is_none());
        assert_eq!(config.page_navigator.sleep_time, 1.0);
    }
}
