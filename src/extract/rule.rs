use crate::config::{DataParsing, RawAttribute, RawElement};
use crate::ConfigError;
use scraper::Selector;

/// A single attribute requirement: the attribute `name` must carry every
/// token in `tokens`
///
/// Tokens model "class has both X and Y", not "X or Y": a node's attribute
/// value is split on whitespace and must contain every listed token.
#[derive(Debug, Clone)]
pub struct AttributeMatch {
    pub name: String,
    pub tokens: Vec<String>,
}

impl AttributeMatch {
    pub fn new(name: impl Into<String>, value: &str) -> Self {
        Self {
            name: name.into(),
            tokens: value.split_whitespace().map(str::to_string).collect(),
        }
    }

    fn from_raw(raw: &RawAttribute) -> Self {
        Self {
            name: raw.name.clone(),
            tokens: raw.value.tokens(),
        }
    }
}

/// Selection strategy for locating target nodes in a parsed document
///
/// Exactly one strategy exists per rule; configs declaring zero or more than
/// one are rejected during validation.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Delegate to the document's CSS query capability; comma-separated
    /// compound selectors have union semantics
    Css(Selector),

    /// Match nodes whose tag equals `tag` and which satisfy every attribute
    /// entry (conjunctive across entries and across tokens within an entry)
    TagAttribute {
        tag: String,
        attributes: Vec<AttributeMatch>,
    },

    /// Ordered staged descent: each step narrows the candidate set to
    /// descendants of the previous step's matches
    SearchHierarchy(Vec<AttributeMatch>),

    /// Reserved; never constructed from configuration
    #[allow(dead_code)]
    XPath(String),
}

/// A declarative rule describing how to locate target data on a page and
/// convert it into a named field
#[derive(Debug, Clone)]
pub struct ElementRule {
    /// Output field label
    pub name: String,

    pub strategy: Strategy,

    pub parsing: DataParsing,
}

impl ElementRule {
    /// Converts a validated raw config element into a rule
    ///
    /// `index` supplies the fallback label for unnamed elements.
    pub fn from_raw(raw: &RawElement, index: usize) -> Result<Self, ConfigError> {
        let name = raw.label(index);

        if raw.xpath.is_some() {
            return Err(ConfigError::Validation(format!(
                "element '{}': xpath selection is reserved and not supported",
                name
            )));
        }

        let strategy = if let Some(css) = &raw.css_selector {
            let selector = Selector::parse(css)
                .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", css, e)))?;
            Strategy::Css(selector)
        } else if let Some(tag) = &raw.tag {
            Strategy::TagAttribute {
                tag: tag.to_ascii_lowercase(),
                attributes: raw.attributes.iter().map(AttributeMatch::from_raw).collect(),
            }
        } else if !raw.search_hierarchy.is_empty() {
            Strategy::SearchHierarchy(
                raw.search_hierarchy
                    .iter()
                    .map(AttributeMatch::from_raw)
                    .collect(),
            )
        } else {
            return Err(ConfigError::Validation(format!(
                "element '{}': missing a selection strategy",
                name
            )));
        };

        if !raw.data_parsing.collect_text && raw.data_parsing.collect_attribute.is_none() {
            tracing::info!(
                "element '{}' has no data parsing directives; its field will always be empty",
                name
            );
        }

        Ok(Self {
            name,
            strategy,
            parsing: raw.data_parsing.clone(),
        })
    }

    /// Builds rules for every configured element
    pub fn build_all(elements: &[RawElement]) -> Result<Vec<ElementRule>, ConfigError> {
        elements
            .iter()
            .enumerate()
            .map(|(index, raw)| ElementRule::from_raw(raw, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawElement {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_css_rule() {
        let rule = ElementRule::from_raw(&raw(r#"{"name": "n", "css_selector": ".h3, h3"}"#), 0)
            .unwrap();
        assert!(matches!(rule.strategy, Strategy::Css(_)));
        assert_eq!(rule.name, "n");
    }

    #[test]
    fn builds_tag_attribute_rule_with_tokens() {
        let rule = ElementRule::from_raw(
            &raw(
                r#"{"tag": "P",
                    "attributes": [{"name": "class", "value": "price_color price_amount"}]}"#,
            ),
            3,
        )
        .unwrap();

        assert_eq!(rule.name, "element 3");
        match &rule.strategy {
            Strategy::TagAttribute { tag, attributes } => {
                assert_eq!(tag, "p");
                assert_eq!(attributes.len(), 1);
                assert_eq!(attributes[0].tokens, vec!["price_color", "price_amount"]);
            }
            other => panic!("unexpected strategy: {:?}", other),
        }
    }

    #[test]
    fn builds_search_hierarchy_rule() {
        let rule = ElementRule::from_raw(
            &raw(
                r#"{"name": "price",
                    "search_hierarchy": [
                        {"name": "class", "value": "main-product"},
                        {"name": "class", "value": "price"}]}"#,
            ),
            0,
        )
        .unwrap();

        match &rule.strategy {
            Strategy::SearchHierarchy(steps) => assert_eq!(steps.len(), 2),
            other => panic!("unexpected strategy: {:?}", other),
        }
    }

    #[test]
    fn rejects_xpath() {
        let result = ElementRule::from_raw(&raw(r#"{"name": "n", "xpath": "//div"}"#), 0);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_strategy() {
        let result = ElementRule::from_raw(&raw(r#"{"name": "n"}"#), 0);
        assert!(result.is_err());
    }

    #[test]
    fn attribute_match_splits_value_tokens() {
        let m = AttributeMatch::new("class", "btn active");
        assert_eq!(m.tokens, vec!["btn", "active"]);
    }
}
