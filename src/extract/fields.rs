//! Field extraction: matched nodes -> named, ordered field values
//!
//! Converts resolver matches into values per the element's data-parsing
//! directives and assembles one record per page honoring the declared
//! output order.

use crate::config::DataParsing;
use crate::extract::resolver::resolve;
use crate::extract::rule::ElementRule;
use crate::output::Record;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use url::Url;

/// Extracts values from matched nodes per the parsing directives
///
/// Per node, the text value (whitespace-collapsed, trimmed) is emitted
/// first, then the attribute value. A node missing the requested attribute
/// yields no value for that directive; it is skipped, not an error.
pub fn extract_values(matches: &[ElementRef], parsing: &DataParsing) -> Vec<String> {
    let mut values = Vec::new();

    for el in matches {
        if parsing.collect_text {
            values.push(normalized_text(el));
        }

        if let Some(attr_name) = &parsing.collect_attribute {
            match el.value().attr(attr_name) {
                Some(value) => values.push(value.to_string()),
                None => tracing::debug!(
                    "node <{}> has no '{}' attribute, skipping",
                    el.value().name(),
                    attr_name
                ),
            }
        }
    }

    values
}

/// A node's text content with whitespace collapsed and trimmed
pub fn normalized_text(el: &ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves the authoritative output field order
///
/// Names in `data_order` come first (duplicates collapsed, first occurrence
/// wins); declared fields not listed follow in declaration order. Unknown
/// names are rejected by configuration validation before this runs.
pub fn resolve_output_order(labels: &[String], data_order: &[String]) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(labels.len());

    for name in data_order {
        if !order.contains(name) {
            order.push(name.clone());
        }
    }

    for label in labels {
        if !order.contains(label) {
            order.push(label.clone());
        }
    }

    order
}

/// Runs every rule against a page and assembles the record
///
/// Fields absent on the page are emitted as empty rather than omitting the
/// record. Rules sharing a label contribute to the same field, values
/// appended in declaration order.
pub fn extract_record(
    document: &Html,
    url: &Url,
    rules: &[ElementRule],
    output_order: &[String],
) -> Record {
    let mut collected: HashMap<&str, Vec<String>> = HashMap::new();

    for rule in rules {
        let matches = resolve(document, &rule.strategy);
        if matches.is_empty() {
            tracing::debug!("element '{}' matched nothing on {}", rule.name, url);
        }

        let values = extract_values(&matches, &rule.parsing);
        collected.entry(rule.name.as_str()).or_default().extend(values);
    }

    let fields = output_order
        .iter()
        .map(|name| {
            (
                name.clone(),
                collected.remove(name.as_str()).unwrap_or_default(),
            )
        })
        .collect();

    Record::new(url.to_string(), fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawElement;
    use crate::extract::rule::ElementRule;

    fn rules(json: &str) -> Vec<ElementRule> {
        let raw: Vec<RawElement> = serde_json::from_str(json).unwrap();
        ElementRule::build_all(&raw).unwrap()
    }

    fn page() -> Html {
        Html::parse_document(
            r#"<html><body>
                <h3><a href="/book-1" title="A Light in the Attic">A Light in
                   the   Attic</a></h3>
                <p class="price_color">£51.77</p>
            </body></html>"#,
        )
    }

    fn url() -> Url {
        Url::parse("https://books.toscrape.com/catalogue/page-1.html").unwrap()
    }

    #[test]
    fn collect_text_normalizes_whitespace() {
        let document = page();
        let built = rules(r#"[{"name": "Book Name", "css_selector": "h3 a",
                               "data_parsing": {"collect_text": true}}]"#);

        let record = extract_record(&document, &url(), &built, &["Book Name".to_string()]);
        assert_eq!(
            record.field("Book Name"),
            Some(&["A Light in the Attic".to_string()][..])
        );
    }

    #[test]
    fn collect_attribute_skips_nodes_missing_it() {
        let html = Html::parse_document(
            r#"<html><body>
                <a class="lnk" href="/one">one</a>
                <a class="lnk">no href</a>
                <a class="lnk" href="/two">two</a>
            </body></html>"#,
        );
        let built = rules(r#"[{"name": "links", "css_selector": "a.lnk",
                               "data_parsing": {"collect_attribute": "href"}}]"#);

        let record = extract_record(&html, &url(), &built, &["links".to_string()]);
        assert_eq!(
            record.field("links"),
            Some(&["/one".to_string(), "/two".to_string()][..])
        );
    }

    #[test]
    fn combined_directives_emit_text_then_attribute_per_node() {
        let document = page();
        let built = rules(
            r#"[{"name": "title", "css_selector": "h3 a",
                 "data_parsing": {"collect_text": true, "collect_attribute": "title"}}]"#,
        );

        let record = extract_record(&document, &url(), &built, &["title".to_string()]);
        assert_eq!(
            record.field("title"),
            Some(
                &[
                    "A Light in the Attic".to_string(),
                    "A Light in the Attic".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn data_order_governs_field_order_regardless_of_declaration() {
        let document = page();
        // Declared price-first; data_order says name-first.
        let built = rules(
            r#"[{"name": "Book Price", "tag": "p",
                 "attributes": [{"name": "class", "value": "price_color"}],
                 "data_parsing": {"collect_text": true}},
                {"name": "Book Name", "css_selector": "h3 a",
                 "data_parsing": {"collect_text": true}}]"#,
        );

        let order = resolve_output_order(
            &["Book Price".to_string(), "Book Name".to_string()],
            &["Book Name".to_string(), "Book Price".to_string()],
        );
        let record = extract_record(&document, &url(), &built, &order);

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["Book Name", "Book Price"]);
        assert_eq!(
            record.field("Book Price"),
            Some(&["£51.77".to_string()][..])
        );
    }

    #[test]
    fn unlisted_fields_follow_in_declaration_order() {
        let order = resolve_output_order(
            &["a".to_string(), "b".to_string(), "c".to_string()],
            &["c".to_string()],
        );
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn duplicate_data_order_names_collapse() {
        let order = resolve_output_order(
            &["a".to_string(), "b".to_string()],
            &["b".to_string(), "b".to_string()],
        );
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn absent_field_is_emitted_empty() {
        let document = page();
        let built = rules(r#"[{"name": "missing", "css_selector": ".nope",
                               "data_parsing": {"collect_text": true}}]"#);

        let record = extract_record(&document, &url(), &built, &["missing".to_string()]);
        assert_eq!(record.field("missing"), Some(&[][..]));
    }

    #[test]
    fn multiple_matches_yield_multiple_values() {
        let html = Html::parse_document(
            r#"<html><body><p class="q">one</p><p class="q">two</p></body></html>"#,
        );
        let built = rules(r#"[{"name": "q", "css_selector": "p.q",
                               "data_parsing": {"collect_text": true}}]"#);

        let record = extract_record(&html, &url(), &built, &["q".to_string()]);
        assert_eq!(
            record.field("q"),
            Some(&["one".to_string(), "two".to_string()][..])
        );
    }
}
