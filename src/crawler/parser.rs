//! Link discovery on fetched pages

use scraper::{Html, Selector};
use url::Url;

/// Collects the followable links on a page, resolved against its base URL
///
/// Non-navigational hrefs (scripts, mail, phone, data URIs, bare fragments)
/// and non-HTTP(S) results are skipped. Fragments are stripped so `#section`
/// variants dedup to one page.
pub fn extract_links(document: &Html, base: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();

            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
                || href.starts_with("tel:")
                || href.starts_with("data:")
            {
                continue;
            }

            match base.join(href) {
                Ok(mut url) => {
                    if url.scheme() != "http" && url.scheme() != "https" {
                        continue;
                    }
                    url.set_fragment(None);
                    links.push(url);
                }
                Err(e) => {
                    tracing::trace!("unresolvable href '{}' on {}: {}", href, base, e);
                }
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    fn base() -> Url {
        Url::parse("https://books.toscrape.com/catalogue/page-1.html").unwrap()
    }

    #[test]
    fn resolves_relative_links_against_base() {
        let document = parse(
            r#"<html><body>
                <a href="page-2.html">next</a>
                <a href="/index.html">home</a>
                <a href="https://other.example/x">abs</a>
            </body></html>"#,
        );

        let links = extract_links(&document, &base());
        let strings: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(
            strings,
            vec![
                "https://books.toscrape.com/catalogue/page-2.html",
                "https://books.toscrape.com/index.html",
                "https://other.example/x",
            ]
        );
    }

    #[test]
    fn skips_non_navigational_hrefs() {
        let document = parse(
            r##"<html><body>
                <a href="#top">top</a>
                <a href="javascript:void(0)">js</a>
                <a href="mailto:x@example.com">mail</a>
                <a href="tel:+123">call</a>
                <a href="ftp://files.example/x">ftp</a>
                <a href="real.html">real</a>
            </body></html>"##,
        );

        let links = extract_links(&document, &base());
        assert_eq!(links.len(), 1);
        assert!(links[0].as_str().ends_with("/catalogue/real.html"));
    }

    #[test]
    fn strips_fragments() {
        let document = parse(r#"<html><body><a href="page-2.html#reviews">x</a></body></html>"#);

        let links = extract_links(&document, &base());
        assert_eq!(
            links[0].as_str(),
            "https://books.toscrape.com/catalogue/page-2.html"
        );
    }
}
