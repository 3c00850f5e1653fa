//! URL helpers: domain extraction and allow-list matching

use url::Url;

/// Lowercased host of a URL, if it has one
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(str::to_ascii_lowercase)
}

/// Wildcard domain match: `*.example.com` matches `example.com` and any
/// subdomain; a plain pattern matches exactly
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let candidate = candidate.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => candidate == base || candidate.ends_with(&format!(".{}", base)),
        None => candidate == pattern,
    }
}

/// Whether a domain passes the allow-list; an empty list allows everything
pub fn domain_allowed(allowed: &[String], domain: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|p| matches_wildcard(p, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_lowercased_host() {
        let url = Url::parse("https://Books.ToScrape.com/catalogue/").unwrap();
        assert_eq!(extract_domain(&url), Some("books.toscrape.com".to_string()));
    }

    #[test]
    fn exact_pattern_matches_exactly() {
        assert!(matches_wildcard("example.com", "example.com"));
        assert!(!matches_wildcard("example.com", "sub.example.com"));
        assert!(!matches_wildcard("example.com", "badexample.com"));
    }

    #[test]
    fn wildcard_matches_base_and_subdomains() {
        assert!(matches_wildcard("*.example.com", "example.com"));
        assert!(matches_wildcard("*.example.com", "shop.example.com"));
        assert!(matches_wildcard("*.example.com", "a.b.example.com"));
        assert!(!matches_wildcard("*.example.com", "example.org"));
        assert!(!matches_wildcard("*.example.com", "badexample.com"));
    }

    #[test]
    fn empty_allow_list_allows_everything() {
        assert!(domain_allowed(&[], "anything.example"));
    }

    #[test]
    fn allow_list_filters() {
        let allowed = vec!["books.toscrape.com".to_string()];
        assert!(domain_allowed(&allowed, "books.toscrape.com"));
        assert!(!domain_allowed(&allowed, "evil.example"));
    }
}
