//! Selector resolution: (parsed document, strategy) -> ordered node sequence
//!
//! Pure and deterministic: identical document and strategy always produce
//! the same matches, in document order. A miss is an empty sequence, never
//! an error.

use crate::extract::rule::{AttributeMatch, Strategy};
use scraper::{ElementRef, Html};
use std::collections::HashSet;

/// Resolves a selection strategy against a parsed document
///
/// Matches are returned in document order. An empty result is a normal
/// outcome (soft condition), not an error.
pub fn resolve<'a>(document: &'a Html, strategy: &Strategy) -> Vec<ElementRef<'a>> {
    match strategy {
        Strategy::Css(selector) => document.select(selector).collect(),

        Strategy::TagAttribute { tag, attributes } => document_elements(document)
            .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
            .filter(|el| attributes.iter().all(|a| carries_tokens(el, a)))
            .collect(),

        Strategy::SearchHierarchy(steps) => resolve_hierarchy(document, steps),

        Strategy::XPath(expr) => {
            tracing::debug!("xpath strategy is reserved, returning no matches: {}", expr);
            Vec::new()
        }
    }
}

/// Every element in the document, in document order
fn document_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

/// True when the element's attribute `name` contains every required token
///
/// The attribute value is split on whitespace; multiple tokens are
/// conjunctive ("has both X and Y").
fn carries_tokens(el: &ElementRef, required: &AttributeMatch) -> bool {
    match el.value().attr(&required.name) {
        Some(actual) => {
            let present: Vec<&str> = actual.split_whitespace().collect();
            required
                .tokens
                .iter()
                .all(|token| present.iter().any(|p| p == token))
        }
        None => false,
    }
}

/// Staged descent through an ordered chain of attribute-match steps
///
/// Step 0 matches anywhere in the document. Each later step keeps only
/// elements nested (at any depth) under an element matched by the previous
/// step. A node satisfying the final step but not reachable through a valid
/// chain of all earlier steps is excluded, which keeps structurally similar
/// sibling sections from contaminating each other's matches.
fn resolve_hierarchy<'a>(document: &'a Html, steps: &[AttributeMatch]) -> Vec<ElementRef<'a>> {
    let Some(first) = steps.first() else {
        return Vec::new();
    };

    let mut matched: Vec<ElementRef<'a>> = document_elements(document)
        .filter(|el| carries_tokens(el, first))
        .collect();

    for step in &steps[1..] {
        if matched.is_empty() {
            return Vec::new();
        }

        let previous: HashSet<_> = matched.iter().map(|el| el.id()).collect();

        // A full document pass per step keeps the result in document order
        // and deduplicates nodes reachable through multiple chains.
        matched = document_elements(document)
            .filter(|el| carries_tokens(el, step))
            .filter(|el| el.ancestors().any(|node| previous.contains(&node.id())))
            .collect();
    }

    matched
}
