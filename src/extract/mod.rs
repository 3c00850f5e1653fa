//! Element selection and field extraction
//!
//! Turns validated configuration elements into [`ElementRule`]s, resolves
//! each rule's [`Strategy`] against a parsed page, and assembles the
//! per-page [`Record`](crate::output::Record).

mod fields;
mod resolver;
mod rule;

pub use fields::{extract_record, extract_values, normalized_text, resolve_output_order};
pub use resolver::resolve;
pub use rule::{AttributeMatch, ElementRule, Strategy};
