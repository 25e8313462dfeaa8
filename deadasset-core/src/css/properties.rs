//! Property statistics: how often each `property: value` pair, and each
//! full rule body, appears across stylesheets.
//!
//! Frequent rule bodies are candidates for a shared class or mixin.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use std::sync::OnceLock;

use crate::corpus::Document;

const DELIMITER: &str = "||";

fn property_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*([\w-]*):\s*([^;]*)").expect("Hardcoded regex pattern is valid")
    })
}

fn rule_property_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\s*([\w-]*):\s*([^;]*)").expect("Hardcoded regex pattern is valid")
    })
}

fn rule_opening_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^}]*\{\n").expect("Hardcoded regex pattern is valid"))
}

fn rule_closing_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\s*\}").expect("Hardcoded regex pattern is valid"))
}

/// Every `property: value` pair starting a line.
pub fn property_values(content: &str) -> Vec<(String, String)> {
    property_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let property = caps.get(1)?.as_str().trim();
            let value = caps.get(2)?.as_str().trim();
            Some((property.to_string(), value.to_string()))
        })
        .collect()
}

/// One signature per rule body: its pairs as `prop:value` joined by `;`.
///
/// Rule bodies are the text between a `{` that ends a line and the next
/// `}`. Signatures are returned sorted; bodies without any pair are
/// dropped.
pub fn class_signatures(content: &str) -> Vec<String> {
    let opened = rule_opening_regex().replace_all(content, format!("\n{}", DELIMITER));
    let closed = rule_closing_regex().replace_all(&opened, format!("{}\n", DELIMITER));
    let collapsed = closed.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut signatures: Vec<String> = collapsed
        .split(DELIMITER)
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .map(|body| {
            rule_property_regex()
                .captures_iter(body)
                .filter_map(|caps| {
                    let property = caps.get(1)?.as_str().trim();
                    let value = caps.get(2)?.as_str().trim();
                    Some(format!("{}:{}", property, value))
                })
                .collect::<Vec<_>>()
                .join(";")
        })
        .filter(|signature| !signature.is_empty())
        .collect();
    signatures.sort();
    signatures
}

/// A `property: value` pair and how often it appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyCount {
    pub property: String,
    pub value: String,
    pub count: usize,
}

/// A rule signature and how often it appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureCount {
    pub signature: String,
    pub count: usize,
}

/// Count items; most frequent first, ties in first-seen order.
fn count_by_frequency<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    let mut positions: HashMap<T, usize> = HashMap::new();
    for item in items {
        match positions.get(&item) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn is_plain_css(id: &str) -> bool {
    Path::new(id)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}

/// Property pair frequencies over every document.
pub fn count_properties(documents: &[Document]) -> Vec<PropertyCount> {
    let pairs = documents.iter().flat_map(|doc| property_values(&doc.text()));
    count_by_frequency(pairs)
        .into_iter()
        .map(|((property, value), count)| PropertyCount {
            property,
            value,
            count,
        })
        .collect()
}

/// Rule signature frequencies; plain `.css` documents are skipped.
pub fn count_class_signatures(documents: &[Document]) -> Vec<SignatureCount> {
    let signatures = documents
        .iter()
        .filter(|doc| !is_plain_css(&doc.id))
        .flat_map(|doc| class_signatures(&doc.text()));
    count_by_frequency(signatures)
        .into_iter()
        .map(|(signature, count)| SignatureCount { signature, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_values() {
        let scss = ".a {\n  color: red;\n  margin:0 auto;\n}\n";
        assert_eq!(
            property_values(scss),
            vec![
                ("color".to_string(), "red".to_string()),
                ("margin".to_string(), "0 auto".to_string()),
            ]
        );
    }

    #[test]
    fn test_class_signatures() {
        let scss = ".b {\n  margin: 0;\n  color: red;\n}\n.a {\n  color:   blue;\n}\n.empty {\n}\n";
        assert_eq!(
            class_signatures(scss),
            vec!["color:blue".to_string(), "margin:0;color:red".to_string()]
        );
    }

    #[test]
    fn test_count_by_frequency_ties_keep_first_seen() {
        let counted = count_by_frequency(["x", "y", "z", "y", "z"]);
        assert_eq!(counted, vec![("y", 2), ("z", 2), ("x", 1)]);
    }

    #[test]
    fn test_count_properties_across_documents() {
        let docs = vec![
            Document::new("a.scss", ".a {\n  color: red;\n}\n"),
            Document::new("b.css", ".b {\n  color: red;\n  top: 0;\n}\n"),
        ];
        let counts = count_properties(&docs);
        assert_eq!(
            counts[0],
            PropertyCount {
                property: "color".into(),
                value: "red".into(),
                count: 2
            }
        );
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_signatures_skip_plain_css() {
        let body = ".a {\n  color: red;\n}\n";
        let docs = vec![
            Document::new("one.scss", body),
            Document::new("two.scss", body),
            Document::new("three.css", body),
        ];
        let counts = count_class_signatures(&docs);
        assert_eq!(
            counts,
            vec![SignatureCount {
                signature: "color:red".into(),
                count: 2
            }]
        );
    }
}
