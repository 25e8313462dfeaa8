//! Variable catalog across stylesheets.
//!
//! Collects every SASS variable (`$name: value;`) and every CSS custom
//! property declared inside a selector block, then classifies each
//! variable:
//! - unique: one definition
//! - duplicate: several definitions, all with the same value
//! - conflict: several definitions with different values

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use crate::corpus::Document;

fn sass_variable_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(\$[\w-]+):\s+([^;]+);").expect("Hardcoded regex pattern is valid")
    })
}

fn css_variable_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(--[\w-]+):\s+([^;]+);").expect("Hardcoded regex pattern is valid")
    })
}

fn selector_block_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"([:#.]?[\w-]+)\s*\{([^}]*)\}").expect("Hardcoded regex pattern is valid")
    })
}

fn line_comment_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\s*//[^\n]*").expect("Hardcoded regex pattern is valid"))
}

fn sass_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\$[\w-]+[^\n]+").expect("Hardcoded regex pattern is valid"))
}

fn blank_lines_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\n+").expect("Hardcoded regex pattern is valid"))
}

/// `(name, value)` pairs in first-seen order; a later value for the same
/// name replaces the earlier one.
fn name_value_pairs(re: &Regex, content: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for caps in re.captures_iter(content) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str().trim().to_string();
        let value = value.as_str().trim().to_string();
        match positions.get(&name) {
            Some(&pos) => pairs[pos].1 = value,
            None => {
                positions.insert(name.clone(), pairs.len());
                pairs.push((name, value));
            }
        }
    }
    pairs
}

/// SASS variables defined in `content`.
pub fn sass_variables(content: &str) -> Vec<(String, String)> {
    name_value_pairs(sass_variable_regex(), content)
}

/// Drop `//` comments and SASS variable lines, squeeze blank lines.
fn strip_for_selectors(content: &str) -> String {
    let without_comments = line_comment_regex().replace_all(content, "");
    let without_sass = sass_line_regex().replace_all(&without_comments, "");
    blank_lines_regex()
        .replace_all(&without_sass, "\n")
        .trim()
        .to_string()
}

/// Custom properties declared in one selector block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorVariables {
    /// `<source>.<selector>`
    pub source: String,
    pub variables: Vec<(String, String)>,
}

/// Custom properties per selector block of `content`.
pub fn css_variables_by_selector(content: &str, source: &str) -> Vec<SelectorVariables> {
    let cleaned = strip_for_selectors(content);
    selector_block_regex()
        .captures_iter(&cleaned)
        .filter_map(|caps| {
            let selector = caps.get(1)?.as_str();
            let body = caps.get(2)?.as_str();
            let selector = selector.trim_matches(':').trim_matches('#').trim();
            Some(SelectorVariables {
                source: format!("{}.{}", source, selector),
                variables: name_value_pairs(css_variable_regex(), body),
            })
        })
        .collect()
}

/// One definition of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub source: String,
    pub value: String,
}

/// How the definitions of a variable relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Consistency {
    Unique,
    Duplicate,
    Conflict,
}

/// Variables and all their definitions, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct VariableCatalog {
    entries: Vec<(String, Vec<Definition>)>,
    positions: HashMap<String, usize>,
}

impl VariableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, variable: &str, source: &str, value: &str) {
        let definition = Definition {
            source: source.to_string(),
            value: value.to_string(),
        };
        match self.positions.get(variable) {
            Some(&pos) => self.entries[pos].1.push(definition),
            None => {
                self.positions.insert(variable.to_string(), self.entries.len());
                self.entries.push((variable.to_string(), vec![definition]));
            }
        }
    }

    pub fn add_all(&mut self, pairs: &[(String, String)], source: &str) {
        for (variable, value) in pairs {
            self.add(variable, source, value);
        }
    }

    pub fn definitions(&self, variable: &str) -> &[Definition] {
        self.positions
            .get(variable)
            .map(|&pos| self.entries[pos].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn classify(&self, variable: &str) -> Option<Consistency> {
        let defs = self.definitions(variable);
        match defs.len() {
            0 => None,
            1 => Some(Consistency::Unique),
            _ => {
                let values: BTreeSet<&str> = defs.iter().map(|d| d.value.as_str()).collect();
                if values.len() == 1 {
                    Some(Consistency::Duplicate)
                } else {
                    Some(Consistency::Conflict)
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Definition])> + '_ {
        self.entries
            .iter()
            .map(|(name, defs)| (name.as_str(), defs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SCSS report with unique, duplicate and conflicting sections.
    ///
    /// `css_block` wraps the report in `:cssVariables{ ... }`.
    pub fn render(&self, css_block: bool) -> String {
        let row = |variable: &str, def: &Definition| {
            format!("{}: {}; //{}\n", variable, def.value, def.source)
        };

        let mut unique = String::new();
        let mut duplicate = String::new();
        let mut conflict = String::new();

        for (variable, defs) in self.iter() {
            let section = match self.classify(variable) {
                Some(Consistency::Unique) => {
                    unique.push_str(&row(variable, &defs[0]));
                    continue;
                }
                Some(Consistency::Duplicate) => &mut duplicate,
                Some(Consistency::Conflict) => &mut conflict,
                None => continue,
            };
            for def in defs {
                section.push_str(&row(variable, def));
            }
            section.push('\n');
        }

        let mut out = String::new();
        if css_block {
            out.push_str(":cssVariables{\n");
        }
        out.push_str("//Unique Values\n");
        out.push_str(&unique);
        out.push_str("\n\n//Duplicate Values\n");
        out.push_str(&duplicate);
        out.push_str("\n\n//Conflicting Values\n");
        out.push_str(&conflict);
        if css_block {
            out.push('}');
        }
        out
    }
}

/// SASS and CSS variable catalogs for a set of stylesheets.
#[derive(Debug, Clone, Default)]
pub struct StylesheetCatalogs {
    pub sass: VariableCatalog,
    pub css: VariableCatalog,
}

/// Catalog every stylesheet; sources are the document ids.
pub fn catalog_documents(documents: &[Document]) -> StylesheetCatalogs {
    let mut catalogs = StylesheetCatalogs::default();
    for doc in documents {
        let content = doc.text();
        catalogs.sass.add_all(&sass_variables(&content), &doc.id);
        for block in css_variables_by_selector(&content, &doc.id) {
            catalogs.css.add_all(&block.variables, &block.source);
        }
    }
    catalogs
}
