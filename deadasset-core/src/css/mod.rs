//! Stylesheet audits.
//!
//! - [`variables`]: custom properties used but never declared, or declared but never used
//! - [`sass`]: SASS and CSS variable definitions grouped and checked for consistency
//! - [`properties`]: frequency of property pairs and of whole rule bodies
//!
//! All audits work on already-loaded [`Document`](crate::corpus::Document)s;
//! discovery goes through [`gather_files`](crate::scan::gather_files) like
//! the asset scan.

pub mod properties;
pub mod sass;
pub mod variables;

pub use properties::{
    class_signatures, count_class_signatures, count_properties, property_values, PropertyCount,
    SignatureCount,
};
pub use sass::{
    catalog_documents, css_variables_by_selector, sass_variables, Consistency, Definition,
    StylesheetCatalogs, VariableCatalog,
};
pub use variables::{audit, declarations_in, extract_declarations, extract_usages, VariableAudit};

/// Extensions of the files the stylesheet audits read.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["scss", "css"];
