//! Output formatting - plaintext and JSON, to stdout or report files.

use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::error::{DeadassetError, DeadassetResult, IoResultExt};

/// Prints unused assets in plain text format.
pub fn print_plain(unused: &[String]) {
    if unused.is_empty() {
        println!("No unused assets found.");
    } else {
        println!("UNUSED ASSETS ({}):", unused.len());
        for name in unused {
            println!("- {}", name);
        }
    }
}

/// Prints unused assets in JSON format.
///
/// Falls back to a simple format if serialization fails.
pub fn print_json(unused: &[String]) {
    match serde_json::to_string_pretty(&json!({ "unused": unused })) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"unused\": {:?}}}", unused);
        }
    }
}

/// Serialize with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> DeadassetResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| DeadassetError::internal(format!("JSON serialization failed: {}", e)))?;
    String::from_utf8(buf)
        .map_err(|e| DeadassetError::internal(format!("JSON output is not UTF-8: {}", e)))
}

/// Write a JSON report file, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> DeadassetResult<()> {
    let json = to_pretty_json(value)?;
    write_text(path, &json)
}

/// Write a text report file, creating parent directories as needed.
pub fn write_text(path: &Path, text: &str) -> DeadassetResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
    }
    fs::write(path, text).with_path(path)
}
