//! deadasset CLI - unused asset detector for web projects.
//!
//! Features:
//! - One multi-pattern scan per source file, whatever the number of assets
//! - Rayon-powered parallel discovery, reading and scanning
//! - JSON reports written next to the project (or to `--output-dir`)
//! - Stylesheet audits: custom properties, SASS variable catalog, property statistics

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use deadasset_core::css;
use deadasset_core::{
    gather_files_in, init_structured_logging, load_config, log_error, log_event, log_warn,
    print_json, print_plain,
    read_documents, to_pretty_json, write_json, write_text, Deadasset, DeadassetConfig,
    UsageReport,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find assets that no source file references")]
pub struct Cli {
    /// Directories containing the assets (images, fonts, ...)
    #[arg(
        short,
        long,
        num_args = 1..,
        required_unless_present_any = ["css_vars", "sass_report", "css_properties"]
    )]
    images: Vec<String>,

    /// Directories containing the source files to search
    #[arg(
        short,
        long,
        num_args = 1..,
        required_unless_present_any = ["sass_report"]
    )]
    files: Vec<String>,

    /// Source file extensions to search (default: html ts js scss css)
    #[arg(long, num_args = 1..)]
    ext: Vec<String>,

    /// Directory names to skip, in addition to the defaults
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Asset names or patterns never reported as unused (prefix*, *suffix, substring)
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Include which source files reference each asset
    #[arg(long)]
    by_file: bool,

    /// Directory (relative) receiving the report files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Print results only; do not write report files
    #[arg(long)]
    no_write: bool,

    /// Number of worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Audit CSS custom properties: undeclared usages and unused declarations
    #[arg(long, requires = "declarations")]
    css_vars: bool,

    /// Stylesheets declaring the custom properties (with --css-vars)
    #[arg(long, num_args = 1.., value_name = "FILE")]
    declarations: Vec<String>,

    /// Catalog SASS and CSS variables of these stylesheets
    #[arg(long, num_args = 1.., value_name = "FILE")]
    sass_report: Vec<String>,

    /// Count property pairs and rule signatures across stylesheets
    #[arg(long)]
    css_properties: bool,
}

/// Security: Validates output paths to prevent path traversal attacks.
///
/// Rejects:
/// - Absolute paths (must be relative to current directory)
/// - Paths containing `..` (parent directory traversal)
/// - Paths with null bytes (injection attacks)
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);

    if p.is_absolute() {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }

    // Backslashes count as separators so `..\\x` is caught on every platform
    let normalized = path.replace('\\', "/");
    if p
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
        || normalized.split('/').any(|segment| segment == "..")
    {
        return Err(anyhow!(
            "Path traversal (..) not allowed in output paths: {}",
            path
        ));
    }

    Ok(p)
}

/// Output directory from the command line, then the config file, then `.`.
fn resolve_output_dir(cli: &Cli, config: Option<&DeadassetConfig>) -> Result<PathBuf> {
    let from_config = config
        .and_then(|c| c.output.as_ref())
        .and_then(|o| o.dir.clone());
    match cli.output_dir.clone().or(from_config) {
        Some(dir) => validate_output_path(&dir),
        None => Ok(PathBuf::from(".")),
    }
}

fn wants_json(cli: &Cli, config: Option<&DeadassetConfig>) -> bool {
    cli.json
        || config
            .and_then(|c| c.output.as_ref())
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
}

/// File names (not paths) of the searched source files.
fn file_names(report: &UsageReport) -> Vec<String> {
    report
        .files
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .collect()
}

fn load_stylesheets(dirs: &[String], excludes: &[&str]) -> Result<Vec<deadasset_core::Document>> {
    let files = gather_files_in(dirs, css::STYLESHEET_EXTENSIONS, excludes)
        .context("Failed to gather stylesheets")?;
    info!(files = files.len(), "stylesheets found");
    Ok(read_documents(&files))
}

fn run_css_vars(cli: &Cli, out_dir: &Path, json: bool) -> Result<bool> {
    let declaration_files: Vec<PathBuf> = cli.declarations.iter().map(PathBuf::from).collect();
    let declaration_docs = read_documents(&declaration_files);
    if declaration_docs.len() != declaration_files.len() {
        log_error("declaration file unreadable; refusing to audit");
        return Err(anyhow!("Failed to read every declaration file"));
    }
    let declared = css::declarations_in(&declaration_docs);

    let excludes: Vec<&str> = cli.exclude.iter().map(String::as_str).collect();
    let docs = load_stylesheets(&cli.files, &excludes)?;
    let audit = css::audit(&docs, &declared);

    if !cli.no_write {
        let declared_sorted: Vec<&String> = declared.iter().collect();
        write_json(&out_dir.join("declared_variables.json"), &declared_sorted)?;
        write_json(&out_dir.join("undeclared_variables.json"), &audit.undeclared)?;
        write_json(&out_dir.join("unused_variables.json"), &audit.unused)?;
    }

    if json {
        println!("{}", to_pretty_json(&audit)?);
    } else {
        println!("Declared variables: {}", declared.len());
        println!("UNDECLARED VARIABLES ({}):", audit.undeclared.len());
        for (variable, files) in &audit.undeclared {
            println!("- {} ({})", variable, files.join(", "));
        }
        println!("UNUSED VARIABLES ({}):", audit.unused.len());
        for variable in &audit.unused {
            println!("- {}", variable);
        }
    }

    Ok(!audit.undeclared.is_empty() || !audit.unused.is_empty())
}

fn run_sass_report(cli: &Cli, out_dir: &Path) -> Result<()> {
    let paths: Vec<PathBuf> = cli.sass_report.iter().map(PathBuf::from).collect();
    let docs = read_documents(&paths);
    let catalogs = css::catalog_documents(&docs);
    info!(
        files = docs.len(),
        sass = catalogs.sass.len(),
        css = catalogs.css.len(),
        "variables cataloged"
    );

    let sass_text = catalogs.sass.render(false);
    let css_text = catalogs.css.render(true);

    if cli.no_write {
        println!("{}", sass_text);
        println!("{}", css_text);
    } else {
        write_text(&out_dir.join("sass_variables.scss"), &sass_text)?;
        write_text(&out_dir.join("css_variables.scss"), &css_text)?;
        println!(
            "Cataloged {} SASS and {} CSS variables",
            catalogs.sass.len(),
            catalogs.css.len()
        );
    }
    Ok(())
}

fn run_css_properties(cli: &Cli, out_dir: &Path, json: bool) -> Result<()> {
    let excludes: Vec<&str> = cli.exclude.iter().map(String::as_str).collect();
    let docs = load_stylesheets(&cli.files, &excludes)?;

    let signatures = css::count_class_signatures(&docs);
    let properties = css::count_properties(&docs);

    if !cli.no_write {
        write_json(&out_dir.join("class_properties.json"), &signatures)?;
        write_json(&out_dir.join("properties.json"), &properties)?;
    }

    if json {
        println!(
            "{}",
            to_pretty_json(&serde_json::json!({
                "class_properties": signatures,
                "properties": properties,
            }))?
        );
    } else {
        println!("Found {} distinct rule signatures", signatures.len());
        println!("Found {} distinct properties", properties.len());
        for entry in properties.iter().take(10) {
            println!("{:>6}  {}: {}", entry.count, entry.property, entry.value);
        }
    }
    Ok(())
}

fn run_unused_assets(
    cli: &Cli,
    config: Option<&DeadassetConfig>,
    out_dir: &Path,
    json: bool,
) -> Result<bool> {
    let mut builder = Deadasset::new();
    if let Some(config) = config {
        builder = builder.apply_config(config);
    }
    if !cli.ext.is_empty() {
        builder = builder.extensions(cli.ext.iter().cloned());
    }
    let report = builder
        .asset_dirs(cli.images.iter().map(PathBuf::from))
        .source_dirs(cli.files.iter().map(PathBuf::from))
        .exclude_dirs(cli.exclude.iter().cloned())
        .ignore_patterns(cli.ignore.iter().cloned())
        .analyze()?;

    info!(
        assets = report.assets.len(),
        files = report.files.len(),
        unused = report.unused.len(),
        ignored = report.ignored.len(),
        "analysis complete"
    );

    if !cli.no_write {
        write_json(&out_dir.join("all_images.json"), &report.assets)?;
        write_json(&out_dir.join("all_files.json"), &file_names(&report))?;
        write_json(&out_dir.join("unused_images.json"), &report.unused)?;
        if cli.by_file {
            write_json(&out_dir.join("image_usage.json"), &report.usage)?;
        }
    }

    if json && cli.by_file {
        println!("{}", to_pretty_json(&report)?);
    } else if json {
        print_json(&report.unused);
    } else {
        print_plain(&report.unused);
        if cli.by_file {
            for (name, files) in &report.usage {
                println!("{} <- {}", name, files.join(", "));
            }
        }
        if !report.shared_names.is_empty() {
            println!(
                "Note: {} asset names are shared by several files",
                report.shared_names.len()
            );
        }
    }

    for name in &report.shared_names {
        log_warn(&format!("asset name shared by several files: {}", name));
    }

    Ok(report.has_unused())
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadasset internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();
    let started = Instant::now();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let config = load_config(Path::new("."))?;
    let json = wants_json(&cli, config.as_ref());
    let out_dir = resolve_output_dir(&cli, config.as_ref())?;

    // Stylesheet audit modes
    if cli.css_vars {
        log_event("mode", "css-vars");
        let findings = run_css_vars(&cli, &out_dir, json)?;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
        std::process::exit(if findings { 1 } else { 0 });
    }

    if !cli.sass_report.is_empty() {
        log_event("mode", "sass-report");
        run_sass_report(&cli, &out_dir)?;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
        return Ok(());
    }

    if cli.css_properties {
        log_event("mode", "css-properties");
        run_css_properties(&cli, &out_dir, json)?;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
        return Ok(());
    }

    // Default mode: unused assets
    let has_unused = run_unused_assets(&cli, config.as_ref(), &out_dir, json)?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
    std::process::exit(if has_unused { 1 } else { 0 });
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadasset_core::OutputConfig;
    use std::fs;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::File::create(path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("deadasset_cli_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deadasset").chain(args.iter().copied())).unwrap()
    }

    // --- validate_output_path TESTS ---

    #[test]
    fn test_validate_output_path_relative() {
        assert_eq!(
            validate_output_path("reports/out").unwrap(),
            PathBuf::from("reports/out")
        );
    }

    #[test]
    fn test_validate_output_path_rejects_traversal() {
        assert!(validate_output_path("../outside").is_err());
        assert!(validate_output_path("reports/../../x").is_err());
        assert!(validate_output_path("reports\\..\\x").is_err());
    }

    #[test]
    fn test_validate_output_path_rejects_absolute_and_null() {
        assert!(validate_output_path("/tmp/reports").is_err());
        assert!(validate_output_path("rep\0orts").is_err());
    }

    // --- argument parsing TESTS ---

    #[test]
    fn test_default_mode_requires_images() {
        let result = Cli::try_parse_from(["deadasset", "-f", "src"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_default_mode() {
        let cli = parse(&["-i", "img", "fonts", "-f", "src", "--ext", "vue", "--json"]);
        assert_eq!(cli.images, vec!["img", "fonts"]);
        assert_eq!(cli.files, vec!["src"]);
        assert_eq!(cli.ext, vec!["vue"]);
        assert!(cli.json);
        assert!(!cli.css_vars);
    }

    #[test]
    fn test_sass_report_needs_no_directories() {
        let cli = parse(&["--sass-report", "a.scss", "b.scss"]);
        assert_eq!(cli.sass_report, vec!["a.scss", "b.scss"]);
        assert!(cli.images.is_empty());
    }

    #[test]
    fn test_css_vars_requires_declarations() {
        assert!(Cli::try_parse_from(["deadasset", "--css-vars", "-f", "styles"]).is_err());
        let cli = parse(&["--css-vars", "-f", "styles", "--declarations", "vars.scss"]);
        assert_eq!(cli.declarations, vec!["vars.scss"]);
    }

    #[test]
    fn test_output_dir_falls_back_to_config() {
        let cli = parse(&["-i", "img", "-f", "src"]);
        let config = DeadassetConfig {
            output: Some(OutputConfig {
                format: Some("json".into()),
                dir: Some("reports".into()),
            }),
            ..DeadassetConfig::default()
        };

        assert_eq!(
            resolve_output_dir(&cli, Some(&config)).unwrap(),
            PathBuf::from("reports")
        );
        assert!(wants_json(&cli, Some(&config)));
        assert_eq!(resolve_output_dir(&cli, None).unwrap(), PathBuf::from("."));
    }

    // --- mode TESTS ---

    #[test]
    fn test_unused_assets_writes_reports() {
        let dir = create_temp_dir("unused");
        create_file(&dir.join("img/logo.png"), "");
        create_file(&dir.join("img/icon.png"), "");
        create_file(&dir.join("src/index.html"), "<img src='logo.png'>");

        let img = dir.join("img").display().to_string();
        let src = dir.join("src").display().to_string();
        let cli = parse(&["-i", &img, "-f", &src, "--by-file"]);
        let out = dir.join("out");

        let has_unused = run_unused_assets(&cli, None, &out, false).unwrap();
        assert!(has_unused);

        let unused: Vec<String> =
            serde_json::from_str(&fs::read_to_string(out.join("unused_images.json")).unwrap())
                .unwrap();
        assert_eq!(unused, vec!["icon.png"]);

        let files: Vec<String> =
            serde_json::from_str(&fs::read_to_string(out.join("all_files.json")).unwrap())
                .unwrap();
        assert_eq!(files, vec!["index.html"]);
        assert!(out.join("image_usage.json").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_no_write_leaves_no_files() {
        let dir = create_temp_dir("nowrite");
        create_file(&dir.join("img/logo.png"), "");
        create_file(&dir.join("src/index.html"), "logo.png");

        let img = dir.join("img").display().to_string();
        let src = dir.join("src").display().to_string();
        let cli = parse(&["-i", &img, "-f", &src, "--no-write"]);
        let out = dir.join("out");

        let has_unused = run_unused_assets(&cli, None, &out, false).unwrap();
        assert!(!has_unused);
        assert!(!out.exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_css_vars_mode() {
        let dir = create_temp_dir("cssvars");
        create_file(&dir.join("vars.scss"), ":root { --brand: #00f; --idle: 0; }");
        create_file(&dir.join("styles/app.scss"), ".a { color: var(--brand); }");

        let decl = dir.join("vars.scss").display().to_string();
        let styles = dir.join("styles").display().to_string();
        let cli = parse(&["--css-vars", "-f", &styles, "--declarations", &decl]);
        let out = dir.join("out");

        assert!(run_css_vars(&cli, &out, false).unwrap());
        let unused: Vec<String> =
            serde_json::from_str(&fs::read_to_string(out.join("unused_variables.json")).unwrap())
                .unwrap();
        assert_eq!(unused, vec!["--idle"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_sass_report_mode() {
        let dir = create_temp_dir("sass");
        create_file(&dir.join("a.scss"), "$gap: 4px;\n");
        create_file(&dir.join("b.scss"), "$gap: 8px;\n");

        let a = dir.join("a.scss").display().to_string();
        let b = dir.join("b.scss").display().to_string();
        let cli = parse(&["--sass-report", &a, &b]);
        let out = dir.join("out");

        run_sass_report(&cli, &out).unwrap();
        let text = fs::read_to_string(out.join("sass_variables.scss")).unwrap();
        assert!(text.contains("//Conflicting Values\n$gap: 4px;"));
        assert!(out.join("css_variables.scss").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_css_properties_mode() {
        let dir = create_temp_dir("props");
        create_file(&dir.join("styles/a.scss"), ".a {\n  color: red;\n}\n");
        create_file(&dir.join("styles/b.scss"), ".b {\n  color: red;\n}\n");

        let styles = dir.join("styles").display().to_string();
        let cli = parse(&["--css-properties", "-f", &styles]);
        let out = dir.join("out");

        run_css_properties(&cli, &out, false).unwrap();
        let props: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("properties.json")).unwrap())
                .unwrap();
        assert_eq!(props[0]["property"], "color");
        assert_eq!(props[0]["count"], 2);

        fs::remove_dir_all(&dir).ok();
    }
}
