//! Structural tests for architectural boundary enforcement.
//!
//! The domain layer stays pure and application services only talk to the
//! outside world through ports.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines that mention one of `forbidden`.
fn violations(dir: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(dir);
    let mut found = Vec::new();
    for file in collect_rs_files(&root) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        for (n, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") {
                continue;
            }
            if forbidden.iter().any(|f| trimmed.contains(f)) {
                found.push(format!("{}:{}: {trimmed}", file.display(), n + 1));
            }
        }
    }
    found
}

#[test]
fn test_domain_has_no_io_or_outer_layer_imports() {
    let found = violations(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
        ],
    );
    assert!(found.is_empty(), "domain layer violations:\n{}", found.join("\n"));
}

#[test]
fn test_application_does_not_import_adapters() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "std::fs"],
    );
    assert!(
        found.is_empty(),
        "application layer violations:\n{}",
        found.join("\n")
    );
}
