//! Hygiene: source-level budgets for panics and silently dropped errors.
//!
//! Scans the production sources of this crate and of `emotion-log` (sibling
//! `*_test.rs` files excluded). Every budget is zero: a hit fails the suite
//! and lists the offending files.

use std::fs;
use std::path::{Path, PathBuf};

const SOURCE_ROOTS: [&str; 2] = ["src", "emotion-log/src"];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    for root in SOURCE_ROOTS {
        collect_rs_files(&manifest.join(root), &mut files);
    }
    files
}

fn collect_rs_files(dir: &PathBuf, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Assert that no production line contains `pattern`.
fn assert_absent(pattern: &str) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found under {SOURCE_ROOTS:?}");

    let hits: Vec<String> = files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| format!("  {}: {count}", file.path))
        })
        .collect();
    assert!(hits.is_empty(), "`{pattern}` found in production code:\n{}", hits.join("\n"));
}

// Panics.

#[test]
fn no_unwrap() {
    assert_absent(".unwrap()");
}

#[test]
fn no_expect() {
    assert_absent(".expect(");
}

#[test]
fn no_panic() {
    assert_absent("panic!(");
}

#[test]
fn no_unreachable() {
    assert_absent("unreachable!(");
}

#[test]
fn no_todo() {
    assert_absent("todo!(");
}

#[test]
fn no_unimplemented() {
    assert_absent("unimplemented!(");
}

// Silent loss.

#[test]
fn no_silent_discard() {
    assert_absent("let _ =");
}

#[test]
fn no_dot_ok() {
    assert_absent(".ok()");
}

// Structure.

#[test]
fn no_allow_dead_code() {
    assert_absent("#[allow(dead_code)]");
}
