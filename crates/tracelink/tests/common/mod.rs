//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the tracelink binary built for this test run
pub fn tracelink_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tracelink"))
}

/// Run the tracelink binary in the specified directory
pub fn run_tracelink_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(tracelink_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute tracelink binary")
}

/// One artifact declaration line
pub fn artifact(id: &str, kind: &str) -> String {
    format!(r#"{{"decl":"artifact","id":"{id}","kind":"{kind}"}}"#)
}

/// One artifact declaration line with the kind left to prefix inference
pub fn artifact_inferred(id: &str) -> String {
    format!(r#"{{"decl":"artifact","id":"{id}"}}"#)
}

/// One link declaration line
pub fn link(source: &str, target: &str, link_type: &str) -> String {
    format!(r#"{{"decl":"link","source":"{source}","target":"{target}","type":"{link_type}"}}"#)
}

/// Write declaration lines to `dir/name` and return the path
pub fn write_declarations(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).expect("Failed to write declarations");
    path
}

/// Declarations for a single complete six-level chain
pub fn complete_chain_lines() -> Vec<String> {
    vec![
        artifact("BN-1", "business_need"),
        artifact("STR-1", "stakeholder_requirement"),
        artifact("REQ-1", "system_requirement"),
        artifact("DES-1", "design_element"),
        artifact("CODE-1", "code_unit"),
        artifact("TEST-1", "test_case"),
        link("STR-1", "BN-1", "satisfies"),
        link("REQ-1", "STR-1", "derives"),
        link("DES-1", "REQ-1", "satisfies"),
        link("CODE-1", "DES-1", "implements"),
        link("TEST-1", "CODE-1", "verifies"),
    ]
}
