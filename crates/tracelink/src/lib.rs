//! Tracelink - traceability analysis for engineering artifacts.
//!
//! Artifacts (business needs, stakeholder and system requirements, design
//! elements, code units and test cases) are linked into a six-level
//! hierarchy. This crate loads artifact and link declarations, resolves
//! forward and backward traceability chains, computes per-level coverage,
//! and reports orphans, dangling links and conflict/duplicate pairs.
//!
//! The library is usable on its own (see [`resolver`]); the `tracelink`
//! binary wraps it in a CLI.

#![forbid(unsafe_code)]

// Core model and analysis
pub mod domain;
pub mod error;
pub mod report;
pub mod resolver;
pub mod store;

// Loading
pub mod config;
pub mod ingest;

// CLI support (needed by binary)
pub mod app;
pub mod cli;
pub mod commands;
pub mod output;
