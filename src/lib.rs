//! # classops
//!
//! Administrative CLI for an e-learning platform. Each subcommand is an
//! independent chore: export catalog data, filter groups by the naming
//! convention, assign courses to groups, render templates, merge content
//! fragments, and batch-convert presentations.
//!
//! ## Modules
//!
//! - `api` - Trait-based abstraction over the platform's REST interface
//! - `assign` - Group course assignment pipeline
//! - `cli` - Argument parsing, routing, and validation
//! - `config` - Runtime settings (timeouts, retry, fail-fast policy)
//! - `content` - HTML fragment merging
//! - `convert` - Batch presentation conversion via an external tool
//! - `courses` - Published course catalog export
//! - `groups` - Group listing and naming-convention filtering
//! - `records` - Tabular input records and CSV readers
//! - `report` - Timestamped report files
//! - `subprocess` - External process abstraction
//! - `template` - Variable substitution for text files
pub mod api;
pub mod assign;
pub mod cli;
pub mod config;
pub mod content;
pub mod convert;
pub mod courses;
pub mod error;
pub mod groups;
pub mod records;
pub mod report;
pub mod subprocess;
pub mod template;
