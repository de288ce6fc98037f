//! trinline - build-time translation inliner for JavaScript
//!
//! Replaces `tr`, `trc`, `trn` and `marktr` call sites with the translated
//! text of a locale, producing one localized copy of the sources per locale.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Tree model, translation pass, catalogs and the project driver
//! - `issues`: User-facing issue types

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
