//! Localization engine.
//!
//! - `ast`: arena tree the pass works on
//! - `patch`: the translation pass over a tree
//! - `splitter`: `%N` placeholder expansion into `plus` trees
//! - `table`: per-language translation lookup
//! - `parsers`: JavaScript front end and catalog readers
//! - `printer`: tree back to source text
//! - `context`: project driver used by the CLI

pub mod ast;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod file_scanner;
pub mod parsers;
pub mod patch;
pub mod printer;
pub mod splitter;
pub mod table;

pub use ast::{Node, NodeId, NodeKind, Tree};
pub use context::{LocalizeContext, LocalizedFile};
pub use diagnostics::{Diagnostic, DiagnosticSink, Discard, Level, TranslationFn};
pub use error::PatchError;
pub use patch::{Patcher, has_text, patch};
pub use printer::print;
pub use splitter::split;
pub use table::{Catalog, Entry, Table};
