//! Readers for source files and translation catalogs.
//!
//! - `js`: JavaScript/TypeScript sources (swc), lowered into the arena tree
//! - `catalog`: catalog discovery, JSON catalogs and table building
//! - `po`: gettext catalogs

pub mod catalog;
pub mod js;
pub mod po;
