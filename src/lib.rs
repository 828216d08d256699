//! vdfkit: read and surgically rewrite Valve's VDF key/value files.
//!
//! The text format is parsed into a tree whose nodes remember the source lines they occupy.
//! Edits are recorded as a line-level [`EditPlan`] and replayed over the untouched original lines,
//! so a rewritten file differs from its source only where an edit landed.
//!
//! ```no_run
//! use vdfkit::{EditPlan, TextDocument};
//!
//! let doc = TextDocument::load("config/config.vdf")?;
//! if let Some(devices) = doc.root().path(&["InstallConfigStore", "AuthorizedDevice"]) {
//!     let mut plan = EditPlan::new();
//!     devices.clear(&mut plan);
//!     devices.append(&mut plan, ["\t\t\"123\"\n", "\t\t{\n", "\t\t}\n"]);
//!     doc.save(&plan)?;
//! }
//! # Ok::<(), vdfkit::Error>(())
//! ```
//!
//! The binary catalogs (`appinfo.vdf`, `packageinfo.vdf`) are decoded read-only by the
//! [`catalog`] readers, optionally restricted to a set of ids.
#![allow(clippy::multiple_crate_versions)]

pub mod binary;
pub mod catalog;
pub mod config;
pub mod document;
pub mod edit_plan;
pub mod encoding;
pub mod error;
pub mod lexer;
mod ordered_map;
pub mod parser;
pub mod section;
pub mod shares;

pub use catalog::IdFilter;
pub use document::TextDocument;
pub use edit_plan::{Edit, EditPlan};
pub use error::{Error, Result};
pub use section::{Scalar, Section, Span, Value};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
