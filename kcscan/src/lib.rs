//! # kcscan
//!
//! A scanner and search engine for the Linux kernel's Kconfig language.
//!
//! `kcscan` parses a tree of Kconfig files (directives declaring
//! configuration options, their types, dependencies, and menu nesting, with
//! recursive `source` inclusion) into an in-memory item tree, and provides
//! the building blocks for filtering that tree by a regex and rendering the
//! matching subtree with its ancestor context preserved.
//!
//! ## Features
//!
//! - Full directive grammar: `config`/`menuconfig`, menus, choices, types,
//!   defaults, ranges, `depends on`, `select`/`imply`, `visible if`, and
//!   conditional `if`/`endif` blocks
//! - Backslash continuations and indentation-bounded help-text capture
//! - Recursive `source` inclusion with variable substitution and cycle
//!   detection
//! - Submenu reconstruction: flat sibling runs that depend on a preceding
//!   item are regrouped into nested submenus
//! - Search with ancestor visibility propagation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kcscan::{rebuild_submenus, search, Scanner, SearchSpec};
//! use regex::RegexBuilder;
//!
//! let mut tree = Scanner::new("/usr/src/linux", "Kconfig")
//!     .with_replacement("$SRCARCH", "x86")
//!     .scan()
//!     .unwrap();
//! rebuild_submenus(&mut tree);
//!
//! let spec = SearchSpec {
//!     regex: Some(RegexBuilder::new("swap").case_insensitive(true).build().unwrap()),
//!     include_unnamed: false,
//! };
//! let hits = search(&mut tree, &spec);
//! println!("{hits} matching options");
//! ```
//!
//! ## Modules
//!
//! - [`expr`] - Condition expression model and the `requires` predicate
//! - [`parse`] - Grammar engine turning one logical line into a directive
//! - [`scan`] - Per-file state machine building the item tree
//! - [`tree`] - Arena-based item tree
//! - [`submenu`] - Dependent-sibling submenu reconstruction
//! - [`search`] - Regex search with visibility propagation

/// Condition expression model and the `requires` predicate.
pub mod expr;

/// Grammar engine for single logical lines.
pub mod parse;

/// Per-file scanning state machine and file inclusion.
pub mod scan;

/// Regex search with ancestor visibility propagation.
pub mod search;

/// Submenu reconstruction pass.
pub mod submenu;

/// Arena-based item tree.
pub mod tree;

pub use expr::{CmpOp, Expr, Symbol};
pub use parse::{Directive, ParseError, parse_directive};
pub use scan::{ScanError, Scanner};
pub use search::{SearchSpec, search};
pub use submenu::rebuild_submenus;
pub use tree::{Item, ItemId, ItemKind, ItemTree, Origin};
