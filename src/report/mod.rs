//! Report renderers for checked license expressions.
//!
//! - [`terminal`] — colored, tabular output with a summary line; respects `--verbose` / `--quiet`.
//!
//! JSON output is plain `serde_json` over [`crate::models::ExpressionReport`].

pub mod terminal;
