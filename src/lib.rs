//! `license-expr` — parse, build, and normalize SPDX license expressions.
//!
//! ```
//! use license_expr::license::{normalize, parse};
//!
//! let expr = parse("MIT AND (Apache-2.0 OR BSD-3-Clause)").unwrap();
//! assert_eq!(normalize(&expr).len(), 2);
//! ```
//!
//! Everything here is pure and synchronous; all public types are `Send + Sync`.

pub mod license;
