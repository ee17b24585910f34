//! SPDX license expression engine.
//!
//! - [`catalog`] — static registry of license and exception identifiers.
//! - [`parser`] — turns expression strings into [`Expression`] trees.
//! - [`expression`] — the tree itself, combinators, and canonical rendering.
//! - [`normalizer`] — disjunctive normal form for set-based compatibility checks.
//! - [`reference`] — recognizes scanner-generated `LicenseRef-` identifiers.
//! - [`cache`] — optional memoization of parse results.

pub mod cache;
pub mod catalog;
pub mod error;
pub mod expression;
pub mod normalizer;
pub mod parser;
pub mod reference;

pub use cache::ParseCache;
pub use catalog::{lookup_exception, lookup_license, Exception, License};
pub use error::{ConstructionError, ParseError, ValidationError};
pub use expression::{
    license_and, license_or, license_with, Compound, ExceptionRef, Expression, LicenseRef,
    Operator, SimpleLicense, Strictness,
};
pub use normalizer::{normalize, Clause, NormalizedForm, Term, TermLicense};
pub use parser::{parse, parse_lenient};
pub use reference::{is_license_ref_to, ReferenceMatcher, DEFAULT_NAMESPACES};
