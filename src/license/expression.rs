//! License expression tree and the combinators that build it from code.
//!
//! Trees are immutable: every node is owned by its parent and nothing is
//! mutated after construction. The only way to build a [`Compound`] is
//! [`Compound::new`], which enforces the `WITH` invariants, so any tree that
//! exists is structurally valid.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::catalog::{lookup_exception, lookup_license, Exception, License};
use super::error::{ConstructionError, ValidationError};

/// SPDX idstring, optionally scoped to an external document.
pub(crate) static IDSTRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(DocumentRef-[A-Za-z0-9.\-]+:)?[A-Za-z0-9.\-]+$").unwrap()
});

/// Binary operators, loosest binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Or,
    And,
    With,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Or => "OR",
            Operator::And => "AND",
            Operator::With => "WITH",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog license as an expression leaf.
///
/// `id` is the base id: for the deprecated `GPL-2.0+` it is `GPL-2.0` with
/// `or_later` set, for the current `GPL-2.0-or-later` the suffix stays part
/// of the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimpleLicense {
    id: String,
    or_later: bool,
    deprecated: bool,
}

impl SimpleLicense {
    pub(crate) fn new(id: impl Into<String>, or_later: bool, deprecated: bool) -> Self {
        Self {
            id: id.into(),
            or_later,
            deprecated,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn or_later(&self) -> bool {
        self.or_later
    }

    pub fn deprecated(&self) -> bool {
        self.deprecated
    }
}

impl fmt::Display for SimpleLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only deprecated ids use the legacy `+` operator.
        if self.deprecated && self.or_later {
            write!(f, "{}+", self.id)
        } else {
            f.write_str(&self.id)
        }
    }
}

/// An identifier that is not in the catalog, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LicenseRef(String);

impl LicenseRef {
    /// Wrap `raw` as a license reference.
    ///
    /// `raw` must be a valid SPDX idstring that [`parse`](super::parse) would
    /// read back as a reference: operator keywords and catalog license or
    /// exception ids are rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self, ConstructionError> {
        let raw = raw.into();
        if !IDSTRING.is_match(&raw)
            || matches!(raw.as_str(), "AND" | "OR" | "WITH")
            || lookup_license(&raw).is_some()
            || lookup_exception(&raw).is_some()
        {
            return Err(ConstructionError::InvalidLicenseRef(raw));
        }
        Ok(Self(raw))
    }

    pub(crate) fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference uses an explicit `LicenseRef-`/`DocumentRef-` prefix.
    pub fn is_prefixed(&self) -> bool {
        self.0.starts_with("LicenseRef-") || self.0.starts_with("DocumentRef-")
    }
}

impl fmt::Display for LicenseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog exception as an expression leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExceptionRef {
    id: String,
    deprecated: bool,
}

impl ExceptionRef {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn deprecated(&self) -> bool {
        self.deprecated
    }
}

impl fmt::Display for ExceptionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Two operands joined by an [`Operator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compound {
    left: Box<Expression>,
    operator: Operator,
    right: Box<Expression>,
}

impl Compound {
    /// Join `left` and `right` with `operator`.
    ///
    /// `WITH` requires a single license or license reference on the left and
    /// an exception leaf on the right. `AND` and `OR` reject bare exception
    /// leaves as operands.
    pub fn new(
        left: Expression,
        operator: Operator,
        right: Expression,
    ) -> Result<Self, ConstructionError> {
        match operator {
            Operator::With => {
                if !left.is_license_leaf() {
                    return Err(ConstructionError::ExceptionTarget(left.to_string()));
                }
                if !matches!(right, Expression::Exception(_)) {
                    return Err(ConstructionError::NotAnException(right.to_string()));
                }
            }
            Operator::And | Operator::Or => {
                for operand in [&left, &right] {
                    if let Expression::Exception(exception) = operand {
                        return Err(ConstructionError::ExceptionOperand {
                            exception: exception.id.clone(),
                            operator: operator.as_str(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    /// Join operands the caller already knows to satisfy [`Compound::new`].
    pub(crate) fn new_unchecked(left: Expression, operator: Operator, right: Expression) -> Self {
        Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub(crate) fn into_parts(self) -> (Expression, Operator, Expression) {
        (*self.left, self.operator, *self.right)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_operand(f, self.operator, &self.left)?;
        write!(f, " {} ", self.operator)?;
        write_operand(f, self.operator, &self.right)
    }
}

/// `OR` is the only operator looser than its parent can be; `AND` and `OR`
/// are associative, so same-operator children never need parentheses.
fn write_operand(f: &mut fmt::Formatter<'_>, parent: Operator, operand: &Expression) -> fmt::Result {
    match operand {
        Expression::Compound(c) if parent == Operator::And && c.operator == Operator::Or => {
            write!(f, "({})", c)
        }
        other => write!(f, "{}", other),
    }
}

/// A license expression tree.
///
/// Rendering and normalizing recurse once per level. [`parse`](super::parse)
/// bounds that depth; trees assembled with the combinators are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    License(SimpleLicense),
    LicenseRef(LicenseRef),
    /// Only valid as the right operand of `WITH`.
    Exception(ExceptionRef),
    Compound(Compound),
}

/// How strictly [`Expression::validate`] treats non-catalog and deprecated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Any identifier is accepted.
    AllowAny,
    /// Non-catalog ids need a `LicenseRef-` prefix; deprecated ids are fine.
    #[default]
    AllowDeprecated,
    /// Like `AllowDeprecated`, and deprecated licenses or exceptions fail.
    AllowCurrent,
}

impl Expression {
    /// A single license or license reference.
    pub fn is_license_leaf(&self) -> bool {
        matches!(self, Expression::License(_) | Expression::LicenseRef(_))
    }

    /// All leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&Expression> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Expression>) {
        match self {
            Expression::Compound(c) => {
                c.left.collect_leaves(out);
                c.right.collect_leaves(out);
            }
            leaf => out.push(leaf),
        }
    }

    /// The distinct license and license reference ids in this expression, sorted.
    pub fn licenses(&self) -> Vec<String> {
        self.leaves()
            .into_iter()
            .filter(|leaf| leaf.is_license_leaf())
            .map(ToString::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check every leaf against `strictness`, reporting the first violation.
    pub fn validate(&self, strictness: Strictness) -> Result<(), ValidationError> {
        for leaf in self.leaves() {
            match (leaf, strictness) {
                (_, Strictness::AllowAny) => {}
                (Expression::LicenseRef(r), _) if !r.is_prefixed() => {
                    return Err(ValidationError::UnknownLicense(r.to_string()));
                }
                (Expression::License(l), Strictness::AllowCurrent) if l.deprecated => {
                    return Err(ValidationError::DeprecatedLicense(l.to_string()));
                }
                (Expression::Exception(e), Strictness::AllowCurrent) if e.deprecated => {
                    return Err(ValidationError::DeprecatedException(e.to_string()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::License(l) => fmt::Display::fmt(l, f),
            Expression::LicenseRef(r) => fmt::Display::fmt(r, f),
            Expression::Exception(e) => fmt::Display::fmt(e, f),
            Expression::Compound(c) => fmt::Display::fmt(c, f),
        }
    }
}

impl License {
    /// Convert this catalog entry into an expression leaf.
    ///
    /// Current ids carry "or later" in the id text (`GPL-3.0-or-later`);
    /// deprecated ids use a trailing `+` (`GPL-2.0+`), which is stripped from
    /// the leaf id.
    pub fn to_expression(&self) -> SimpleLicense {
        let (id, or_later) = if self.deprecated {
            match self.id.strip_suffix('+') {
                Some(base) => (base, true),
                None => (self.id, false),
            }
        } else {
            (self.id, self.id.ends_with("-or-later"))
        };

        SimpleLicense::new(id, or_later, self.deprecated)
    }
}

impl Exception {
    /// Convert this catalog entry into an exception leaf.
    pub fn to_expression(&self) -> Expression {
        Expression::Exception(ExceptionRef {
            id: self.id.to_string(),
            deprecated: self.deprecated,
        })
    }
}

impl From<SimpleLicense> for Expression {
    fn from(license: SimpleLicense) -> Self {
        Expression::License(license)
    }
}

impl From<LicenseRef> for Expression {
    fn from(reference: LicenseRef) -> Self {
        Expression::LicenseRef(reference)
    }
}

impl From<Compound> for Expression {
    fn from(compound: Compound) -> Self {
        Expression::Compound(compound)
    }
}

impl From<&License> for Expression {
    fn from(license: &License) -> Self {
        Expression::License(license.to_expression())
    }
}

impl From<&Exception> for Expression {
    fn from(exception: &Exception) -> Self {
        exception.to_expression()
    }
}

/// Join two operands with `AND`.
pub fn license_and(
    left: impl Into<Expression>,
    right: impl Into<Expression>,
) -> Result<Expression, ConstructionError> {
    Compound::new(left.into(), Operator::And, right.into()).map(Expression::Compound)
}

/// Join two operands with `OR`.
pub fn license_or(
    left: impl Into<Expression>,
    right: impl Into<Expression>,
) -> Result<Expression, ConstructionError> {
    Compound::new(left.into(), Operator::Or, right.into()).map(Expression::Compound)
}

/// Attach `exception` to a single license or license reference.
pub fn license_with(
    license: impl Into<Expression>,
    exception: &Exception,
) -> Result<Expression, ConstructionError> {
    Compound::new(license.into(), Operator::With, exception.to_expression())
        .map(Expression::Compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lic(id: &str) -> &'static License {
        lookup_license(id).unwrap()
    }

    fn classpath() -> &'static Exception {
        lookup_exception("Classpath-exception-2.0").unwrap()
    }

    #[test]
    fn test_to_expression_deprecated_plus() {
        let leaf = lic("GPL-2.0+").to_expression();
        assert_eq!(leaf.id(), "GPL-2.0");
        assert!(leaf.or_later());
        assert!(leaf.deprecated());
        assert_eq!(leaf.to_string(), "GPL-2.0+");
    }

    #[test]
    fn test_to_expression_deprecated_without_plus() {
        let leaf = lic("GPL-2.0").to_expression();
        assert_eq!(leaf.id(), "GPL-2.0");
        assert!(!leaf.or_later());
    }

    #[test]
    fn test_to_expression_current_or_later() {
        let leaf = lic("GPL-3.0-or-later").to_expression();
        assert_eq!(leaf.id(), "GPL-3.0-or-later");
        assert!(leaf.or_later());
        assert_eq!(leaf.to_string(), "GPL-3.0-or-later");
    }

    #[test]
    fn test_to_expression_plain() {
        let leaf = lic("MIT").to_expression();
        assert_eq!(leaf.id(), "MIT");
        assert!(!leaf.or_later());
    }

    #[test]
    fn test_current_id_with_plus_is_not_stripped() {
        // The `+` rule only applies to deprecated entries.
        let custom = License {
            id: "Foo-1.0+",
            name: "Foo",
            deprecated: false,
            or_later_eligible: false,
        };
        let leaf = custom.to_expression();
        assert_eq!(leaf.id(), "Foo-1.0+");
        assert!(!leaf.or_later());
    }

    #[test]
    fn test_exception_to_expression() {
        let leaf = classpath().to_expression();
        assert_eq!(leaf.to_string(), "Classpath-exception-2.0");
        assert!(matches!(leaf, Expression::Exception(_)));
    }

    #[test]
    fn test_combinators_nest() {
        let either = license_or(lic("Apache-2.0"), lic("BSD-3-Clause")).unwrap();
        let expr = license_and(lic("MIT"), either).unwrap();
        assert_eq!(expr.to_string(), "MIT AND (Apache-2.0 OR BSD-3-Clause)");

        let Expression::Compound(c) = &expr else {
            panic!("expected compound");
        };
        assert_eq!(c.operator(), Operator::And);
        assert_eq!(c.left().to_string(), "MIT");
    }

    #[test]
    fn test_license_with() {
        let expr = license_with(lic("GPL-2.0-only"), classpath()).unwrap();
        assert_eq!(expr.to_string(), "GPL-2.0-only WITH Classpath-exception-2.0");

        let reference = LicenseRef::new("LicenseRef-custom").unwrap();
        assert!(license_with(reference, classpath()).is_ok());
    }

    #[test]
    fn test_license_with_rejects_compound() {
        let either = license_or(lic("MIT"), lic("GPL-2.0-only")).unwrap();
        let err = license_with(either, classpath()).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::ExceptionTarget("MIT OR GPL-2.0-only".to_string())
        );
    }

    #[test]
    fn test_compound_rejects_misplaced_exception() {
        let err = license_and(lic("MIT"), classpath()).unwrap_err();
        assert!(matches!(err, ConstructionError::ExceptionOperand { operator: "AND", .. }));

        let err = Compound::new(lic("MIT").into(), Operator::With, lic("Apache-2.0").into())
            .unwrap_err();
        assert_eq!(err, ConstructionError::NotAnException("Apache-2.0".to_string()));
    }

    #[test]
    fn test_display_parenthesizes_only_or_under_and() {
        let and = license_and(lic("MIT"), lic("ISC")).unwrap();
        let expr = license_or(and, lic("Zlib")).unwrap();
        assert_eq!(expr.to_string(), "MIT AND ISC OR Zlib");

        let or = license_or(lic("MIT"), lic("ISC")).unwrap();
        let expr = license_or(lic("Zlib"), or).unwrap();
        assert_eq!(expr.to_string(), "Zlib OR MIT OR ISC");

        let or = license_or(lic("MIT"), lic("ISC")).unwrap();
        let expr = license_and(or, lic("Zlib")).unwrap();
        assert_eq!(expr.to_string(), "(MIT OR ISC) AND Zlib");
    }

    #[test]
    fn test_license_ref_validation() {
        assert!(LicenseRef::new("LicenseRef-scancode-public-domain").is_ok());
        assert!(LicenseRef::new("DocumentRef-spdx-tool:LicenseRef-x").is_ok());
        assert_eq!(
            LicenseRef::new("MIT OR GPL"),
            Err(ConstructionError::InvalidLicenseRef("MIT OR GPL".to_string()))
        );
        assert!(LicenseRef::new("").is_err());
    }

    #[test]
    fn test_license_ref_rejects_keywords() {
        for keyword in ["AND", "OR", "WITH"] {
            assert_eq!(
                LicenseRef::new(keyword),
                Err(ConstructionError::InvalidLicenseRef(keyword.to_string()))
            );
        }
        // Lowercase words are plain identifiers.
        assert!(LicenseRef::new("and").is_ok());
    }

    #[test]
    fn test_license_ref_rejects_catalog_ids() {
        assert_eq!(
            LicenseRef::new("MIT"),
            Err(ConstructionError::InvalidLicenseRef("MIT".to_string()))
        );
        assert!(LicenseRef::new("GPL-2.0").is_err());
        assert_eq!(
            LicenseRef::new("Classpath-exception-2.0"),
            Err(ConstructionError::InvalidLicenseRef(
                "Classpath-exception-2.0".to_string()
            ))
        );
    }

    #[test]
    fn test_license_ref_trees_reparse() {
        let reference = LicenseRef::new("Custom-1.0").unwrap();
        let expr = license_or(reference, lic("MIT")).unwrap();
        assert_eq!(crate::license::parse(&expr.to_string()), Ok(expr));
    }

    #[test]
    fn test_licenses_are_sorted_and_unique() {
        let expr = license_and(
            license_or(lic("MIT"), lic("Apache-2.0")).unwrap(),
            license_with(lic("MIT"), classpath()).unwrap(),
        )
        .unwrap();
        assert_eq!(expr.licenses(), vec!["Apache-2.0", "MIT"]);
    }

    #[test]
    fn test_validate_strictness() {
        let unknown = LicenseRef::new("Custom-1.0").unwrap();
        let expr = license_or(lic("GPL-2.0+"), unknown).unwrap();

        assert_eq!(expr.validate(Strictness::AllowAny), Ok(()));
        assert_eq!(
            expr.validate(Strictness::AllowDeprecated),
            Err(ValidationError::UnknownLicense("Custom-1.0".to_string()))
        );

        let prefixed = LicenseRef::new("LicenseRef-custom").unwrap();
        let expr = license_or(lic("GPL-2.0+"), prefixed).unwrap();
        assert_eq!(expr.validate(Strictness::AllowDeprecated), Ok(()));
        assert_eq!(
            expr.validate(Strictness::AllowCurrent),
            Err(ValidationError::DeprecatedLicense("GPL-2.0+".to_string()))
        );
    }

    #[test]
    fn test_validate_deprecated_exception() {
        let nokia = lookup_exception("Nokia-Qt-exception-1.1").unwrap();
        let expr = license_with(lic("GPL-2.0-only"), nokia).unwrap();

        assert_eq!(expr.validate(Strictness::AllowDeprecated), Ok(()));
        assert_eq!(
            expr.validate(Strictness::AllowCurrent),
            Err(ValidationError::DeprecatedException(
                "Nokia-Qt-exception-1.1".to_string()
            ))
        );
    }
}
