//! Disjunctive normal form of license expressions.
//!
//! A [`NormalizedForm`] is a set of clauses; a work may be used under any one
//! clause, and a clause requires every license term in it. A compatibility
//! checker only needs to find one clause whose terms are all allowed.
//!
//! Distribution is exponential in the worst case: `(A OR B) AND (C OR D) AND
//! ...` with `n` two-way choices yields `2^n` clauses. Real-world expressions
//! have a handful of terms, so no attempt is made to bound this; a warning is
//! logged when a result grows past [`LARGE_FORM_CLAUSES`].

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::expression::{Compound, Expression, ExceptionRef, LicenseRef, Operator, SimpleLicense};

/// Clause count above which normalization logs a warning.
pub const LARGE_FORM_CLAUSES: usize = 256;

/// The license part of a [`Term`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermLicense {
    License(SimpleLicense),
    LicenseRef(LicenseRef),
}

/// A license or license reference with its optional exception.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
    license: TermLicense,
    exception: Option<ExceptionRef>,
}

impl Term {
    pub fn license(&self) -> &TermLicense {
        &self.license
    }

    /// The license id, without the legacy `+` of deprecated or-later ids.
    pub fn id(&self) -> &str {
        match &self.license {
            TermLicense::License(l) => l.id(),
            TermLicense::LicenseRef(r) => r.as_str(),
        }
    }

    pub fn or_later(&self) -> bool {
        matches!(&self.license, TermLicense::License(l) if l.or_later())
    }

    pub fn deprecated(&self) -> bool {
        matches!(&self.license, TermLicense::License(l) if l.deprecated())
    }

    pub fn is_license_ref(&self) -> bool {
        matches!(self.license, TermLicense::LicenseRef(_))
    }

    pub fn exception(&self) -> Option<&ExceptionRef> {
        self.exception.as_ref()
    }

    /// Rebuild the leaf (or `WITH` pair) this term came from.
    pub fn to_expression(&self) -> Expression {
        let license: Expression = match &self.license {
            TermLicense::License(l) => l.clone().into(),
            TermLicense::LicenseRef(r) => r.clone().into(),
        };
        match &self.exception {
            Some(exception) => Compound::new_unchecked(
                license,
                Operator::With,
                Expression::Exception(exception.clone()),
            )
            .into(),
            None => license,
        }
    }
}

/// Terms that must all be satisfied together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clause(BTreeSet<Term>);

impl Clause {
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_expression(&self) -> Option<Expression> {
        join(self.terms().map(Term::to_expression), Operator::And)
    }
}

/// An OR of AND-clauses equivalent to some [`Expression`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedForm {
    clauses: BTreeSet<Clause>,
}

impl NormalizedForm {
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// An empty form has no clause to choose, so it grants nothing.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Expand back into an OR of ANDs, or `None` for the empty form.
    pub fn to_expression(&self) -> Option<Expression> {
        join(self.clauses().filter_map(Clause::to_expression), Operator::Or)
    }
}

fn join(mut parts: impl Iterator<Item = Expression>, operator: Operator) -> Option<Expression> {
    let first = parts.next()?;
    Some(parts.fold(first, |acc, next| {
        Compound::new_unchecked(acc, operator, next).into()
    }))
}

/// Convert `expr` into disjunctive normal form.
///
/// `WITH` pairs stay atomic. Duplicate terms in a clause and duplicate
/// clauses collapse. A bare exception leaf normalizes to the empty form.
pub fn normalize(expr: &Expression) -> NormalizedForm {
    let clauses = clauses_of(expr);
    if clauses.len() > LARGE_FORM_CLAUSES {
        warn!(clauses = clauses.len(), expression = %expr, "large normalized form");
    } else {
        debug!(clauses = clauses.len(), expression = %expr, "normalized license expression");
    }
    NormalizedForm { clauses }
}

fn single(term: Term) -> BTreeSet<Clause> {
    BTreeSet::from([Clause(BTreeSet::from([term]))])
}

fn term_license(expr: &Expression) -> Option<TermLicense> {
    match expr {
        Expression::License(l) => Some(TermLicense::License(l.clone())),
        Expression::LicenseRef(r) => Some(TermLicense::LicenseRef(r.clone())),
        Expression::Exception(_) | Expression::Compound(_) => None,
    }
}

fn clauses_of(expr: &Expression) -> BTreeSet<Clause> {
    match expr {
        Expression::License(l) => single(Term {
            license: TermLicense::License(l.clone()),
            exception: None,
        }),
        Expression::LicenseRef(r) => single(Term {
            license: TermLicense::LicenseRef(r.clone()),
            exception: None,
        }),
        Expression::Exception(_) => BTreeSet::new(),
        Expression::Compound(c) => match c.operator() {
            // `Compound::new` guarantees a license on the left and an exception on the right.
            Operator::With => match (term_license(c.left()), c.right()) {
                (Some(license), Expression::Exception(e)) => single(Term {
                    license,
                    exception: Some(e.clone()),
                }),
                _ => BTreeSet::new(),
            },
            Operator::Or => {
                let mut clauses = clauses_of(c.left());
                clauses.extend(clauses_of(c.right()));
                clauses
            }
            Operator::And => {
                let left = clauses_of(c.left());
                let right = clauses_of(c.right());
                let mut clauses = BTreeSet::new();
                for l in &left {
                    for r in &right {
                        let mut terms = l.0.clone();
                        terms.extend(r.0.iter().cloned());
                        clauses.insert(Clause(terms));
                    }
                }
                clauses
            }
        },
    }
}
