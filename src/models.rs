use serde::Serialize;

use license_expr::license::{NormalizedForm, Term};

/// Outcome of checking one expression.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionReport {
    pub input: String,
    pub status: CheckStatus,
    /// Canonical rendering; `None` when parsing failed.
    pub canonical: Option<String>,
    /// Normalized form as a list of clauses, each a list of terms.
    pub clauses: Vec<Vec<TermReport>>,
    /// Distinct license ids in the expression.
    pub licenses: Vec<String>,
    /// Parse or validation error, or the reason for a warning.
    pub message: Option<String>,
}

/// One term of a normalized clause, with the flags a policy needs.
#[derive(Debug, Clone, Serialize)]
pub struct TermReport {
    pub id: String,
    pub or_later: bool,
    pub deprecated: bool,
    pub license_ref: bool,
    pub exception: Option<String>,
    pub exception_deprecated: bool,
}

impl From<&Term> for TermReport {
    fn from(term: &Term) -> Self {
        TermReport {
            id: term.id().to_string(),
            or_later: term.or_later(),
            deprecated: term.deprecated(),
            license_ref: term.is_license_ref(),
            exception: term.exception().map(|e| e.id().to_string()),
            exception_deprecated: term.exception().is_some_and(|e| e.deprecated()),
        }
    }
}

impl std::fmt::Display for TermReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if self.or_later && self.deprecated {
            write!(f, "+")?;
        }
        if let Some(exception) = &self.exception {
            write!(f, " WITH {}", exception)?;
        }
        Ok(())
    }
}

/// Convert a normalized form into report clauses.
pub fn clause_reports(form: &NormalizedForm) -> Vec<Vec<TermReport>> {
    form.clauses()
        .map(|clause| clause.terms().map(TermReport::from).collect())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Parsed and uses only current catalog ids.
    Valid,
    /// Parsed, but uses deprecated ids or non-catalog references.
    Review,
    /// Did not parse or failed validation.
    Invalid,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Valid => write!(f, "valid"),
            CheckStatus::Review => write!(f, "review"),
            CheckStatus::Invalid => write!(f, "invalid"),
        }
    }
}
