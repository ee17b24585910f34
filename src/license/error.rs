use thiserror::Error;

/// A malformed license expression.
///
/// Positions are byte offsets into the input string. A parse failure must be
/// treated as "needs review", never as "no license".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty license expression")]
    Empty,

    #[error("invalid identifier `{token}` at position {position}")]
    InvalidIdentifier { token: String, position: usize },

    #[error("unexpected `{token}` at position {position}, expected {expected}")]
    UnexpectedToken {
        token: String,
        position: usize,
        expected: &'static str,
    },

    #[error("missing right operand after `{operator}` at position {position}")]
    MissingOperand {
        operator: &'static str,
        position: usize,
    },

    #[error("unclosed `(` at position {position}")]
    UnclosedParen { position: usize },

    #[error("unmatched `)` at position {position}")]
    UnmatchedParen { position: usize },

    #[error("`WITH` at position {position} must be followed by a single license exception, found `{found}`")]
    InvalidException { found: String, position: usize },

    #[error("`{license}` at position {position} already carries an exception")]
    DuplicateException { license: String, position: usize },

    #[error("`+` on `{token}` at position {position} is only allowed for deprecated licenses")]
    InvalidOrLater { token: String, position: usize },

    #[error("more than {limit} operators (limit reached at position {position})")]
    TooComplex { limit: usize, position: usize },
    #[error("parentheses nested deeper than {limit} at position {position}")]
    TooDeep { limit: usize, position: usize },
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// A precondition failure when building an expression from code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("an exception can only be attached to a single license, not `{0}`")]
    ExceptionTarget(String),

    #[error("the right operand of `WITH` must be a license exception, not `{0}`")]
    NotAnException(String),

    #[error("license exception `{exception}` cannot be an operand of `{operator}`")]
    ExceptionOperand {
        exception: String,
        operator: &'static str,
    },

    #[error("invalid license reference `{0}`")]
    InvalidLicenseRef(String),
}

/// An expression that parses but is not acceptable at the requested strictness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{0}` is neither a known license nor a `LicenseRef-`")]
    UnknownLicense(String),

    #[error("`{0}` is deprecated")]
    DeprecatedLicense(String),

    #[error("exception `{0}` is deprecated")]
    DeprecatedException(String),
}
