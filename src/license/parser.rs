//! SPDX license expression parser.
//!
//! Grammar (`WITH` binds tightest, then `AND`, then `OR`):
//! ```text
//! or_expr   := and_expr ( "OR" and_expr )*
//! and_expr  := with_expr ( "AND" with_expr )*
//! with_expr := atom ( "WITH" exception-id )?
//! atom      := "(" or_expr ")" | license-id
//! ```
//! `AND` and `OR` are left-associative. Identifiers that are not in the
//! catalog become [`LicenseRef`] leaves instead of errors.
//!
//! Rendering and normalizing a tree recurse once per level, so input is
//! capped at [`MAX_OPERATORS`] operators and [`MAX_NESTING`] levels of
//! parentheses. Larger input fails with [`ParseError::TooComplex`] or
//! [`ParseError::TooDeep`].

use tracing::debug;

use super::catalog::{lookup_exception, lookup_license, resolve_alias, Exception};
use super::error::ParseError;
use super::expression::{Compound, Expression, LicenseRef, Operator, SimpleLicense, IDSTRING};
use super::reference::ReferenceMatcher;

/// Most `AND`/`OR`/`WITH` operators one expression may contain.
pub const MAX_OPERATORS: usize = 1000;

/// Deepest parenthesis nesting one expression may use.
pub const MAX_NESTING: usize = 64;

/// Tokens produced by [`tokenize`].
#[derive(Debug, PartialEq, Clone)]
enum Token {
    Id(String),
    And,
    Or,
    With,
    LParen,
    RParen,
}

impl Token {
    fn text(&self) -> &str {
        match self {
            Token::Id(s) => s,
            Token::And => "AND",
            Token::Or => "OR",
            Token::With => "WITH",
            Token::LParen => "(",
            Token::RParen => ")",
        }
    }
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    position: usize,
}

/// Split an expression on whitespace and parentheses.
fn tokenize(expr: &str) -> Vec<Spanned> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let token = if c == '(' {
            chars.next();
            Token::LParen
        } else if c == ')' {
            chars.next();
            Token::RParen
        } else {
            let mut s = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_whitespace() || c == '(' || c == ')' {
                    break;
                }
                s.push(c);
                chars.next();
            }
            match s.as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                "WITH" => Token::With,
                _ => Token::Id(s),
            }
        };
        tokens.push(Spanned { token, position });
    }
    tokens
}

/// Recursive descent parser over a token stream.
struct ExprParser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// The last operator or `(` consumed, used to explain a premature end.
    last: Option<(&'static str, usize)>,
    operators: usize,
    depth: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn consume(&mut self) -> Option<Spanned> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn consume_operator(&mut self, text: &'static str) -> Result<usize, ParseError> {
        let position = self.consume().map_or(0, |t| t.position);
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(ParseError::TooComplex {
                limit: MAX_OPERATORS,
                position,
            });
        }
        self.last = Some((text, position));
        Ok(position)
    }

    /// Parse an OR-level expression (lowest precedence).
    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.consume_operator("OR")?;
            let right = self.parse_and()?;
            left = Compound::new(left, Operator::Or, right)?.into();
        }
        Ok(left)
    }

    /// Parse an AND-level expression (higher precedence than OR).
    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_with()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.consume_operator("AND")?;
            let right = self.parse_with()?;
            left = Compound::new(left, Operator::And, right)?.into();
        }
        Ok(left)
    }

    /// Parse an atom with an optional `WITH` exception.
    fn parse_with(&mut self) -> Result<Expression, ParseError> {
        let atom = self.parse_atom()?;
        if !matches!(self.peek(), Some(Token::With)) {
            return Ok(atom);
        }

        let with_position = self.consume_operator("WITH")?;
        let exception = match self.consume() {
            None => {
                return Err(ParseError::MissingOperand {
                    operator: "WITH",
                    position: with_position,
                })
            }
            Some(Spanned {
                token: Token::Id(id),
                position,
            }) => lookup_exception(&id).ok_or(ParseError::InvalidException {
                found: id.clone(),
                position,
            })?,
            Some(Spanned { token, position }) => {
                return Err(ParseError::InvalidException {
                    found: token.text().to_string(),
                    position,
                })
            }
        };

        if let Some(Spanned {
            token: Token::With,
            position,
        }) = self.tokens.get(self.pos)
        {
            return Err(ParseError::DuplicateException {
                license: atom.to_string(),
                position: *position,
            });
        }

        attach_exception(atom, exception, with_position)
    }

    /// Parse a parenthesised sub-expression or a single license id.
    fn parse_atom(&mut self) -> Result<Expression, ParseError> {
        let Some(Spanned { token, position }) = self.consume() else {
            return Err(match self.last {
                Some(("(", position)) => ParseError::UnclosedParen { position },
                Some((operator, position)) => ParseError::MissingOperand { operator, position },
                None => ParseError::Empty,
            });
        };

        match token {
            Token::LParen => {
                self.depth += 1;
                if self.depth > MAX_NESTING {
                    return Err(ParseError::TooDeep {
                        limit: MAX_NESTING,
                        position,
                    });
                }
                self.last = Some(("(", position));
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.consume() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    None => Err(ParseError::UnclosedParen { position }),
                    Some(Spanned { token, position }) => Err(ParseError::UnexpectedToken {
                        token: token.text().to_string(),
                        position,
                        expected: "an operator or `)`",
                    }),
                }
            }
            Token::Id(id) => leaf(&id, position),
            other => Err(ParseError::UnexpectedToken {
                token: other.text().to_string(),
                position,
                expected: "a license identifier or `(`",
            }),
        }
    }
}

/// Turn a single identifier into a leaf.
fn leaf(token: &str, position: usize) -> Result<Expression, ParseError> {
    let (base, plus) = match token.strip_suffix('+') {
        Some(base) => (base, true),
        None => (token, false),
    };
    if !IDSTRING.is_match(base) {
        return Err(ParseError::InvalidIdentifier {
            token: token.to_string(),
            position,
        });
    }

    if let Some(license) = lookup_license(token) {
        if license.deprecated {
            debug!(id = license.id, position, "deprecated license identifier");
        }
        return Ok(license.to_expression().into());
    }

    if plus {
        // `GPL-2.0` + `+` where only the bare id is catalogued.
        return match lookup_license(base) {
            Some(license) if license.deprecated => {
                debug!(id = license.id, position, "deprecated license identifier");
                Ok(SimpleLicense::new(license.id, true, true).into())
            }
            _ => Err(ParseError::InvalidOrLater {
                token: token.to_string(),
                position,
            }),
        };
    }

    if lookup_exception(token).is_some() {
        return Err(ParseError::UnexpectedToken {
            token: token.to_string(),
            position,
            expected: "a license, not a license exception",
        });
    }

    Ok(LicenseRef::new_unchecked(token).into())
}

/// Attach `exception` to every license leaf of `expr`.
///
/// `(A OR B) WITH e` becomes `A WITH e OR B WITH e`, so `WITH` only ever
/// joins a single license and an exception.
fn attach_exception(
    expr: Expression,
    exception: &Exception,
    position: usize,
) -> Result<Expression, ParseError> {
    match expr {
        Expression::Compound(compound) => {
            let (left, operator, right) = compound.into_parts();
            if operator == Operator::With {
                return Err(ParseError::DuplicateException {
                    license: left.to_string(),
                    position,
                });
            }
            let left = attach_exception(left, exception, position)?;
            let right = attach_exception(right, exception, position)?;
            Ok(Compound::new(left, operator, right)?.into())
        }
        leaf => Ok(Compound::new(leaf, Operator::With, exception.to_expression())?.into()),
    }
}

/// Parse a license expression.
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = ExprParser {
        tokens,
        pos: 0,
        last: None,
        operators: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;

    if let Some(Spanned { token, position }) = parser.consume() {
        return Err(match token {
            Token::RParen => ParseError::UnmatchedParen { position },
            other => ParseError::UnexpectedToken {
                token: other.text().to_string(),
                position,
                expected: "`AND`, `OR`, `WITH` or the end of the expression",
            },
        });
    }

    debug!(input, expression = %expr, "parsed license expression");
    Ok(expr)
}

/// Parse free-form license strings as found in package manifests.
///
/// On top of [`parse`]: a whole-input alias such as `"Apache License 2.0"`
/// resolves to its catalog license, `/` is read as `OR` (`MIT/Apache-2.0`),
/// and scanner `LicenseRef-` leaves that `matcher` maps to a catalog license
/// are replaced by that license. Error positions refer to the input after `/`
/// substitution.
pub fn parse_lenient(input: &str, matcher: &ReferenceMatcher) -> Result<Expression, ParseError> {
    if let Some(license) = resolve_alias(input) {
        debug!(input, id = license.id, "resolved license alias");
        return Ok(license.to_expression().into());
    }

    let normalized = input.replace('/', " OR ");
    let expr = parse(&normalized)?;
    resolve_references(expr, matcher)
}

fn resolve_references(
    expr: Expression,
    matcher: &ReferenceMatcher,
) -> Result<Expression, ParseError> {
    match expr {
        Expression::LicenseRef(reference) => match matcher.resolve(reference.as_str()) {
            Some(license) => {
                debug!(reference = reference.as_str(), id = license.id, "resolved license reference");
                Ok(license.to_expression().into())
            }
            None => Ok(reference.into()),
        },
        Expression::Compound(compound) => {
            let (left, operator, right) = compound.into_parts();
            let left = resolve_references(left, matcher)?;
            Ok(Compound::new(left, operator, resolve_references(right, matcher)?)?.into())
        }
        other => Ok(other),
    }
}
