//! `license-expr` — parse, validate, and normalize SPDX license expressions.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Initialize `tracing` from `-v` count.
//! 3. Load config ([`config::load_config`]).
//! 4. Run the subcommand against the [`license_expr::license`] engine.
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0`, or `1` if any expression failed to parse or validate.

mod cli;
mod config;
mod models;
mod report;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ReportFormat};
use config::{load_config, Config};
use license_expr::license::{lookup_exception, lookup_license, normalize, ParseCache, Strictness};
use models::{clause_reports, CheckStatus, ExpressionReport};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 | 1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    let ok = match &cli.command {
        Command::Check {
            expressions,
            report: format,
            strictness,
            lenient,
        } => {
            let strictness = strictness
                .as_ref()
                .map(Strictness::from)
                .unwrap_or(config.parser.strictness);
            let lenient = *lenient || config.parser.lenient;

            let cache = if lenient {
                ParseCache::lenient(config.matcher.clone())
            } else {
                ParseCache::new()
            };
            let reports: Vec<ExpressionReport> = expressions
                .iter()
                .map(|input| check_expression(input, &cache, strictness))
                .collect();

            match format {
                ReportFormat::Terminal => {
                    report::terminal::render(&reports, cli.verbose > 0, cli.quiet)?;
                }
                ReportFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                }
            }

            reports.iter().all(|r| r.status != CheckStatus::Invalid)
        }
        Command::Match { candidate, name } => run_match(candidate, name.as_deref(), &config),
        Command::Lookup { id } => {
            let license = lookup_license(id);
            let exception = lookup_exception(id);
            if license.is_none() && exception.is_none() {
                eprintln!("{} `{}` is not in the catalog", "✗".red(), id);
                false
            } else {
                report::terminal::render_lookup(license, exception);
                true
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

/// Parse, validate, and normalize one expression.
fn check_expression(input: &str, cache: &ParseCache, strictness: Strictness) -> ExpressionReport {
    let expr = match cache.parse(input) {
        Ok(expr) => expr,
        Err(e) => {
            return ExpressionReport {
                input: input.to_string(),
                status: CheckStatus::Invalid,
                canonical: None,
                clauses: Vec::new(),
                licenses: Vec::new(),
                message: Some(e.to_string()),
            }
        }
    };

    let form = normalize(&expr);
    let clauses = clause_reports(&form);

    let (status, message) = match expr.validate(strictness) {
        Err(e) => (CheckStatus::Invalid, Some(e.to_string())),
        Ok(()) => match review_reason(&clauses) {
            Some(reason) => (CheckStatus::Review, Some(reason)),
            None => (CheckStatus::Valid, None),
        },
    };

    ExpressionReport {
        input: input.to_string(),
        status,
        canonical: Some(expr.to_string()),
        licenses: expr.licenses(),
        clauses,
        message,
    }
}

/// Why an otherwise valid expression still deserves a human look.
fn review_reason(clauses: &[Vec<models::TermReport>]) -> Option<String> {
    let terms = || clauses.iter().flatten();

    let licenses = terms().filter(|t| t.deprecated).map(|t| {
        let mut id = t.id.clone();
        if t.or_later {
            id.push('+');
        }
        id
    });
    let exceptions = terms()
        .filter(|t| t.exception_deprecated)
        .filter_map(|t| t.exception.clone());
    let mut deprecated: Vec<String> = licenses.chain(exceptions).collect();
    deprecated.sort();
    deprecated.dedup();
    if !deprecated.is_empty() {
        return Some(format!("deprecated: {}", deprecated.join(", ")));
    }

    let mut references: Vec<&str> = terms().filter(|t| t.license_ref).map(|t| t.id.as_str()).collect();
    references.sort();
    references.dedup();
    if !references.is_empty() {
        return Some(format!("not in catalog: {}", references.join(", ")));
    }

    None
}

fn run_match(candidate: &str, name: Option<&str>, config: &Config) -> bool {
    match name {
        Some(name) => {
            let matched = config.matcher.matches(candidate, name);
            if matched {
                println!("{} `{}` refers to `{}`", "✓".green(), candidate, name);
            } else {
                println!("{} `{}` does not refer to `{}`", "✗".red(), candidate, name);
            }
            matched
        }
        None => match config.matcher.resolve(candidate) {
            Some(license) => {
                println!("{} `{}` refers to `{}`", "✓".green(), candidate, license.id);
                true
            }
            None => {
                println!("{} `{}` matches no catalog license", "✗".red(), candidate);
                false
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str, strictness: Strictness) -> ExpressionReport {
        check_expression(input, &ParseCache::new(), strictness)
    }

    #[test]
    fn test_check_valid() {
        let report = check("MIT AND (Apache-2.0 OR BSD-3-Clause)", Strictness::AllowDeprecated);
        assert_eq!(report.status, CheckStatus::Valid);
        assert_eq!(report.clauses.len(), 2);
        assert_eq!(
            report.canonical.as_deref(),
            Some("MIT AND (Apache-2.0 OR BSD-3-Clause)")
        );
    }

    #[test]
    fn test_check_parse_failure_is_invalid() {
        let report = check("MIT AND", Strictness::AllowAny);
        assert_eq!(report.status, CheckStatus::Invalid);
        assert_eq!(
            report.message.as_deref(),
            Some("missing right operand after `AND` at position 4")
        );
        assert!(report.canonical.is_none());
    }

    #[test]
    fn test_check_deprecated_needs_review() {
        let report = check("GPL-2.0+ OR MIT", Strictness::AllowDeprecated);
        assert_eq!(report.status, CheckStatus::Review);
        assert_eq!(report.message.as_deref(), Some("deprecated: GPL-2.0+"));

        let report = check("GPL-2.0+ OR MIT", Strictness::AllowCurrent);
        assert_eq!(report.status, CheckStatus::Invalid);
    }

    #[test]
    fn test_check_deprecated_exception_needs_review() {
        let report = check(
            "GPL-2.0-only WITH Nokia-Qt-exception-1.1",
            Strictness::AllowDeprecated,
        );
        assert_eq!(report.status, CheckStatus::Review);
        assert_eq!(report.message.as_deref(), Some("deprecated: Nokia-Qt-exception-1.1"));
        assert!(report.clauses[0][0].exception_deprecated);
        assert!(!report.clauses[0][0].deprecated);

        let report = check(
            "GPL-2.0-only WITH Nokia-Qt-exception-1.1",
            Strictness::AllowCurrent,
        );
        assert_eq!(report.status, CheckStatus::Invalid);
    }

    #[test]
    fn test_check_unprefixed_reference() {
        let report = check("Custom-1.0", Strictness::AllowAny);
        assert_eq!(report.status, CheckStatus::Review);

        let report = check("Custom-1.0", Strictness::AllowDeprecated);
        assert_eq!(report.status, CheckStatus::Invalid);
    }

    #[test]
    fn test_check_lenient() {
        let cache = ParseCache::lenient(Config::default().matcher);
        let report = check_expression("MIT/Apache-2.0", &cache, Strictness::AllowDeprecated);
        assert_eq!(report.status, CheckStatus::Valid);
        assert_eq!(report.canonical.as_deref(), Some("MIT OR Apache-2.0"));
    }
}
