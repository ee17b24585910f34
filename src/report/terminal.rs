use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use license_expr::license::{Exception, License};

use crate::models::{CheckStatus, ExpressionReport, TermReport};

/// Render a colored terminal report of checked expressions.
pub fn render(reports: &[ExpressionReport], verbose: bool, quiet: bool) -> Result<()> {
    let total = reports.len();
    let valid_count = count(reports, CheckStatus::Valid);
    let review_count = count(reports, CheckStatus::Review);
    let invalid_count = count(reports, CheckStatus::Invalid);

    if quiet {
        println!(
            "Total: {}  Valid: {}  Review: {}  Invalid: {}",
            total,
            valid_count.to_string().green(),
            review_count.to_string().yellow(),
            invalid_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "license-expr".bold(),
        env!("CARGO_PKG_VERSION")
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Expression").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Canonical").add_attribute(Attribute::Bold),
            Cell::new("Normalized").add_attribute(Attribute::Bold),
        ]);

    for report in reports {
        let (symbol, status_color) = match report.status {
            CheckStatus::Valid => ("✓", Color::Green),
            CheckStatus::Review => ("⚠", Color::Yellow),
            CheckStatus::Invalid => ("✗", Color::Red),
        };

        let normalized = report
            .clauses
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" AND ")
            })
            .collect::<Vec<_>>()
            .join("\nOR ");

        table.add_row(vec![
            Cell::new(&report.input),
            Cell::new(format!("{} {}", symbol, report.status))
                .fg(status_color)
                .set_alignment(CellAlignment::Center),
            Cell::new(report.canonical.as_deref().unwrap_or("-")),
            Cell::new(normalized),
        ]);
    }

    println!("{}", table);

    for report in reports {
        if let Some(message) = &report.message {
            let tag = match report.status {
                CheckStatus::Invalid => "[ERROR]".red().bold(),
                _ => "[WARN]".yellow().bold(),
            };
            println!(" {} {}: {}", tag, report.input, message);
        }
    }

    if verbose {
        for report in reports.iter().filter(|r| !r.clauses.is_empty()) {
            println!("\n {}", report.input.bold());
            render_terms(report);
        }
    }

    println!(
        "\n Total: {}  {} {}  {} {}  {} {}\n",
        total,
        "✓".green(),
        valid_count,
        "⚠".yellow(),
        review_count,
        "✗".red(),
        invalid_count
    );

    Ok(())
}

fn render_terms(report: &ExpressionReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Clause").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Or later").add_attribute(Attribute::Bold),
            Cell::new("Deprecated").add_attribute(Attribute::Bold),
            Cell::new("Exception").add_attribute(Attribute::Bold),
        ]);

    for (index, clause) in report.clauses.iter().enumerate() {
        for term in clause {
            let license_color = if term.license_ref {
                Color::DarkGrey
            } else {
                Color::Reset
            };
            table.add_row(vec![
                Cell::new(index + 1).set_alignment(CellAlignment::Right),
                Cell::new(&term.id).fg(license_color),
                Cell::new(flag(term.or_later)).set_alignment(CellAlignment::Center),
                Cell::new(flag(term.deprecated))
                    .fg(if term.deprecated { Color::Yellow } else { Color::Reset })
                    .set_alignment(CellAlignment::Center),
                Cell::new(exception_label(term))
                    .fg(if term.exception_deprecated { Color::Yellow } else { Color::Reset }),
            ]);
        }
    }

    println!("{}", table);
}

/// Render the catalog entry for a license or exception.
pub fn render_lookup(license: Option<&License>, exception: Option<&Exception>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    if let Some(license) = license {
        let expr = license.to_expression();
        table.add_row(vec![Cell::new("Kind"), Cell::new("license")]);
        table.add_row(vec![Cell::new("Id"), Cell::new(license.id)]);
        table.add_row(vec![Cell::new("Name"), Cell::new(license.name)]);
        table.add_row(vec![Cell::new("Deprecated"), Cell::new(flag(license.deprecated))]);
        table.add_row(vec![Cell::new("Or-later eligible"), Cell::new(flag(license.or_later_eligible))]);
        table.add_row(vec![Cell::new("Expression id"), Cell::new(expr.id())]);
        table.add_row(vec![Cell::new("Or later"), Cell::new(flag(expr.or_later()))]);
    }
    if let Some(exception) = exception {
        table.add_row(vec![Cell::new("Kind"), Cell::new("exception")]);
        table.add_row(vec![Cell::new("Id"), Cell::new(exception.id)]);
        table.add_row(vec![Cell::new("Name"), Cell::new(exception.name)]);
        table.add_row(vec![Cell::new("Deprecated"), Cell::new(flag(exception.deprecated))]);
    }

    println!("{}", table);
}

fn exception_label(term: &TermReport) -> String {
    match &term.exception {
        Some(id) if term.exception_deprecated => format!("{} (deprecated)", id),
        Some(id) => id.clone(),
        None => String::new(),
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn count(reports: &[ExpressionReport], status: CheckStatus) -> usize {
    reports.iter().filter(|r| r.status == status).count()
}
