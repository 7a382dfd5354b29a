//! Output formatting for lint results.

use anyhow::Result;
use forceloader_core::{LintResult, Severity, Violation};
use miette::GraphicalReportHandler;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analyzed directory; `pretty` output reads sources from it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{}:{}:{}: {} [{}]",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            severity_label(violation.severity),
            violation.code,
        );
        println!("  {}", violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    println!(
        "{color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)\x1b[0m",
        result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, root: &Path) {
    let handler = GraphicalReportHandler::new();
    for violation in &result.violations {
        match render_pretty(&handler, violation, root) {
            Some(rendered) => print!("{rendered}"),
            None => print!("{}", violation.format()),
        }
        println!();
    }
    print_summary(result);
}

fn render_pretty(
    handler: &GraphicalReportHandler,
    violation: &Violation,
    root: &Path,
) -> Option<String> {
    let path = root.join(&violation.location.file);
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!("Cannot read {} for snippet: {}", path.display(), e);
            return None;
        }
    };
    let diagnostic = violation.to_diagnostic(source);
    let mut out = String::new();
    handler.render_report(&mut out, &diagnostic).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forceloader_core::{Location, Suggestion};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn pretty_rendering_points_at_the_call() {
        let tmp = TempDir::new().unwrap();
        let source = "package graph\n\nfunc f() {\n\tr.UseCase.Email(ctx)\n}\n";
        fs::write(tmp.path().join("user.go"), source).unwrap();

        let offset = source.find("r.UseCase").unwrap();
        let violation = Violation::new(
            "FL001",
            "forceloader",
            Severity::Error,
            Location::new(PathBuf::from("user.go"), 4, 2).with_span(offset, 20),
            "UseCase.Email cannot be used in usecase.UseCase",
        )
        .with_suggestion(Suggestion::new("load it through a dataloader"));

        let rendered = render_pretty(
            &GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor()),
            &violation,
            tmp.path(),
        )
        .unwrap();
        assert!(rendered.contains("[FL001] UseCase.Email cannot be used in usecase.UseCase"));
        assert!(rendered.contains("r.UseCase.Email(ctx)"));
        assert!(rendered.contains("load it through a dataloader"));
    }

    #[test]
    fn pretty_rendering_skips_missing_files() {
        let tmp = TempDir::new().unwrap();
        let violation = Violation::new(
            "FL001",
            "forceloader",
            Severity::Error,
            Location::new(PathBuf::from("gone.go"), 1, 1),
            "x cannot be used in y",
        );
        assert!(render_pretty(&GraphicalReportHandler::new(), &violation, tmp.path()).is_none());
    }
}
