//! Reporting of per-variable findings

use crate::check::diff::ScopeDiff;
use crate::core::{Result, StatementRow};
use serde::Serialize;
use std::io::Write;
use tracing::error;

/// Sink for findings. Implementations decide the output format.
pub trait Reporter {
    /// Statements in scope that the location list does not cover
    fn missing(&mut self, function: &str, variable: &str, rows: &[StatementRow]) -> Result<()>;

    /// Statements the location list covers outside the variable's scope
    fn excess(&mut self, function: &str, variable: &str, rows: &[StatementRow]) -> Result<()>;
}

/// Fatal finding that halts the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcessFinding {
    pub function: String,
    pub variable: String,
    pub rows: Vec<StatementRow>,
}

/// Plain-text reporter writing the traditional line-oriented format
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn missing(&mut self, function: &str, variable: &str, rows: &[StatementRow]) -> Result<()> {
        writeln!(
            self.out,
            "Function {}, variable {} missing in statements:",
            function, variable
        )?;
        for row in rows {
            writeln!(self.out, "\t{}", row)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn excess(&mut self, _function: &str, _variable: &str, rows: &[StatementRow]) -> Result<()> {
        writeln!(self.out, "\tEXCESS {}", rows.len())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Send a diff's findings to `reporter`.
///
/// Missing rows are reported and checking goes on; excess rows are reported
/// and returned so the caller can halt.
pub fn report_diff<R: Reporter + ?Sized>(
    reporter: &mut R,
    function: &str,
    variable: &str,
    diff: &ScopeDiff,
) -> Result<Option<ExcessFinding>> {
    if !diff.missing.is_empty() {
        reporter.missing(function, variable, &diff.missing)?;
    }
    if diff.excess.is_empty() {
        return Ok(None);
    }

    error!(
        "Function {}, variable {}: location list covers {} statements outside its scope",
        function,
        variable,
        diff.excess.len()
    );
    reporter.excess(function, variable, &diff.excess)?;
    Ok(Some(ExcessFinding {
        function: function.to_string(),
        variable: variable.to_string(),
        rows: diff.excess.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(address: u64, line: u64) -> StatementRow {
        StatementRow {
            address,
            line,
            file_path: "/src/main.go".to_string(),
        }
    }

    #[test]
    fn test_missing_text_format() {
        let mut reporter = TextReporter::new(Vec::new());
        let diff = ScopeDiff {
            missing: vec![row(0x40, 8)],
            ..ScopeDiff::default()
        };
        let finding = report_diff(&mut reporter, "main.f", "x", &diff).unwrap();
        assert!(finding.is_none());

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "Function main.f, variable x missing in statements:\n\t/src/main.go:8 at 0x40\n\n"
        );
    }

    #[test]
    fn test_excess_is_returned() {
        let mut reporter = TextReporter::new(Vec::new());
        let diff = ScopeDiff {
            excess: vec![row(0x50, 9), row(0x60, 10)],
            ..ScopeDiff::default()
        };
        let finding = report_diff(&mut reporter, "main.f", "y", &diff)
            .unwrap()
            .expect("excess finding");
        assert_eq!(finding.function, "main.f");
        assert_eq!(finding.variable, "y");
        assert_eq!(finding.rows.len(), 2);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "\tEXCESS 2\n");
    }

    #[test]
    fn test_consistent_diff_reports_nothing() {
        let mut reporter = TextReporter::new(Vec::new());
        let diff = ScopeDiff {
            matched: vec![row(0x10, 3)],
            ..ScopeDiff::default()
        };
        assert!(report_diff(&mut reporter, "main.f", "z", &diff)
            .unwrap()
            .is_none());
        assert!(reporter.into_inner().is_empty());
    }
}
