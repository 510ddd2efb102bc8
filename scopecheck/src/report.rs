//! JSON output: findings are collected and printed as one document at the end

use anyhow::Result;
use scopecheck_dwarf::{CheckOutcome, CheckStats, ExcessFinding, Reporter, StatementRow};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct MissingReport {
    pub function: String,
    pub variable: String,
    pub statements: Vec<StatementRow>,
}

#[derive(Debug, Default)]
pub struct JsonReporter {
    missing: Vec<MissingReport>,
}

impl Reporter for JsonReporter {
    fn missing(&mut self, function: &str, variable: &str, rows: &[StatementRow]) -> Result<()> {
        self.missing.push(MissingReport {
            function: function.to_string(),
            variable: variable.to_string(),
            statements: rows.to_vec(),
        });
        Ok(())
    }

    // The finding itself comes back through the check outcome
    fn excess(&mut self, _function: &str, _variable: &str, _rows: &[StatementRow]) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub target: String,
    pub clean: bool,
    pub missing: &'a [MissingReport],
    pub excess: Option<&'a ExcessFinding>,
    pub stats: &'a CheckStats,
}

impl JsonReporter {
    pub fn render(
        &self,
        target: &Path,
        outcome: &CheckOutcome,
        stats: &CheckStats,
    ) -> Result<String> {
        let excess = match outcome {
            CheckOutcome::Excess(finding) => Some(finding),
            CheckOutcome::Clean => None,
        };
        let summary = JsonSummary {
            target: target.display().to_string(),
            clean: outcome.is_clean(),
            missing: &self.missing,
            excess,
            stats,
        };
        Ok(serde_json::to_string_pretty(&summary)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_document() {
        let mut reporter = JsonReporter::default();
        let row = StatementRow {
            address: 0x40,
            line: 8,
            file_path: "/src/main.go".to_string(),
        };
        reporter.missing("main.f", "x", &[row.clone()]).unwrap();

        let outcome = CheckOutcome::Excess(ExcessFinding {
            function: "main.g".to_string(),
            variable: "y".to_string(),
            rows: vec![row],
        });
        let stats = CheckStats {
            units_seen: 1,
            ..CheckStats::default()
        };
        let text = reporter
            .render(Path::new("prog"), &outcome, &stats)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["target"], "prog");
        assert_eq!(value["clean"], false);
        assert_eq!(value["missing"][0]["variable"], "x");
        assert_eq!(value["missing"][0]["statements"][0]["address"], 0x40);
        assert_eq!(value["excess"]["function"], "main.g");
        assert_eq!(value["stats"]["units_seen"], 1);
    }
}
