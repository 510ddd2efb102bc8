//! Top-level driver: units, then functions, then variables

use crate::check::diff::diff_visible_sets;
use crate::check::report::{report_diff, ExcessFinding, Reporter};
use crate::check::scope::{ScopeExit, ScopeTracker};
use crate::check::statements::{
    extract_function_statements, FunctionStatements, DEFAULT_SYNTHETIC_FILE,
};
use crate::check::unit_filter::{UnitFilter, UnitVerdict};
use crate::check::variable::{
    classify_variable, derive_visible_sets, resolve_location_ranges, VariableVerdict,
};
use crate::core::{CheckError, DebugRecord, Result, SubprogramRecord, VariableRecord};
use crate::source::{DebugInfoSource, LineTableCursor, RecordStream, UnitSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, trace, warn};

/// Statement sequence the location ranges are applied to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationBasis {
    /// The innermost enclosing scope's statements
    #[default]
    Scope,
    /// The whole function's statements, so coverage leaking out of a block shows up
    Function,
}

impl FromStr for LocationBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scope" => Ok(LocationBasis::Scope),
            "function" => Ok(LocationBasis::Function),
            _ => Err(format!(
                "Invalid location basis: {s}. Valid options are: scope, function"
            )),
        }
    }
}

impl fmt::Display for LocationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationBasis::Scope => write!(f, "scope"),
            LocationBasis::Function => write!(f, "function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub filter: UnitFilter,
    /// Source file name marking compiler-generated functions
    pub synthetic_file: String,
    pub location_basis: LocationBasis,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            filter: UnitFilter::default(),
            synthetic_file: DEFAULT_SYNTHETIC_FILE.to_string(),
            location_basis: LocationBasis::default(),
        }
    }
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckStats {
    pub units_seen: usize,
    pub units_checked: usize,
    pub units_skipped: usize,
    pub functions_checked: usize,
    pub functions_skipped: usize,
    pub variables_checked: usize,
    pub variables_skipped: usize,
    pub variables_with_missing: usize,
    pub missing_statements: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Clean,
    /// The run stopped at the first variable whose location list exceeds its scope
    Excess(ExcessFinding),
}

impl CheckOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, CheckOutcome::Clean)
    }
}

/// Per-unit state shared by the function walks of that unit
struct UnitWalk<'a, U: UnitSource> {
    unit: &'a U,
    cursor: LineTableCursor,
    records: RecordStream,
    base_address: u64,
}

/// Single forward pass over a debug-info source
pub struct ScopeChecker<R: Reporter> {
    options: CheckOptions,
    reporter: R,
    stats: CheckStats,
}

impl<R: Reporter> ScopeChecker<R> {
    pub fn new(options: CheckOptions, reporter: R) -> Self {
        Self {
            options,
            reporter,
            stats: CheckStats::default(),
        }
    }

    pub fn run<S: DebugInfoSource>(&mut self, source: &mut S) -> Result<CheckOutcome> {
        while let Some(unit) = source.next_unit()? {
            self.stats.units_seen += 1;
            if let Some(finding) = self.check_unit(&unit)? {
                return Ok(CheckOutcome::Excess(finding));
            }
        }
        info!(
            "Checked {} of {} compile units, {} functions, {} variables",
            self.stats.units_checked,
            self.stats.units_seen,
            self.stats.functions_checked,
            self.stats.variables_checked
        );
        Ok(CheckOutcome::Clean)
    }

    pub fn check_unit<U: UnitSource>(&mut self, unit: &U) -> Result<Option<ExcessFinding>> {
        let header = unit.header();
        let unit_name = header.name.as_deref().unwrap_or("<unnamed>");
        let base_address = match self.options.filter.evaluate(header) {
            UnitVerdict::Accepted { base_address } => base_address,
            UnitVerdict::Rejected(reason) => {
                debug!("Skipping compile unit {}: {}", unit_name, reason);
                self.stats.units_skipped += 1;
                return Ok(None);
            }
        };
        info!(
            "Checking compile unit {} (base 0x{:x})",
            unit_name, base_address
        );

        let mut walk = UnitWalk {
            unit,
            cursor: unit.line_cursor()?,
            records: unit.records()?,
            base_address,
        };
        if walk.cursor.is_empty() {
            warn!("Compile unit {} has no line table rows", unit_name);
        } else {
            debug!("Compile unit {}: {} line rows", unit_name, walk.cursor.len());
        }
        while let Some(record) = walk.records.next_record() {
            match &record {
                DebugRecord::Subprogram(subprogram) => {
                    if let Some(finding) = self.check_function(&mut walk, &record, subprogram)? {
                        return Ok(Some(finding));
                    }
                }
                // The unit's own end-of-children marker
                DebugRecord::EndOfChildren => {}
                other => walk.records.skip_children(other)?,
            }
        }

        self.stats.units_checked += 1;
        Ok(None)
    }

    fn check_function<U: UnitSource>(
        &mut self,
        walk: &mut UnitWalk<'_, U>,
        record: &DebugRecord,
        subprogram: &SubprogramRecord,
    ) -> Result<Option<ExcessFinding>> {
        let name = subprogram.name.as_deref().unwrap_or("<anonymous>");
        let (Some(low_pc), Some(high_pc)) = (subprogram.low_pc, subprogram.high_pc) else {
            trace!("Function {} has no PC range, skipping", name);
            self.stats.functions_skipped += 1;
            walk.records.skip_children(record)?;
            return Ok(None);
        };

        let statements = match extract_function_statements(
            &mut walk.cursor,
            name,
            low_pc,
            high_pc,
            &self.options.synthetic_file,
        )? {
            FunctionStatements::Statements(rows) => rows,
            FunctionStatements::Synthetic => {
                self.stats.functions_skipped += 1;
                walk.records.skip_children(record)?;
                return Ok(None);
            }
        };
        debug!(
            "Function {} [0x{:x}, 0x{:x}): {} statements",
            name,
            low_pc,
            high_pc,
            statements.len()
        );
        self.stats.functions_checked += 1;
        if !subprogram.has_children {
            return Ok(None);
        }

        let mut tracker = ScopeTracker::new(statements);
        loop {
            let Some(child) = walk.records.next_record() else {
                let err = if tracker.depth() > 0 {
                    CheckError::UnbalancedScopes {
                        function: name.to_string(),
                        depth: tracker.depth(),
                    }
                } else {
                    CheckError::TruncatedRecords {
                        context: format!("function {}", name),
                    }
                };
                return Err(err.into());
            };

            match &child {
                DebugRecord::EndOfChildren => {
                    if tracker.close() == ScopeExit::Function {
                        break;
                    }
                }
                DebugRecord::LexicalBlock(block) => {
                    // A childless block has no end marker to pop it
                    if block.has_children {
                        tracker.open_block(&block.ranges);
                    }
                }
                DebugRecord::Variable(variable) => {
                    let finding = self.check_variable(walk, &tracker, name, variable)?;
                    if finding.is_some() {
                        return Ok(finding);
                    }
                    walk.records.skip_children(&child)?;
                }
                other => walk.records.skip_children(other)?,
            }
        }

        Ok(None)
    }

    fn check_variable<U: UnitSource>(
        &mut self,
        walk: &UnitWalk<'_, U>,
        tracker: &ScopeTracker,
        function: &str,
        variable: &VariableRecord,
    ) -> Result<Option<ExcessFinding>> {
        let name = variable.name.as_deref().unwrap_or("<anonymous>");
        let (list_offset, decl_line) = match classify_variable(variable)? {
            VariableVerdict::Check {
                list_offset,
                decl_line,
            } => (list_offset, decl_line),
            VariableVerdict::Skip(reason) => {
                trace!("Variable {} in {} skipped: {:?}", name, function, reason);
                self.stats.variables_skipped += 1;
                return Ok(None);
            }
        };

        let entries = walk.unit.location_list(list_offset)?;
        let ranges = resolve_location_ranges(walk.base_address, &entries);
        let basis = match self.options.location_basis {
            LocationBasis::Scope => tracker.current(),
            LocationBasis::Function => tracker.function_statements(),
        };
        let sets = derive_visible_sets(tracker.current(), basis, decl_line, &ranges);
        let diff = diff_visible_sets(&sets.from_scope, &sets.from_location);
        let kind = if variable.is_parameter {
            "Parameter"
        } else {
            "Variable"
        };
        debug!(
            "{} {} (line {}) in {}: {} in scope, {} located, {} missing, {} excess",
            kind,
            name,
            decl_line,
            function,
            sets.from_scope.len(),
            sets.from_location.len(),
            diff.missing.len(),
            diff.excess.len()
        );

        self.stats.variables_checked += 1;
        if !diff.missing.is_empty() {
            self.stats.variables_with_missing += 1;
            self.stats.missing_statements += diff.missing.len();
        }
        report_diff(&mut self.reporter, function, name, &diff)
    }

    pub fn stats(&self) -> &CheckStats {
        &self.stats
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }
}
