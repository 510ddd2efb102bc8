//! Scope/location consistency checking

pub mod checker;
pub mod diff;
pub mod report;
pub mod scope;
pub mod statements;
pub mod unit_filter;
pub mod variable;

pub use checker::{CheckOptions, CheckOutcome, CheckStats, LocationBasis, ScopeChecker};
pub use diff::{diff_visible_sets, ScopeDiff};
pub use report::{report_diff, ExcessFinding, Reporter, TextReporter};
pub use scope::{filter_inside_ranges, LexicalBlock, ScopeExit, ScopeTracker};
pub use statements::{
    extract_function_statements, is_synthetic_file, FunctionStatements, DEFAULT_SYNTHETIC_FILE,
};
pub use unit_filter::{
    RejectReason, UnitFilter, UnitVerdict, DEFAULT_FLAGS_MARKER, DEFAULT_PRODUCER_MARKER,
};
pub use variable::{
    classify_variable, derive_visible_sets, filter_after_line, resolve_location_ranges,
    SkipReason, VariableVerdict, VisibleSets,
};
