//! Scopecheck DWARF Library
//!
//! Cross-checks two independent compiler descriptions of a local variable:
//! the lexical scope it is declared in and the location list saying where its
//! storage is valid. Both are projected onto the statement rows of the line
//! table and diffed per variable.

// Core modules
pub mod core;

// Debug-format access layer
pub mod source;

// Checking pipeline
pub mod check;

pub use check::{
    CheckOptions, CheckOutcome, CheckStats, ExcessFinding, LocationBasis, Reporter, ScopeChecker,
    ScopeDiff, TextReporter, UnitFilter,
};
pub use crate::core::{
    AddressRange, CheckError, CompileUnitRecord, DebugRecord, LexicalBlockRecord, LineRow,
    LocListEntry, LocationAttr, Result, StatementRow, SubprogramRecord, VariableRecord,
};
pub use source::{DebugInfoSource, DwarfFile, MemorySource, MemoryUnit, UnitSource};
