//! Address ranges, line rows and statement rows

use serde::Serialize;
use std::fmt;

/// Half-open address range `[begin, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressRange {
    pub begin: u64,
    pub end: u64,
}

impl AddressRange {
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    #[inline]
    pub fn contains(&self, address: u64) -> bool {
        address >= self.begin && address < self.end
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}-0x{:x}", self.begin, self.end)
    }
}

/// True when any range in the set covers `address`
pub fn ranges_contain(ranges: &[AddressRange], address: u64) -> bool {
    ranges.iter().any(|range| range.contains(address))
}

/// One row of a unit's line-number program, in program order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRow {
    pub address: u64,
    pub file_path: String,
    pub line: u64,
    pub is_stmt: bool,
    pub end_sequence: bool,
}

impl LineRow {
    /// Convenience constructor for a statement row inside a sequence
    pub fn stmt(address: u64, line: u64, file_path: impl Into<String>) -> Self {
        Self {
            address,
            file_path: file_path.into(),
            line,
            is_stmt: true,
            end_sequence: false,
        }
    }

    /// Row that terminates a sequence at `address`
    pub fn end_of_sequence(address: u64) -> Self {
        Self {
            address,
            file_path: String::new(),
            line: 0,
            is_stmt: false,
            end_sequence: true,
        }
    }

    pub fn to_statement(&self) -> StatementRow {
        StatementRow {
            address: self.address,
            line: self.line,
            file_path: self.file_path.clone(),
        }
    }
}

/// A statement boundary inside a function: the unit of comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRow {
    pub address: u64,
    pub line: u64,
    pub file_path: String,
}

impl fmt::Display for StatementRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} at 0x{:x}", self.file_path, self.line, self.address)
    }
}

/// Sort statements by address, keeping line-table order for equal addresses
pub fn sort_by_address(rows: &mut [StatementRow]) {
    rows.sort_by_key(|row| row.address);
}
