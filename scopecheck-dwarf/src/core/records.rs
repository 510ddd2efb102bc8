//! Structured debug-info records consumed by the checker
//!
//! The access layer decodes the container format and hands these records to
//! the checker; nothing past this point looks at raw section bytes.

use crate::core::AddressRange;

/// Compile unit header: producer string and the unit's address ranges
#[derive(Debug, Clone, Default)]
pub struct CompileUnitRecord {
    /// Unit name (usually the primary source file), for logging only
    pub name: Option<String>,
    pub producer: Option<String>,
    pub ranges: Vec<AddressRange>,
}

/// A function definition
#[derive(Debug, Clone, Default)]
pub struct SubprogramRecord {
    pub name: Option<String>,
    pub low_pc: Option<u64>,
    /// Absolute end address (exclusive)
    pub high_pc: Option<u64>,
    pub has_children: bool,
}

/// A nested lexical block with its (possibly disjoint) ranges
#[derive(Debug, Clone, Default)]
pub struct LexicalBlockRecord {
    pub ranges: Vec<AddressRange>,
    pub has_children: bool,
}

/// How a variable describes its storage location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationAttr {
    /// Single location expression valid over the whole scope
    Expression,
    /// Offset into the location-list table
    ListOffset(u64),
    /// Attribute form the checker cannot interpret; fatal only if the variable is checked
    Unsupported { form: String },
}

/// A local variable or formal parameter
#[derive(Debug, Clone, Default)]
pub struct VariableRecord {
    pub name: Option<String>,
    pub is_parameter: bool,
    pub decl_line: Option<u64>,
    pub location: Option<LocationAttr>,
    pub has_children: bool,
}

/// One record of a unit's flattened record tree
#[derive(Debug, Clone)]
pub enum DebugRecord {
    Subprogram(SubprogramRecord),
    LexicalBlock(LexicalBlockRecord),
    Variable(VariableRecord),
    /// Any record the checker does not interpret
    Other {
        tag: gimli::DwTag,
        has_children: bool,
    },
    /// Closes the children of the innermost open record
    EndOfChildren,
}

impl DebugRecord {
    pub fn has_children(&self) -> bool {
        match self {
            DebugRecord::Subprogram(r) => r.has_children,
            DebugRecord::LexicalBlock(r) => r.has_children,
            DebugRecord::Variable(r) => r.has_children,
            DebugRecord::Other { has_children, .. } => *has_children,
            DebugRecord::EndOfChildren => false,
        }
    }
}

/// Raw location-list entry, before base-address resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocListEntry {
    /// Base-address selection; rebases the entries that follow
    BaseAddress(u64),
    /// Range relative to the running base address
    Offset { begin: u64, end: u64 },
    /// Range that is already absolute
    Absolute { begin: u64, end: u64 },
}
