//! Core types and utilities for scopecheck-dwarf

pub mod errors;
pub mod records;
pub mod types;

pub use errors::*;
pub use records::*;
pub use types::*;
