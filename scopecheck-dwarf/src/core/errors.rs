//! Error types for the scope checker

/// Fatal conditions; any of these aborts the whole run
#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DWARF parsing error: {0}")]
    Gimli(#[from] gimli::Error),
    #[error("Object file error: {0}")]
    Object(#[from] object::Error),
    #[error("Required section {name} is absent")]
    MissingSection { name: &'static str },
    #[error("Line table has no row covering 0x{pc:x} (function {function})")]
    LineSeek { function: String, pc: u64 },
    #[error("Function {function} ended with {depth} lexical block(s) still open")]
    UnbalancedScopes { function: String, depth: usize },
    #[error("Record stream ended inside {context}")]
    TruncatedRecords { context: String },
    #[error("Variable {variable} has an unsupported location form: {form}")]
    UnsupportedLocationForm { variable: String, form: String },
}

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
