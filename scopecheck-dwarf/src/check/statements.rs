//! Per-function statement extraction from the unit's line table

use crate::core::{CheckError, Result, StatementRow};
use crate::source::LineTableCursor;
use std::path::Path;
use tracing::{debug, trace};

pub const DEFAULT_SYNTHETIC_FILE: &str = "<autogenerated>";

/// Statement boundaries of one function, or a marker that it is compiler scaffolding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionStatements {
    Statements(Vec<StatementRow>),
    Synthetic,
}

/// True when `file_path` names the synthetic source file
pub fn is_synthetic_file(file_path: &str, synthetic_file: &str) -> bool {
    file_path == synthetic_file
        || Path::new(file_path)
            .file_name()
            .is_some_and(|name| name == synthetic_file)
}

/// Collect the is_stmt rows in `[low_pc, high_pc)`.
///
/// The cursor is searched forward first and rewound once if that fails; a
/// second miss means the line table does not cover the function, which is
/// fatal. Running off the end of the table inside the function is tolerated.
pub fn extract_function_statements(
    cursor: &mut LineTableCursor,
    function: &str,
    low_pc: u64,
    high_pc: u64,
    synthetic_file: &str,
) -> Result<FunctionStatements> {
    if !cursor.seek_pc(low_pc) {
        trace!(
            "Line cursor not positioned for {} at 0x{:x}, rewinding",
            function,
            low_pc
        );
        cursor.reset();
        if !cursor.seek_pc(low_pc) {
            return Err(CheckError::LineSeek {
                function: function.to_string(),
                pc: low_pc,
            }
            .into());
        }
    }

    if let Some(first) = cursor.current() {
        if is_synthetic_file(&first.file_path, synthetic_file) {
            debug!("Skipping synthetic function {}", function);
            return Ok(FunctionStatements::Synthetic);
        }
    }

    let mut statements = Vec::new();
    loop {
        let Some(row) = cursor.current() else {
            trace!("Line table exhausted inside {}", function);
            break;
        };
        if row.address >= high_pc {
            break;
        }
        if row.is_stmt && !row.end_sequence && row.address >= low_pc {
            statements.push(row.to_statement());
        }
        cursor.advance();
    }

    Ok(FunctionStatements::Statements(statements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LineRow;

    fn addresses(result: &FunctionStatements) -> Vec<u64> {
        match result {
            FunctionStatements::Statements(rows) => rows.iter().map(|r| r.address).collect(),
            FunctionStatements::Synthetic => panic!("unexpected synthetic function"),
        }
    }

    fn two_functions() -> LineTableCursor {
        let mut not_stmt = LineRow::stmt(0x18, 5, "main.go");
        not_stmt.is_stmt = false;
        LineTableCursor::new(vec![
            LineRow::stmt(0x10, 5, "main.go"),
            not_stmt,
            LineRow::stmt(0x20, 6, "main.go"),
            LineRow::stmt(0x30, 7, "main.go"),
            LineRow::stmt(0x40, 20, "main.go"),
            LineRow::stmt(0x50, 21, "main.go"),
            LineRow::end_of_sequence(0x60),
        ])
    }

    #[test]
    fn test_collects_statements_in_range() {
        let mut cursor = two_functions();
        let result =
            extract_function_statements(&mut cursor, "main.f", 0x10, 0x40, DEFAULT_SYNTHETIC_FILE)
                .unwrap();
        assert_eq!(addresses(&result), vec![0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_rewinds_when_function_precedes_cursor() {
        let mut cursor = two_functions();
        extract_function_statements(&mut cursor, "main.g", 0x40, 0x60, DEFAULT_SYNTHETIC_FILE)
            .unwrap();
        let result =
            extract_function_statements(&mut cursor, "main.f", 0x10, 0x40, DEFAULT_SYNTHETIC_FILE)
                .unwrap();
        assert_eq!(addresses(&result), vec![0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_exhaustion_mid_function_keeps_prefix() {
        let mut cursor = LineTableCursor::new(vec![
            LineRow::stmt(0x10, 5, "main.go"),
            LineRow::stmt(0x20, 6, "main.go"),
        ]);
        let result =
            extract_function_statements(&mut cursor, "main.f", 0x10, 0x100, DEFAULT_SYNTHETIC_FILE)
                .unwrap();
        assert_eq!(addresses(&result), vec![0x10, 0x20]);
    }

    #[test]
    fn test_uncovered_low_pc_is_fatal() {
        let mut cursor = two_functions();
        let err =
            extract_function_statements(&mut cursor, "main.h", 0x70, 0x80, DEFAULT_SYNTHETIC_FILE)
                .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckError>(),
            Some(CheckError::LineSeek { pc: 0x70, .. })
        ));
    }

    #[test]
    fn test_synthetic_function_is_skipped() {
        let mut cursor = LineTableCursor::new(vec![
            LineRow::stmt(0x10, 1, "<autogenerated>"),
            LineRow::stmt(0x20, 1, "<autogenerated>"),
            LineRow::end_of_sequence(0x30),
        ]);
        let result =
            extract_function_statements(&mut cursor, "type..eq", 0x10, 0x30, DEFAULT_SYNTHETIC_FILE)
                .unwrap();
        assert_eq!(result, FunctionStatements::Synthetic);
        assert!(is_synthetic_file("/go/src/<autogenerated>", "<autogenerated>"));
    }
}
