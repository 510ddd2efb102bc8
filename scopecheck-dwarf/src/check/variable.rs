//! Per-variable derivation of the two visible statement sets

use crate::check::scope::filter_inside_ranges;
use crate::core::{
    sort_by_address, AddressRange, CheckError, LocListEntry, LocationAttr, Result, StatementRow,
    VariableRecord,
};
use tracing::warn;

/// Why a variable is not cross-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InlineExpression,
    NoLocation,
    NoDeclLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableVerdict {
    Skip(SkipReason),
    Check { list_offset: u64, decl_line: u64 },
}

/// Decide whether a variable is cross-checked.
///
/// A location form the checker cannot interpret is fatal here, once the
/// walk actually reaches the variable.
pub fn classify_variable(variable: &VariableRecord) -> Result<VariableVerdict> {
    let list_offset = match &variable.location {
        Some(LocationAttr::ListOffset(offset)) => *offset,
        Some(LocationAttr::Expression) => {
            return Ok(VariableVerdict::Skip(SkipReason::InlineExpression))
        }
        Some(LocationAttr::Unsupported { form }) => {
            return Err(CheckError::UnsupportedLocationForm {
                variable: variable.name.as_deref().unwrap_or("<anonymous>").to_string(),
                form: form.clone(),
            }
            .into())
        }
        None => return Ok(VariableVerdict::Skip(SkipReason::NoLocation)),
    };
    Ok(match variable.decl_line {
        Some(decl_line) => VariableVerdict::Check {
            list_offset,
            decl_line,
        },
        None => VariableVerdict::Skip(SkipReason::NoDeclLine),
    })
}

/// Turn raw location-list entries into absolute ranges.
///
/// The running base starts at the unit base; base-address selections replace
/// it and produce no range. Inverted ranges are dropped.
pub fn resolve_location_ranges(unit_base: u64, entries: &[LocListEntry]) -> Vec<AddressRange> {
    let mut base = unit_base;
    let mut ranges = Vec::with_capacity(entries.len());
    for entry in entries {
        let range = match *entry {
            LocListEntry::BaseAddress(address) => {
                base = address;
                continue;
            }
            LocListEntry::Offset { begin, end } => {
                AddressRange::new(begin.wrapping_add(base), end.wrapping_add(base))
            }
            LocListEntry::Absolute { begin, end } => AddressRange::new(begin, end),
        };
        if range.begin > range.end {
            warn!("Ignoring inverted location range {}", range);
            continue;
        }
        ranges.push(range);
    }
    ranges
}

/// Rows whose line is strictly after the declaration line
pub fn filter_after_line(statements: &[StatementRow], decl_line: u64) -> Vec<StatementRow> {
    statements
        .iter()
        .filter(|row| row.line > decl_line)
        .cloned()
        .collect()
}

/// Where a variable should be observable, derived two independent ways
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSets {
    /// From the enclosing lexical scope and the declaration line
    pub from_scope: Vec<StatementRow>,
    /// From the location-list ranges and the declaration line
    pub from_location: Vec<StatementRow>,
}

/// Both sets come back sorted by address.
///
/// `location_basis` is the statement sequence the location ranges are applied
/// to; normally the same scope statements, or the whole function's.
pub fn derive_visible_sets(
    scope_statements: &[StatementRow],
    location_basis: &[StatementRow],
    decl_line: u64,
    location_ranges: &[AddressRange],
) -> VisibleSets {
    let mut from_scope = filter_after_line(scope_statements, decl_line);
    let mut from_location = filter_after_line(
        &filter_inside_ranges(location_basis, location_ranges),
        decl_line,
    );
    sort_by_address(&mut from_scope);
    sort_by_address(&mut from_location);
    VisibleSets {
        from_scope,
        from_location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements() -> Vec<StatementRow> {
        [(0x10, 5), (0x20, 6), (0x30, 7), (0x40, 8)]
            .iter()
            .map(|&(address, line)| StatementRow {
                address,
                line,
                file_path: "main.go".to_string(),
            })
            .collect()
    }

    fn addresses(rows: &[StatementRow]) -> Vec<u64> {
        rows.iter().map(|r| r.address).collect()
    }

    #[test]
    fn test_base_address_selection_rebases_following_entries() {
        let entries = [
            LocListEntry::Offset { begin: 0x0, end: 0x10 },
            LocListEntry::BaseAddress(0x2000),
            LocListEntry::Offset { begin: 0x4, end: 0x8 },
            LocListEntry::Absolute { begin: 0x50, end: 0x60 },
        ];
        assert_eq!(
            resolve_location_ranges(0x1000, &entries),
            vec![
                AddressRange::new(0x1000, 0x1010),
                AddressRange::new(0x2004, 0x2008),
                AddressRange::new(0x50, 0x60),
            ]
        );
    }

    #[test]
    fn test_inverted_ranges_are_dropped() {
        let entries = [LocListEntry::Absolute { begin: 0x60, end: 0x50 }];
        assert!(resolve_location_ranges(0, &entries).is_empty());
    }

    #[test]
    fn test_declaration_line_is_excluded_from_both_sets() {
        let stmts = statements();
        let sets = derive_visible_sets(&stmts, &stmts, 5, &[AddressRange::new(0x10, 0x40)]);
        assert_eq!(addresses(&sets.from_scope), vec![0x20, 0x30, 0x40]);
        assert_eq!(addresses(&sets.from_location), vec![0x20, 0x30]);
        assert!(sets
            .from_scope
            .iter()
            .chain(sets.from_location.iter())
            .all(|row| row.line > 5));
    }

    #[test]
    fn test_sets_are_sorted_by_address() {
        let mut stmts = statements();
        stmts.reverse();
        let sets = derive_visible_sets(&stmts, &stmts, 0, &[AddressRange::new(0, 0x100)]);
        assert_eq!(addresses(&sets.from_scope), vec![0x10, 0x20, 0x30, 0x40]);
        assert_eq!(addresses(&sets.from_location), vec![0x10, 0x20, 0x30, 0x40]);
    }

    #[test]
    fn test_classify_variable() {
        let mut variable = VariableRecord {
            name: Some("x".to_string()),
            decl_line: Some(5),
            location: Some(LocationAttr::ListOffset(0x40)),
            ..VariableRecord::default()
        };
        assert_eq!(
            classify_variable(&variable).unwrap(),
            VariableVerdict::Check {
                list_offset: 0x40,
                decl_line: 5
            }
        );

        variable.decl_line = None;
        assert_eq!(
            classify_variable(&variable).unwrap(),
            VariableVerdict::Skip(SkipReason::NoDeclLine)
        );

        variable.location = Some(LocationAttr::Expression);
        assert_eq!(
            classify_variable(&variable).unwrap(),
            VariableVerdict::Skip(SkipReason::InlineExpression)
        );

        variable.location = None;
        assert_eq!(
            classify_variable(&variable).unwrap(),
            VariableVerdict::Skip(SkipReason::NoLocation)
        );
    }

    #[test]
    fn test_unsupported_location_form_is_fatal_when_classified() {
        let variable = VariableRecord {
            name: Some("v".to_string()),
            decl_line: Some(3),
            location: Some(LocationAttr::Unsupported {
                form: "Data4(16)".to_string(),
            }),
            ..VariableRecord::default()
        };
        let err = classify_variable(&variable).unwrap_err();
        match err.downcast_ref::<CheckError>() {
            Some(CheckError::UnsupportedLocationForm { variable, form }) => {
                assert_eq!(variable, "v");
                assert_eq!(form, "Data4(16)");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
