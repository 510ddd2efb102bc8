//! Merge-walk comparison of two address-sorted statement sets

use crate::core::StatementRow;
use serde::Serialize;
use std::cmp::Ordering;

/// Result of comparing the scope-derived set against the location-derived set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopeDiff {
    /// Rows present in both, taken from the scope side
    pub matched: Vec<StatementRow>,
    /// In scope but not covered by the location list
    pub missing: Vec<StatementRow>,
    /// Covered by the location list but outside the scope
    pub excess: Vec<StatementRow>,
}

impl ScopeDiff {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.excess.is_empty()
    }
}

/// Compare `from_scope` against `from_location`, matching rows by address.
///
/// Both inputs are expected sorted by address. Duplicate addresses are
/// matched one-to-one.
pub fn diff_visible_sets(from_scope: &[StatementRow], from_location: &[StatementRow]) -> ScopeDiff {
    let mut diff = ScopeDiff::default();
    let (mut i, mut j) = (0, 0);

    while i < from_scope.len() && j < from_location.len() {
        let (a, b) = (&from_scope[i], &from_location[j]);
        match a.address.cmp(&b.address) {
            Ordering::Equal => {
                diff.matched.push(a.clone());
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                diff.missing.push(a.clone());
                i += 1;
            }
            Ordering::Greater => {
                diff.excess.push(b.clone());
                j += 1;
            }
        }
    }
    diff.missing.extend_from_slice(&from_scope[i..]);
    diff.excess.extend_from_slice(&from_location[j..]);
    diff
}
