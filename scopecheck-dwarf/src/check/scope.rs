//! Lexical block stack for a single function's record walk

use crate::core::{ranges_contain, AddressRange, StatementRow};
use tracing::trace;

/// A pushed block: its ranges and the parent's statements narrowed to them
#[derive(Debug, Clone)]
pub struct LexicalBlock {
    pub ranges: Vec<AddressRange>,
    pub statements: Vec<StatementRow>,
}

/// What a closing end-of-children marker closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeExit {
    Block,
    /// The stack was already empty: this marker ends the function itself
    Function,
}

/// Rows whose address falls inside any of `ranges`
pub fn filter_inside_ranges(
    statements: &[StatementRow],
    ranges: &[AddressRange],
) -> Vec<StatementRow> {
    statements
        .iter()
        .filter(|row| ranges_contain(ranges, row.address))
        .cloned()
        .collect()
}

/// Explicit stack of nested lexical blocks; empty means function scope
#[derive(Debug, Clone)]
pub struct ScopeTracker {
    function_statements: Vec<StatementRow>,
    stack: Vec<LexicalBlock>,
}

impl ScopeTracker {
    pub fn new(function_statements: Vec<StatementRow>) -> Self {
        Self {
            function_statements,
            stack: Vec::new(),
        }
    }

    /// Push a block narrowed from the current top of stack
    pub fn open_block(&mut self, ranges: &[AddressRange]) {
        let statements = filter_inside_ranges(self.current(), ranges);
        trace!(
            "Open block at depth {}: {} ranges, {} statements",
            self.stack.len() + 1,
            ranges.len(),
            statements.len()
        );
        self.stack.push(LexicalBlock {
            ranges: ranges.to_vec(),
            statements,
        });
    }

    pub fn close(&mut self) -> ScopeExit {
        match self.stack.pop() {
            Some(block) => {
                trace!(
                    "Close block at depth {} starting at 0x{:x}",
                    self.stack.len() + 1,
                    block.ranges.first().map_or(0, |range| range.begin)
                );
                ScopeExit::Block
            }
            None => ScopeExit::Function,
        }
    }

    /// Statements visible in the innermost open scope
    pub fn current(&self) -> &[StatementRow] {
        match self.stack.last() {
            Some(block) => &block.statements,
            None => &self.function_statements,
        }
    }

    pub fn function_statements(&self) -> &[StatementRow] {
        &self.function_statements
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(addresses: &[u64]) -> Vec<StatementRow> {
        addresses
            .iter()
            .enumerate()
            .map(|(i, &address)| StatementRow {
                address,
                line: 10 + i as u64,
                file_path: "main.go".to_string(),
            })
            .collect()
    }

    fn addresses(rows: &[StatementRow]) -> Vec<u64> {
        rows.iter().map(|r| r.address).collect()
    }

    #[test]
    fn test_nested_blocks_narrow_from_top_of_stack() {
        let mut tracker = ScopeTracker::new(rows(&[0x10, 0x20, 0x30, 0x40, 0x50]));
        tracker.open_block(&[AddressRange::new(0x20, 0x50)]);
        assert_eq!(addresses(tracker.current()), vec![0x20, 0x30, 0x40]);

        // The inner block's ranges reach outside the outer block but cannot widen it
        tracker.open_block(&[AddressRange::new(0x10, 0x20), AddressRange::new(0x40, 0x60)]);
        assert_eq!(addresses(tracker.current()), vec![0x40]);
        assert_eq!(tracker.depth(), 2);

        assert_eq!(tracker.close(), ScopeExit::Block);
        assert_eq!(addresses(tracker.current()), vec![0x20, 0x30, 0x40]);
        assert_eq!(tracker.close(), ScopeExit::Block);
        assert_eq!(tracker.close(), ScopeExit::Function);
        assert_eq!(tracker.depth(), 0);
        assert_eq!(tracker.function_statements().len(), 5);
    }

    #[test]
    fn test_disjoint_block_ranges() {
        let statements = rows(&[0x10, 0x20, 0x30, 0x40]);
        let inside = filter_inside_ranges(
            &statements,
            &[AddressRange::new(0x10, 0x11), AddressRange::new(0x30, 0x40)],
        );
        assert_eq!(addresses(&inside), vec![0x10, 0x30]);
    }
}
