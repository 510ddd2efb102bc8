//! Positionable cursor over one unit's line table

use crate::core::LineRow;
use tracing::trace;

/// Owns a unit's line rows in program order and a single mutable position
#[derive(Debug, Clone, Default)]
pub struct LineTableCursor {
    rows: Vec<LineRow>,
    position: usize,
}

impl LineTableCursor {
    pub fn new(rows: Vec<LineRow>) -> Self {
        Self { rows, position: 0 }
    }

    /// Rewind to the first row of the unit
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Search forward from the current position for the row whose span
    /// `[row.address, next.address)` within one sequence contains `pc`.
    /// On failure the position is left untouched.
    pub fn seek_pc(&mut self, pc: u64) -> bool {
        for index in self.position..self.rows.len() {
            let row = &self.rows[index];
            if row.end_sequence || row.address > pc {
                continue;
            }
            let Some(next) = self.rows.get(index + 1) else {
                break;
            };
            if pc < next.address {
                trace!(
                    "seek_pc 0x{:x}: row {} at 0x{:x} (line {})",
                    pc,
                    index,
                    row.address,
                    row.line
                );
                self.position = index;
                return true;
            }
        }
        false
    }

    pub fn current(&self) -> Option<&LineRow> {
        self.rows.get(self.position)
    }

    /// Step to the next row; None once the table is exhausted
    pub fn advance(&mut self) -> Option<&LineRow> {
        if self.position < self.rows.len() {
            self.position += 1;
        }
        self.rows.get(self.position)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LineTableCursor {
        LineTableCursor::new(vec![
            LineRow::stmt(0x10, 5, "a.go"),
            LineRow::stmt(0x20, 6, "a.go"),
            LineRow::end_of_sequence(0x30),
            LineRow::stmt(0x100, 9, "b.go"),
            LineRow::end_of_sequence(0x110),
        ])
    }

    #[test]
    fn test_seek_exact_and_inside_span() {
        let mut cursor = table();
        assert!(cursor.seek_pc(0x20));
        assert_eq!(cursor.current().unwrap().address, 0x20);

        cursor.reset();
        assert!(cursor.seek_pc(0x18));
        assert_eq!(cursor.current().unwrap().address, 0x10);
    }

    #[test]
    fn test_seek_is_forward_only_until_reset() {
        let mut cursor = table();
        assert!(cursor.seek_pc(0x100));
        assert!(!cursor.seek_pc(0x10));
        assert_eq!(cursor.current().unwrap().address, 0x100);

        cursor.reset();
        assert!(cursor.seek_pc(0x10));
    }

    #[test]
    fn test_seek_outside_any_sequence_fails() {
        let mut cursor = table();
        assert!(!cursor.seek_pc(0x40));
        assert!(!cursor.seek_pc(0x110));
        assert_eq!(cursor.current().unwrap().address, 0x10);
    }

    #[test]
    fn test_advance_until_exhausted() {
        let mut cursor = table();
        let mut seen = 1;
        while cursor.advance().is_some() {
            seen += 1;
        }
        assert_eq!(seen, cursor.len());
        assert!(cursor.current().is_none());
        assert!(cursor.advance().is_none());
    }
}
