//! In-memory access layer built from literal records

use crate::core::{CompileUnitRecord, DebugRecord, LineRow, LocListEntry, Result};
use crate::source::{DebugInfoSource, LineTableCursor, RecordStream, UnitSource};
use std::collections::{HashMap, VecDeque};

/// One compile unit held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryUnit {
    pub header: CompileUnitRecord,
    pub line_rows: Vec<LineRow>,
    pub records: Vec<DebugRecord>,
    pub location_lists: HashMap<u64, Vec<LocListEntry>>,
}

impl MemoryUnit {
    pub fn new(header: CompileUnitRecord) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    pub fn with_line_rows(mut self, rows: Vec<LineRow>) -> Self {
        self.line_rows = rows;
        self
    }

    pub fn with_records(mut self, records: Vec<DebugRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_location_list(mut self, offset: u64, entries: Vec<LocListEntry>) -> Self {
        self.location_lists.insert(offset, entries);
        self
    }
}

impl UnitSource for MemoryUnit {
    fn header(&self) -> &CompileUnitRecord {
        &self.header
    }

    fn line_cursor(&self) -> Result<LineTableCursor> {
        Ok(LineTableCursor::new(self.line_rows.clone()))
    }

    fn records(&self) -> Result<RecordStream> {
        Ok(RecordStream::new(self.records.clone()))
    }

    fn location_list(&self, offset: u64) -> Result<Vec<LocListEntry>> {
        self.location_lists
            .get(&offset)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No location list at offset 0x{:x}", offset))
    }
}

/// Debug-info source over a fixed list of in-memory units
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    units: VecDeque<MemoryUnit>,
}

impl MemorySource {
    pub fn new(units: Vec<MemoryUnit>) -> Self {
        Self {
            units: units.into(),
        }
    }
}

impl DebugInfoSource for MemorySource {
    type Unit = MemoryUnit;

    fn next_unit(&mut self) -> Result<Option<MemoryUnit>> {
        Ok(self.units.pop_front())
    }
}
