//! Debug-format access layer
//!
//! Everything the checker needs from a debug-info container, expressed as
//! structured records. `DwarfFile` backs it with gimli; `MemorySource` backs
//! it with literal records.

pub(crate) mod dwarf_file;
pub(crate) mod line_cursor;
pub(crate) mod memory;
pub(crate) mod path;
pub(crate) mod range_extractor;
pub(crate) mod record_stream;

pub use dwarf_file::{DwarfFile, DwarfUnit};
pub use line_cursor::LineTableCursor;
pub use memory::{MemorySource, MemoryUnit};
pub use record_stream::RecordStream;

use crate::core::{CompileUnitRecord, LocListEntry, Result};

/// Iterates the compile units of one debug-info container, in file order
pub trait DebugInfoSource {
    type Unit: UnitSource;

    fn next_unit(&mut self) -> Result<Option<Self::Unit>>;
}

/// Per-unit access: header, line table, record tree and location lists
pub trait UnitSource {
    fn header(&self) -> &CompileUnitRecord;

    /// Fresh cursor over the unit's line table, positioned at its first row
    fn line_cursor(&self) -> Result<LineTableCursor>;

    /// The unit's records after the compile-unit record itself
    fn records(&self) -> Result<RecordStream>;

    /// Raw entries of the location list at `offset`
    fn location_list(&self, offset: u64) -> Result<Vec<LocListEntry>>;
}
