//! gimli-backed access layer over an object file on disk

use crate::{
    core::{
        CheckError, CompileUnitRecord, DebugRecord, LexicalBlockRecord, LineRow, LocListEntry,
        LocationAttr, Result, SubprogramRecord, VariableRecord,
    },
    source::{
        path::resolve_file_path, range_extractor::RangeExtractor, DebugInfoSource,
        LineTableCursor, RecordStream, UnitSource,
    },
};
use gimli::Reader as _;
use object::{Object, ObjectSection};
use std::{
    borrow::Cow,
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, trace};

pub(crate) type DwarfReader = gimli::EndianArcSlice<gimli::RunTimeEndian>;

/// Sections without which no unit can be checked
const REQUIRED_SECTIONS: [&str; 2] = [".debug_info", ".debug_line"];

/// An object file's DWARF data, iterated one compile unit at a time
pub struct DwarfFile {
    path: PathBuf,
    dwarf: Arc<gimli::Dwarf<DwarfReader>>,
    units: gimli::DebugInfoUnitHeadersIter<DwarfReader>,
}

impl DwarfFile {
    /// Memory map and parse the object file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(CheckError::from)?;
        let mmap = unsafe { memmap2::MmapOptions::new().map(&file) }.map_err(CheckError::from)?;
        Self::parse(path, &mmap[..])
    }

    /// Parse an object file image already in memory; section data is copied
    pub fn parse(path: impl AsRef<Path>, data: &[u8]) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let object = object::File::parse(data).map_err(CheckError::from)?;

        for name in REQUIRED_SECTIONS {
            if object.section_by_name(name).is_none() {
                return Err(CheckError::MissingSection { name }.into());
            }
        }

        let endian = if object.is_little_endian() {
            gimli::RunTimeEndian::Little
        } else {
            gimli::RunTimeEndian::Big
        };

        let load_section =
            |id: gimli::SectionId| -> std::result::Result<DwarfReader, object::Error> {
                let data = match object.section_by_name(id.name()) {
                    Some(section) => section.uncompressed_data()?,
                    None => Cow::Borrowed(&[][..]),
                };
                Ok(gimli::EndianArcSlice::new(Arc::from(data.as_ref()), endian))
            };
        let dwarf = gimli::Dwarf::load(load_section).map_err(CheckError::from)?;
        let units = dwarf.units();

        info!("Loaded DWARF sections from {}", path.display());
        Ok(Self {
            path,
            dwarf: Arc::new(dwarf),
            units,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DebugInfoSource for DwarfFile {
    type Unit = DwarfUnit;

    fn next_unit(&mut self) -> Result<Option<DwarfUnit>> {
        while let Some(header) = self.units.next().map_err(CheckError::from)? {
            let unit = self.dwarf.unit(header).map_err(CheckError::from)?;

            let mut entries = unit.entries();
            let tag = entries.next_dfs()?.map(|(_, entry)| entry.tag());
            drop(entries);
            if tag != Some(gimli::constants::DW_TAG_compile_unit) {
                debug!("Skipping non-compile unit (root tag {:?})", tag);
                continue;
            }

            let header = CompileUnitRecord {
                name: reader_string(unit.name.as_ref())?,
                producer: unit_producer(&self.dwarf, &unit)?,
                ranges: RangeExtractor::extract_unit_ranges(&unit, &self.dwarf)?,
            };
            return Ok(Some(DwarfUnit {
                dwarf: Arc::clone(&self.dwarf),
                unit,
                header,
            }));
        }
        Ok(None)
    }
}

/// One compile unit of a `DwarfFile`
pub struct DwarfUnit {
    dwarf: Arc<gimli::Dwarf<DwarfReader>>,
    unit: gimli::Unit<DwarfReader>,
    header: CompileUnitRecord,
}

impl DwarfUnit {
    fn attr_string(&self, value: gimli::AttributeValue<DwarfReader>) -> Result<Option<String>> {
        match self.dwarf.attr_string(&self.unit, value) {
            Ok(string) => Ok(Some(string.to_string_lossy()?.into_owned())),
            Err(_) => Ok(None),
        }
    }

    fn extract_name(
        &self,
        entry: &gimli::DebuggingInformationEntry<'_, '_, DwarfReader>,
    ) -> Result<Option<String>> {
        match entry.attr_value(gimli::constants::DW_AT_name)? {
            Some(value) => self.attr_string(value),
            None => Ok(None),
        }
    }

    fn resolve_row_file(
        &self,
        header: &gimli::LineProgramHeader<DwarfReader>,
        row: &gimli::LineRow,
        comp_dir: &str,
    ) -> Result<String> {
        let Some(file) = row.file(header) else {
            return Ok(String::new());
        };
        let filename = self.attr_string(file.path_name())?.unwrap_or_default();
        let directory = match file.directory(header) {
            Some(dir) => self.attr_string(dir)?,
            None => None,
        };
        Ok(resolve_file_path(comp_dir, directory.as_deref(), &filename))
    }

    fn convert_entry(
        &self,
        entry: &gimli::DebuggingInformationEntry<'_, '_, DwarfReader>,
    ) -> Result<DebugRecord> {
        let has_children = entry.has_children();
        let record = match entry.tag() {
            gimli::constants::DW_TAG_subprogram => {
                let (low_pc, high_pc) =
                    RangeExtractor::extract_pc_bounds(entry, &self.unit, &self.dwarf)?;
                DebugRecord::Subprogram(SubprogramRecord {
                    name: self.extract_name(entry)?,
                    low_pc,
                    high_pc,
                    has_children,
                })
            }
            gimli::constants::DW_TAG_lexical_block => {
                DebugRecord::LexicalBlock(LexicalBlockRecord {
                    ranges: RangeExtractor::extract_all_ranges(entry, &self.unit, &self.dwarf)?,
                    has_children,
                })
            }
            gimli::constants::DW_TAG_variable | gimli::constants::DW_TAG_formal_parameter => {
                DebugRecord::Variable(self.convert_variable(entry)?)
            }
            tag => DebugRecord::Other { tag, has_children },
        };
        Ok(record)
    }

    fn convert_variable(
        &self,
        entry: &gimli::DebuggingInformationEntry<'_, '_, DwarfReader>,
    ) -> Result<VariableRecord> {
        let name = self.extract_name(entry)?;
        let decl_line = entry
            .attr(gimli::constants::DW_AT_decl_line)?
            .and_then(|attr| attr.udata_value());

        let location = match entry.attr_value(gimli::constants::DW_AT_location)? {
            None => None,
            Some(gimli::AttributeValue::Exprloc(_)) | Some(gimli::AttributeValue::Block(_)) => {
                Some(LocationAttr::Expression)
            }
            Some(gimli::AttributeValue::LocationListsRef(offset)) => {
                Some(LocationAttr::ListOffset(offset.0 as u64))
            }
            Some(gimli::AttributeValue::DebugLocListsIndex(index)) => {
                let offset = self.dwarf.locations_offset(&self.unit, index)?;
                Some(LocationAttr::ListOffset(offset.0 as u64))
            }
            Some(other) => Some(LocationAttr::Unsupported {
                form: format!("{:?}", other),
            }),
        };

        Ok(VariableRecord {
            name,
            is_parameter: entry.tag() == gimli::constants::DW_TAG_formal_parameter,
            decl_line,
            location,
            has_children: entry.has_children(),
        })
    }
}

impl UnitSource for DwarfUnit {
    fn header(&self) -> &CompileUnitRecord {
        &self.header
    }

    fn line_cursor(&self) -> Result<LineTableCursor> {
        let Some(program) = self.unit.line_program.clone() else {
            debug!("Unit has no line program");
            return Ok(LineTableCursor::default());
        };
        let comp_dir = reader_string(self.unit.comp_dir.as_ref())?.unwrap_or_default();

        let mut file_paths: HashMap<u64, String> = HashMap::new();
        let mut line_rows = Vec::new();
        let mut rows = program.rows();
        while let Some((header, row)) = rows.next_row()? {
            let file_index = row.file_index();
            let file_path = match file_paths.get(&file_index) {
                Some(path) => path.clone(),
                None => {
                    let path = self.resolve_row_file(header, row, &comp_dir)?;
                    file_paths.insert(file_index, path.clone());
                    path
                }
            };

            line_rows.push(LineRow {
                address: row.address(),
                file_path,
                line: row.line().map(|l| l.get()).unwrap_or(0),
                is_stmt: row.is_stmt(),
                end_sequence: row.end_sequence(),
            });
        }

        trace!("Read {} line rows", line_rows.len());
        Ok(LineTableCursor::new(line_rows))
    }

    fn records(&self) -> Result<RecordStream> {
        let mut entries = self.unit.entries();
        // The first entry is the compile unit itself
        if entries.next_entry()?.is_none() {
            return Ok(RecordStream::default());
        }

        let mut records = Vec::new();
        while entries.next_entry()?.is_some() {
            let record = match entries.current() {
                Some(entry) => self.convert_entry(entry)?,
                None => DebugRecord::EndOfChildren,
            };
            records.push(record);
        }
        Ok(RecordStream::new(records))
    }

    fn location_list(&self, offset: u64) -> Result<Vec<LocListEntry>> {
        let mut raw = self.dwarf.locations.raw_locations(
            gimli::LocationListsOffset(offset as usize),
            self.unit.encoding(),
        )?;

        let mut entries = Vec::new();
        while let Some(entry) = raw.next()? {
            let converted = match entry {
                gimli::RawLocListEntry::BaseAddress { addr } => LocListEntry::BaseAddress(addr),
                gimli::RawLocListEntry::BaseAddressx { addr } => {
                    LocListEntry::BaseAddress(self.dwarf.address(&self.unit, addr)?)
                }
                gimli::RawLocListEntry::AddressOrOffsetPair { begin, end, .. }
                | gimli::RawLocListEntry::OffsetPair { begin, end, .. } => {
                    LocListEntry::Offset { begin, end }
                }
                gimli::RawLocListEntry::StartEnd { begin, end, .. } => {
                    LocListEntry::Absolute { begin, end }
                }
                gimli::RawLocListEntry::StartLength { begin, length, .. } => {
                    LocListEntry::Absolute {
                        begin,
                        end: begin.wrapping_add(length),
                    }
                }
                gimli::RawLocListEntry::StartxEndx { begin, end, .. } => LocListEntry::Absolute {
                    begin: self.dwarf.address(&self.unit, begin)?,
                    end: self.dwarf.address(&self.unit, end)?,
                },
                gimli::RawLocListEntry::StartxLength { begin, length, .. } => {
                    let begin = self.dwarf.address(&self.unit, begin)?;
                    LocListEntry::Absolute {
                        begin,
                        end: begin.wrapping_add(length),
                    }
                }
                #[allow(unreachable_patterns)]
                _ => {
                    trace!("Ignoring default location-list entry at 0x{:x}", offset);
                    continue;
                }
            };
            entries.push(converted);
        }
        Ok(entries)
    }
}

fn reader_string(value: Option<&DwarfReader>) -> Result<Option<String>> {
    match value {
        Some(reader) => Ok(Some(reader.to_string_lossy()?.into_owned())),
        None => Ok(None),
    }
}

fn unit_producer(
    dwarf: &gimli::Dwarf<DwarfReader>,
    unit: &gimli::Unit<DwarfReader>,
) -> Result<Option<String>> {
    let mut entries = unit.entries();
    let Some((_, entry)) = entries.next_dfs()? else {
        return Ok(None);
    };
    let Some(value) = entry.attr_value(gimli::constants::DW_AT_producer)? else {
        return Ok(None);
    };
    match dwarf.attr_string(unit, value) {
        Ok(producer) => Ok(Some(producer.to_string_lossy()?.into_owned())),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_non_object_data() {
        let err = match DwarfFile::parse("garbage.bin", b"definitely not an object file") {
            Ok(_) => panic!("garbage parsed as an object file"),
            Err(err) => err,
        };
        assert!(matches!(
            err.downcast_ref::<CheckError>(),
            Some(CheckError::Object(_))
        ));
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let err = match DwarfFile::open("/nonexistent/scopecheck/input") {
            Ok(_) => panic!("opened a nonexistent file"),
            Err(err) => err,
        };
        assert!(matches!(
            err.downcast_ref::<CheckError>(),
            Some(CheckError::Io(_))
        ));
    }
}
