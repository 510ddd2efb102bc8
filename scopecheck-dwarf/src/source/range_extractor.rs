//! DWARF address range extraction utilities
//!
//! Provides reusable logic for extracting address ranges from DIEs,
//! supporting both single ranges (low_pc/high_pc) and multiple ranges (DW_AT_ranges)

use crate::core::{AddressRange, Result};
use crate::source::dwarf_file::DwarfReader;
use tracing::{debug, trace};

/// Utility for extracting address ranges from DWARF DIEs
pub(crate) struct RangeExtractor;

impl RangeExtractor {
    /// Extract all address ranges from a DIE
    ///
    /// This will try:
    /// 1. Single range from DW_AT_low_pc + DW_AT_high_pc
    /// 2. Multiple ranges from DW_AT_ranges
    /// 3. Return empty vec if no ranges found
    pub(crate) fn extract_all_ranges(
        entry: &gimli::DebuggingInformationEntry<'_, '_, DwarfReader>,
        unit: &gimli::Unit<DwarfReader>,
        dwarf: &gimli::Dwarf<DwarfReader>,
    ) -> Result<Vec<AddressRange>> {
        if let (Some(low), Some(high)) = Self::extract_pc_bounds(entry, unit, dwarf)? {
            trace!("Found single range: 0x{:x}-0x{:x}", low, high);
            return Ok(vec![AddressRange::new(low, high)]);
        }

        if let Some(ranges) = Self::extract_multiple_ranges(entry, unit, dwarf)? {
            trace!("Found {} ranges from DW_AT_ranges", ranges.len());
            return Ok(ranges);
        }

        trace!("No address ranges found for DIE");
        Ok(Vec::new())
    }

    /// Extract DW_AT_low_pc and the absolute DW_AT_high_pc, each if present
    pub(crate) fn extract_pc_bounds(
        entry: &gimli::DebuggingInformationEntry<'_, '_, DwarfReader>,
        unit: &gimli::Unit<DwarfReader>,
        dwarf: &gimli::Dwarf<DwarfReader>,
    ) -> Result<(Option<u64>, Option<u64>)> {
        let mut low_pc = None;
        let mut high_pc = None;
        let mut high_pc_offset = None;

        let mut attrs = entry.attrs();
        while let Some(attr) = attrs.next()? {
            match attr.name() {
                gimli::constants::DW_AT_low_pc => {
                    low_pc = dwarf.attr_address(unit, attr.value())?;
                }
                gimli::constants::DW_AT_high_pc => match attr.value() {
                    gimli::AttributeValue::Udata(offset) => high_pc_offset = Some(offset),
                    gimli::AttributeValue::Data1(offset) => high_pc_offset = Some(offset as u64),
                    gimli::AttributeValue::Data2(offset) => high_pc_offset = Some(offset as u64),
                    gimli::AttributeValue::Data4(offset) => high_pc_offset = Some(offset as u64),
                    gimli::AttributeValue::Data8(offset) => high_pc_offset = Some(offset),
                    other => high_pc = dwarf.attr_address(unit, other)?,
                },
                _ => {}
            }
        }

        let high_pc = match (low_pc, high_pc, high_pc_offset) {
            (_, Some(high), _) => Some(high),
            (Some(low), None, Some(offset)) => Some(low.wrapping_add(offset)),
            _ => None,
        };
        Ok((low_pc, high_pc))
    }

    /// Extract multiple address ranges from DW_AT_ranges
    pub(crate) fn extract_multiple_ranges(
        entry: &gimli::DebuggingInformationEntry<'_, '_, DwarfReader>,
        unit: &gimli::Unit<DwarfReader>,
        dwarf: &gimli::Dwarf<DwarfReader>,
    ) -> Result<Option<Vec<AddressRange>>> {
        let ranges_attr = match entry.attr_value(gimli::constants::DW_AT_ranges)? {
            Some(value) => value,
            None => return Ok(None),
        };

        let Some(ranges_offset) = dwarf.attr_ranges_offset(unit, ranges_attr)? else {
            debug!("Unexpected DW_AT_ranges attribute value type");
            return Ok(None);
        };

        let mut ranges_iter = dwarf.ranges(unit, ranges_offset)?;
        let mut ranges = Vec::new();
        while let Some(range) = ranges_iter.next()? {
            if range.begin > range.end {
                continue;
            }
            trace!("Range: 0x{:x}-0x{:x}", range.begin, range.end);
            ranges.push(AddressRange::new(range.begin, range.end));
        }

        if ranges.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ranges))
        }
    }

    /// Address ranges covered by a whole compilation unit
    pub(crate) fn extract_unit_ranges(
        unit: &gimli::Unit<DwarfReader>,
        dwarf: &gimli::Dwarf<DwarfReader>,
    ) -> Result<Vec<AddressRange>> {
        let mut ranges_iter = dwarf.unit_ranges(unit)?;
        let mut ranges = Vec::new();
        while let Some(range) = ranges_iter.next()? {
            ranges.push(AddressRange::new(range.begin, range.end));
        }
        Ok(ranges)
    }
}
