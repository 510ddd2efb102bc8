//! Compile unit eligibility: producer toolchain and debug-build flags

use crate::core::CompileUnitRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PRODUCER_MARKER: &str = "Go";
pub const DEFAULT_FLAGS_MARKER: &str = "-N -l";

/// Producer-string markers a unit must carry to be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFilter {
    /// Substring identifying the toolchain family
    pub producer_marker: String,
    /// Substring identifying an unoptimized, no-inlining build
    pub flags_marker: String,
}

impl Default for UnitFilter {
    fn default() -> Self {
        Self {
            producer_marker: DEFAULT_PRODUCER_MARKER.to_string(),
            flags_marker: DEFAULT_FLAGS_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoProducer,
    ForeignProducer,
    OptimizedBuild,
    NoAddressRanges,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::NoProducer => "no producer string",
            RejectReason::ForeignProducer => "producer is not the expected toolchain",
            RejectReason::OptimizedBuild => "not built without optimizations and inlining",
            RejectReason::NoAddressRanges => "no address ranges",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitVerdict {
    /// Unit is checked; its first range's low address is the location-list base
    Accepted { base_address: u64 },
    Rejected(RejectReason),
}

impl UnitFilter {
    pub fn evaluate(&self, unit: &CompileUnitRecord) -> UnitVerdict {
        let Some(producer) = unit.producer.as_deref() else {
            return UnitVerdict::Rejected(RejectReason::NoProducer);
        };
        if !producer.contains(&self.producer_marker) {
            return UnitVerdict::Rejected(RejectReason::ForeignProducer);
        }
        if !producer.contains(&self.flags_marker) {
            return UnitVerdict::Rejected(RejectReason::OptimizedBuild);
        }
        match unit.ranges.first() {
            Some(range) => UnitVerdict::Accepted {
                base_address: range.begin,
            },
            None => UnitVerdict::Rejected(RejectReason::NoAddressRanges),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AddressRange;

    fn unit(producer: Option<&str>, ranges: Vec<AddressRange>) -> CompileUnitRecord {
        CompileUnitRecord {
            name: Some("main".to_string()),
            producer: producer.map(str::to_string),
            ranges,
        }
    }

    #[test]
    fn test_accepts_debug_build_and_takes_first_range_as_base() {
        let filter = UnitFilter::default();
        let verdict = filter.evaluate(&unit(
            Some("Go cmd/compile go1.21; -N -l"),
            vec![AddressRange::new(0x4000, 0x5000), AddressRange::new(0x1000, 0x2000)],
        ));
        assert_eq!(verdict, UnitVerdict::Accepted { base_address: 0x4000 });
    }

    #[test]
    fn test_rejections() {
        let filter = UnitFilter::default();
        let ranges = vec![AddressRange::new(0x10, 0x20)];

        assert_eq!(
            filter.evaluate(&unit(None, ranges.clone())),
            UnitVerdict::Rejected(RejectReason::NoProducer)
        );
        assert_eq!(
            filter.evaluate(&unit(Some("clang version 17; -N -l"), ranges.clone())),
            UnitVerdict::Rejected(RejectReason::ForeignProducer)
        );
        assert_eq!(
            filter.evaluate(&unit(Some("Go cmd/compile go1.21; regabi"), ranges)),
            UnitVerdict::Rejected(RejectReason::OptimizedBuild)
        );
        assert_eq!(
            filter.evaluate(&unit(Some("Go cmd/compile go1.21; -N -l"), vec![])),
            UnitVerdict::Rejected(RejectReason::NoAddressRanges)
        );
    }

    #[test]
    fn test_custom_markers() {
        let filter = UnitFilter {
            producer_marker: "rustc".to_string(),
            flags_marker: String::new(),
        };
        let verdict = filter.evaluate(&unit(
            Some("clang LLVM (rustc version 1.80.0)"),
            vec![AddressRange::new(0x200, 0x300)],
        ));
        assert_eq!(verdict, UnitVerdict::Accepted { base_address: 0x200 });
    }
}
