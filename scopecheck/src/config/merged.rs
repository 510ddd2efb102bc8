use scopecheck_dwarf::{CheckOptions, UnitFilter};
use std::path::PathBuf;

use crate::config::{Config, LogLevel, ParsedArgs};

/// Final merged configuration that combines command line arguments and config file settings
/// Command line arguments take priority over config file settings
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub target: PathBuf,
    pub log_level: LogLevel,
    pub verbose: bool,
    pub quiet: bool,
    pub json: bool,
    pub options: CheckOptions,
}

impl MergedConfig {
    /// Create merged configuration from parsed arguments and config file
    pub fn new(args: ParsedArgs, config: Config) -> Self {
        let filter = UnitFilter {
            producer_marker: args
                .producer_marker
                .unwrap_or(config.filter.producer_marker),
            flags_marker: args.flags_marker.unwrap_or(config.filter.flags_marker),
        };

        Self {
            target: args.target,
            log_level: args.log_level.unwrap_or(config.general.log_level),
            verbose: args.verbose,
            quiet: args.quiet,
            json: args.json,
            options: CheckOptions {
                filter,
                synthetic_file: args
                    .synthetic_file
                    .unwrap_or(config.filter.synthetic_file),
                location_basis: args
                    .location_basis
                    .unwrap_or(config.check.location_basis),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopecheck_dwarf::LocationBasis;

    fn args() -> ParsedArgs {
        ParsedArgs {
            target: PathBuf::from("prog"),
            config: None,
            producer_marker: None,
            flags_marker: None,
            synthetic_file: None,
            location_basis: None,
            log_level: None,
            verbose: false,
            quiet: false,
            json: false,
        }
    }

    #[test]
    fn test_config_fills_unset_arguments() {
        let mut config = Config::default();
        config.filter.producer_marker = "gccgo".to_string();
        config.check.location_basis = LocationBasis::Function;
        config.general.log_level = LogLevel::Info;

        let merged = MergedConfig::new(args(), config);
        assert_eq!(merged.options.filter.producer_marker, "gccgo");
        assert_eq!(merged.options.filter.flags_marker, "-N -l");
        assert_eq!(merged.options.location_basis, LocationBasis::Function);
        assert_eq!(merged.log_level, LogLevel::Info);
    }

    #[test]
    fn test_arguments_win_over_config() {
        let mut config = Config::default();
        config.filter.synthetic_file = "<generated>".to_string();
        config.general.log_level = LogLevel::Error;

        let parsed = ParsedArgs {
            synthetic_file: Some("<stub>".to_string()),
            location_basis: Some(LocationBasis::Scope),
            log_level: Some(LogLevel::Debug),
            ..args()
        };
        let merged = MergedConfig::new(parsed, config);
        assert_eq!(merged.options.synthetic_file, "<stub>");
        assert_eq!(merged.options.location_basis, LocationBasis::Scope);
        assert_eq!(merged.log_level, LogLevel::Debug);
    }
}
