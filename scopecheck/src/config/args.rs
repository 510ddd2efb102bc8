use anyhow::Result;
use clap::Parser;
use scopecheck_dwarf::LocationBasis;
use std::path::PathBuf;

use crate::config::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "scopecheck")]
#[command(about = "Reports variables whose DWARF location lists disagree with their lexical scope")]
#[command(version = "0.1.0")]
#[command(
    after_help = "EXIT STATUS:\n  0  no excess coverage found\n  1  a location list covers statements outside its variable's scope\n  2  the input or configuration could not be processed"
)]
pub struct Args {
    /// Executable or object file carrying DWARF debug information
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Specify custom configuration file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Producer substring selecting the compile units to check (default: Go)
    #[arg(long, value_name = "TEXT")]
    pub producer_marker: Option<String>,

    /// Producer substring marking unoptimized, non-inlined builds (default: "-N -l")
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub flags_marker: Option<String>,

    /// Source file name of compiler-generated functions (default: <autogenerated>)
    #[arg(long, value_name = "NAME")]
    pub synthetic_file: Option<String>,

    /// Statements the location list is matched against: scope or function
    #[arg(long, value_name = "BASIS")]
    pub location_basis: Option<LocationBasis>,

    /// Set log level (error, warn, info, debug, trace)
    /// Priority: 1. RUST_LOG env var, 2. Command line args, 3. Config file (default: warn)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Verbose output: debug logging and a statistics summary
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output: no logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub target: PathBuf,
    pub config: Option<PathBuf>,
    pub producer_marker: Option<String>,
    pub flags_marker: Option<String>,
    pub synthetic_file: Option<String>,
    pub location_basis: Option<LocationBasis>,
    /// Explicit --log-level, or debug for -v
    pub log_level: Option<LogLevel>,
    pub verbose: bool,
    pub quiet: bool,
    pub json: bool,
}

impl Args {
    /// Parse the process command line
    pub fn parse_args() -> Result<ParsedArgs> {
        Args::parse().into_parsed()
    }

    pub fn into_parsed(self) -> Result<ParsedArgs> {
        let log_level = match self.log_level.as_deref() {
            Some(level) => Some(level.parse::<LogLevel>()?),
            None if self.verbose => Some(LogLevel::Debug),
            None => None,
        };

        Ok(ParsedArgs {
            target: self.target,
            config: self.config,
            producer_marker: self.producer_marker,
            flags_marker: self.flags_marker,
            synthetic_file: self.synthetic_file,
            location_basis: self.location_basis,
            log_level,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
        })
    }
}
