//! scopecheck: cross-check DWARF lexical scopes against variable location lists
//!
//! Exit status is 0 for a clean run, 1 when a location list covers statements
//! outside its variable's scope, and 2 when the run could not complete.

mod config;
mod logging;
mod report;

use anyhow::Result;
use config::{Args, Config, MergedConfig};
use report::JsonReporter;
use scopecheck_dwarf::{
    CheckOutcome, CheckStats, DwarfFile, Reporter, ScopeChecker, TextReporter,
};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

const EXIT_EXCESS: u8 = 1;
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(CheckOutcome::Clean) => ExitCode::SUCCESS,
        Ok(CheckOutcome::Excess(_)) => ExitCode::from(EXIT_EXCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run() -> Result<CheckOutcome> {
    let args = Args::parse_args()?;
    let file_config = match &args.config {
        Some(path) => Config::load_with_explicit_path(path)?,
        None => Config::load()?,
    };
    let merged = MergedConfig::new(args, file_config);
    logging::initialize_logging(&merged);
    debug!("Effective options: {:?}", merged.options);

    validate_target(&merged.target)?;
    let mut source = DwarfFile::open(&merged.target)?;
    info!("Checking {}", source.path().display());

    if merged.json {
        let (outcome, stats, reporter) = check(&merged, &mut source, JsonReporter::default())?;
        println!("{}", reporter.render(&merged.target, &outcome, &stats)?);
        return Ok(outcome);
    }

    let stdout = std::io::stdout();
    let (outcome, stats, reporter) =
        check(&merged, &mut source, TextReporter::new(stdout.lock()))?;
    let mut out = reporter.into_inner();
    if merged.verbose {
        print_stats(&mut out, &stats)?;
    }
    out.flush()?;
    Ok(outcome)
}

fn check<R: Reporter>(
    merged: &MergedConfig,
    source: &mut DwarfFile,
    reporter: R,
) -> Result<(CheckOutcome, CheckStats, R)> {
    let mut checker = ScopeChecker::new(merged.options.clone(), reporter);
    let outcome = checker.run(source)?;
    let stats = *checker.stats();
    Ok((outcome, stats, checker.into_reporter()))
}

fn validate_target(target: &Path) -> Result<()> {
    if !target.exists() {
        return Err(anyhow::anyhow!(
            "Target file does not exist: {}",
            target.display()
        ));
    }
    if !target.is_file() {
        return Err(anyhow::anyhow!(
            "Target path is not a file: {}",
            target.display()
        ));
    }
    Ok(())
}

fn print_stats(out: &mut impl Write, stats: &CheckStats) -> Result<()> {
    writeln!(out, "Summary:")?;
    writeln!(
        out,
        "  compile units: {} seen, {} checked, {} skipped",
        stats.units_seen, stats.units_checked, stats.units_skipped
    )?;
    writeln!(
        out,
        "  functions:     {} checked, {} skipped",
        stats.functions_checked, stats.functions_skipped
    )?;
    writeln!(
        out,
        "  variables:     {} checked, {} skipped",
        stats.variables_checked, stats.variables_skipped
    )?;
    writeln!(
        out,
        "  missing:       {} statements across {} variables",
        stats.missing_statements, stats.variables_with_missing
    )?;
    Ok(())
}
