//! Provisioning initializer — run the tool's init command and report.
//!
//! check working dir → launch → capture → (optional) event log → report

use super::types::*;
use crate::provenance::{eventlog, hasher};
use crate::transport;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

/// Run the configured command once in the configured working directory.
///
/// Fails before launching anything if the working directory is unusable.
/// A non-zero exit code is returned in the result, not as an error.
pub fn run_init(config: &InitConfig) -> Result<ExecutionResult, LaunchError> {
    check_working_dir(&config.working_dir)?;
    transport::exec_command(
        &config.command.program,
        &config.command.args,
        &config.working_dir,
    )
}

/// `run_init`, recording start and outcome to the event log when one is set.
///
/// Event log write failures are warned about on stderr and never change
/// the returned result.
pub fn run_init_logged(config: &InitConfig) -> Result<ExecutionResult, LaunchError> {
    let Some(log) = config.event_log.as_deref() else {
        return run_init(config);
    };

    let run_id = eventlog::generate_run_id();
    record(
        log,
        ProvenanceEvent::InitStarted {
            run_id: run_id.clone(),
            working_dir: config.working_dir.display().to_string(),
            program: config.command.program.clone(),
            args: config.command.args.clone(),
            provinit_version: env!("CARGO_PKG_VERSION").to_string(),
        },
    );

    let start = Instant::now();
    let outcome = run_init(config);

    let event = match &outcome {
        Ok(result) => {
            let (stdout_hash, stderr_hash) = hasher::hash_streams(&result.stdout, &result.stderr);
            ProvenanceEvent::InitCompleted {
                run_id,
                exit_code: result.exit_code,
                duration_seconds: start.elapsed().as_secs_f64(),
                stdout_hash,
                stderr_hash,
            }
        }
        Err(e) => ProvenanceEvent::InitFailed {
            run_id,
            error: e.to_string(),
        },
    };
    record(log, event);

    outcome
}

fn record(log: &Path, event: ProvenanceEvent) {
    if let Err(e) = eventlog::append_event(log, event) {
        eprintln!("warning: {}", e);
    }
}

fn check_working_dir(path: &Path) -> Result<(), LaunchError> {
    let unusable = |reason: String| LaunchError::DirectoryNotFound {
        path: path.to_path_buf(),
        reason,
    };
    let meta = std::fs::metadata(path).map_err(|e| unusable(e.to_string()))?;
    if !meta.is_dir() {
        return Err(unusable("not a directory".to_string()));
    }
    // Exists but cannot be entered or listed (e.g. mode 000, other owner).
    std::fs::read_dir(path).map_err(|e| unusable(e.to_string()))?;
    Ok(())
}

/// The three-line report: raw stdout, raw stderr, then the return code.
pub fn format_report(result: &ExecutionResult) -> String {
    format!(
        "{}\n{}\nReturn code: {}\n",
        result.stdout, result.stderr, result.exit_code
    )
}

/// Write the report to `out`.
pub fn write_report<W: Write>(out: &mut W, result: &ExecutionResult) -> io::Result<()> {
    out.write_all(format_report(result).as_bytes())?;
    out.flush()
}

/// Write the report to stdout. Errors (e.g. a closed pipe) are returned, not panicked on.
pub fn print_report(result: &ExecutionResult) -> io::Result<()> {
    write_report(&mut io::stdout().lock(), result)
}
