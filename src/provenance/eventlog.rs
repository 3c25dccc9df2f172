//! Append-only JSONL run log.

use crate::core::types::{ProvenanceEvent, TimestampedEvent};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Current UTC time as ISO 8601, second precision.
pub fn now_iso8601() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_iso8601(secs)
}

/// Format seconds since the Unix epoch as `YYYY-MM-DDTHH:MM:SSZ`.
fn format_iso8601(epoch_secs: u64) -> String {
    let days = (epoch_secs / 86_400) as i64;
    let tod = epoch_secs % 86_400;
    let (y, m, d) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        y,
        m,
        d,
        tod / 3600,
        (tod % 3600) / 60,
        tod % 60
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    // Shift the epoch to 0000-03-01 so leap days fall at the end of a year.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m, d)
}

/// Generate a run ID.
pub fn generate_run_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("r-{:012x}", nanos & 0xFFFF_FFFF_FFFF)
}

/// Append an event to the log at `path`, creating parent directories.
pub fn append_event(path: &Path, event: ProvenanceEvent) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("cannot create dir {}: {}", parent.display(), e))?;
        }
    }

    let te = TimestampedEvent {
        ts: now_iso8601(),
        event,
    };
    let json = serde_json::to_string(&te).map_err(|e| format!("JSON serialize error: {}", e))?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("cannot open event log {}: {}", path.display(), e))?;

    writeln!(file, "{}", json).map_err(|e| format!("write error: {}", e))?;

    Ok(())
}

/// Read every event from a log. A missing file is an empty log.
pub fn read_events(path: &Path) -> Result<Vec<TimestampedEvent>, String> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open event log {}: {}", path.display(), e))?;

    let mut events = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| format!("read error {}: {}", path.display(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let te: TimestampedEvent = serde_json::from_str(&line)
            .map_err(|e| format!("{}:{}: invalid event: {}", path.display(), i + 1, e))?;
        events.push(te);
    }
    Ok(events)
}

/// How a logged run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed { exit_code: i32, duration_seconds: f64 },
    Failed { error: String },
    /// Started but never finished (process died mid-run).
    Incomplete,
}

/// One run reconstructed from its events.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: String,
    pub command: String,
    pub working_dir: String,
    pub outcome: RunOutcome,
}

/// Group events into runs, in the order the runs started.
/// Events whose run has no `init_started` record are ignored.
pub fn summarize_runs(events: &[TimestampedEvent]) -> Vec<RunSummary> {
    let mut runs: Vec<RunSummary> = Vec::new();
    for te in events {
        match &te.event {
            ProvenanceEvent::InitStarted {
                run_id,
                working_dir,
                program,
                args,
                ..
            } => {
                let mut command = program.clone();
                for a in args {
                    command.push(' ');
                    command.push_str(a);
                }
                runs.push(RunSummary {
                    run_id: run_id.clone(),
                    started_at: te.ts.clone(),
                    command,
                    working_dir: working_dir.clone(),
                    outcome: RunOutcome::Incomplete,
                });
            }
            ProvenanceEvent::InitCompleted {
                run_id,
                exit_code,
                duration_seconds,
                ..
            } => {
                if let Some(run) = runs.iter_mut().rev().find(|r| &r.run_id == run_id) {
                    run.outcome = RunOutcome::Completed {
                        exit_code: *exit_code,
                        duration_seconds: *duration_seconds,
                    };
                }
            }
            ProvenanceEvent::InitFailed { run_id, error } => {
                if let Some(run) = runs.iter_mut().rev().find(|r| &r.run_id == run_id) {
                    run.outcome = RunOutcome::Failed {
                        error: error.clone(),
                    };
                }
            }
        }
    }
    runs
}
