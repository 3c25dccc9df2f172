//! Configuration, execution result, launch error and provenance event types.
//!
//! Config types derive Serialize/Deserialize for YAML roundtripping;
//! events serialize to tagged JSON for the append-only event log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// provinit.yaml
// ============================================================================

/// Root configuration — what to run and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitConfig {
    /// Schema version (must be "1.0")
    #[serde(default = "default_version")]
    pub version: String,

    /// Provisioning project root the command runs in
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// External command to launch
    #[serde(default)]
    pub command: CommandSpec,

    /// Append-only JSONL event log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            working_dir: default_working_dir(),
            command: CommandSpec::default(),
            event_log: None,
        }
    }
}

/// Program name (resolved via `PATH`) plus a fixed argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

impl Default for CommandSpec {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_program() -> String {
    "terraform".to_string()
}

fn default_args() -> Vec<String> {
    vec!["init".to_string()]
}

// ============================================================================
// Execution result
// ============================================================================

/// Captured outcome of one child process run to completion.
///
/// A non-zero `exit_code` is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

// ============================================================================
// Launch errors
// ============================================================================

/// Failure to get a child process running at all.
#[derive(Debug)]
pub enum LaunchError {
    /// Working directory missing, inaccessible, or not a directory.
    DirectoryNotFound { path: PathBuf, reason: String },
    /// Program not found on `PATH`.
    CommandNotFound { program: String },
    /// Any other spawn or wait failure.
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::DirectoryNotFound { path, reason } => {
                write!(f, "working directory {}: {}", path.display(), reason)
            }
            LaunchError::CommandNotFound { program } => {
                write!(f, "command not found: {}", program)
            }
            LaunchError::Spawn { program, source } => {
                write!(f, "failed to run {}: {}", program, source)
            }
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Provenance events
// ============================================================================

/// One entry in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProvenanceEvent {
    InitStarted {
        run_id: String,
        working_dir: String,
        program: String,
        args: Vec<String>,
        provinit_version: String,
    },
    InitCompleted {
        run_id: String,
        exit_code: i32,
        duration_seconds: f64,
        stdout_hash: String,
        stderr_hash: String,
    },
    InitFailed {
        run_id: String,
        error: String,
    },
}

impl ProvenanceEvent {
    pub fn run_id(&self) -> &str {
        match self {
            ProvenanceEvent::InitStarted { run_id, .. }
            | ProvenanceEvent::InitCompleted { run_id, .. }
            | ProvenanceEvent::InitFailed { run_id, .. } => run_id,
        }
    }
}

/// Timestamped event wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub ts: String,
    #[serde(flatten)]
    pub event: ProvenanceEvent,
}
