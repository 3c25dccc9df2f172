//! YAML parsing and validation for provinit.yaml.
//!
//! Validates structural constraints:
//! - Version must be "1.0"
//! - Working directory and program must be non-empty
//! - Arguments must not contain NUL bytes

use super::types::*;
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse a provinit.yaml file from disk.
pub fn parse_config_file(path: &Path) -> Result<InitConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_config(&content)
}

/// Parse a provinit.yaml from a string. An empty document yields the defaults.
pub fn parse_config(yaml: &str) -> Result<InitConfig, String> {
    if yaml.trim().is_empty() {
        return Ok(InitConfig::default());
    }
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed config. Returns a list of errors (empty = valid).
pub fn validate_config(config: &InitConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(ValidationError {
            message: format!("version must be \"1.0\", got \"{}\"", config.version),
        });
    }

    if config.working_dir.as_os_str().is_empty() {
        errors.push(ValidationError {
            message: "working_dir must not be empty".to_string(),
        });
    }

    if config.command.program.trim().is_empty() {
        errors.push(ValidationError {
            message: "command.program must not be empty".to_string(),
        });
    }
    if config.command.program.contains('\0') {
        errors.push(ValidationError {
            message: "command.program contains a NUL byte".to_string(),
        });
    }

    for (i, arg) in config.command.args.iter().enumerate() {
        if arg.contains('\0') {
            errors.push(ValidationError {
                message: format!("command.args[{}] contains a NUL byte", i),
            });
        }
    }

    if let Some(log) = &config.event_log {
        if log.as_os_str().is_empty() {
            errors.push(ValidationError {
                message: "event_log must not be empty when set".to_string(),
            });
        }
    }

    errors
}
