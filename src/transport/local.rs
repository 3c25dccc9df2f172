//! Local process execution with fully captured output.

use crate::core::types::{ExecutionResult, LaunchError};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Run `program args...` in `cwd`, blocking until it exits.
///
/// The child gets its own working directory; the caller's is left alone.
/// Both pipes are drained concurrently by `wait_with_output`, so large
/// outputs cannot deadlock the child.
pub fn exec_command(program: &str, args: &[String], cwd: &Path) -> Result<ExecutionResult, LaunchError> {
    let child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(program, cwd, e))?;

    let output = child.wait_with_output().map_err(|e| LaunchError::Spawn {
        program: program.to_string(),
        source: e,
    })?;

    Ok(ExecutionResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: exit_code(&output.status),
    })
}

/// Classify a spawn failure. The child's chdir and exec failures share
/// errno values, so `cwd` is re-checked to blame the right one.
fn spawn_error(program: &str, cwd: &Path, e: std::io::Error) -> LaunchError {
    let dir_unusable = matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied)
        && std::fs::read_dir(cwd).is_err();
    if dir_unusable {
        return LaunchError::DirectoryNotFound {
            path: cwd.to_path_buf(),
            reason: e.to_string(),
        };
    }
    if e.kind() == ErrorKind::NotFound {
        LaunchError::CommandNotFound {
            program: program.to_string(),
        }
    } else {
        LaunchError::Spawn {
            program: program.to_string(),
            source: e,
        }
    }
}

/// Exit code, or the negated signal number when killed by a signal.
fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return -sig;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_pi010_echo() {
        let dir = tempfile::tempdir().unwrap();
        let out = exec_command("sh", &sh("echo hello"), dir.path()).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(out.stderr, "");
    }

    #[test]
    fn test_pi010_failure_is_data() {
        let dir = tempfile::tempdir().unwrap();
        let out = exec_command("sh", &sh("exit 42"), dir.path()).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, 42);
    }

    #[test]
    fn test_pi010_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let out = exec_command("sh", &sh("printf err >&2"), dir.path()).unwrap();
        assert!(out.success());
        assert_eq!(out.stderr, "err");
        assert_eq!(out.stdout, "");
    }

    #[test]
    fn test_pi010_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.tf"), "").unwrap();
        let out = exec_command("sh", &sh("ls"), dir.path()).unwrap();
        assert_eq!(out.stdout.trim(), "main.tf");
    }

    #[test]
    fn test_pi010_args_not_reinterpreted() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec!["a b".to_string(), "$HOME".to_string()];
        let out = exec_command("echo", &args, dir.path()).unwrap();
        assert_eq!(out.stdout, "a b $HOME\n");
    }

    #[test]
    fn test_pi010_signal_killed() {
        let dir = tempfile::tempdir().unwrap();
        let out = exec_command("sh", &sh("kill -9 $$"), dir.path()).unwrap();
        assert_eq!(out.exit_code, -9);
    }

    #[test]
    fn test_pi010_command_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = exec_command("provinit-no-such-binary-xyz", &[], dir.path()).unwrap_err();
        assert!(matches!(err, LaunchError::CommandNotFound { .. }));
    }

    #[test]
    fn test_pi010_vanished_cwd_blames_directory() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");
        let err = exec_command("sh", &sh("true"), &gone).unwrap_err();
        match err {
            LaunchError::DirectoryNotFound { path, .. } => assert_eq!(path, gone),
            other => panic!("expected DirectoryNotFound, got: {}", other),
        }
    }

    #[test]
    fn test_pi010_large_output_both_streams() {
        let dir = tempfile::tempdir().unwrap();
        let script = "i=0; while [ $i -lt 3000 ]; do \
                      echo 'stdout line padding padding padding'; \
                      echo 'stderr line padding padding padding' >&2; \
                      i=$((i+1)); done";
        let out = exec_command("sh", &sh(script), dir.path()).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.lines().count(), 3000);
        assert_eq!(out.stderr.lines().count(), 3000);
        assert!(out.stdout.len() > 64 * 1024);
        assert!(out.stderr.len() > 64 * 1024);
    }
}
