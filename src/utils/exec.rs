//! External command execution.
//!
//! Runs an external tool (the SCSS compiler) with captured output and
//! error reporting. The command is configured as a vector whose first
//! element is the program and the rest are leading arguments.

use crate::log;
use anyhow::{Context, Result, bail};
use std::{
    path::Path,
    process::{Command, Output},
};

/// Execute a command and capture its output.
///
/// # Errors
/// Returns error if the command fails to execute or exits non-zero.
pub fn exec(cmd: &[String], args: &[&str], cwd: Option<&Path>) -> Result<Output> {
    let name = cmd.first().context("Empty command")?;

    let mut command = Command::new(name);
    command.args(&cmd[1..]).args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    if !output.status.success() {
        bail!(format_error(name, &output));
    }

    // On success, only surface stderr (warnings) to reduce noise
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        log!(name; "{stderr}");
    }

    Ok(output)
}

/// Format a command failure with its captured output.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);
    if !stderr.trim().is_empty() {
        msg.push_str(stderr.trim());
    }
    if !stdout.trim().is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout.trim());
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
