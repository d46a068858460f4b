//! External-tool invocation seam.
//!
//! Production code spawns the real binaries via [`Subprocess`]; tests record
//! invocations instead. Exit codes of the invoked tools are not inspected;
//! only a failure to spawn at all is an error.

use std::process::Command;

use crate::error::{io_err, SyncError};

/// Runs one external command to completion.
pub trait ToolRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<(), SyncError>;
}

/// [`ToolRunner`] backed by `std::process::Command`.
///
/// Binaries are resolved via `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Subprocess;

impl ToolRunner for Subprocess {
    fn run(&self, program: &str, args: &[String]) -> Result<(), SyncError> {
        tracing::debug!("running {program} {}", args.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| io_err(program, e))?;
        if !status.success() {
            tracing::debug!("{program} exited with {status}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_exit_is_not_an_error() {
        let runner = Subprocess;
        runner
            .run("false", &[])
            .expect("nonzero exit must be ignored");
    }

    #[test]
    fn missing_binary_is_an_io_error() {
        let runner = Subprocess;
        let err = runner
            .run("aptsnap-no-such-binary", &[])
            .expect_err("spawn failure must surface");
        assert!(matches!(err, SyncError::Io { .. }));
    }
}
