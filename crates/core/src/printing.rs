//! OS print command abstraction.
//!
//! [`PrintCommand`] hides the shell-out behind a single method so the
//! dispatcher can be exercised with test doubles. [`LpPrintCommand`] is the
//! production implementation, spawning CUPS `lp` (or any configured program)
//! with the stored file path as the final argument.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::CoreError;

/// Default print program.
pub const DEFAULT_PRINT_COMMAND: &str = "lp";

/// Result of a single print invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// The command exited with status 0.
    Printed,
    /// The command could not be spawned or exited non-zero.
    Failed {
        /// Exit code, `None` if the process never ran or was killed by a signal.
        exit_code: Option<i32>,
        /// Captured stderr or spawn error.
        detail: String,
    },
}

/// Sends a stored file to the printer.
///
/// Implementations block until the print subsystem has accepted or rejected
/// the file. There is no timeout and no retry.
#[async_trait]
pub trait PrintCommand: Send + Sync {
    async fn print(&self, path: &Path) -> PrintOutcome;
}

/// Runs an external print program, e.g. `lp -d <printer> <path>`.
#[derive(Debug, Clone)]
pub struct LpPrintCommand {
    program: String,
    args: Vec<String>,
    printer: Option<String>,
}

impl LpPrintCommand {
    /// Build from a whitespace-separated command line such as `lp -o fit-to-page`.
    ///
    /// When `printer` is set, `-d <printer>` is appended before the file path.
    pub fn from_command_line(command_line: &str, printer: Option<String>) -> Result<Self, CoreError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| CoreError::Validation("Print command must not be empty".into()))?;

        Ok(Self {
            program,
            args: parts.collect(),
            printer: printer.filter(|p| !p.trim().is_empty()),
        })
    }

    /// Arguments passed to the program for `path`, in order.
    pub fn arguments_for(&self, path: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        if let Some(printer) = &self.printer {
            args.push("-d".to_string());
            args.push(printer.clone());
        }
        args.push(path.to_string_lossy().into_owned());
        args
    }
}

#[async_trait]
impl PrintCommand for LpPrintCommand {
    async fn print(&self, path: &Path) -> PrintOutcome {
        let args = self.arguments_for(path);
        tracing::info!(program = %self.program, ?args, "Running print command");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => PrintOutcome::Printed,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let detail = if stderr.is_empty() {
                    format!("{} exited with {}", self.program, output.status)
                } else {
                    stderr
                };
                PrintOutcome::Failed {
                    exit_code: output.status.code(),
                    detail,
                }
            }
            Err(e) => PrintOutcome::Failed {
                exit_code: None,
                detail: format!("Failed to spawn {}: {e}", self.program),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;

    use super::*;

    /// Write a shell script that records its arguments into `out`, then exits
    /// with `code`.
    fn recording_script(out: &Path, code: i32) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new()
            .suffix(".sh")
            .tempfile()
            .expect("create temp file");
        writeln!(f, "echo \"$@\" > '{}'", out.display()).expect("write body");
        writeln!(f, "echo 'printer on fire' >&2").expect("write body");
        writeln!(f, "exit {code}").expect("write body");
        f
    }

    #[test]
    fn empty_command_line_is_rejected() {
        assert_matches!(
            LpPrintCommand::from_command_line("   ", None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn printer_name_is_passed_before_path() {
        let cmd = LpPrintCommand::from_command_line("lp -o fit-to-page", Some("office".into()))
            .expect("command");
        assert_eq!(
            cmd.arguments_for(Path::new("/srv/uploads/a.pdf")),
            vec!["-o", "fit-to-page", "-d", "office", "/srv/uploads/a.pdf"]
        );
    }

    #[test]
    fn blank_printer_name_uses_default_printer() {
        let cmd = LpPrintCommand::from_command_line("lp", Some(" ".into())).expect("command");
        assert_eq!(cmd.arguments_for(Path::new("a.pdf")), vec!["a.pdf"]);
    }

    #[tokio::test]
    async fn zero_exit_is_printed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("args.txt");
        let script = recording_script(&out, 0);
        let cmd = LpPrintCommand::from_command_line(
            &format!("sh {}", script.path().display()),
            Some("kiosk".into()),
        )
        .expect("command");

        let outcome = cmd.print(Path::new("/tmp/report.pdf")).await;

        assert_eq!(outcome, PrintOutcome::Printed);
        let recorded = std::fs::read_to_string(&out).expect("args recorded");
        assert_eq!(recorded.trim(), "-d kiosk /tmp/report.pdf");
    }

    #[tokio::test]
    async fn non_zero_exit_is_failure_with_stderr() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = recording_script(&dir.path().join("args.txt"), 3);
        let cmd = LpPrintCommand::from_command_line(&format!("sh {}", script.path().display()), None)
            .expect("command");

        let outcome = cmd.print(Path::new("/tmp/report.pdf")).await;

        assert_matches!(
            outcome,
            PrintOutcome::Failed { exit_code: Some(3), detail } if detail == "printer on fire"
        );
    }

    #[tokio::test]
    async fn missing_program_is_failure() {
        let cmd = LpPrintCommand::from_command_line("definitely-not-a-print-program-xyz", None)
            .expect("command");
        let outcome = cmd.print(Path::new("a.pdf")).await;
        assert_matches!(outcome, PrintOutcome::Failed { exit_code: None, .. });
    }
}
