//! Frame capture.
//!
//! The camera is an external collaborator: [`CaptureCommand`] runs a
//! program (by default `fswebcam`) that writes a single PNG or JPEG frame to
//! stdout, once per call.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// Errors from a frame source.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture command is empty")]
    EmptyCommand,

    #[error("Failed to run capture command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Capture command exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("Capture command produced no image data")]
    EmptyFrame,
}

/// Produces one encoded camera frame per call.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self) -> Result<Vec<u8>, CaptureError>;
}

/// Captures frames by running an external command.
#[derive(Debug, Clone)]
pub struct CaptureCommand {
    program: String,
    args: Vec<String>,
}

impl CaptureCommand {
    /// Build from a whitespace-separated command line.
    pub fn from_command_line(command_line: &str) -> Result<Self, CaptureError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(CaptureError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl FrameSource for CaptureCommand {
    async fn capture(&self) -> Result<Vec<u8>, CaptureError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(CaptureError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(CaptureError::EmptyFrame);
        }
        Ok(output.stdout)
    }
}
