//! Wrappers around ffmpeg and ffprobe.
//!
//! Both tools run as child processes through a [`CommandRunner`], bounded by
//! the configured timeout. A timed-out child is killed when its future is
//! dropped.

use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

mod faststart;
mod probe;
mod runner;

pub use faststart::{ProcessedFile, processed_path};
pub use probe::{InspectError, Orientation, classify};
pub use runner::{CommandOutput, CommandRunner, SystemCommandRunner, ToolError};

#[derive(Clone)]
pub struct Toolchain {
    runner: Arc<dyn CommandRunner>,
    ffmpeg: String,
    ffprobe: String,
    timeout: Duration,
}

impl Toolchain {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        ffmpeg: impl Into<String>,
        ffprobe: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            timeout,
        }
    }

    async fn invoke(&self, program: &str, args: Vec<OsString>) -> Result<CommandOutput, ToolError> {
        match tokio::time::timeout(self.timeout, self.runner.run(program, &args)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(program, timeout = ?self.timeout, "external tool timed out, killed");
                Err(ToolError::TimedOut {
                    program: program.to_string(),
                    after: self.timeout,
                })
            }
        }
    }
}
