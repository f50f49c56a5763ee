use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tubecast::transcode::{CommandOutput, CommandRunner, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remux {
    /// Copy input to output, like a successful `-c copy` run.
    Copy,
    /// Write a partial output, then exit non-zero.
    Fail,
    /// Write a partial output, then never return.
    Hang,
}

/// Stands in for ffmpeg/ffprobe.
pub struct FakeTools {
    remux: Remux,
    probe_stdout: String,
    probed: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeTools {
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self::with_probe_output(format!(
            r#"{{"streams":[{{"index":0,"codec_type":"video","codec_name":"h264","width":{},"height":{}}}]}}"#,
            width, height
        ))
    }

    pub fn with_probe_output(stdout: impl Into<String>) -> Self {
        Self {
            remux: Remux::Copy,
            probe_stdout: stdout.into(),
            probed: Arc::default(),
        }
    }

    /// Paths handed to ffprobe, readable after the fake moves into the app.
    pub fn probed(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        self.probed.clone()
    }

    pub fn remux(mut self, remux: Remux) -> Self {
        self.remux = remux;
        self
    }
}

fn arg_after(args: &[OsString], flag: &str) -> Option<PathBuf> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

#[async_trait]
impl CommandRunner for FakeTools {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, ToolError> {
        match program {
            "ffmpeg" => {
                let input = arg_after(args, "-i").expect("ffmpeg input");
                let output = PathBuf::from(args.last().expect("ffmpeg output"));
                match self.remux {
                    Remux::Copy => {
                        tokio::fs::copy(&input, &output).await.expect("copy");
                        Ok(CommandOutput::default())
                    }
                    Remux::Fail => {
                        tokio::fs::write(&output, b"partial").await.expect("write");
                        Err(ToolError::Failed {
                            program: program.to_string(),
                            status: "exit status: 1".to_string(),
                            stderr: "moov atom not found".to_string(),
                        })
                    }
                    Remux::Hang => {
                        tokio::fs::write(&output, b"partial").await.expect("write");
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok(CommandOutput::default())
                    }
                }
            }
            "ffprobe" => {
                let path = PathBuf::from(args.last().expect("ffprobe input"));
                self.probed.lock().unwrap().push(path);
                Ok(CommandOutput {
                    stdout: self.probe_stdout.clone().into_bytes(),
                    stderr: Vec::new(),
                })
            }
            other => Err(ToolError::NotFound {
                program: other.to_string(),
            }),
        }
    }
}
