use super::{Toolchain, ToolError};
use serde::Deserialize;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("unreadable ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no video stream reported")]
    NoVideoStream,

    #[error("video stream has no width/height")]
    MissingDimensions,
}

/// Frame geometry bucket, used as the storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    pub fn prefix(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

pub fn classify(width: u64, height: u64) -> Orientation {
    if width > height {
        Orientation::Landscape
    } else if width < height {
        Orientation::Portrait
    } else {
        Orientation::Other
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u64>,
    height: Option<u64>,
}

fn orientation_from_probe(stdout: &[u8]) -> Result<Orientation, InspectError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)?;
    let stream = probe.streams.first().ok_or(InspectError::NoVideoStream)?;
    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(classify(width, height)),
        _ => Err(InspectError::MissingDimensions),
    }
}

impl Toolchain {
    /// Classifies the first video stream of the file at `path`.
    pub async fn inspect(&self, path: &Path) -> Result<Orientation, InspectError> {
        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-select_streams".into(),
            "v:0".into(),
            "-print_format".into(),
            "json".into(),
            "-show_streams".into(),
            path.into(),
        ];
        let output = self.invoke(&self.ffprobe, args).await?;

        let orientation = orientation_from_probe(&output.stdout)?;
        debug!(path = %path.display(), %orientation, "classified video");
        Ok(orientation)
    }
}
