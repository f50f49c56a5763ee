use super::{Toolchain, ToolError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Remuxer output. Deleted on drop, like the staged input it came from.
#[derive(Debug)]
pub struct ProcessedFile {
    path: PathBuf,
}

impl ProcessedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProcessedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "couldn't remove processed file"),
        }
    }
}

/// Sibling of `input` that the remuxer writes to.
pub fn processed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".processing");
    PathBuf::from(name)
}

impl Toolchain {
    /// Rewrites `input` with the moov atom up front.
    ///
    /// Every stream is copied as-is; nothing is re-encoded. `input` is left
    /// untouched.
    pub async fn remux(&self, input: &Path) -> Result<ProcessedFile, ToolError> {
        // Own the output path before ffmpeg runs so a partial file from a
        // failed or cancelled run is removed too.
        let output = ProcessedFile {
            path: processed_path(input),
        };

        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            input.into(),
            "-map".into(),
            "0".into(),
            "-c".into(),
            "copy".into(),
            "-movflags".into(),
            "faststart".into(),
            "-f".into(),
            "mp4".into(),
            output.path().into(),
        ];
        self.invoke(&self.ffmpeg, args).await?;

        info!(path = %output.path().display(), "remuxed for fast start");
        Ok(output)
    }
}
