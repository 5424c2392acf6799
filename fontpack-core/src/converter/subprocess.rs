//! Local-executable converter transport.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::batch::UploadedFont;
use crate::converter::FontConverter;
use crate::error::{ConvertError, Result};
use crate::format::TargetFormat;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Invokes an external program once per file with two path arguments:
/// `<program> [base args..] <input path> <output path>`.
///
/// The target format is implied by the output path's extension. Exit code
/// zero means the output file holds the converted bytes; anything else is a
/// failure, with the program's stderr as the diagnostic.
///
/// Each conversion gets its own uniquely named directory under `workdir`,
/// removed best-effort when the job ends, success or failure.
pub struct SubprocessConverter {
    program: String,
    args: Vec<String>,
    workdir: PathBuf,
    timeout: Duration,
}

impl SubprocessConverter {
    pub fn new(program: impl Into<String>) -> Self {
        SubprocessConverter {
            program: program.into(),
            args: Vec::new(),
            workdir: std::env::temp_dir(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build from a whitespace-separated command line, e.g.
    /// `"python3 convert_font.py"`.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            ConvertError::ConverterUnavailable("empty converter command".to_string())
        })?;
        Ok(SubprocessConverter::new(program).with_args(parts.map(str::to_string)))
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Root directory for per-job temp directories. Defaults to the system
    /// temp dir; tests point this at a fixture directory.
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Bounded wait for one conversion; the child is killed on expiry.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl FontConverter for SubprocessConverter {
    async fn convert(&self, font: &UploadedFont, target: TargetFormat) -> Result<Vec<u8>> {
        let dir = tempfile::Builder::new()
            .prefix("fontpack-")
            .tempdir_in(&self.workdir)?;

        let input_ext = font.extension().unwrap_or("font");
        let input_path = dir.path().join(format!("input.{input_ext}"));
        let output_path = dir.path().join(format!("output.{}", target.extension()));

        tokio::fs::write(&input_path, &font.data).await?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(&input_path)
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(program = %self.program, file = %font.name, "spawning converter");

        let mut child = command.spawn().map_err(|e| {
            ConvertError::ConverterUnavailable(format!(
                "failed to spawn '{}': {e}",
                self.program
            ))
        })?;

        // Drain stderr while waiting so a chatty converter can't fill the
        // pipe and deadlock against our wait.
        let mut stderr_pipe = child.stderr.take();
        let mut stderr = Vec::new();
        let wait = async {
            let drain = async {
                if let Some(pipe) = stderr_pipe.as_mut() {
                    let _ = pipe.read_to_end(&mut stderr).await;
                }
            };
            let (status, ()) = tokio::join!(child.wait(), drain);
            status
        };

        let status = match tokio::time::timeout(self.timeout, wait).await {
            Ok(status) => status?,
            // kill_on_drop reaps the stuck child when it goes out of scope.
            Err(_) => {
                return Err(ConvertError::Timeout {
                    file: font.name.clone(),
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        if !status.success() {
            let message = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(ConvertError::Conversion {
                file: font.name.clone(),
                message: if message.is_empty() {
                    "font conversion failed".to_string()
                } else {
                    message
                },
            });
        }

        let data = tokio::fs::read(&output_path).await?;

        // Cleanup is best-effort; a stubborn temp dir must not fail the job.
        if let Err(e) = dir.close() {
            debug!(error = %e, "failed to remove conversion temp dir");
        }

        Ok(data)
    }
}
