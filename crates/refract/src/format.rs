//! Prettier-backed formatter.

use std::process::Stdio;
use std::time::Duration;

use refract_adapters::Target;
use refract_pipeline::{FormatError, Formatter};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime::Handle;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pipes generated files through `npx prettier`.
///
/// Called from rayon workers, so each call blocks on the runtime through a
/// handle rather than an `.await`.
pub struct PrettierFormatter {
    handle: Handle,
    program: String,
    timeout: Duration,
}

impl PrettierFormatter {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            program: "npx".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: &str, timeout: Duration) -> Self {
        self.program = program.to_string();
        self.timeout = timeout;
        self
    }

    async fn run(&self, text: &str, target: Target) -> Result<String, FormatError> {
        let mut child = Command::new(&self.program)
            .args(["prettier", "--stdin-filepath"])
            .arg(format!("component.{}", target.extension()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FormatError::new(format!("Failed to start {}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| FormatError::new(format!("Failed to write to formatter: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| FormatError::new(format!("Waiting for formatter: {e}")))?;
        if !output.status.success() {
            return Err(FormatError::new(format!(
                "Formatter exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| FormatError::new(format!("Formatter produced invalid UTF-8: {e}")))
    }
}

impl Formatter for PrettierFormatter {
    fn format(&self, text: &str, target: Target) -> Result<String, FormatError> {
        self.handle.block_on(async {
            match tokio::time::timeout(self.timeout, self.run(text, target)).await {
                Ok(result) => result,
                Err(_) => Err(FormatError::new(format!(
                    "Formatter timed out after {}s",
                    self.timeout.as_secs()
                ))),
            }
        })
    }
}
