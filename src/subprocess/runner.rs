use super::{ExitStatus, ProcessCommand, ProcessError, ProcessOutput, ProcessRunner};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tracing::debug;

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    fn convert_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else {
            ExitStatus::Error(status.code().unwrap_or(-1))
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        debug!("executing: {} {}", command.program, command.args.join(" "));

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let output_future = cmd.output();
        let output = match command.timeout {
            Some(limit) => tokio::time::timeout(limit, output_future)
                .await
                .map_err(|_| ProcessError::Timeout(limit))?,
            None => output_future.await,
        }
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcessError::CommandNotFound(command.program.clone())
            } else {
                ProcessError::Io(e)
            }
        })?;

        Ok(ProcessOutput {
            status: Self::convert_exit_status(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: start.elapsed(),
        })
    }
}
