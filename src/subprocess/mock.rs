use super::{ExitStatus, ProcessCommand, ProcessError, ProcessOutput, ProcessRunner};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays queued outputs and records every command it was asked to run.
/// With an empty queue it reports success with empty output.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    responses: Arc<Mutex<VecDeque<ProcessOutput>>>,
    call_history: Arc<Mutex<Vec<ProcessCommand>>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_response(&self, output: ProcessOutput) {
        self.responses.lock().unwrap().push_back(output);
    }

    pub fn queue_failure(&self, code: i32, stderr: &str) {
        self.queue_response(ProcessOutput {
            status: ExitStatus::Error(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
            duration: Duration::from_millis(10),
        });
    }

    pub fn call_history(&self) -> Vec<ProcessCommand> {
        self.call_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.call_history.lock().unwrap().push(command);
        let output = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ProcessOutput {
                status: ExitStatus::Success,
                stdout: String::new(),
                stderr: String::new(),
                duration: Duration::from_millis(10),
            });
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_replays_queue() {
        let runner = MockProcessRunner::new();
        runner.queue_failure(2, "boom");

        let first = runner.run(ProcessCommand::new("conv")).await.unwrap();
        let second = runner.run(ProcessCommand::new("conv")).await.unwrap();

        assert_eq!(first.status, ExitStatus::Error(2));
        assert!(second.status.success());
        assert_eq!(runner.call_history().len(), 2);
    }
}
