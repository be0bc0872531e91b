//! Out-of-process Python runner with a hard wall-clock limit.

use std::io::{Read, Write as _};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use wait_timeout::ChildExt;

use super::{CodeRunResult, CodeRunner, RuntimeErrorInfo};
use crate::error::{Result, TieError};
use crate::runtime::PreprocessedProgram;

/// Runs the generated program under `python3`, kills it when the time
/// budget is exceeded, and parses the harness JSON from stdout.
pub struct SubprocessRunner {
    python_bin: String,
    timeout: Duration,
}

impl SubprocessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self::with_python("python3", timeout)
    }

    pub fn with_python(python_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            python_bin: python_bin.into(),
            timeout,
        }
    }
}

impl CodeRunner for SubprocessRunner {
    fn run(&self, program: &PreprocessedProgram) -> Result<CodeRunResult> {
        let mut file = tempfile::Builder::new()
            .prefix("tie-program-")
            .suffix(".py")
            .tempfile()?;
        file.write_all(program.source.as_bytes())?;
        file.flush()?;

        let mut child = Command::new(&self.python_bin)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TieError::runner(format!("failed to spawn {}: {}", self.python_bin, e)))?;

        let stdout_handle = spawn_reader(child.stdout.take());
        let stderr_handle = spawn_reader(child.stderr.take());

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                child.kill()?;
                child.wait()?;
                let _ = stdout_handle.join();
                let _ = stderr_handle.join();
                tracing::debug!(timeout_secs = self.timeout.as_secs(), "run killed at time budget");
                return Ok(CodeRunResult::timed_out());
            }
        };

        let stdout = join_reader(stdout_handle);
        let stderr = join_reader(stderr_handle);
        tracing::trace!(exit = ?status.code(), stdout_len = stdout.len(), "run finished");

        parse_run_output(program, &stdout, &stderr, status.success())
    }
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut reader) = source {
            let _ = reader.read_to_end(&mut buf);
        }
        buf
    })
}

fn join_reader(handle: thread::JoinHandle<Vec<u8>>) -> String {
    String::from_utf8_lossy(&handle.join().unwrap_or_default()).into_owned()
}

/// Shape of the JSON document the harness prints after the marker line.
#[derive(Debug, Deserialize)]
struct HarnessOutput {
    #[serde(default)]
    observed_outputs: Vec<Vec<Vec<Value>>>,
    #[serde(default)]
    buggy_output_results: Vec<Vec<bool>>,
    #[serde(default)]
    performance_results: Vec<Vec<String>>,
    #[serde(default)]
    runtime_error: Option<RuntimeErrorInfo>,
    #[serde(default)]
    error_input: Option<Value>,
}

pub(crate) fn parse_run_output(
    program: &PreprocessedProgram,
    stdout: &str,
    stderr: &str,
    exited_cleanly: bool,
) -> Result<CodeRunResult> {
    let Some(marker_pos) = stdout.find(&program.results_marker) else {
        if exited_cleanly {
            return Err(TieError::runner("harness produced no results document"));
        }
        // The interpreter rejected the program before the harness ran,
        // typically a syntax error in the submission.
        return Ok(CodeRunResult {
            stdout: stdout.to_string(),
            runtime_error: Some(error_from_stderr(stderr)),
            ..CodeRunResult::default()
        });
    };

    let json_text = stdout[marker_pos + program.results_marker.len()..].trim();
    let harness: HarnessOutput = serde_json::from_str(json_text)
        .map_err(|e| TieError::runner(format!("unparsable harness output: {}", e)))?;

    Ok(CodeRunResult {
        stdout: stdout[..marker_pos].to_string(),
        observed_outputs: harness.observed_outputs,
        buggy_output_results: harness.buggy_output_results,
        performance_results: harness.performance_results,
        runtime_error: harness.runtime_error,
        error_input: harness.error_input,
        timed_out: false,
    })
}

fn stderr_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"line (\d+)").unwrap_or_else(|_| unreachable!()))
}

fn error_from_stderr(stderr: &str) -> RuntimeErrorInfo {
    let message = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("the program could not be run")
        .trim()
        .to_string();
    let line_number = stderr_line_regex()
        .captures_iter(stderr)
        .last()
        .and_then(|c| c[1].parse().ok());
    RuntimeErrorInfo {
        message,
        line_number,
    }
}
