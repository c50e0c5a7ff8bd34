//! Result normalizer: collapses raw service responses and transport failures
//! into one displayable outcome.

use serde::Serialize;

use crate::transport::{RawExecution, RawStage, TransportFailure};

/// Lines holding only this token are artifacts of the upstream response
/// shape, not program output, and are stripped from displayed stdout.
const PLACEHOLDER_LINE: &str = "undefined";

/// Discriminated outcome class for one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeStatus {
    Success,
    CompileError,
    RuntimeError,
    Timeout,
    TransportError,
    UnsupportedLanguage,
}

impl OutcomeStatus {
    /// Short machine-checkable tag used to prefix rendered output.
    pub fn tag(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "ok",
            OutcomeStatus::CompileError => "compile-error",
            OutcomeStatus::RuntimeError => "runtime-error",
            OutcomeStatus::Timeout => "timeout",
            OutcomeStatus::TransportError => "transport-error",
            OutcomeStatus::UnsupportedLanguage => "unsupported-language",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success)
    }
}

/// Captured output of one stage (compile or run).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub signal: Option<String>,
}

impl StageReport {
    fn from_raw(stage: &RawStage) -> Self {
        Self {
            stdout: clean_stdout(effective_stdout(stage)),
            stderr: stage.stderr.clone(),
            exit_code: stage.code,
            signal: stage.signal.clone(),
        }
    }
}

/// Normalized result of one execution attempt. `message` is always populated
/// so the UI has something to display on every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub status: OutcomeStatus,
    pub compile_stage: Option<StageReport>,
    pub run_stage: Option<StageReport>,
    pub message: String,
}

impl ExecutionOutcome {
    /// Outcome for a language id the registry does not know. Built by the
    /// bridge before any network call.
    pub fn unsupported(language_id: &str) -> Self {
        Self {
            status: OutcomeStatus::UnsupportedLanguage,
            compile_stage: None,
            run_stage: None,
            message: format!("Unsupported language: {language_id}"),
        }
    }
}

/// Map a raw response or transport failure to one terminal outcome. Pure;
/// equal inputs produce equal outcomes.
pub fn normalize(result: Result<RawExecution, TransportFailure>) -> ExecutionOutcome {
    let raw = match result {
        Err(TransportFailure::Timeout(ms)) => {
            return ExecutionOutcome {
                status: OutcomeStatus::Timeout,
                compile_stage: None,
                run_stage: None,
                message: if ms > 0 {
                    format!("Execution timed out after {ms} ms")
                } else {
                    "Execution timed out".to_string()
                },
            }
        }
        Err(failure) => {
            return ExecutionOutcome {
                status: OutcomeStatus::TransportError,
                compile_stage: None,
                run_stage: None,
                message: failure.to_string(),
            }
        }
        Ok(raw) => raw,
    };

    if let Some(compile) = raw.compile.as_ref() {
        if stage_failed(compile) {
            let report = StageReport::from_raw(compile);
            let message = match first_line(&report.stderr) {
                Some(line) => format!("Compilation failed: {line}"),
                None => format!(
                    "Compilation failed with exit code {}",
                    report.exit_code.unwrap_or(0)
                ),
            };
            return ExecutionOutcome {
                status: OutcomeStatus::CompileError,
                compile_stage: Some(report),
                run_stage: None,
                message,
            };
        }
    }

    let compile_stage = raw.compile.as_ref().map(StageReport::from_raw);

    let run = match raw.run.as_ref() {
        Some(run) => run,
        None => {
            return ExecutionOutcome {
                status: OutcomeStatus::TransportError,
                compile_stage,
                run_stage: None,
                message: "Execution service response is missing the run stage".to_string(),
            }
        }
    };
    let report = StageReport::from_raw(run);

    if stage_failed(run) {
        let message = match first_line(&report.stderr) {
            Some(line) => format!("Runtime error: {line}"),
            None => match report.signal.as_deref() {
                Some(sig) => format!("Process terminated by signal {sig}"),
                None => format!(
                    "Program exited with code {}",
                    report.exit_code.unwrap_or(0)
                ),
            },
        };
        return ExecutionOutcome {
            status: OutcomeStatus::RuntimeError,
            compile_stage,
            run_stage: Some(report),
            message,
        };
    }

    let message = if report.stdout.trim().is_empty() {
        "No output produced".to_string()
    } else {
        "Execution succeeded".to_string()
    };
    ExecutionOutcome {
        status: OutcomeStatus::Success,
        compile_stage,
        run_stage: Some(report),
        message,
    }
}

/// Non-zero exit code, any stderr content, or a terminating signal marks the
/// stage fatal. A missing exit code is treated as 0, matching how the service
/// omits it on success.
fn stage_failed(stage: &RawStage) -> bool {
    stage.code.unwrap_or(0) != 0 || !stage.stderr.is_empty() || stage.signal.is_some()
}

/// Some deployments put combined output under `output` and leave `stdout`
/// empty; prefer `stdout` when it has content.
fn effective_stdout(stage: &RawStage) -> &str {
    if stage.stdout.is_empty() && !stage.output.is_empty() {
        &stage.output
    } else {
        &stage.stdout
    }
}

/// Strip placeholder-only lines. Text without any placeholder line passes
/// through byte-for-byte so genuine trailing newlines survive.
fn clean_stdout(text: &str) -> String {
    if text.lines().any(|l| l == PLACEHOLDER_LINE) {
        text.lines()
            .filter(|l| *l != PLACEHOLDER_LINE)
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        text.to_string()
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_stage(stdout: &str, stderr: &str, code: i32) -> RawStage {
        RawStage {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            output: String::new(),
            code: Some(code),
            signal: None,
        }
    }

    #[test]
    fn clean_run_is_success_with_populated_message() {
        let raw = RawExecution {
            run: Some(run_stage("hi\n", "", 0)),
            ..Default::default()
        };
        let outcome = normalize(Ok(raw));
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.message, "Execution succeeded");
        assert_eq!(outcome.run_stage.unwrap().stdout, "hi\n");
    }

    #[test]
    fn success_without_output_says_so() {
        let raw = RawExecution {
            run: Some(run_stage("", "", 0)),
            ..Default::default()
        };
        let outcome = normalize(Ok(raw));
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.message, "No output produced");
    }

    #[test]
    fn placeholder_lines_are_filtered_from_stdout() {
        let raw = RawExecution {
            run: Some(run_stage("undefined\nHello\n", "", 0)),
            ..Default::default()
        };
        let outcome = normalize(Ok(raw));
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.run_stage.unwrap().stdout, "Hello");
    }

    #[test]
    fn stdout_without_placeholder_passes_through_unchanged() {
        let raw = RawExecution {
            run: Some(run_stage("hi\n", "", 0)),
            ..Default::default()
        };
        assert_eq!(normalize(Ok(raw)).run_stage.unwrap().stdout, "hi\n");
    }

    #[test]
    fn compile_stderr_yields_compile_error_without_run_stage() {
        let raw = RawExecution {
            compile: Some(run_stage("", "syntax error", 1)),
            ..Default::default()
        };
        let outcome = normalize(Ok(raw));
        assert_eq!(outcome.status, OutcomeStatus::CompileError);
        assert!(outcome.run_stage.is_none());
        assert_eq!(outcome.message, "Compilation failed: syntax error");
        assert_eq!(outcome.compile_stage.unwrap().stderr, "syntax error");
    }

    #[test]
    fn nonzero_exit_is_runtime_error_with_both_stages() {
        let raw = RawExecution {
            compile: Some(run_stage("", "", 0)),
            run: Some(run_stage("partial\n", "boom", 1)),
            ..Default::default()
        };
        let outcome = normalize(Ok(raw));
        assert_eq!(outcome.status, OutcomeStatus::RuntimeError);
        assert!(outcome.compile_stage.is_some());
        assert_eq!(outcome.message, "Runtime error: boom");
        assert_eq!(outcome.run_stage.unwrap().stdout, "partial\n");
    }

    #[test]
    fn stderr_with_zero_exit_is_still_fatal() {
        let raw = RawExecution {
            run: Some(run_stage("out\n", "warning treated as fatal", 0)),
            ..Default::default()
        };
        assert_eq!(normalize(Ok(raw)).status, OutcomeStatus::RuntimeError);
    }

    #[test]
    fn signal_termination_is_reported() {
        let raw = RawExecution {
            run: Some(RawStage {
                code: None,
                signal: Some("SIGKILL".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let outcome = normalize(Ok(raw));
        assert_eq!(outcome.status, OutcomeStatus::RuntimeError);
        assert_eq!(outcome.message, "Process terminated by signal SIGKILL");
        assert_eq!(outcome.run_stage.unwrap().signal.as_deref(), Some("SIGKILL"));
    }

    #[test]
    fn combined_output_field_is_adopted_when_stdout_empty() {
        let raw = RawExecution {
            run: Some(RawStage {
                output: "combined\n".to_string(),
                code: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(normalize(Ok(raw)).run_stage.unwrap().stdout, "combined\n");
    }

    #[test]
    fn timeout_failure_maps_to_timeout_status() {
        let outcome = normalize(Err(TransportFailure::Timeout(5_000)));
        assert_eq!(outcome.status, OutcomeStatus::Timeout);
        assert_eq!(outcome.message, "Execution timed out after 5000 ms");
        assert!(outcome.run_stage.is_none());
    }

    #[test]
    fn other_transport_failures_map_to_transport_error() {
        let outcome = normalize(Err(TransportFailure::Http {
            status: 500,
            message: "internal".to_string(),
            body: String::new(),
        }));
        assert_eq!(outcome.status, OutcomeStatus::TransportError);
        assert!(outcome.message.contains("500"));
    }

    #[test]
    fn missing_run_stage_is_a_transport_error() {
        let outcome = normalize(Ok(RawExecution::default()));
        assert_eq!(outcome.status, OutcomeStatus::TransportError);
        assert!(!outcome.message.is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = RawExecution {
            run: Some(run_stage("undefined\nHello\n", "", 0)),
            ..Default::default()
        };
        let first = normalize(Ok(raw.clone()));
        let second = normalize(Ok(raw));
        assert_eq!(first, second);
    }
}
