//! Execution bridge: builder -> transport -> normalizer as one async operation.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::languages::{self, LanguageDescriptor};
use crate::outcome::{normalize, ExecutionOutcome};
use crate::request::ExecutionRequest;
use crate::transport::{ExecutionTransport, RuntimeInfo};

/// Syntax-check verdict derived from a throwaway run with empty stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxReport {
    pub valid: bool,
    pub errors: Option<String>,
}

/// One expected-output test case for the case runner.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub case: usize,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub reports: Vec<CaseReport>,
}

/// Orchestrator over a transport. Every failure path resolves to a
/// displayable `ExecutionOutcome`; nothing escapes as an opaque error.
/// Concurrent runs are not deduplicated here; in-flight tracking is a
/// caller concern.
pub struct ExecutionBridge<T: ExecutionTransport> {
    transport: T,
    // Last successfully fetched runtime listing. Read-mostly, refreshed
    // opportunistically; stale reads only affect which languages the UI
    // offers, never the correctness of a submitted execution.
    runtime_cache: Mutex<Option<Vec<RuntimeInfo>>>,
}

impl<T: ExecutionTransport> ExecutionBridge<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            runtime_cache: Mutex::new(None),
        }
    }

    /// Run `source` under `language_id` with the default timeout.
    pub async fn run(
        &self,
        source: &str,
        language_id: &str,
        stdin: &str,
        args: Vec<String>,
    ) -> ExecutionOutcome {
        self.run_with_timeout(source, language_id, stdin, args, None)
            .await
    }

    /// Run with a caller-chosen round-trip budget in milliseconds.
    pub async fn run_with_timeout(
        &self,
        source: &str,
        language_id: &str,
        stdin: &str,
        args: Vec<String>,
        timeout_ms: Option<u64>,
    ) -> ExecutionOutcome {
        let request = match ExecutionRequest::build(source, language_id, stdin, args, timeout_ms) {
            Ok(request) => request,
            // Validation short-circuits before any network call.
            Err(err) => return ExecutionOutcome::unsupported(&err.0),
        };
        log::debug!(
            "executing {} ({} {}) with {} ms budget",
            request.file_name,
            request.language.runtime_name,
            request.language.runtime_version,
            request.timeout_ms
        );
        normalize(self.transport.execute(&request).await)
    }

    /// Registry listing, advisorily narrowed to runtimes the service reports
    /// as available. A failed live query falls back to the full static list.
    pub async fn list_languages(&self) -> Vec<&'static LanguageDescriptor> {
        let all: Vec<&'static LanguageDescriptor> = languages::list().iter().collect();
        match self.available_runtimes().await {
            Some(runtimes) => {
                let offered: Vec<&'static LanguageDescriptor> = all
                    .iter()
                    .copied()
                    .filter(|lang| runtime_available(lang, &runtimes))
                    .collect();
                if offered.is_empty() {
                    all
                } else {
                    offered
                }
            }
            None => all,
        }
    }

    /// Syntax validation via a run with empty stdin, as the service has no
    /// dedicated check endpoint.
    pub async fn check(&self, source: &str, language_id: &str) -> SyntaxReport {
        let outcome = self.run(source, language_id, "", vec![]).await;
        if outcome.status.is_success() {
            return SyntaxReport {
                valid: true,
                errors: None,
            };
        }
        let errors = outcome
            .compile_stage
            .as_ref()
            .map(|s| s.stderr.clone())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                outcome
                    .run_stage
                    .as_ref()
                    .map(|s| s.stderr.clone())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| outcome.message.clone());
        SyntaxReport {
            valid: false,
            errors: Some(errors),
        }
    }

    /// Run `source` once per test case, comparing trimmed stdout against the
    /// trimmed expectation.
    pub async fn run_cases(
        &self,
        source: &str,
        language_id: &str,
        cases: &[TestCase],
    ) -> CaseSummary {
        let mut reports = Vec::with_capacity(cases.len());
        let mut passed = 0;
        for (i, case) in cases.iter().enumerate() {
            let outcome = self.run(source, language_id, &case.input, vec![]).await;
            let actual = outcome
                .run_stage
                .as_ref()
                .map(|s| s.stdout.trim().to_string())
                .unwrap_or_default();
            let expected = case.expected_output.trim().to_string();
            let case_passed = outcome.status.is_success() && actual == expected;
            if case_passed {
                passed += 1;
            }
            reports.push(CaseReport {
                case: i + 1,
                passed: case_passed,
                expected,
                actual,
                message: outcome.message,
            });
        }
        CaseSummary {
            total: cases.len(),
            passed,
            failed: cases.len() - passed,
            reports,
        }
    }

    async fn available_runtimes(&self) -> Option<Vec<RuntimeInfo>> {
        if let Some(cached) = self.runtime_cache.lock().ok()?.clone() {
            return Some(cached);
        }
        match self.transport.runtimes().await {
            Ok(runtimes) => {
                if let Ok(mut cache) = self.runtime_cache.lock() {
                    *cache = Some(runtimes.clone());
                }
                Some(runtimes)
            }
            Err(failure) => {
                // Advisory only; the static registry remains authoritative.
                log::debug!("runtime listing unavailable, using static registry: {failure}");
                None
            }
        }
    }
}

fn runtime_available(lang: &LanguageDescriptor, runtimes: &[RuntimeInfo]) -> bool {
    runtimes.iter().any(|r| {
        r.language == lang.runtime_name || r.aliases.iter().any(|a| a == lang.runtime_name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(language: &str, aliases: &[&str]) -> RuntimeInfo {
        RuntimeInfo {
            language: language.to_string(),
            version: "1.0.0".to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn runtime_matching_checks_name_and_aliases() {
        let python = languages::resolve("python").unwrap();
        let runtimes = vec![runtime("python", &["py", "python3"])];
        assert!(runtime_available(python, &runtimes));

        let node_alias = vec![runtime("node", &["javascript", "js"])];
        let js = languages::resolve("javascript").unwrap();
        assert!(runtime_available(js, &node_alias));

        let rust = languages::resolve("rust").unwrap();
        assert!(!runtime_available(rust, &runtimes));
    }
}
