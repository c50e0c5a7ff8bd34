//! Execution request construction: validate the language, then build the payload.

use thiserror::Error;

use crate::languages::{self, LanguageDescriptor};

/// Round-trip budget applied when the caller does not pick one.
pub const DEFAULT_TIMEOUT_MS: u64 = 25_000;

/// The requested language id is not in the registry. Raised before any
/// network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

/// A validated, fully resolved execution request. Built fresh per run and
/// never persisted.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub source_text: String,
    pub language: &'static LanguageDescriptor,
    pub file_name: String,
    pub stdin: String,
    pub args: Vec<String>,
    pub timeout_ms: u64,
}

impl ExecutionRequest {
    /// Resolve `language_id` and assemble the request. Fails with
    /// `UnsupportedLanguage` on an unknown id so callers surface a clear
    /// validation error instead of a confusing transport error.
    pub fn build(
        source_text: impl Into<String>,
        language_id: &str,
        stdin: impl Into<String>,
        args: Vec<String>,
        timeout_ms: Option<u64>,
    ) -> Result<Self, UnsupportedLanguage> {
        let language = languages::resolve(language_id)
            .ok_or_else(|| UnsupportedLanguage(language_id.to_string()))?;
        Ok(Self {
            source_text: source_text.into(),
            language,
            file_name: format!("main.{}", language.file_extension),
            stdin: stdin.into(),
            args,
            timeout_ms: timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_resolved_runtime_and_filename() {
        let req = ExecutionRequest::build("print('hi')", "python", "", vec![], None).unwrap();
        assert_eq!(req.language.runtime_name, "python");
        assert_eq!(req.file_name, "main.py");
        assert_eq!(req.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(req.source_text, "print('hi')");
    }

    #[test]
    fn alias_resolves_before_building() {
        let req = ExecutionRequest::build("console.log(1)", "js", "", vec![], Some(5_000)).unwrap();
        assert_eq!(req.language.id, "javascript");
        assert_eq!(req.file_name, "main.js");
        assert_eq!(req.timeout_ms, 5_000);
    }

    #[test]
    fn unknown_language_fails_with_offending_id() {
        let err = ExecutionRequest::build("x", "not-a-real-language", "", vec![], None)
            .unwrap_err();
        assert_eq!(err, UnsupportedLanguage("not-a-real-language".to_string()));
    }

    #[test]
    fn empty_source_is_accepted() {
        let req = ExecutionRequest::build("", "python", "", vec![], None).unwrap();
        assert!(req.source_text.is_empty());
    }
}
