// src/sandbox.rs

//! HTTP client for the external code-execution sandbox (Piston-style API).
//!
//! The sandbox runs untrusted submitted code and returns stdout/stderr for
//! the run and compile stages. Failures are always localized to the test
//! case being graded: a timeout or network error marks that case failed and
//! the remaining cases still run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{SANDBOX_COMPILE_TIMEOUT_MS, SANDBOX_HTTP_TIMEOUT_MS, SANDBOX_RUN_TIMEOUT_MS};
use crate::harness::{self, Language};
use crate::models::assessment::TestCaseResult;
use crate::models::question::TestCase;

#[derive(Clone)]
pub struct SandboxClient {
    http: reqwest::Client,
    execute_url: String,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<FileSpec>,
    compile_timeout: u64,
    run_timeout: u64,
}

#[derive(Serialize)]
struct FileSpec {
    name: String,
    content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub run: Option<StageOutput>,
    #[serde(default)]
    pub compile: Option<StageOutput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StageOutput {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub code: Option<i64>,
}

/// Outcome of running one submission against a set of test cases.
#[derive(Debug)]
pub struct TestRun {
    /// Stdout/stderr of the first case, echoed to the editor console.
    pub output: String,
    pub results: Vec<TestCaseResult>,
    pub passed: usize,
    pub total: usize,
}

/// Pure pass/fail judgement for one case: trimmed exact stdout match, and
/// any stderr (run or compile) forces a failure regardless of stdout.
fn judge(stdout: &str, stderr: &str, expected: &str) -> (bool, String) {
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    let passed = stdout == expected.trim() && stderr.is_empty();
    let actual = if !stdout.is_empty() {
        stdout.to_string()
    } else if !stderr.is_empty() {
        format!("Error: {}", stderr)
    } else {
        "No output".to_string()
    };
    (passed, actual)
}

impl SandboxClient {
    pub fn new(execute_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(SANDBOX_HTTP_TIMEOUT_MS))
            .build()
            .unwrap_or_default();

        Self {
            http,
            execute_url: execute_url.into(),
        }
    }

    /// Dispatches one complete program to the sandbox.
    async fn execute(&self, language: Language, source: String) -> Result<ExecuteResponse, String> {
        let req = ExecuteRequest {
            language: language.sandbox_name(),
            version: language.sandbox_version(),
            files: vec![FileSpec {
                name: language.file_name().to_string(),
                content: source,
            }],
            compile_timeout: SANDBOX_COMPILE_TIMEOUT_MS,
            run_timeout: SANDBOX_RUN_TIMEOUT_MS,
        };

        let res = self
            .http
            .post(&self.execute_url)
            .json(&req)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("sandbox HTTP {}: {}", status, body));
        }

        res.json::<ExecuteResponse>().await.map_err(|e| e.to_string())
    }

    /// Runs the submitted code against every test case, one sandbox call
    /// per case. Total latency scales linearly with case count; cases are
    /// independent and a sibling's failure never aborts the rest.
    pub async fn run_test_cases(
        &self,
        language: Language,
        code: &str,
        cases: &[TestCase],
    ) -> TestRun {
        let mut results = Vec::with_capacity(cases.len());
        let mut output = String::new();

        for (i, case) in cases.iter().enumerate() {
            let program = harness::wrap(language, code, &case.input);
            let expected = case.expected_output.trim().to_string();

            let (passed, actual) = match self.execute(language, program).await {
                Ok(resp) => {
                    let run = resp.run.unwrap_or_default();
                    let compile_stderr = resp.compile.map(|c| c.stderr).unwrap_or_default();
                    let stderr = if run.stderr.trim().is_empty() {
                        compile_stderr
                    } else {
                        run.stderr.clone()
                    };
                    if i == 0 {
                        output = if run.stdout.trim().is_empty() {
                            stderr.trim().to_string()
                        } else {
                            run.stdout.trim().to_string()
                        };
                    }
                    judge(&run.stdout, &stderr, &expected)
                }
                Err(e) => {
                    warn!("sandbox call failed for test case {}: {}", i + 1, e);
                    (false, format!("Error: {}", e))
                }
            };

            results.push(TestCaseResult {
                test_case: i + 1,
                input: case.input.clone(),
                expected,
                actual,
                passed,
            });
        }

        let passed = results.iter().filter(|r| r.passed).count();
        TestRun {
            output,
            total: results.len(),
            passed,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_trims_before_comparing() {
        let (passed, actual) = judge("  42\n", "", "42");
        assert!(passed);
        assert_eq!(actual, "42");
    }

    #[test]
    fn judge_fails_on_stderr_even_when_stdout_matches() {
        let (passed, _) = judge("42", "warning: deprecated", "42");
        assert!(!passed);
    }

    #[test]
    fn judge_reports_stderr_when_no_stdout() {
        let (passed, actual) = judge("", "SyntaxError: invalid syntax", "42");
        assert!(!passed);
        assert_eq!(actual, "Error: SyntaxError: invalid syntax");
    }

    #[test]
    fn judge_reports_missing_output() {
        let (passed, actual) = judge("", "", "42");
        assert!(!passed);
        assert_eq!(actual, "No output");
    }

    #[test]
    fn execute_response_tolerates_missing_stages() {
        let resp: ExecuteResponse = serde_json::from_str(r#"{"run":{"stdout":"4\n","code":0}}"#)
            .expect("valid piston payload");
        let run = resp.run.unwrap();
        assert_eq!(run.stdout, "4\n");
        assert_eq!(run.stderr, "");
        assert_eq!(run.code, Some(0));
        assert!(resp.compile.is_none());
    }
}
