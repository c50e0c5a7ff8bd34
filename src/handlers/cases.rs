//! Case-runner handler: executes a program against expected-output test cases.

use std::fs;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use runbox::bridge::{ExecutionBridge, TestCase};
use runbox::config::Config;
use runbox::transport::HttpTransport;

pub async fn run(source: &str, language: &str, cases_path: &str, json: bool) -> Result<bool> {
    let text = fs::read_to_string(cases_path)
        .with_context(|| format!("failed to read test cases from {cases_path}"))?;
    let cases: Vec<TestCase> = serde_json::from_str(&text)
        .with_context(|| format!("{cases_path} is not a valid test case file"))?;

    let cfg = Config::load();
    let transport = HttpTransport::from_config(&cfg)?;
    let bridge = ExecutionBridge::new(transport);

    let summary = bridge.run_cases(source, language, &cases).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(summary.failed == 0);
    }

    for report in &summary.reports {
        if report.passed {
            println!("{} case {}", "[pass]".green(), report.case);
        } else {
            println!("{} case {}: {}", "[fail]".red(), report.case, report.message);
            println!("  expected: {:?}", report.expected);
            println!("  actual:   {:?}", report.actual);
        }
    }
    println!(
        "{}/{} cases passed",
        summary.passed, summary.total
    );
    Ok(summary.failed == 0)
}
