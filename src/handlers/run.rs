//! Run handler: executes one program and renders the outcome.

use anyhow::Result;
use owo_colors::OwoColorize;

use runbox::bridge::ExecutionBridge;
use runbox::config::Config;
use runbox::outcome::{ExecutionOutcome, OutcomeStatus};
use runbox::transport::HttpTransport;

/// Execute `source` and render the outcome. Returns whether the run
/// succeeded so the caller can set the process exit code.
pub async fn run(
    source: &str,
    language: &str,
    stdin: &str,
    args: Vec<String>,
    timeout_ms: Option<u64>,
    check_only: bool,
    json: bool,
) -> Result<bool> {
    let cfg = Config::load();
    let transport = HttpTransport::from_config(&cfg)?;
    let bridge = ExecutionBridge::new(transport);

    if check_only {
        let report = bridge.check(source, language).await;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if report.valid {
            println!("{} syntax looks valid", "[ok]".green());
        } else {
            println!("{} syntax check failed", "[invalid]".red());
            if let Some(errors) = &report.errors {
                eprintln!("{errors}");
            }
        }
        return Ok(report.valid);
    }

    let timeout_ms = timeout_ms.or_else(|| cfg.request_timeout_ms());
    let outcome = bridge
        .run_with_timeout(source, language, stdin, args, timeout_ms)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render(&outcome);
    }
    Ok(outcome.status.is_success())
}

/// Human rendering: a colored status tag, the one-line message, then any
/// captured output. The tag makes the outcome class assertable without
/// parsing prose.
fn render(outcome: &ExecutionOutcome) {
    let tag = format!("[{}]", outcome.status.tag());
    let header = match outcome.status {
        OutcomeStatus::Success => format!("{}", tag.green()),
        OutcomeStatus::Timeout => format!("{}", tag.yellow()),
        _ => format!("{}", tag.red()),
    };
    println!("{} {}", header, outcome.message);

    if let Some(compile) = &outcome.compile_stage {
        if !compile.stderr.is_empty() {
            eprintln!("{}", compile.stderr.trim_end());
        }
    }
    if let Some(run) = &outcome.run_stage {
        if !run.stdout.is_empty() {
            print!("{}", run.stdout);
            if !run.stdout.ends_with('\n') {
                println!();
            }
        }
        if !run.stderr.is_empty() {
            eprintln!("{}", run.stderr.trim_end());
        }
    }
}
