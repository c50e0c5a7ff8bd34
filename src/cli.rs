use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "runbox", about = "Run code in a remote execution sandbox", version)]
#[command(group(ArgGroup::new("mode").args(["check", "cases", "list_languages", "starter"]).multiple(false)))]
pub struct Cli {
    /// Source file to execute. Omit to read the program from stdin.
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Language id or alias (python, js, cpp, ...). Inferred from the file
    /// extension when omitted.
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// File whose contents are fed to the program as stdin.
    #[arg(long = "stdin-file")]
    pub stdin_file: Option<String>,

    /// Inline stdin for the program.
    #[arg(short = 'i', long = "input")]
    pub input: Option<String>,

    /// Command-line argument passed to the program. Repeatable.
    #[arg(short = 'a', long = "arg", action = clap::ArgAction::Append)]
    pub args: Vec<String>,

    /// Round-trip timeout in milliseconds.
    #[arg(short = 't', long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Check syntax only (runs with empty stdin, reports validity).
    #[arg(long)]
    pub check: bool,

    /// Run expected-output test cases from a JSON file:
    /// [{"input": "...", "expected_output": "..."}, ...]
    #[arg(long = "cases", value_name = "JSON_FILE")]
    pub cases: Option<String>,

    /// List supported languages.
    #[arg(short = 'L', long = "list-languages", visible_alias = "ll")]
    pub list_languages: bool,

    /// Print the starter snippet for a language.
    #[arg(long = "starter", value_name = "LANGUAGE")]
    pub starter: Option<String>,

    /// Print the outcome as JSON instead of rendered text.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
