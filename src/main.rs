mod cli;
mod handlers;

use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Result};
use is_terminal::IsTerminal;

use runbox::languages;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = cli::Cli::parse();

    // Listing shortcuts return early, before any source is read.
    if args.list_languages {
        return handlers::languages::run(args.json).await;
    }
    if let Some(lang_id) = &args.starter {
        match languages::resolve(lang_id) {
            Some(lang) => {
                print!("{}", lang.starter_snippet);
                return Ok(());
            }
            None => bail!("unsupported language: {}", lang_id),
        }
    }

    // Source comes from the positional file, or from a pipe.
    let stdin_is_tty = io::stdin().is_terminal();
    let source = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            if stdin_is_tty {
                bail!("provide a source file or pipe a program via stdin");
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    // Explicit --language wins; otherwise infer from the file extension.
    let language = match &args.language {
        Some(id) => id.clone(),
        None => {
            let inferred = args
                .file
                .as_deref()
                .and_then(|p| Path::new(p).extension())
                .and_then(|e| e.to_str())
                .and_then(languages::resolve_extension);
            match inferred {
                Some(lang) => lang.id.to_string(),
                None => bail!("cannot infer the language; pass --language"),
            }
        }
    };

    // Program stdin: inline --input wins over --stdin-file.
    let program_stdin = match (&args.input, &args.stdin_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => String::new(),
    };

    let ok = if let Some(cases_path) = &args.cases {
        handlers::cases::run(&source, &language, cases_path, args.json).await?
    } else {
        handlers::run::run(
            &source,
            &language,
            &program_stdin,
            args.args.clone(),
            args.timeout_ms,
            args.check,
            args.json,
        )
        .await?
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
