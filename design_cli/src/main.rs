//! # Armature CLI
//!
//! Reads a JSON design request from a file (or stdin) and prints the JSON
//! result, the same body the HTTP server would return.
//!
//! ```text
//! design_cli column request.json --pretty
//! cat wall.json | design_cli retaining-wall
//! ```
//!
//! Exit status: 0 on a computed result (adequate or not), 2 when the request
//! is rejected, 1 on an internal failure.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use design_core::{design, CalcError, ElementKind, MaterialCatalog};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "design_cli")]
#[command(about = "Reinforced-concrete element design from a JSON request")]
#[command(version)]
struct Cli {
    /// Element type: column, retaining-wall, beam, slab, foundation, grading
    element: String,

    /// Request file; reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

/// What a single invocation produced.
#[derive(Debug)]
enum Outcome {
    Designed(Value),
    Rejected(Value),
    Failed(Value),
}

impl Outcome {
    fn body(&self) -> &Value {
        match self {
            Outcome::Designed(v) | Outcome::Rejected(v) | Outcome::Failed(v) => v,
        }
    }

    fn status(&self) -> u8 {
        match self {
            Outcome::Designed(_) => 0,
            Outcome::Rejected(_) => 2,
            Outcome::Failed(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let raw = read_input(cli.input.as_deref())?;
    let outcome = evaluate(&cli.element, &raw);
    println!("{}", render(outcome.body(), cli.pretty)?);
    Ok(ExitCode::from(outcome.status()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("failed to read request file {}", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

fn evaluate(element: &str, raw: &str) -> Outcome {
    let kind = match ElementKind::from_slug(element) {
        Ok(kind) => kind,
        Err(err) => return Outcome::Rejected(error_body(&err.to_string(), err.error_code())),
    };

    let request: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            let message = format!("request body is not valid JSON: {}", e);
            return Outcome::Rejected(error_body(&message, "INVALID_JSON"));
        }
    };

    let _span = tracing::info_span!("design", element = %kind).entered();
    match design(kind, &request, MaterialCatalog::standard()) {
        Ok(result) => Outcome::Designed(result),
        Err(err) => {
            let body = calc_error_body(&err);
            if err.is_client_error() {
                tracing::info!(code = err.error_code(), "request rejected");
                Outcome::Rejected(body)
            } else {
                tracing::error!(code = err.error_code(), "{}", err);
                Outcome::Failed(body)
            }
        }
    }
}

fn calc_error_body(err: &CalcError) -> Value {
    error_body(&err.to_string(), err.error_code())
}

fn error_body(message: &str, code: &str) -> Value {
    json!({ "error": message, "code": code })
}

fn render(body: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(body)?
    } else {
        serde_json::to_string(body)?
    };
    Ok(text)
}
