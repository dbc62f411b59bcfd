use clap::{Parser, ValueEnum};
use exception_context::report::{HtmlRenderer, JsonRenderer, ReportOptions, ReportRenderer, TextRenderer};
use exception_context::{Context, Scope};
use serde_json::Value;
use std::error::Error as _;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Html,
    Text,
    Json,
}

/// Build one exception from a message template and print its report.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Message template, e.g. "order {id} failed for {[user]name}"
    message: String,
    /// Current context entry as KEY=JSON (non-JSON values are taken as strings)
    #[arg(long = "set", value_name = "KEY=JSON")]
    set: Vec<String>,
    /// Saved context as NAME=JSON_OBJECT
    #[arg(long = "saved", value_name = "NAME=JSON_OBJECT")]
    saved: Vec<String>,
    /// Error type shown in the report
    #[arg(long = "type")]
    kind: Option<String>,
    /// Possible cause, may be repeated
    #[arg(long)]
    cause: Vec<String>,
    /// Error code
    #[arg(long, default_value_t = 0)]
    code: i64,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Source lines shown around the reported line
    #[arg(long, default_value_t = 5)]
    radius: usize,
    /// Build the exception but render nothing
    #[arg(long)]
    hidden: bool,
    /// Debug logging on stderr
    #[arg(long)]
    verbose: bool,
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose, &directives))
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(Some(report)) => println!("{report}"),
        Ok(None) => debug!("report hidden"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` directives win; `--verbose` only moves the fallback level.
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let fallback = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    EnvFilter::builder()
        .with_default_directive(fallback.into())
        .parse_lossy(directives)
}

fn run(args: &Args) -> Result<Option<String>, String> {
    let mut scope = Scope::new();

    for entry in &args.saved {
        let (name, raw) = split_pair(entry)?;
        let context = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Context::from_map(map),
            Ok(_) => return Err(format!("saved context {name:?} must be a JSON object")),
            Err(e) => return Err(format!("invalid JSON for saved context {name:?}: {e}")),
        };
        scope.registry_mut().save(name, context).map_err(|e| chain(&e))?;
    }

    for entry in &args.set {
        let (key, raw) = split_pair(entry)?;
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        scope.context_mut().set(key, value).map_err(|e| chain(&e))?;
    }

    let mut exception = scope
        .exception(&args.message)
        .map_err(|e| chain(&e))?
        .with_code(args.code);
    if let Some(kind) = &args.kind {
        exception = exception.with_type(kind.as_str());
    }
    for cause in &args.cause {
        exception = exception.add_possible_cause(cause.as_str());
    }

    let opts = ReportOptions { enabled: !args.hidden, snippet_radius: args.radius };
    let renderer: &dyn ReportRenderer = match args.format {
        Format::Html => &HtmlRenderer,
        Format::Text => &TextRenderer,
        Format::Json => &JsonRenderer,
    };
    exception.report(renderer, &opts).map_err(|e| chain(&e))
}

fn chain(err: &exception_context::Error) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        text.push_str(": ");
        text.push_str(&e.to_string());
        cause = e.source();
    }
    text
}

fn split_pair(entry: &str) -> Result<(&str, &str), String> {
    entry
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {entry:?}"))
}
