use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use polydecode::config::schema::Schema;
use polydecode::config::Config;
use polydecode::decode::decode;
use polydecode::file::loader::{load_document, load_document_from_stdin};
use polydecode::objectpath::ObjectPath;
use polydecode::resolver::{Policy, TypeResolver};

/// polydecode - decode polymorphic JSON/YAML documents
#[derive(Parser)]
#[command(name = "polydecode")]
#[command(version)]
#[command(about = "Decode polymorphic JSON/YAML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a path and print its canonical, normalized form
    Path {
        /// Path to parse, e.g. `payload/../type`
        path: String,

        /// Absolute path to anchor a relative path at
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Resolve and decode a document with a schema
    Decode {
        /// Document to decode (omit to read from stdin)
        file: Option<PathBuf>,

        /// TOML schema describing the types and the resolver
        #[arg(short, long)]
        schema: PathBuf,

        /// No-match policy (overrides config, not the schema)
        #[arg(short, long)]
        policy: Option<Policy>,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },
}

fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run_path(path: &str, base: Option<&str>) -> Result<()> {
    let mut path = ObjectPath::parse(path)?;
    if let Some(base) = base {
        let base = ObjectPath::parse(base).context("invalid base path")?;
        path.to_absolute(&base)?;
    }
    if path.is_absolute() {
        path.normalize()?;
    }
    println!("{}", path);
    Ok(())
}

fn run_decode(
    config: &Config,
    file: Option<PathBuf>,
    schema: PathBuf,
    policy: Option<Policy>,
    compact: bool,
) -> Result<()> {
    let compiled = Schema::load(&schema)?.compile(policy.unwrap_or(config.policy))?;

    let source = match file {
        Some(path) => load_document(&path)?,
        None if !io::stdin().is_terminal() => load_document_from_stdin()?,
        None => anyhow::bail!("No input: pass a file or pipe a document to stdin"),
    };

    let mut target = compiled.target();
    let applied = decode(&compiled.resolver, &source, &mut target)?;
    if !applied {
        tracing::warn!(
            target_path = %compiled.resolver.target_path(),
            "no type resolved, decoded generically"
        );
    }

    let output = if compact || !config.pretty {
        serde_json::to_string(&target)?
    } else {
        serde_json::to_string_pretty(&target)?
    };
    println!("{}", output);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::load();
    init_logging(&config.log_level);

    let result = match cli.command {
        Command::Path { path, base } => run_path(&path, base.as_deref()),
        Command::Decode {
            file,
            schema,
            policy,
            compact,
        } => run_decode(&config, file, schema, policy, compact),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let unresolved = err
                .downcast_ref::<polydecode::Error>()
                .is_some_and(polydecode::Error::is_unresolved_type);
            if unresolved {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
