//! mimir — inspect and maintain a response cache from the shell.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mimir::config::Config;
use mimir::{ResponseCache, fingerprint};

/// Mimir response cache tool
#[derive(Parser)]
#[command(name = "mimir")]
#[command(version)]
#[command(about = "Inspect and maintain a mimir response cache")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "MIMIR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Number of cached entries
    Count,

    /// Delete every cached entry
    Clear,

    /// Print the cached value for an input (exit 1 on miss)
    Get {
        /// Input text (or omit to read from stdin)
        input: Option<String>,
    },

    /// Cache a value for an input
    Put {
        /// Input text
        input: String,
        /// Value to cache (or omit to read from stdin)
        value: Option<String>,
    },

    /// Remove the cached value for an input
    Remove {
        /// Input text (or omit to read from stdin)
        input: Option<String>,
    },

    /// Show the stored record for an input (exit 1 on miss)
    Inspect {
        /// Input text (or omit to read from stdin)
        input: Option<String>,
    },

    /// Print the fingerprint of an input
    Hash {
        /// Input text (or omit to read from stdin)
        input: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // Commands that don't touch the store
    if let Command::Hash { input } = args.command {
        let input = input_or_stdin(input)?;
        println!("{}", fingerprint::hash(&input));
        println!("{}", fingerprint::short_hash(&input));
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(args.config.as_deref())?;
    let cache = ResponseCache::new(&config.cache_config())?;

    match args.command {
        Command::Count => println!("{}", cache.cache_count().await),
        Command::Clear => cache.clear_cache().await,
        Command::Get { input } => {
            let input = input_or_stdin(input)?;
            match cache.get_cached_response(&input).await {
                Some(value) => println!("{value}"),
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Command::Put { input, value } => {
            let value = input_or_stdin(value)?;
            cache.cache_response(&input, &value).await;
        }
        Command::Remove { input } => {
            let input = input_or_stdin(input)?;
            cache.remove_cached_response(&input).await;
        }
        Command::Inspect { input } => {
            let input = input_or_stdin(input)?;
            match cache.cached_entry(&input).await {
                Some(entry) => {
                    println!("key:        {}{}", cache.namespace(), fingerprint::short_hash(&input));
                    println!("created_at: {}", entry.created_at.to_rfc3339());
                    println!("input:      {}", entry.original_input);
                    println!("value:      {}", entry.value);
                }
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Command::Hash { .. } => unreachable!("handled above"),
    }

    Ok(ExitCode::SUCCESS)
}

/// Use the positional argument, or read all of stdin when it is piped.
fn input_or_stdin(arg: Option<String>) -> io::Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no input given and stdin is a terminal",
        ));
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches('\n').to_string())
}
