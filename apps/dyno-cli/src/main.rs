//! Dyno CLI - scan, read and describe tables from the command line.
//!
//! # Usage
//!
//! ```text
//! dyno scan <table> [--index <name>] [--project <a,b,...>] [--eventual]
//! dyno get <table> <key-field> <key-value> [--number] [--project <a,b,...>]
//! dyno describe <table>
//! ```
//!
//! Items are printed one JSON object per line without type descriptors.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_REGION` | *(from `~/.aws/config`, else `us-east-1`)* | Signing region |
//! | `DYNO_ENDPOINT` | *(regional endpoint)* | Endpoint override, e.g. `http://localhost:8000` |
//! | `DYNO_TIMEOUT_SECS` | `5` | Per-request timeout |
//! | `DYNO_PAGE_SIZE` | `100` | Scan page size |
//! | `DYNO_LOG` | `false` | Log request and response bodies at debug level |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result, bail};
use dyno_client::{CredentialSource, Dyno, DynoOptions, Get, Scan};
use dyno_model::{AttributeValue, Item};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Read the log level from the environment.
fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Scan {
        table: String,
        index: Option<String>,
        projection: Vec<String>,
        consistent: bool,
    },
    Get {
        table: String,
        key_field: String,
        key_value: AttributeValue,
        projection: Vec<String>,
    },
    Describe {
        table: String,
    },
}

fn split_projection(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut positional = Vec::new();
    let mut index = None;
    let mut projection = Vec::new();
    let mut consistent = true;
    let mut numeric_key = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--index" => index = Some(args.next().context("--index needs a value")?),
            "--project" => {
                projection = split_projection(&args.next().context("--project needs a value")?);
            }
            "--eventual" => consistent = false,
            "--number" => numeric_key = true,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = positional.next().context("missing command (scan, get, describe)")?;
    let table = positional.next().context("missing table name")?;

    let parsed = match command.as_str() {
        "scan" => Command::Scan {
            table,
            index,
            projection,
            consistent,
        },
        "get" => {
            let key_field = positional.next().context("missing key field")?;
            let raw = positional.next().context("missing key value")?;
            let key_value = if numeric_key {
                raw.parse::<f64>()
                    .with_context(|| format!("key value {raw:?} is not a number"))?;
                AttributeValue::N(raw)
            } else {
                AttributeValue::S(raw)
            };
            Command::Get {
                table,
                key_field,
                key_value,
                projection,
            }
        }
        "describe" => Command::Describe { table },
        other => bail!("unknown command {other}"),
    };

    if let Some(extra) = positional.next() {
        bail!("unexpected argument {extra}");
    }
    Ok(parsed)
}

fn print_item(item: &Item) -> Result<()> {
    let json = AttributeValue::M(item.clone()).to_json();
    println!("{}", serde_json::to_string(&json)?);
    Ok(())
}

async fn run(dyno: &Dyno, command: Command) -> Result<()> {
    match command {
        Command::Scan {
            table,
            index,
            projection,
            consistent,
        } => {
            let mut scan = Scan::new(&table)
                .projection(projection)
                .consistent_read(consistent);
            if let Some(index) = index {
                scan = scan.index_name(index);
            }
            let result = dyno
                .scan_items(&scan)
                .await
                .with_context(|| format!("scan of {table} failed"))?;
            for item in &result.items {
                print_item(item)?;
            }
            info!(
                table = %table,
                items = result.len(),
                capacity = ?result.consumed_capacity.total.capacity_units,
                "scan finished"
            );
        }
        Command::Get {
            table,
            key_field,
            key_value,
            projection,
        } => {
            let get = Get::new(&table, key_field, key_value).projection(projection);
            let result = dyno
                .get::<serde_json::Value>(&get)
                .await
                .with_context(|| format!("get from {table} failed"))?;
            match result.into_first() {
                Some(item) => println!("{}", serde_json::to_string(&item)?),
                None => bail!("no item found in {table}"),
            }
        }
        Command::Describe { table } => {
            let description = dyno
                .describe_table(&table)
                .await
                .with_context(|| format!("describe of {table} failed"))?;
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&log_level())?;

    let command = parse_args(std::env::args().skip(1))?;
    let dyno = Dyno::new(None, &CredentialSource::default(), DynoOptions::from_env())
        .context("failed to configure client")?;
    info!(region = dyno.connection().region(), "client ready");

    run(&dyno, command).await
}
