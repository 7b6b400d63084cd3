//! Command line client for unAPI endpoints.
//!
//! ```text
//! unapi --record 1234567890
//! unapi --record 1234567890 --schema marcxml --db k10plus
//! unapi --record 1234567890 --isil DE-14
//! unapi --formats
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::debug;
use unapi::config::{DEFAULT_DB, DEFAULT_SCHEMA, DEFAULT_URL, DEFAULT_VAR};
use unapi::pretty::pretty_response;
use unapi::{Client, ClientConfig, Encoding, Response, SchemaRecord};

/// Fetch records from an unAPI endpoint
#[derive(Debug, Parser)]
#[command(name = "unapi", version, about = "Fetch records from an unAPI endpoint")]
struct Args {
    /// Base URL of the unAPI endpoint
    #[arg(long, value_name = "URL", default_value = DEFAULT_URL)]
    url: String,

    /// Target database
    #[arg(long, value_name = "DB", default_value = DEFAULT_DB)]
    db: String,

    /// Type of the record identifier
    #[arg(long, value_name = "VAR", default_value = DEFAULT_VAR)]
    var: String,

    /// Identifier of the record to fetch
    #[arg(short, long, value_name = "ID")]
    record: Option<String>,

    /// Schema of the response
    #[arg(short, long, value_name = "SCHEMA", default_value = DEFAULT_SCHEMA)]
    schema: String,

    /// List the schemas served by the endpoint
    #[arg(long)]
    formats: bool,

    /// Print the holdings of the library with this ISIL
    #[arg(long, value_name = "ISIL")]
    isil: Option<String>,
}

fn setup_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unapi=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging();
    debug!(?args, "Parsed arguments");

    let config = ClientConfig::default()
        .with_url(args.url)
        .with_db(args.db)
        .with_var(args.var);
    let client = Client::new(config).context("Failed to create HTTP client")?;

    if args.formats {
        for (name, info) in client.formats().context("Failed to fetch format list")? {
            println!(
                "{name}\t{}\t{}",
                info.mime_type.as_deref().unwrap_or("-"),
                info.docs.as_deref().unwrap_or("-")
            );
        }
        return Ok(());
    }

    let Some(record) = args.record else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };

    let response = client
        .request(&record, &args.schema)
        .with_context(|| format!("Failed to fetch record {record}"))?;
    println!("{}", pretty_response(&response)?);

    if let Some(isil) = args.isil {
        let encoding = Encoding::from_schema(&args.schema)
            .with_context(|| format!("No holdings accessor for schema '{}'", args.schema))?;
        let Response::Json(value) = response else {
            anyhow::bail!("Schema '{}' is not served as JSON", args.schema);
        };
        let accessor = SchemaRecord::from_value(encoding, value)?;
        match accessor.holdings_from_isil(&isil) {
            Some(holdings) => println!("{isil}: {}", holdings.join(", ")),
            None => println!("{isil}: no holdings"),
        }
    }

    Ok(())
}
