//! gitsql CLI - SQL queries over Git history.

use anyhow::{bail, Context};
use clap::Parser;
use gitsql::output::OutputWriter;
use gitsql::sql::{find_preset, get_table_info, PRESETS};
use gitsql::{Args, Command, GitsqlError, SqlEngine, TABLES};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut out = OutputWriter::new(io::stdout().lock(), args.format).with_header(!args.no_header);

    match args.command {
        Some(Command::Tables) => {
            for table in TABLES {
                out.writeln(&format!("{:<10} {}", table.name, table.description))?;
            }
            return Ok(());
        }
        Some(Command::Schema { ref table }) => {
            let info =
                get_table_info(table).ok_or_else(|| GitsqlError::TableNotFound(table.clone()))?;
            out.writeln(&format!("{} ({})", info.name, info.description))?;
            for column in info.columns {
                out.writeln(&format!(
                    "  {:<10} {:<8} {}",
                    column.name, column.sql_type, column.description
                ))?;
            }
            return Ok(());
        }
        Some(Command::Examples) => {
            for preset in PRESETS {
                out.writeln(&format!("{}  --  {}", preset.name, preset.description))?;
                out.writeln(&format!("  {}\n", preset.sql))?;
            }
            return Ok(());
        }
        None => {}
    }

    let query = match (&args.query, &args.preset) {
        (Some(query), _) => query.clone(),
        (None, Some(name)) => find_preset(name)?.sql.to_string(),
        (None, None) if !io::stdin().is_terminal() => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read query from stdin")?;
            buf
        }
        (None, None) => bail!("no query given; pass one as an argument or run `gitsql --help`"),
    };
    if query.trim().is_empty() {
        bail!("query is empty");
    }

    let repo = if args.repo.is_absolute() {
        args.repo.clone()
    } else {
        std::env::current_dir()?.join(&args.repo)
    };
    let engine = SqlEngine::open(&repo)?;
    let result = engine.execute(&query)?;
    tracing::debug!(
        repo = %engine.repo_path(),
        rows = result.row_count(),
        "query finished"
    );

    out.write_result(&result)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gitsql=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
