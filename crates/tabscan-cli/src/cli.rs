//! Command-line entry point for tabscan.
//!
//! The binary stays synchronous: every async driver call runs through
//! the shared blocking runtime, so shell pipelines see plain
//! call-and-return behavior.

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use tracing_subscriber::EnvFilter;

use tabscan_core::{
    Connection, DataSource, Driver, RowLimit, TableMetadata, TablePreview, TabscanError, Value,
};
use tabscan_drivers::sqlite::{DatabaseFileInfo, SqliteConnection};
use tabscan_drivers::{DriverRegistry, block_on_tokio};
use tabscan_inspect::{describe_columns, list_tables, preview};

#[derive(Parser)]
#[command(name = "tabscan")]
#[command(version)]
#[command(about = "Inspect the tables inside a database from the command line")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

/// Global options available to all commands.
#[derive(Args, Clone)]
struct GlobalOptions {
    /// Path to the database file.
    ///
    /// Can also be set via the TABSCAN_DB environment variable.
    #[arg(long = "db", env = "TABSCAN_DB", global = true)]
    db: Option<String>,

    /// Open the database without write access.
    #[arg(long = "readonly", global = true)]
    readonly: bool,

    /// Output JSON instead of human-readable tables.
    #[arg(long = "json", global = true)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every table in the database.
    Tables,

    /// Show column metadata for the named tables.
    ///
    /// With no names, describes every table the catalog lists.
    Columns {
        /// Tables to describe.
        tables: Vec<String>,
    },

    /// Fetch the leading rows of the named tables.
    ///
    /// With no names, previews every table the catalog lists.
    Preview {
        /// Tables to preview.
        tables: Vec<String>,

        /// Maximum number of rows per table. Omit to fetch every row.
        #[arg(short = 'n', long = "limit")]
        limit: Option<u64>,
    },

    /// Show storage details for the database file.
    Info,
}

/// What a subcommand fetched, carried back out of the runtime so
/// rendering happens on the calling thread.
enum Report {
    Tables(Vec<String>),
    Columns(TableMetadata),
    Previews(Vec<TablePreview>),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

/// Initialize the logging system.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
/// RUST_LOG takes precedence over the built-in filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "debug"
    } else {
        "warn,tabscan_core=info,tabscan_inspect=info,tabscan_drivers=info,tabscan_driver_sqlite=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli { global, command } = cli;
    let db = global
        .db
        .context("--db is required (or set TABSCAN_DB)")?;

    // Info reads file-level pragmas, which only the concrete SQLite
    // connection exposes.
    if let Commands::Info = command {
        let conn = open_file(&db, global.readonly)?;
        let info = conn.get_info()?;
        return render_info(&db, &info, global.json);
    }

    let registry = DriverRegistry::with_defaults();
    let driver = registry
        .get("sqlite")
        .context("sqlite driver is not registered")?;

    let mut source = DataSource::sqlite(&db);
    if global.readonly {
        source = source.with_param("readonly", true);
    }

    let report = block_on_tokio(async move {
        let conn = driver.connect(&source).await?;
        tracing::debug!(driver = conn.driver_name(), "connected");

        let report = match command {
            Commands::Tables => Report::Tables(list_tables(conn.as_ref()).await?),
            Commands::Columns { tables } => {
                let request = if tables.is_empty() {
                    list_tables(conn.as_ref()).await?
                } else {
                    tables
                };
                Report::Columns(describe_columns(conn.as_ref(), &request).await?)
            }
            Commands::Preview { tables, limit } => {
                let request = if tables.is_empty() {
                    list_tables(conn.as_ref()).await?
                } else {
                    tables
                };
                Report::Previews(preview(conn.as_ref(), &request, RowLimit::from(limit)).await?)
            }
            Commands::Info => unreachable!("handled above"),
        };

        conn.close().await?;
        Ok::<_, TabscanError>(report)
    })?;

    match report {
        Report::Tables(names) => render_table_names(&names, global.json),
        Report::Columns(metadata) => render_columns(&metadata, global.json),
        Report::Previews(previews) => render_previews(&previews, global.json),
    }
}

fn open_file(path: &str, readonly: bool) -> tabscan_core::Result<SqliteConnection> {
    if readonly {
        SqliteConnection::open_read_only(path)
    } else {
        SqliteConnection::open(path)
    }
}

fn render_table_names(names: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(names)?);
        return Ok(());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn render_columns(metadata: &TableMetadata, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
        return Ok(());
    }

    for (table_name, columns) in metadata {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["#", "column", "type", "not null", "default", "pk"]);

        for column in columns {
            table.add_row(vec![
                Cell::new(column.ordinal),
                Cell::new(&column.name),
                Cell::new(&column.data_type),
                Cell::new(if column.not_null { "yes" } else { "" }),
                Cell::new(column.default_value.as_deref().unwrap_or("")),
                Cell::new(if column.is_primary_key { "yes" } else { "" }),
            ]);
        }

        println!("{}", table_name);
        println!("{}", table);
    }
    Ok(())
}

fn render_previews(previews: &[TablePreview], json: bool) -> anyhow::Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = previews.iter().map(preview_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in previews {
        match &entry.outcome {
            Ok(rows) => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(rows.column_names());

                for row in &rows.rows {
                    table.add_row(row.values.iter().map(Cell::new).collect::<Vec<_>>());
                }

                println!("{} ({} rows)", entry.table, rows.row_count());
                println!("{}", table);
            }
            Err(err) => {
                println!("{}: {}", entry.table, err);
            }
        }
    }
    Ok(())
}

fn preview_to_json(entry: &TablePreview) -> serde_json::Value {
    match &entry.outcome {
        Ok(rows) => {
            let mapped: Vec<serde_json::Map<String, serde_json::Value>> = rows
                .rows
                .iter()
                .map(|row| {
                    rows.columns
                        .iter()
                        .zip(row.values.iter())
                        .map(|(column, value)| (column.name.clone(), value_to_json(value)))
                        .collect()
                })
                .collect();
            serde_json::json!({
                "table": entry.table,
                "row_count": mapped.len(),
                "rows": mapped,
            })
        }
        Err(err) => serde_json::json!({
            "table": entry.table,
            "error": err.to_string(),
        }),
    }
}

/// Flatten a database value into plain JSON.
///
/// The derived serialization would tag every value with its variant
/// name; previews want `42`, not `{"Int64": 42}`.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(v) => serde_json::Value::Bool(*v),
        Value::Int64(v) => serde_json::Value::Number((*v).into()),
        Value::Float64(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Json(v) => v.clone(),
        other => serde_json::Value::String(other.to_string()),
    }
}

fn render_info(path: &str, info: &DatabaseFileInfo, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec![Cell::new("path"), Cell::new(path)]);
    table.add_row(vec![
        Cell::new("size"),
        Cell::new(format!("{} bytes", info.file_size_bytes)),
    ]);
    table.add_row(vec![Cell::new("page count"), Cell::new(info.page_count)]);
    table.add_row(vec![Cell::new("page size"), Cell::new(info.page_size)]);
    table.add_row(vec![Cell::new("encoding"), Cell::new(&info.encoding)]);
    table.add_row(vec![
        Cell::new("journal mode"),
        Cell::new(&info.journal_mode),
    ]);
    table.add_row(vec![
        Cell::new("schema version"),
        Cell::new(info.schema_version),
    ]);
    table.add_row(vec![
        Cell::new("user version"),
        Cell::new(info.user_version),
    ]);
    println!("{}", table);
    Ok(())
}
