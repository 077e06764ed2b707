//! shelterdash CLI: import shelter records, edit them, and browse the
//! dashboard views from a terminal.

mod logging;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use shelterdash_core::prelude::{
    AnimalRecord, Changes, DashboardConfig, Query, RescueCategory, Scalar,
};
use shelterdash_exec::{Dashboard, Event, Session};
use shelterdash_io::readers::csv::CsvRecordReader;
use shelterdash_operators::{ChartSummary, SortKey, TableState};
use shelterdash_planner::{compile, explain, BreedSelection};

use logging::{init_logging, LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "shelterdash")]
#[command(about = "Browse animal-shelter outcome records by rescue category", long_about = None)]
struct Cli {
    /// Store location: memory://, file://<root> or a directory (overrides SHELTERDASH_STORE_URI)
    #[arg(long, global = true)]
    store_uri: Option<String>,

    /// Database name (overrides SHELTERDASH_DATABASE)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Collection name (overrides SHELTERDASH_COLLECTION)
    #[arg(long, global = true)]
    collection: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an outcome export (CSV) into the collection
    Import {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Show the table page, chart and map for a selection
    Browse {
        /// water, mountain, disaster or reset
        #[arg(short, long, default_value = "reset")]
        category: RescueCategory,

        /// Restrict to these breeds (repeatable)
        #[arg(short, long = "breed")]
        breeds: Vec<String>,

        /// Sort key, `column` or `column:desc` (repeatable, first wins)
        #[arg(long)]
        sort: Vec<String>,

        /// Table filter, e.g. `{breed} contains Retriever && {age_upon_outcome_in_weeks} < 100`
        #[arg(long)]
        filter: Option<String>,

        /// Selected row on the visible table (zero-based)
        #[arg(long)]
        select: Option<usize>,

        /// Highlight these columns (repeatable)
        #[arg(long = "column")]
        columns: Vec<String>,

        /// Page to print (one-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print the full view state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Insert one record given as a JSON object
    Insert {
        #[arg(long)]
        json: String,
    },

    /// Set fields on every record matching a query document
    Update {
        /// Query document, e.g. `{"breed": {"$in": ["Newfoundland"]}}`
        #[arg(long = "where")]
        filter: String,

        /// Field values, e.g. `{"name": "Rex"}`
        #[arg(long = "set")]
        changes: String,
    },

    /// Delete every record matching a query document
    Delete {
        #[arg(long = "where")]
        filter: String,
    },

    /// List rescue categories and what they select
    Categories,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = resolve_config(
        DashboardConfig::from_env(),
        cli.store_uri,
        cli.database,
        cli.collection,
    );

    match cli.command {
        Commands::Categories => {
            print_categories();
            Ok(())
        }
        Commands::Import { csv } => import(cfg, &csv),
        Commands::Insert { json } => {
            let dash = connect(cfg)?;
            let value = serde_json::from_str(&json).context("record is not valid JSON")?;
            let record = AnimalRecord::from_json(value)?;
            let id = dash.store().create(Some(&record))?;
            println!("{id}");
            Ok(())
        }
        Commands::Update { filter, changes } => {
            let dash = connect(cfg)?;
            let query = parse_query(&filter)?;
            let changes = parse_changes(&changes)?;
            let n = dash.store().update(Some(&query), Some(&changes))?;
            println!("modified {n}");
            Ok(())
        }
        Commands::Delete { filter } => {
            let dash = connect(cfg)?;
            let query = parse_query(&filter)?;
            let n = dash.store().delete(Some(&query))?;
            println!("deleted {n}");
            Ok(())
        }
        Commands::Browse {
            category,
            breeds,
            sort,
            filter,
            select,
            columns,
            page,
            json,
        } => {
            let dash = connect(cfg)?;
            let mut session = dash.open_session();
            let events = browse_events(category, breeds, &sort, filter, select, columns)?;
            let update = session.handle_all(events);
            if let Some(note) = &update.notification {
                eprintln!("{}", note.text);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            } else {
                print_view(&session, page);
            }
            Ok(())
        }
    }
}

/// CLI flags win over the environment.
fn resolve_config(
    mut cfg: DashboardConfig,
    store_uri: Option<String>,
    database: Option<String>,
    collection: Option<String>,
) -> DashboardConfig {
    if let Some(uri) = store_uri {
        cfg.store_uri = uri;
    }
    if let Some(db) = database {
        cfg.database = db;
    }
    if let Some(coll) = collection {
        cfg.collection = coll;
    }
    cfg
}

fn connect(cfg: DashboardConfig) -> Result<Dashboard> {
    let uri = cfg.store_uri.clone();
    Dashboard::connect(cfg).with_context(|| format!("cannot open store {uri}"))
}

fn import(cfg: DashboardConfig, csv: &Path) -> Result<()> {
    let store_cfg = cfg.store_config();
    if matches!(store_cfg.scheme(), Some("file") | None) {
        std::fs::create_dir_all(&store_cfg.root)
            .with_context(|| format!("cannot create store root {}", store_cfg.root))?;
    }
    let dash = connect(cfg)?;

    let records = CsvRecordReader::from_path(csv)
        .and_then(|mut r| r.read_all())
        .with_context(|| format!("cannot read {}", csv.display()))?;

    let mut imported = 0usize;
    for record in &records {
        if record.is_empty() {
            tracing::warn!("skipping empty row");
            continue;
        }
        dash.store().create(Some(record))?;
        imported += 1;
    }
    tracing::info!(imported, path = %csv.display(), "import finished");
    println!("imported {imported} records");
    Ok(())
}

fn parse_query(raw: &str) -> Result<Query> {
    let doc: serde_json::Value = serde_json::from_str(raw).context("query is not valid JSON")?;
    Ok(Query::from_document(&doc)?)
}

fn parse_changes(raw: &str) -> Result<Changes> {
    let doc: serde_json::Value = serde_json::from_str(raw).context("changes are not valid JSON")?;
    let Some(obj) = doc.as_object() else {
        bail!("changes must be a JSON object");
    };
    obj.iter()
        .map(|(k, v)| Ok::<_, anyhow::Error>((k.clone(), Scalar::from_json(v)?)))
        .collect()
}

fn browse_events(
    category: RescueCategory,
    breeds: Vec<String>,
    sort: &[String],
    filter: Option<String>,
    select: Option<usize>,
    columns: Vec<String>,
) -> Result<Vec<Event>> {
    let sort_by = sort
        .iter()
        .map(|s| SortKey::parse(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut events = vec![
        Event::CategoryChanged(category),
        Event::BreedsChanged(breeds.into_iter().collect::<BreedSelection>()),
        Event::TableStateChanged(TableState { sort_by, filter }),
        Event::ColumnsSelected(columns.into_iter().collect::<BTreeSet<_>>()),
    ];
    // Without --select the fetch's default selection (row 0) stands.
    if let Some(row) = select {
        events.push(Event::RowSelected(Some(row)));
    }
    Ok(events)
}

fn print_categories() {
    for category in RescueCategory::ALL {
        let query = compile(category, &BreedSelection::new());
        println!("{:<10} {}", category.key(), category.label());
        println!("{:<10} {}", "", explain(&query));
    }
}

fn print_view(session: &Session, page: usize) {
    let view = session.view();
    println!("query: {}", explain(view.query()));
    println!(
        "rows: {} fetched, {} visible, page {}/{}",
        view.fetched().len(),
        view.visible().len(),
        page.max(1),
        session.page_count()
    );

    let columns = session.columns();
    let highlighted = view.selected_columns();
    let header: Vec<String> = columns
        .iter()
        .map(|c| if highlighted.contains(c) { format!("[{c}]") } else { c.clone() })
        .collect();
    println!("{}", header.join(" | "));

    let offset = (page.max(1) - 1) * session.page_size();
    for (i, row) in session.page(page.max(1) - 1).iter().enumerate() {
        let marker = if view.selected_row() == Some(offset + i) { ">" } else { " " };
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{marker} {}", cells.join(" | "));
    }

    match session.chart() {
        ChartSummary::Placeholder { message } => println!("chart: {message}"),
        ChartSummary::Pie { title, slices } => {
            println!("chart: {title}");
            for s in slices {
                println!("  {:<32} {:>5} {:>6.1}%", s.label, s.count, s.fraction * 100.0);
            }
        }
    }

    let map = session.map();
    match &map.marker {
        Some(m) => {
            println!(
                "map: ({:.4}, {:.4}) zoom {} tooltip {:?}",
                map.center.lat, map.center.long, map.zoom, m.tooltip
            );
            println!("  {}", m.popup.title);
            for line in m.popup.lines() {
                println!("  {line}");
            }
        }
        None => println!(
            "map: ({:.4}, {:.4}) zoom {} (no selection)",
            map.center.lat, map.center.long, map.zoom
        ),
    }
}
