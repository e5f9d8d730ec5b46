//! CLI entry point for `normalyzer`.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use normalyzer::catalog::memory::{MemoryCatalog, MemoryTable};
use normalyzer::catalog::value::Value;
use normalyzer::config::AnalysisConfig;
use normalyzer::detector;
use normalyzer::oracle::FdOracle;
use normalyzer::planner;
use normalyzer::render::{self, RenderStrategy};
use normalyzer::structure::builder;
use normalyzer::structure::model::{AttributeSpec, KeyToken, TableStructure};
use normalyzer::structure::validate;

#[derive(Parser)]
#[command(
    name = "normalyzer",
    about = "Analyze tables against a declared schema and generate normalization SQL"
)]
struct Cli {
    /// Structure CSV with headers: table, attribute, type, key, functional_dependency
    #[arg(long)]
    structure: PathBuf,

    /// Table data as `Table=path.csv` (repeatable)
    #[arg(long = "data", value_parser = parse_data_arg)]
    data: Vec<(String, PathBuf)>,

    /// Tables to analyze (defaults to every table with data)
    #[arg(long = "table")]
    tables: Vec<String>,

    /// Schema name used in generated SQL
    #[arg(long, default_value = "dbo")]
    schema: String,

    /// Render strategy: transactional or rebuild
    #[arg(long, default_value = "transactional")]
    strategy: RenderStrategy,

    /// Maximum rows sampled per table (0 = unlimited)
    #[arg(long)]
    sample_rows: Option<usize>,

    /// Disable single-column FD inference
    #[arg(long)]
    no_infer: bool,

    /// Treat NULL dependents as distinct values in the 2NF scan
    #[arg(long)]
    fd_check_nulls: bool,

    /// Require determinant groups of at least this many rows
    #[arg(long, default_value_t = 1)]
    min_support: usize,

    /// Treat a bare FK token (no declared target) as an error
    #[arg(long)]
    require_fk_target: bool,

    /// Output directory
    #[arg(long, default_value = "normalyzer-output")]
    output_dir: PathBuf,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    // Stage 1: load and validate the declared structure.
    let rows = match read_structure_csv(&cli.structure) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.structure.display());
            process::exit(2);
        }
    };

    let outcome = validate::validate_rows(&rows, cli.require_fk_target);
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if !outcome.is_ok() {
        for error in &outcome.errors {
            eprintln!("error: {error}");
        }
        process::exit(2);
    }

    let structures = match builder::build_structures(&rows) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Structure error: {e}");
            process::exit(2);
        }
    };

    // Stage 2: load table data into the in-memory catalog.
    let mut catalog = MemoryCatalog::new();
    for (table, path) in &cli.data {
        let Some(structure) = builder::lookup(&structures, table) else {
            eprintln!("Table '{table}' has data but is not declared in the structure file");
            process::exit(2);
        };
        match read_data_csv(path, structure) {
            Ok(mem_table) => catalog.insert(&cli.schema, &structure.name, mem_table),
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                process::exit(2);
            }
        }
    }

    let targets: Vec<String> = if cli.tables.is_empty() {
        cli.data.iter().map(|(t, _)| t.clone()).collect()
    } else {
        cli.tables.clone()
    };
    if targets.is_empty() {
        eprintln!("No tables to analyze: pass --data and/or --table");
        process::exit(2);
    }

    let config = AnalysisConfig {
        sample_rows: match cli.sample_rows {
            Some(0) => None,
            Some(n) => Some(n),
            None => AnalysisConfig::default().sample_rows,
        },
        infer_single_col_fds: !cli.no_infer,
        fd_check_nulls: cli.fd_check_nulls,
        min_group_support: cli.min_support,
    };
    let oracle = FdOracle::with_min_support(config.min_group_support);

    if let Err(e) = std::fs::create_dir_all(&cli.output_dir) {
        eprintln!("Error creating {}: {e}", cli.output_dir.display());
        process::exit(2);
    }

    // Stage 3: analyze, plan, and render each requested table.
    let mut any_violations = false;
    for target in &targets {
        let Some(structure) = builder::lookup(&structures, target) else {
            eprintln!("Table '{target}' is not declared in the structure file");
            process::exit(2);
        };
        let name = structure.name.clone();

        let report =
            match detector::analyze(&cli.schema, &name, structure, &catalog, &oracle, &config) {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Analysis failed for {name}: {e}");
                    process::exit(2);
                }
            };
        if cli.verbose {
            eprintln!(
                "{name}: {} atomic issue(s), {} repeated group(s), {} partial, {} transitive",
                report.atomic_issues.len(),
                report.repeated_groups.len(),
                report.partial_dependencies.len(),
                report.transitive_dependencies.len()
            );
        }
        any_violations |= !report.is_clean();

        let plan = planner::build_plan(&name, structure, &report);
        let sql = render::render(&cli.schema, &name, &plan, cli.strategy);

        if let Err(e) = write_outputs(&cli.output_dir, &name, &report, &sql) {
            eprintln!("Error writing output for {name}: {e}");
            process::exit(2);
        }
    }

    // Non-zero exit when violations were found, for scripted use.
    if any_violations {
        process::exit(1);
    }
}

fn parse_data_arg(s: &str) -> Result<(String, PathBuf), String> {
    let (table, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected Table=path.csv, got '{s}'"))?;
    if table.trim().is_empty() || path.trim().is_empty() {
        return Err(format!("expected Table=path.csv, got '{s}'"));
    }
    Ok((table.trim().to_string(), PathBuf::from(path.trim())))
}

fn read_structure_csv(path: &Path) -> Result<Vec<AttributeSpec>, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| e.to_string())?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let index_of = |name: &str| headers.iter().position(|h| h == name);
    let required = ["table", "attribute", "type", "key"];
    for col in required {
        if index_of(col).is_none() {
            return Err(format!("missing required column: {col}"));
        }
    }
    let t_idx = index_of("table").unwrap_or(0);
    let a_idx = index_of("attribute").unwrap_or(0);
    let ty_idx = index_of("type").unwrap_or(0);
    let k_idx = index_of("key").unwrap_or(0);
    let fd_idx = index_of("functional_dependency");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        let field = |idx: usize| record.get(idx).unwrap_or("");
        rows.push(AttributeSpec::new(
            field(t_idx),
            field(a_idx),
            field(ty_idx),
            field(k_idx),
            fd_idx.map_or("", field),
        ));
    }
    Ok(rows)
}

fn read_data_csv(path: &Path, structure: &TableStructure) -> Result<MemoryTable, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| e.to_string())?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let pk: Vec<String> = structure
        .attributes()
        .iter()
        .filter(|a| structure.key_tokens(a).iter().any(KeyToken::is_primary))
        .cloned()
        .collect();
    let unique: Vec<String> = structure.declared_unique();

    let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    let mut table = MemoryTable::new(&column_refs)
        .with_primary_key(&pk.iter().map(String::as_str).collect::<Vec<_>>());
    for col in &unique {
        table = table.with_unique_set(&[col.as_str()]);
    }

    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        let mut row = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            row.push(Value::from_csv_field(record.get(i).unwrap_or("")));
        }
        table = table.with_row(row);
    }
    Ok(table)
}

fn write_outputs(
    output_dir: &Path,
    table: &str,
    report: &normalyzer::detector::report::ViolationReport,
    sql: &str,
) -> Result<(), String> {
    let report_path = output_dir.join(format!("{table}_analysis.json"));
    let json = serde_json::to_string_pretty(report).map_err(|e| e.to_string())?;
    std::fs::write(&report_path, json)
        .map_err(|e| format!("failed to write {}: {e}", report_path.display()))?;

    let sql_path = output_dir.join(format!("{table}_migration.sql"));
    std::fs::write(&sql_path, sql)
        .map_err(|e| format!("failed to write {}: {e}", sql_path.display()))?;
    Ok(())
}
