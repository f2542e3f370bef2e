use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use mapgen_cli::report::{data_sources_table, mappings_table, source_tables_table, target_tables_table};
use mapgen_cli::script::ScriptSession;
use mapgen_codegen::registration_statements;
use mapgen_persistence::load_data_sources;
use mapgen_wizard::{NameFilter, Wizard};

use crate::cli::{DatasourcesArgs, GenerateArgs, ShowArgs, WizardArgs};

fn load_wizard(config: &std::path::Path) -> Result<Wizard> {
    let mut wizard = Wizard::new();
    let report = wizard
        .load_config(config)
        .with_context(|| format!("load configuration {}", config.display()))?;
    for table in &report.skipped_tables {
        eprintln!("warning: skipped target table {table}");
    }
    for mapping in &report.skipped_mappings {
        eprintln!("warning: skipped mapping for {mapping}");
    }
    Ok(wizard)
}

pub fn run_generate(args: &GenerateArgs) -> Result<()> {
    let span = info_span!("generate", config = %args.config.display());
    let _guard = span.enter();
    let wizard = load_wizard(&args.config)?;
    wizard
        .write_code(&args.generator.options(), &args.output)
        .with_context(|| format!("write {}", args.output.display()))?;
    println!(
        "Generated {} mappings into {}",
        wizard.project().mappings().len(),
        args.output.display()
    );
    Ok(())
}

pub fn run_show(args: &ShowArgs) -> Result<()> {
    let wizard = load_wizard(&args.config)?;
    let pattern = args.filter.as_deref().unwrap_or_default();
    let filter =
        NameFilter::new(pattern, args.match_mode.into()).context("compile filter pattern")?;
    let project = wizard.project();
    println!("{}", source_tables_table(project, &filter));
    println!("{}", target_tables_table(project, &filter));
    println!("{}", mappings_table(project, &filter));
    Ok(())
}

pub fn run_table_code() -> Result<()> {
    let stdin = io::stdin();
    let code = registration_statements(stdin.lock()).context("read table names from stdin")?;
    io::stdout()
        .write_all(code.as_bytes())
        .context("write registration statements")?;
    Ok(())
}

pub fn run_datasources(args: &DatasourcesArgs) -> Result<()> {
    let sources = load_data_sources(&args.file)
        .with_context(|| format!("load data sources {}", args.file.display()))?;
    println!("{}", data_sources_table(&sources));
    Ok(())
}

/// Returns `Ok(false)` when any script line failed.
pub fn run_wizard(args: &WizardArgs) -> Result<bool> {
    let wizard = match &args.config {
        Some(config) => load_wizard(config)?,
        None => Wizard::new(),
    };
    let stdout = io::stdout();
    let mut session = ScriptSession::new(wizard, args.generator.options(), stdout.lock());
    let summary = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open script {}", path.display()))?;
            session.run(BufReader::new(file))?
        }
        None => session.run(io::stdin().lock())?,
    };
    info!(
        executed = summary.executed,
        failed = summary.failures.len(),
        "wizard script finished"
    );
    if !summary.is_success() {
        eprintln!(
            "error: {} of {} script lines failed",
            summary.failures.len(),
            summary.executed
        );
    }
    Ok(summary.is_success())
}
