//! CLI tool for CCD acceptance-testing result files.
//!
//! Provides commands for:
//! - Validating a result file and the files it references
//! - Inspecting the records a file holds
//! - Regenerating referenced-file hashes

mod cli;

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use lcatr_core::record::{RecordKind, RecordSummary};
use lcatr_core::{FileLocator, LocatorConfig, ResultFile, SchemaRegistry};

use cli::{Cli, Commands};

fn locator_config(cli: &Cli) -> LocatorConfig {
    let mut config = LocatorConfig::from_env();
    if let Some(root) = &cli.root {
        config.root = Some(root.clone());
    }
    if let Some(path) = &cli.path {
        config.search_path = LocatorConfig::from_vars(None, Some(path)).search_path;
    }
    config
}

fn read_file(path: &Path, registry: &SchemaRegistry) -> anyhow::Result<ResultFile> {
    ResultFile::read(path, registry).with_context(|| format!("Failed to read {}", path.display()))
}

fn validate(path: &Path, registry: &SchemaRegistry, locator: &FileLocator) -> anyhow::Result<()> {
    let file = read_file(path, registry)?;
    let primary = file.primary().map(|r| r.name()).unwrap_or_default();
    match registry.file_schema_for(primary) {
        Some(schema) => schema.check_composition(&file)?,
        None => tracing::warn!("No file schema has primary record '{}'", primary),
    }
    file.validate_all_with(locator)
        .with_context(|| format!("{} failed validation", path.display()))?;
    println!("{}: OK ({} records)", path.display(), file.len());
    Ok(())
}

fn info(path: &Path, json: bool, registry: &SchemaRegistry, locator: &FileLocator) -> anyhow::Result<()> {
    let file = read_file(path, registry)?;
    let summaries: Vec<RecordSummary> = file
        .records()
        .iter()
        .map(|record| RecordSummary {
            error: record.validate_with(locator).err().map(|e| e.to_string()),
            ..record.summary()
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for summary in &summaries {
        println!(
            "{} (version {}, {:?}, {} rows)",
            summary.name,
            summary.version.map_or_else(|| "?".to_string(), |v| v.to_string()),
            summary.kind,
            summary.rows
        );
        for field in &summary.fields {
            println!(
                "  {:<8} = {:<32} / {}",
                field.name,
                field.value.as_deref().unwrap_or("<unset>"),
                field.comment
            );
        }
        for column in &summary.columns {
            println!("  [{}] {} ({})", column.format, column.name, column.ty);
        }
        if let Some(error) = &summary.error {
            println!("  INVALID: {}", error);
        }
    }
    Ok(())
}

fn rehash(
    path: &Path,
    output: Option<&Path>,
    registry: &SchemaRegistry,
    locator: &FileLocator,
) -> anyhow::Result<()> {
    let mut file = read_file(path, registry)?;
    let mut rehashed = 0;
    for record in file.records_mut() {
        if record.kind() == RecordKind::FileRefs {
            record.generate(locator)?;
            rehashed += 1;
        }
    }
    if rehashed == 0 {
        bail!("{} holds no file-reference records", path.display());
    }
    let target = output.unwrap_or(path);
    file.write(target)?;
    println!(
        "Rehashed {} file-reference records into {}",
        rehashed,
        target.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    let registry = SchemaRegistry::with_builtin()?;
    let locator = FileLocator::new(&locator_config(&cli));

    match &cli.command {
        Commands::Validate { file } => validate(file, &registry, &locator),
        Commands::Info { file, json } => info(file, *json, &registry, &locator),
        Commands::Rehash { file, output } => rehash(file, output.as_deref(), &registry, &locator),
    }
}
