use crate::output::{print_json, print_section, print_table};
use agentkit_core::{
    catalog::{self, CapabilityCatalog, CapabilityRecord},
    compose::check_catalog,
    config::Config,
    types::CapabilityKind,
};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// List capabilities
    List {
        /// Only show one kind: skill, workflow, or command
        #[arg(long)]
        kind: Option<CapabilityKind>,
    },
    /// Show one capability and what depends on it
    Show { id: String },
    /// Check the whole catalog for dangling references and dependency cycles
    Check,
}

pub fn run(root: &Path, subcmd: CatalogSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, catalog) = load_catalog(root)?;
    match subcmd {
        CatalogSubcommand::List { kind } => list(&catalog, kind, json),
        CatalogSubcommand::Show { id } => show(&catalog, &id, json),
        CatalogSubcommand::Check => check(&catalog, json),
    }
}

/// Load the project config and the catalog from its configured directories.
pub fn load_catalog(root: &Path) -> anyhow::Result<(Config, CapabilityCatalog)> {
    let config = Config::load(root).context("failed to load config")?;
    let dirs = config.catalog_dirs(root);
    let catalog = catalog::load_dirs(&dirs).context("failed to load capability catalog")?;
    tracing::debug!(capabilities = catalog.len(), "catalog loaded");
    Ok((config, catalog))
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(catalog: &CapabilityCatalog, kind: Option<CapabilityKind>, json: bool) -> anyhow::Result<()> {
    let records: Vec<&CapabilityRecord> = match kind {
        Some(k) => catalog.by_kind(k).collect(),
        None => catalog.iter().collect(),
    };

    if json {
        let items: Vec<serde_json::Value> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "kind": r.kind,
                    "name": r.name,
                    "version": r.version,
                    "status": r.status,
                })
            })
            .collect();
        return print_json(&items);
    }

    if records.is_empty() {
        println!("No capabilities.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.kind.to_string(),
                r.status.to_string(),
                r.version.clone(),
                r.name.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "KIND", "STATUS", "VERSION", "NAME"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(catalog: &CapabilityCatalog, id: &str, json: bool) -> anyhow::Result<()> {
    let record = catalog.require(id)?;
    let required_by: Vec<&str> = catalog
        .iter()
        .filter(|r| r.required_dependencies.iter().any(|d| d == id))
        .map(|r| r.id.as_str())
        .collect();

    if json {
        let mut value = serde_json::to_value(record)?;
        value["required_by"] = serde_json::json!(required_by);
        return print_json(&value);
    }

    println!("{} ({}, v{}, {})", record.id, record.kind, record.version, record.status);
    println!("Name: {}", record.name);
    if !record.description.is_empty() {
        println!("Description: {}", record.description);
    }
    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        println!("Tags: {}", tags.join(", "));
    }
    println!("Origin: {}", record.origin);
    print_section("Requires", &record.required_dependencies);
    print_section("Optional", &record.optional_dependencies);
    print_section("Suggests", &record.suggested_dependencies);
    let mut conflicts: Vec<String> = record.declared_conflicts.iter().cloned().collect();
    conflicts.extend(record.implied_conflicts().map(|id| format!("{id} (implied)")));
    print_section("Conflicts", &conflicts);
    print_section("Required by", &required_by);
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn check(catalog: &CapabilityCatalog, json: bool) -> anyhow::Result<()> {
    let report = check_catalog(catalog);

    if json {
        print_json(&report)?;
    } else if report.is_consistent {
        println!("Catalog OK: {} capabilities, no problems.", report.capabilities);
    } else {
        print_section("Missing references", &report.missing_references);
        let cycles: Vec<String> = report.cycles.iter().map(|c| format_cycle(c)).collect();
        print_section("Dependency cycles", &cycles);
    }

    if !report.is_consistent {
        anyhow::bail!(
            "catalog check found {} missing reference(s) and {} cycle(s)",
            report.missing_references.len(),
            report.cycles.len()
        );
    }
    Ok(())
}

/// `a -> b -> a`
pub fn format_cycle(cycle: &[String]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first);
    }
    parts.join(" -> ")
}
