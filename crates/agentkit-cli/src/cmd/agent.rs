use crate::cmd::catalog::{format_cycle, load_catalog};
use crate::cmd::init;
use crate::output::{print_json, print_section, print_table};
use agentkit_core::{
    agent::AgentConfig,
    catalog::CapabilityCatalog,
    compose::{
        recommend, resolve, Recommendation, RecommendationPolicy, ValidationReport, Validator,
    },
};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum AgentSubcommand {
    /// Validate a capability set without saving it
    Validate {
        /// Capability ids (e.g. workflows/bug-fix skills/testing)
        #[arg(required = true)]
        capabilities: Vec<String>,
        /// Maximum number of recommendations to show
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Recommend capabilities to add to a set
    Recommend {
        #[arg(required = true)]
        capabilities: Vec<String>,
        /// Maximum number of recommendations to show
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Create and save an agent configuration
    Create {
        name: String,
        /// Capability id (repeatable: --capability workflows/bug-fix --capability skills/testing)
        #[arg(long = "capability", required = true)]
        capabilities: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        /// Free-text instructions stored with the agent
        #[arg(long)]
        instructions: Option<String>,
        /// Project file the agent should read first (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
        /// Save even if the capability set has conflicts, cycles, or missing references
        #[arg(long)]
        force: bool,
    },
    /// List saved agents
    List,
    /// Show a saved agent, re-validated against the current catalog
    Show { name: String },
    /// Delete a saved agent
    Delete { name: String },
}

pub fn run(root: &Path, subcmd: AgentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AgentSubcommand::Validate {
            capabilities,
            limit,
        } => validate(root, &capabilities, limit, json),
        AgentSubcommand::Recommend {
            capabilities,
            limit,
        } => recommend_cmd(root, &capabilities, limit, json),
        AgentSubcommand::Create {
            name,
            capabilities,
            description,
            instructions,
            files,
            force,
        } => {
            let agent = AgentConfig::new(name, capabilities)
                .with_description(description)
                .with_instructions(instructions)
                .with_files(files);
            create(root, agent, force, json)
        }
        AgentSubcommand::List => list(root, json),
        AgentSubcommand::Show { name } => show(root, &name, json),
        AgentSubcommand::Delete { name } => delete(root, &name, json),
    }
}

/// The project catalog plus the configured recommendation policy, with an
/// optional `--limit` override.
fn catalog_and_policy(
    root: &Path,
    limit: Option<usize>,
) -> anyhow::Result<(CapabilityCatalog, RecommendationPolicy)> {
    let (config, catalog) = load_catalog(root)?;
    Ok((catalog, config.recommendations.with_limit(limit)))
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(
    root: &Path,
    capabilities: &[String],
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let (catalog, policy) = catalog_and_policy(root, limit)?;
    let report = Validator::new(&catalog)
        .with_policy(policy)
        .validate(capabilities)?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    if !report.is_valid {
        anyhow::bail!("capability set is invalid");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// recommend
// ---------------------------------------------------------------------------

fn recommend_cmd(
    root: &Path,
    capabilities: &[String],
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let (catalog, policy) = catalog_and_policy(root, limit)?;
    let resolved = resolve(&catalog, capabilities)?;
    let recs = recommend(&catalog, &resolved.resolved, &policy);

    if json {
        return print_json(&recs);
    }
    if recs.is_empty() {
        println!("No recommendations.");
        return Ok(());
    }
    print_recommendations(&recs);
    Ok(())
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

fn create(root: &Path, agent: AgentConfig, force: bool, json: bool) -> anyhow::Result<()> {
    let (catalog, policy) = catalog_and_policy(root, None)?;
    let report = Validator::new(&catalog)
        .with_policy(policy)
        .validate(&agent.capabilities)?;

    if !report.is_valid && !force {
        if json {
            print_json(&serde_json::json!({ "validation": report }))?;
        } else {
            print_problems(&report);
        }
        anyhow::bail!(
            "refusing to save invalid agent '{}' (use --force to save anyway)",
            agent.name
        );
    }
    if !report.is_valid {
        tracing::warn!(agent = %agent.name, "saving invalid agent because --force was given");
    }

    let agent = agent.create(root).context("failed to create agent")?;
    let update = init::refresh_agents_md(root)?;

    if json {
        print_json(&serde_json::json!({
            "agent": agent,
            "validation": report,
        }))?;
    } else {
        println!("Created agent '{}'.", agent.name);
        if !report.is_valid {
            print_problems(&report);
        }
        println!("{update}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let agents = AgentConfig::list(root).context("failed to list agents")?;

    if json {
        return print_json(&agents);
    }
    if agents.is_empty() {
        println!("No agents.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = agents
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.capabilities.len().to_string(),
                a.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["NAME", "CAPABILITIES", "DESCRIPTION"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let agent = AgentConfig::load(root, name)
        .with_context(|| format!("failed to load agent '{name}'"))?;
    let (catalog, policy) = catalog_and_policy(root, None)?;
    let report = Validator::new(&catalog)
        .with_policy(policy)
        .validate(&agent.capabilities)?;

    if json {
        return print_json(&serde_json::json!({
            "agent": agent,
            "validation": report,
        }));
    }

    println!("Agent: {}", agent.name);
    if let Some(desc) = &agent.description {
        println!("Description: {desc}");
    }
    println!("Created: {}", agent.created_at.format("%Y-%m-%d %H:%M UTC"));
    print_section("Files", &agent.files);
    if let Some(instructions) = &agent.instructions {
        println!("Instructions:\n{instructions}");
    }
    println!();
    print_report(&report);
    Ok(())
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

fn delete(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    AgentConfig::delete(root, name).with_context(|| format!("failed to delete agent '{name}'"))?;
    let update = init::refresh_agents_md(root)?;

    if json {
        print_json(&serde_json::json!({ "deleted": name }))?;
    } else {
        println!("Deleted agent '{name}'.");
        println!("{update}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_report(report: &ValidationReport) {
    println!("Requested: {}", report.requested.join(", "));
    if let Some(resolved) = &report.resolved {
        println!("Resolved ({}):", resolved.resolved.len());
        for id in &resolved.resolved {
            match resolved.chain_for(id) {
                Some(chain) => println!("  + {id} (via {})", chain.join(" -> ")),
                None => println!("  - {id}"),
            }
        }
    }
    print_problems(report);
    if !report.recommendations.is_empty() {
        println!("Recommendations:");
        print_recommendations(&report.recommendations);
    }
    println!("{}", if report.is_valid { "Valid." } else { "Invalid." });
}

fn print_problems(report: &ValidationReport) {
    print_section("Missing references", &report.missing_references);
    print_section("Conflicts", &report.conflicts);
    let cycles: Vec<String> = report.cycles.iter().map(|c| format_cycle(c)).collect();
    print_section("Cycles", &cycles);
}

fn print_recommendations(recs: &[Recommendation]) {
    let rows: Vec<Vec<String>> = recs
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.score.to_string(),
                r.status.to_string(),
                r.suggested_by.join(", "),
            ]
        })
        .collect();
    print_table(&["ID", "SCORE", "STATUS", "SUGGESTED BY"], rows);
}
