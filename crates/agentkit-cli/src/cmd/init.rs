use agentkit_core::{
    agent::AgentConfig, catalog::builtin, config::Config, io, paths, types::CapabilityKind,
    AgentkitError,
};
use anyhow::Context;
use std::path::Path;

/// Marker that opens the managed agentkit section in AGENTS.md.
pub const SECTION_START: &str = "<!-- agentkit:start -->";
/// Closing marker for the managed agentkit section in AGENTS.md.
pub const SECTION_END: &str = "<!-- agentkit:end -->";

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = default_project_name(root);

    println!("Initializing agentkit in: {}", root.display());

    // 1. Directory structure
    for dir in [paths::AGENTKIT_DIR, paths::CAPABILITIES_DIR, paths::AGENTS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }
    for kind in CapabilityKind::all() {
        let p = paths::capabilities_dir(root).join(kind.dir_name());
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    // 2. config.yaml
    if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::new(&project_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    // 3. Seed catalog; hand-edited documents are never overwritten
    let mut seeded = 0;
    for (id, doc) in builtin::DOCUMENTS {
        let path = paths::capability_file(root, id);
        if io::write_if_missing(&path, doc.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?
        {
            seeded += 1;
        }
    }
    println!(
        "  seeded:  {seeded} of {} capabilities in {}",
        builtin::DOCUMENTS.len(),
        paths::CAPABILITIES_DIR
    );

    // 4. Project documents
    write_if_missing_reported(
        &paths::project_status_md_path(root),
        paths::PROJECT_STATUS_MD,
        &project_status_template(&project_name),
    )?;
    write_if_missing_reported(
        &paths::branching_md_path(root),
        paths::BRANCHING_MD,
        BRANCHING_TEMPLATE,
    )?;

    // 5. AGENTS.md managed section
    let agents = AgentConfig::list(root).context("failed to list agents")?;
    println!("{}", write_agents_md(root, &project_name, &agents)?);

    println!("\nagentkit initialized. Run 'agentkit catalog list' to see available capabilities.");
    Ok(())
}

/// Rewrite the managed AGENTS.md section from the agents currently on disk.
pub fn refresh_agents_md(root: &Path) -> anyhow::Result<AgentsMdUpdate> {
    let project_name = match Config::load(root) {
        Ok(cfg) => cfg.project.name,
        Err(AgentkitError::NotInitialized) => default_project_name(root),
        Err(e) => return Err(e).context("failed to load config"),
    };
    let agents = AgentConfig::list(root).context("failed to list agents")?;
    write_agents_md(root, &project_name, &agents)
}

fn default_project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

fn write_if_missing_reported(path: &Path, label: &str, content: &str) -> anyhow::Result<()> {
    if io::write_if_missing(path, content.as_bytes())
        .with_context(|| format!("failed to write {label}"))?
    {
        println!("  created: {label}");
    } else {
        println!("  exists:  {label}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// AGENTS.md
// ---------------------------------------------------------------------------

/// What [`write_agents_md`] did to AGENTS.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentsMdUpdate {
    Created,
    Refreshed,
    Appended,
    /// Start marker present without an end marker; file left untouched.
    Skipped,
}

impl std::fmt::Display for AgentsMdUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = paths::AGENTS_MD;
        match self {
            AgentsMdUpdate::Created => write!(f, "  created: {file}"),
            AgentsMdUpdate::Refreshed => write!(f, "  updated: {file} (agentkit section refreshed)"),
            AgentsMdUpdate::Appended => write!(f, "  updated: {file} (agentkit section added)"),
            AgentsMdUpdate::Skipped => write!(
                f,
                "  warning: {file} has agentkit:start but no agentkit:end marker; skipped"
            ),
        }
    }
}

/// Write or refresh the agentkit section in AGENTS.md.
///
/// - Creates AGENTS.md with markers if it doesn't exist.
/// - Replaces content between the markers if present.
/// - Appends a marked section if AGENTS.md has none yet.
pub fn write_agents_md(
    root: &Path,
    project_name: &str,
    agents: &[AgentConfig],
) -> anyhow::Result<AgentsMdUpdate> {
    let path = paths::agents_md_path(root);
    let section = build_marked_section(agents);

    if !path.exists() {
        let content = format!("# AGENTS.md\n\nAgent instructions for {project_name}.\n\n{section}\n");
        io::atomic_write(&path, content.as_bytes())?;
        return Ok(AgentsMdUpdate::Created);
    }

    let existing = std::fs::read_to_string(&path)?;
    if existing.contains(SECTION_START) {
        if io::replace_between_markers(&path, SECTION_START, SECTION_END, &section)? {
            Ok(AgentsMdUpdate::Refreshed)
        } else {
            tracing::warn!("AGENTS.md has a start marker but no end marker");
            Ok(AgentsMdUpdate::Skipped)
        }
    } else {
        io::append_text(&path, &format!("\n\n{section}\n"))?;
        Ok(AgentsMdUpdate::Appended)
    }
}

fn build_marked_section(agents: &[AgentConfig]) -> String {
    let mut inner = String::from(
        "\n\n## agentkit\n\n\
        Agents in this project are composed from the capability catalog in \
        `.agentkit/capabilities/`. Manage them with `agentkit agent ...`; \
        do not edit this section by hand.\n\n\
        ### Agents\n\n",
    );

    if agents.is_empty() {
        inner.push_str("_No agents yet. Create one with `agentkit agent create <name> --capability <id>`._\n");
    } else {
        for agent in agents {
            inner.push_str(&format!("- **{}**", agent.name));
            if let Some(desc) = &agent.description {
                inner.push_str(&format!(": {desc}"));
            }
            inner.push('\n');
            if !agent.capabilities.is_empty() {
                inner.push_str(&format!("  - capabilities: {}\n", agent.capabilities.join(", ")));
            }
            if !agent.files.is_empty() {
                inner.push_str(&format!("  - read first: {}\n", agent.files.join(", ")));
            }
        }
    }

    inner.push_str(
        "\n### Key Commands\n\n\
        - `agentkit catalog list`: list capabilities\n\
        - `agentkit agent validate <id>...`: check a capability set\n\
        - `agentkit agent recommend <id>...`: suggest additions\n\
        - `agentkit agent show <name>`: re-validate a saved agent\n\n",
    );

    format!("{SECTION_START}{inner}{SECTION_END}")
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

fn project_status_template(project_name: &str) -> String {
    format!(
        "# Project Status: {project_name}\n\n\
        ## Current Focus\n\n\
        _What is being worked on right now._\n\n\
        ## Recently Completed\n\n\
        - agentkit initialized\n\n\
        ## Blockers\n\n\
        _None._\n"
    )
}

const BRANCHING_TEMPLATE: &str = "# Branching\n\n\
## Branch Names\n\n\
- `feature/<slug>` for new functionality\n\
- `fix/<slug>` for bug fixes\n\
- `chore/<slug>` for maintenance\n\n\
## Rules\n\n\
- Branch from `main`; keep branches short-lived.\n\
- Rebase on `main` before opening a pull request.\n\
- Never push directly to `main`.\n";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
