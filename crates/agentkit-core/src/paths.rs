use crate::error::{AgentkitError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const AGENTKIT_DIR: &str = ".agentkit";
pub const CAPABILITIES_DIR: &str = ".agentkit/capabilities";
pub const AGENTS_DIR: &str = ".agentkit/agents";

pub const CONFIG_FILE: &str = ".agentkit/config.yaml";

pub const AGENTS_MD: &str = "AGENTS.md";
pub const PROJECT_STATUS_MD: &str = "PROJECT_STATUS.md";
pub const BRANCHING_MD: &str = "BRANCHING.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn capabilities_dir(root: &Path) -> PathBuf {
    root.join(CAPABILITIES_DIR)
}

/// On-disk location of a capability document, e.g. `skills/testing` →
/// `.agentkit/capabilities/skills/testing.yaml`.
pub fn capability_file(root: &Path, id: &str) -> PathBuf {
    capabilities_dir(root).join(format!("{id}.yaml"))
}

pub fn agents_dir(root: &Path) -> PathBuf {
    root.join(AGENTS_DIR)
}

pub fn agent_file(root: &Path, slug: &str) -> PathBuf {
    agents_dir(root).join(format!("{slug}.yaml"))
}

pub fn agents_md_path(root: &Path) -> PathBuf {
    root.join(AGENTS_MD)
}

pub fn project_status_md_path(root: &Path) -> PathBuf {
    root.join(PROJECT_STATUS_MD)
}

pub fn branching_md_path(root: &Path) -> PathBuf {
    root.join(BRANCHING_MD)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(AgentkitError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
