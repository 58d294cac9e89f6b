use crate::error::{AgentkitError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// AgentConfig
// ---------------------------------------------------------------------------

/// A named selection of capabilities, persisted at `.agentkit/agents/<name>.yaml`.
///
/// Only the requested ids are stored. The resolved set is recomputed against
/// the current catalog whenever the agent is shown or validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Project files the agent should read before working.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>, capabilities: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: None,
            capabilities,
            instructions: None,
            files: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    /// Persist a new agent. Fails if the name is not a valid slug or an agent
    /// with that name already exists.
    pub fn create(self, root: &Path) -> Result<Self> {
        paths::validate_slug(&self.name)?;
        if paths::agent_file(root, &self.name).exists() {
            return Err(AgentkitError::AgentExists(self.name));
        }
        self.save(root)?;
        tracing::debug!(agent = %self.name, "created agent");
        Ok(self)
    }

    pub fn load(root: &Path, name: &str) -> Result<Self> {
        paths::validate_slug(name)?;
        let file = paths::agent_file(root, name);
        if !file.exists() {
            return Err(AgentkitError::AgentNotFound(name.to_string()));
        }
        let data = std::fs::read_to_string(&file)?;
        let agent: AgentConfig = serde_yaml::from_str(&data)?;
        Ok(agent)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let file = paths::agent_file(root, &self.name);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&file, data.as_bytes())
    }

    /// All persisted agents, sorted by name. Files that fail to parse are
    /// skipped with a warning.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::agents_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut agents = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("yaml")
            {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match Self::load(root, name) {
                Ok(a) => agents.push(a),
                Err(AgentkitError::AgentNotFound(_) | AgentkitError::InvalidSlug(_)) => {}
                Err(AgentkitError::Yaml(e)) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping unreadable agent file");
                }
                Err(e) => return Err(e),
            }
        }
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(agents)
    }

    pub fn delete(root: &Path, name: &str) -> Result<()> {
        paths::validate_slug(name)?;
        let file = paths::agent_file(root, name);
        if !file.exists() {
            return Err(AgentkitError::AgentNotFound(name.to_string()));
        }
        std::fs::remove_file(&file)?;
        tracing::debug!(agent = %name, "deleted agent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
