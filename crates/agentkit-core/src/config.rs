use crate::compose::RecommendationPolicy;
use crate::error::{AgentkitError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// CatalogConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directories scanned for capability documents, relative to the project root.
    #[serde(default = "default_catalog_paths")]
    pub paths: Vec<PathBuf>,
}

fn default_catalog_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(paths::CAPABILITIES_DIR)]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            paths: default_catalog_paths(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub recommendations: RecommendationPolicy,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            catalog: CatalogConfig::default(),
            recommendations: RecommendationPolicy::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(AgentkitError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Catalog directories resolved against `root`.
    pub fn catalog_dirs(&self, root: &Path) -> Vec<PathBuf> {
        self.catalog.paths.iter().map(|p| root.join(p)).collect()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != default_version() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unsupported config version {}", self.version),
            });
        }

        if self.project.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "project.name is empty".to_string(),
            });
        }

        if self.catalog.paths.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "catalog.paths is empty; no capabilities will load".to_string(),
            });
        }
        for path in &self.catalog.paths {
            if path.is_absolute() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "catalog path '{}' is absolute; relative paths keep the project portable",
                        path.display()
                    ),
                });
            }
        }

        if self.recommendations.limit == Some(0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "recommendations.limit is 0; no recommendations will be shown"
                    .to_string(),
            });
        }

        let weights = &self.recommendations.weights;
        if weights.referrer == 0 && weights.tag_overlap == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "all recommendation weights are 0; ranking falls back to status and id"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
