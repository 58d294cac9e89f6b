//! Reading capability documents from disk.
//!
//! One YAML document per capability. Fields are kept loose here; the loader
//! decides what a well-formed record is.

use crate::error::{AgentkitError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// RawCapability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCapability {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub status: Option<String>,
    #[serde(default, alias = "required_dependencies")]
    pub requires: Vec<String>,
    #[serde(default, alias = "optional_dependencies")]
    pub optional: Vec<String>,
    #[serde(default, alias = "suggested_dependencies")]
    pub suggests: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Hand-written YAML often has `version: 2` or `name: 404`; integers and
/// booleans are taken verbatim. Floats are rejected because their text does
/// not survive parsing (`1.50` would read back as `1.5`), so they must be quoted.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    value
        .map(|s| match s {
            Scalar::Str(s) => Ok(s),
            Scalar::Int(i) => Ok(i.to_string()),
            Scalar::Float(f) => Err(serde::de::Error::custom(format!(
                "number {f} is ambiguous, quote it as a string"
            ))),
            Scalar::Bool(b) => Ok(b.to_string()),
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// CapabilitySource
// ---------------------------------------------------------------------------

/// A parsed capability document and the place it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySource {
    pub origin: String,
    pub record: RawCapability,
}

impl CapabilitySource {
    pub fn new(origin: impl Into<String>, record: RawCapability) -> Self {
        Self {
            origin: origin.into(),
            record,
        }
    }
}

pub fn parse_str(origin: impl Into<String>, text: &str) -> Result<CapabilitySource> {
    let origin = origin.into();
    let record: RawCapability = serde_yaml::from_str(text).map_err(|e| AgentkitError::Parse {
        origin: origin.clone(),
        message: e.to_string(),
    })?;
    Ok(CapabilitySource::new(origin, record))
}

/// Read every `*.yaml` / `*.yml` document under `dir`, recursively, in path order.
///
/// A directory that does not exist contributes nothing. A path that exists
/// but is not a directory is an error.
pub fn read_dir(dir: &Path) -> Result<Vec<CapabilitySource>> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "capability directory missing, skipping");
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(AgentkitError::Parse {
            origin: dir.display().to_string(),
            message: "catalog path is not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    collect_yaml_files(dir, &mut files)?;
    files.sort();

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(&path)?;
        sources.push(parse_str(path.display().to_string(), &text)?);
    }
    tracing::debug!(dir = %dir.display(), count = sources.len(), "read capability documents");
    Ok(sources)
}

pub fn read_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<Vec<CapabilitySource>> {
    let mut sources = Vec::new();
    for dir in dirs {
        sources.extend(read_dir(dir.as_ref())?);
    }
    Ok(sources)
}

fn collect_yaml_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_yaml_files(&path, out)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        ) {
            out.push(path);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_full_document() {
        let yaml = r#"
id: workflows/bug-fix
kind: workflow
name: Bug Fix
description: Reproduce, fix, and verify a defect
version: 1.2.0
status: stable
requires: [skills/testing, skills/debugging]
optional: [skills/code-review]
suggests: [commands/status]
conflicts: []
tags: [quality, maintenance]
"#;
        let src = parse_str("bug-fix.yaml", yaml).unwrap();
        assert_eq!(src.origin, "bug-fix.yaml");
        assert_eq!(src.record.id.as_deref(), Some("workflows/bug-fix"));
        assert_eq!(src.record.requires, vec!["skills/testing", "skills/debugging"]);
        assert_eq!(src.record.suggests, vec!["commands/status"]);
        assert_eq!(src.record.tags.len(), 2);
    }

    #[test]
    fn numeric_scalars_become_strings() {
        let src = parse_str("x.yaml", "id: skills/x\nkind: skill\nname: 404\nversion: 2\n").unwrap();
        assert_eq!(src.record.name.as_deref(), Some("404"));
        assert_eq!(src.record.version.as_deref(), Some("2"));
    }

    #[test]
    fn float_scalars_are_rejected() {
        for yaml in ["id: skills/x\nversion: 1.0\n", "id: skills/x\nname: 1.50\n"] {
            match parse_str("x.yaml", yaml).unwrap_err() {
                AgentkitError::Parse { origin, message } => {
                    assert_eq!(origin, "x.yaml");
                    assert!(message.contains("quote it"), "{message}");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
        let src = parse_str("x.yaml", "id: skills/x\nversion: \"1.0\"\n").unwrap();
        assert_eq!(src.record.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn long_field_names_are_accepted() {
        let src = parse_str(
            "x.yaml",
            "id: skills/x\nrequired_dependencies: [skills/y]\noptional_dependencies: [skills/z]\n",
        )
        .unwrap();
        assert_eq!(src.record.requires, vec!["skills/y"]);
        assert_eq!(src.record.optional, vec!["skills/z"]);
    }

    #[test]
    fn parse_error_names_origin() {
        let err = parse_str("broken.yaml", "id: [unclosed").unwrap_err();
        match err {
            AgentkitError::Parse { origin, .. } => assert_eq!(origin, "broken.yaml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_dir_walks_tree_in_path_order() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("skills")).unwrap();
        std::fs::create_dir_all(dir.path().join("workflows")).unwrap();
        std::fs::write(
            dir.path().join("workflows/release.yaml"),
            "id: workflows/release\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("skills/testing.yml"), "id: skills/testing\n").unwrap();
        std::fs::write(dir.path().join("skills/notes.md"), "# not a capability\n").unwrap();
        std::fs::write(dir.path().join("skills/.draft.yaml"), "id: skills/hidden\n").unwrap();

        let sources = read_dir(dir.path()).unwrap();
        let ids: Vec<_> = sources
            .iter()
            .map(|s| s.record.id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["skills/testing", "workflows/release"]);
    }

    #[test]
    fn read_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let sources = read_dir(&dir.path().join("nope")).unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn read_file_instead_of_dir_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("capabilities.yaml");
        std::fs::write(&file, "id: skills/x\n").unwrap();
        assert!(matches!(
            read_dir(&file),
            Err(AgentkitError::Parse { origin, .. }) if origin == file.display().to_string()
        ));
    }
}
