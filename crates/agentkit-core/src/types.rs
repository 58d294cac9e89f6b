use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CapabilityKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Skill,
    Workflow,
    Command,
}

impl CapabilityKind {
    pub fn all() -> &'static [CapabilityKind] {
        &[
            CapabilityKind::Skill,
            CapabilityKind::Workflow,
            CapabilityKind::Command,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityKind::Skill => "skill",
            CapabilityKind::Workflow => "workflow",
            CapabilityKind::Command => "command",
        }
    }

    /// Directory (and id prefix) that holds capabilities of this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            CapabilityKind::Skill => "skills",
            CapabilityKind::Workflow => "workflows",
            CapabilityKind::Command => "commands",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CapabilityKind {
    type Err = crate::error::AgentkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" | "skills" => Ok(CapabilityKind::Skill),
            "workflow" | "workflows" => Ok(CapabilityKind::Workflow),
            "command" | "commands" => Ok(CapabilityKind::Command),
            _ => Err(crate::error::AgentkitError::InvalidKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CapabilityStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityStatus {
    Draft,
    #[default]
    Stable,
    Deprecated,
}

impl CapabilityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityStatus::Draft => "draft",
            CapabilityStatus::Stable => "stable",
            CapabilityStatus::Deprecated => "deprecated",
        }
    }

    /// Preference used when recommendation scores tie. Lower sorts first.
    pub fn preference(self) -> u8 {
        match self {
            CapabilityStatus::Stable => 0,
            CapabilityStatus::Draft => 1,
            CapabilityStatus::Deprecated => 2,
        }
    }
}

impl fmt::Display for CapabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CapabilityStatus {
    type Err = crate::error::AgentkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CapabilityStatus::Draft),
            "stable" => Ok(CapabilityStatus::Stable),
            "deprecated" => Ok(CapabilityStatus::Deprecated),
            _ => Err(crate::error::AgentkitError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// Kind of edge a capability declares towards another capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Requires,
    Optional,
    Suggests,
    Conflicts,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Requires => "requires",
            Relation::Optional => "optional",
            Relation::Suggests => "suggests",
            Relation::Conflicts => "conflicts",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_accepts_singular_and_plural() {
        assert_eq!(CapabilityKind::from_str("skill").unwrap(), CapabilityKind::Skill);
        assert_eq!(
            CapabilityKind::from_str("workflows").unwrap(),
            CapabilityKind::Workflow
        );
        assert!(CapabilityKind::from_str("plugin").is_err());
    }

    #[test]
    fn kind_yaml_roundtrip() {
        let yaml = serde_yaml::to_string(&CapabilityKind::Command).unwrap();
        assert_eq!(yaml.trim(), "command");
        let parsed: CapabilityKind = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, CapabilityKind::Command);
    }

    #[test]
    fn stable_is_preferred() {
        assert!(CapabilityStatus::Stable.preference() < CapabilityStatus::Draft.preference());
        assert!(
            CapabilityStatus::Draft.preference() < CapabilityStatus::Deprecated.preference()
        );
    }

    #[test]
    fn status_from_str_rejects_unknown() {
        assert!(matches!(
            CapabilityStatus::from_str("beta"),
            Err(crate::error::AgentkitError::InvalidStatus(s)) if s == "beta"
        ));
    }
}
