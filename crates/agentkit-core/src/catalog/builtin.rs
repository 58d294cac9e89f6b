//! Seed catalog written into `.agentkit/capabilities/` by `agentkit init`.

use super::source::{self, CapabilitySource};
use super::CapabilityCatalog;
use crate::error::Result;

/// `(id, document)` pairs. The id doubles as the relative file path.
pub const DOCUMENTS: &[(&str, &str)] = &[
    ("skills/testing", SKILL_TESTING),
    ("skills/debugging", SKILL_DEBUGGING),
    ("skills/code-review", SKILL_CODE_REVIEW),
    ("skills/documentation", SKILL_DOCUMENTATION),
    ("skills/git-workflow", SKILL_GIT_WORKFLOW),
    ("workflows/bug-fix", WORKFLOW_BUG_FIX),
    ("workflows/feature-development", WORKFLOW_FEATURE_DEVELOPMENT),
    ("workflows/release", WORKFLOW_RELEASE),
    ("workflows/spike", WORKFLOW_SPIKE),
    ("commands/status", COMMAND_STATUS),
    ("commands/branch", COMMAND_BRANCH),
];

pub fn sources() -> Result<Vec<CapabilitySource>> {
    DOCUMENTS
        .iter()
        .map(|(id, doc)| source::parse_str(format!("builtin:{id}"), doc))
        .collect()
}

pub fn catalog() -> Result<CapabilityCatalog> {
    super::load(sources()?)
}

const SKILL_TESTING: &str = r#"id: skills/testing
kind: skill
name: Testing
description: Write and run automated tests; keep the suite green.
version: 1.0.0
status: stable
suggests: [skills/code-review]
tags: [quality, testing]
"#;

const SKILL_DEBUGGING: &str = r#"id: skills/debugging
kind: skill
name: Debugging
description: Reproduce failures, bisect, and isolate root causes.
version: 1.0.0
status: stable
suggests: [skills/testing]
tags: [quality, troubleshooting]
"#;

const SKILL_CODE_REVIEW: &str = r#"id: skills/code-review
kind: skill
name: Code Review
description: Review diffs for correctness, clarity, and risk.
version: 1.1.0
status: stable
optional: [skills/testing]
tags: [quality, collaboration]
"#;

const SKILL_DOCUMENTATION: &str = r#"id: skills/documentation
kind: skill
name: Documentation
description: Keep README, AGENTS.md, and PROJECT_STATUS.md current.
version: 1.0.0
status: stable
tags: [docs, collaboration]
"#;

const SKILL_GIT_WORKFLOW: &str = r#"id: skills/git-workflow
kind: skill
name: Git Workflow
description: Follow the branching model described in BRANCHING.md.
version: 1.0.0
status: stable
tags: [git, collaboration]
"#;

const WORKFLOW_BUG_FIX: &str = r#"id: workflows/bug-fix
kind: workflow
name: Bug Fix
description: Reproduce, fix, and verify a defect with a regression test.
version: 1.0.0
status: stable
requires: [skills/testing, skills/debugging]
optional: [skills/code-review]
suggests: [commands/status]
tags: [quality, maintenance]
"#;

const WORKFLOW_FEATURE_DEVELOPMENT: &str = r#"id: workflows/feature-development
kind: workflow
name: Feature Development
description: Plan, implement, test, and document a feature on its own branch.
version: 1.0.0
status: stable
requires: [skills/testing, skills/git-workflow]
optional: [skills/code-review, skills/documentation]
suggests: [workflows/release, commands/branch]
tags: [delivery, quality]
"#;

const WORKFLOW_RELEASE: &str = r#"id: workflows/release
kind: workflow
name: Release
description: Cut a release, update the changelog, and tag it.
version: 1.0.0
status: stable
requires: [skills/git-workflow, skills/documentation]
suggests: [commands/status]
tags: [delivery, git]
"#;

const WORKFLOW_SPIKE: &str = r#"id: workflows/spike
kind: workflow
name: Spike
description: Time-boxed exploration that skips review and release gates.
version: 0.1.0
status: draft
optional: [skills/debugging]
conflicts: [workflows/release]
tags: [exploration]
"#;

const COMMAND_STATUS: &str = r#"id: commands/status
kind: command
name: Status
description: Summarize PROJECT_STATUS.md and open work.
version: 1.0.0
status: stable
optional: [skills/documentation]
tags: [reporting, docs]
"#;

const COMMAND_BRANCH: &str = r#"id: commands/branch
kind: command
name: Branch
description: Create a branch named per BRANCHING.md.
version: 1.0.0
status: stable
requires: [skills/git-workflow]
tags: [git]
"#;
