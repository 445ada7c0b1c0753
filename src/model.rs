//! Migration plan model
//!
//! Everything here is built during a single parse and immutable afterwards.
//! Actions keep the scope they were declared in (`mode: None` for the base
//! block, `Some(name)` for a mode overlay). Accessors return exactly one
//! scope; deciding which modes apply is the executor's job.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

// ============================================================================
// Action Types
// ============================================================================

/// When an operation runs relative to the addon actions of its version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pre,
    Post,
}

/// Addon lifecycle action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AddonKind {
    /// Run with `-i`
    Install,
    /// Run with `-u`
    Upgrade,
    /// Uninstalled by the executor
    Remove,
}

/// A shell command to run before or after the addon actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub phase: Phase,
    pub mode: Option<String>,
    /// Copied verbatim from the descriptor
    pub command: String,
}

/// One addon to install, upgrade or remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddonAction {
    pub kind: AddonKind,
    pub mode: Option<String>,
    pub addon: String,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.phase, self.command)
    }
}

impl fmt::Display for AddonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.addon)
    }
}

// ============================================================================
// Resolved Options
// ============================================================================

/// Options shared by every version of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    /// Command used to run odoo
    pub command: Option<String>,
    /// Extra arguments, already split on whitespace
    pub args: Vec<String>,
    pub addons_path: Option<String>,
    #[serde(skip_serializing)]
    pub dsn: String,
}

// ============================================================================
// Version
// ============================================================================

/// One step of the migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    number: String,
    #[serde(skip_serializing)]
    options: Arc<ResolvedOptions>,
    modes: Vec<String>,
    operations: Vec<Operation>,
    addons: Vec<AddonAction>,
}

impl Version {
    /// Version identifier, as written in the descriptor
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn options(&self) -> &Arc<ResolvedOptions> {
        &self.options
    }

    /// Mode names declared by this version, in document order
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(String::as_str)
    }

    /// Every operation of every scope, in declaration order
    pub fn all_operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Every addon action of every scope, in declaration order
    pub fn all_addons(&self) -> &[AddonAction] {
        &self.addons
    }

    /// Operations of exactly one `(phase, mode)` scope.
    ///
    /// `mode = None` is the base block; it is never merged with a mode's
    /// operations here.
    pub fn operations<'a>(
        &'a self,
        phase: Phase,
        mode: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Operation> + 'a {
        self.operations
            .iter()
            .filter(move |op| op.phase == phase && op.mode.as_deref() == mode)
    }

    /// Addon names of exactly one `(kind, mode)` scope, in order
    pub fn addons<'a>(
        &'a self,
        kind: AddonKind,
        mode: Option<&'a str>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.addons
            .iter()
            .filter(move |a| a.kind == kind && a.mode.as_deref() == mode)
            .map(|a| a.addon.as_str())
    }

    /// True when no scope of this version has anything to do
    pub fn is_noop(&self) -> bool {
        self.operations.is_empty() && self.addons.is_empty()
    }

    fn summarize_scope(&self, mode: Option<&str>, lines: &mut Vec<String>) {
        let label = mode.map_or_else(|| "base".to_string(), |m| format!("mode {}", m));
        let mut scope_lines = Vec::new();
        for phase in Phase::iter() {
            for op in self.operations(phase, mode) {
                scope_lines.push(format!("      {}", op));
            }
        }
        for kind in AddonKind::iter() {
            let names: Vec<&str> = self.addons(kind, mode).collect();
            if !names.is_empty() {
                scope_lines.push(format!("      {}: {}", kind, names.join(", ")));
            }
        }
        if !scope_lines.is_empty() {
            lines.push(format!("    [{}]", label));
            lines.append(&mut scope_lines);
        }
    }
}

/// Accumulates the actions of one version, then freezes into a [`Version`].
#[derive(Debug)]
pub struct VersionBuilder {
    number: String,
    options: Arc<ResolvedOptions>,
    modes: Vec<String>,
    operations: Vec<Operation>,
    addons: Vec<AddonAction>,
}

impl VersionBuilder {
    pub fn new(number: impl Into<String>, options: Arc<ResolvedOptions>) -> Self {
        Self {
            number: number.into(),
            options,
            modes: Vec::new(),
            operations: Vec::new(),
            addons: Vec::new(),
        }
    }

    /// Record a declared mode, even if it turns out to carry no action
    pub fn declare_mode(&mut self, mode: impl Into<String>) {
        let mode = mode.into();
        if !self.modes.contains(&mode) {
            self.modes.push(mode);
        }
    }

    /// Append an operation to the `(phase, mode)` scope
    pub fn add_operation(&mut self, phase: Phase, command: impl Into<String>, mode: Option<&str>) {
        self.operations.push(Operation {
            phase,
            mode: mode.map(str::to_string),
            command: command.into(),
        });
    }

    /// Append addons to the `(kind, mode)` scope, keeping their order
    pub fn add_addons<I, S>(&mut self, kind: AddonKind, addons: I, mode: Option<&str>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addons.extend(addons.into_iter().map(|addon| AddonAction {
            kind,
            mode: mode.map(str::to_string),
            addon: addon.into(),
        }));
    }

    pub fn finish(self) -> Version {
        Version {
            number: self.number,
            options: self.options,
            modes: self.modes,
            operations: self.operations,
            addons: self.addons,
        }
    }
}

// ============================================================================
// Migration Plan
// ============================================================================

/// The compiled descriptor: versions in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    options: Option<Arc<ResolvedOptions>>,
    versions: Vec<Version>,
}

impl MigrationPlan {
    pub fn new(options: Arc<ResolvedOptions>, versions: Vec<Version>) -> Self {
        Self {
            options: Some(options),
            versions,
        }
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Options shared by all versions (`None` only for a default-built plan)
    pub fn options(&self) -> Option<&Arc<ResolvedOptions>> {
        self.options.as_ref()
    }

    /// First version with the given identifier
    pub fn version(&self, number: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.number == number)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Returns a summary of the plan for logging/display.
    pub fn summary(&self) -> String {
        let count = self.versions.len();
        let mut lines = vec![format!(
            "Migration Plan ({} version{})",
            count,
            if count == 1 { "" } else { "s" }
        )];
        if let Some(options) = &self.options {
            lines.push(format!(
                "  Command: {}",
                options.command.as_deref().unwrap_or("<unset>")
            ));
            if !options.args.is_empty() {
                lines.push(format!("  Args: {}", options.args.join(" ")));
            }
            if let Some(path) = &options.addons_path {
                lines.push(format!("  Addons path: {}", path));
            }
        }
        for (i, version) in self.versions.iter().enumerate() {
            if version.is_noop() {
                lines.push(format!("  {}. {} (nothing to do)", i + 1, version.number));
                continue;
            }
            lines.push(format!("  {}. {}", i + 1, version.number));
            version.summarize_scope(None, &mut lines);
            for mode in &version.modes {
                version.summarize_scope(Some(mode.as_str()), &mut lines);
            }
        }
        lines.join("\n")
    }
}

impl<'a> IntoIterator for &'a MigrationPlan {
    type Item = &'a Version;
    type IntoIter = std::slice::Iter<'a, Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}
