//! Trait definitions for target adapters.

use std::fmt;
use std::str::FromStr;

use refract_parser::{ComponentDefinition, PropDefinition};
use serde::{Deserialize, Serialize};

use crate::declarations::Declaration;

/// A supported output framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Svelte,
    Vue,
}

impl Target {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Target::Svelte => "svelte",
            Target::Vue => "vue",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Target::Svelte => "svelte",
            Target::Vue => "vue",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svelte" => Ok(Target::Svelte),
            "vue" => Ok(Target::Vue),
            other => Err(GenerateError::UnknownTarget(other.to_string())),
        }
    }
}

/// Options that affect generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Emit `lang="ts"` and type annotations.
    pub typescript: bool,

    /// Module the class-merge helper is imported from.
    pub class_merge_import_path: String,

    /// Svelte 5 runes markup (`onclick`, `{@render children?.()}`).
    pub svelte_runes: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            typescript: true,
            class_merge_import_path: "$lib/utils".to_string(),
            svelte_runes: true,
        }
    }
}

/// Output of a generator before assembly into a single file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCode {
    /// Structured declaration list. `None` on the fallback path, where only
    /// [`GeneratedCode::declaration_block`] is available.
    pub declarations: Option<Vec<Declaration>>,

    /// Serialized declarations. Authoritative when `declarations` is `None`.
    pub declaration_block: String,

    pub markup: String,
}

impl GeneratedCode {
    /// Script body: the structured list when present, else the raw block.
    pub fn script(&self, typescript: bool) -> String {
        match &self.declarations {
            Some(decls) => crate::declarations::render(decls, typescript),
            None => self.declaration_block.clone(),
        }
    }
}

/// Errors that can occur during generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Unknown target: {0} (expected svelte or vue)")]
    UnknownTarget(String),

    #[error("Component {0} is a re-export and has no markup of its own")]
    ReExport(String),

    #[error("Component {0} has no markup and no forwarded ref to synthesize a root from")]
    NoMarkup(String),
}

/// A code generator for one target framework.
pub trait TargetAdapter: Send + Sync {
    fn target(&self) -> Target;

    fn extension(&self) -> &'static str {
        self.target().extension()
    }

    /// Produce declarations and markup for `component`. Pure and
    /// deterministic in its inputs.
    fn generate(
        &self,
        component: &ComponentDefinition,
        props: &[PropDefinition],
        options: &GenerateOptions,
    ) -> Result<GeneratedCode, GenerateError>;

    /// Join script and markup into the target's file layout.
    fn assemble(&self, code: &GeneratedCode, options: &GenerateOptions) -> String;
}
