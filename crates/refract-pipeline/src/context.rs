//! State shared by every hook during one conversion.

use refract_adapters::{GenerateOptions, Target};
use refract_parser::{SharedMetadata, Warning};

/// Mutable context handed to each plugin hook.
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Source text as it stood after the pre-parse phase.
    pub source: String,
    pub target: Target,
    pub options: GenerateOptions,
    /// Unit-wide metadata, available once parsing has finished.
    pub shared: SharedMetadata,
    /// Components the current conversion is interested in. `None` means all.
    pub component_filter: Option<Vec<String>>,
    pub warnings: Vec<Warning>,
}

impl PluginContext {
    pub fn new(source: impl Into<String>, target: Target, options: GenerateOptions) -> Self {
        Self {
            source: source.into(),
            target,
            options,
            shared: SharedMetadata::default(),
            component_filter: None,
            warnings: Vec::new(),
        }
    }

    /// True if `name` passes the component filter.
    pub fn includes(&self, name: &str) -> bool {
        self.component_filter
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == name))
    }

    pub fn warn(&mut self, code: impl Into<String>, message: impl Into<String>) {
        let warning = Warning::new(code, message);
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// True when Svelte output should use runes.
    pub fn svelte_runes(&self) -> bool {
        self.target == Target::Svelte && self.options.svelte_runes
    }
}
