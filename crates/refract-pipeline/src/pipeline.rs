//! Ordered plugin hooks with failure isolation.
//!
//! Every hook runs against a snapshot: when it returns an error, or writes
//! a metadata field it did not declare, the value is restored and the
//! problem is recorded as a warning instead of aborting the conversion.

use refract_adapters::GeneratedCode;
use refract_parser::{ComponentDefinition, MetadataField, ParseResult};

use crate::context::PluginContext;
use crate::error::PluginError;

/// A transformation hooked into one or more conversion phases.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Lower runs first. Ties keep registration order.
    fn order(&self) -> i32 {
        0
    }

    /// Metadata fields the post-parse and pre-generate hooks may change.
    fn writes(&self) -> &[MetadataField] {
        &[]
    }

    fn pre_parse(&self, _source: &mut String, _ctx: &mut PluginContext) -> Result<(), PluginError> {
        Ok(())
    }

    fn post_parse(&self, _result: &mut ParseResult, _ctx: &mut PluginContext) -> Result<(), PluginError> {
        Ok(())
    }

    fn pre_generate(
        &self,
        _component: &mut ComponentDefinition,
        _ctx: &mut PluginContext,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    fn post_generate(
        &self,
        _code: &mut GeneratedCode,
        _component: &ComponentDefinition,
        _ctx: &mut PluginContext,
    ) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Plugins sorted by order.
#[derive(Default)]
pub struct Pipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in plugins.
    pub fn with_defaults() -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Box::new(crate::consolidate::MetadataConsolidation));
        pipeline.register(Box::new(crate::repair::StructuralRepair));
        pipeline.register(Box::new(crate::fixups::MarkupFixups));
        pipeline.register(Box::new(crate::runes::ReactiveSyntax));
        pipeline
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        tracing::debug!("Registering plugin {} (order {})", plugin.name(), plugin.order());
        self.plugins.push(plugin);
        // Stable sort keeps registration order among equal orders.
        self.plugins.sort_by_key(|p| p.order());
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn run_pre_parse(&self, source: &mut String, ctx: &mut PluginContext) {
        for plugin in &self.plugins {
            let snapshot = source.clone();
            if let Err(err) = plugin.pre_parse(source, ctx) {
                *source = snapshot;
                record(plugin.as_ref(), "pre_parse", &err, ctx);
            }
        }
        ctx.source = source.clone();
    }

    pub fn run_post_parse(&self, result: &mut ParseResult, ctx: &mut PluginContext) {
        for plugin in &self.plugins {
            let snapshot = result.clone();
            let outcome = plugin
                .post_parse(result, ctx)
                .and_then(|()| check_components(plugin.as_ref(), &snapshot.components, &result.components));
            if let Err(err) = outcome {
                *result = snapshot;
                record(plugin.as_ref(), "post_parse", &err, ctx);
            }
        }
    }

    pub fn run_pre_generate(&self, component: &mut ComponentDefinition, ctx: &mut PluginContext) {
        for plugin in &self.plugins {
            let snapshot = component.clone();
            let outcome = plugin.pre_generate(component, ctx).and_then(|()| {
                check_components(
                    plugin.as_ref(),
                    std::slice::from_ref(&snapshot),
                    std::slice::from_ref(component),
                )
            });
            if let Err(err) = outcome {
                *component = snapshot;
                record(plugin.as_ref(), "pre_generate", &err, ctx);
            }
        }
    }

    pub fn run_post_generate(
        &self,
        code: &mut GeneratedCode,
        component: &ComponentDefinition,
        ctx: &mut PluginContext,
    ) {
        for plugin in &self.plugins {
            let snapshot = code.clone();
            if let Err(err) = plugin.post_generate(code, component, ctx) {
                *code = snapshot;
                record(plugin.as_ref(), "post_generate", &err, ctx);
            }
        }
    }
}

/// Reject metadata changes outside the plugin's declared fields.
fn check_components(
    plugin: &dyn Plugin,
    before: &[ComponentDefinition],
    after: &[ComponentDefinition],
) -> Result<(), PluginError> {
    let declared = plugin.writes();
    let mut undeclared: Vec<MetadataField> = Vec::new();
    for component in after {
        let Some(previous) = before.iter().find(|c| c.name == component.name) else {
            continue;
        };
        for field in previous.metadata.changed_fields(&component.metadata) {
            if !declared.contains(&field) && !undeclared.contains(&field) {
                undeclared.push(field);
            }
        }
    }
    if undeclared.is_empty() {
        Ok(())
    } else {
        Err(PluginError::UndeclaredWrite(undeclared))
    }
}

fn record(plugin: &dyn Plugin, hook: &str, err: &PluginError, ctx: &mut PluginContext) {
    ctx.warn(
        format!("plugin:{}", plugin.name()),
        format!("{hook} failed and was rolled back: {err}"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use refract_adapters::{GenerateOptions, Target};

    struct Named(&'static str, i32);

    impl Plugin for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn order(&self) -> i32 {
            self.1
        }
    }

    struct Failing;

    impl Plugin for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn pre_parse(&self, source: &mut String, _ctx: &mut PluginContext) -> Result<(), PluginError> {
            source.push_str("garbage");
            Err(PluginError::Failed("boom".to_string()))
        }
    }

    struct Sneaky;

    impl Plugin for Sneaky {
        fn name(&self) -> &str {
            "sneaky"
        }

        fn pre_generate(
            &self,
            component: &mut ComponentDefinition,
            _ctx: &mut PluginContext,
        ) -> Result<(), PluginError> {
            component.metadata.uses_class_merge = true;
            Ok(())
        }
    }

    fn ctx() -> PluginContext {
        PluginContext::new("", Target::Svelte, GenerateOptions::default())
    }

    #[test]
    fn sorts_by_order_then_registration() {
        let mut pipeline = Pipeline::new();
        pipeline.register(Box::new(Named("b", 10)));
        pipeline.register(Box::new(Named("a", 0)));
        pipeline.register(Box::new(Named("c", 10)));
        assert_eq!(pipeline.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn failed_hook_is_rolled_back() {
        let mut pipeline = Pipeline::new();
        pipeline.register(Box::new(Failing));

        let mut ctx = ctx();
        let mut source = "const x = 1".to_string();
        pipeline.run_pre_parse(&mut source, &mut ctx);

        assert_eq!(source, "const x = 1");
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].code, "plugin:failing");
        assert!(ctx.warnings[0].message.contains("boom"));
    }

    #[test]
    fn undeclared_metadata_writes_are_rolled_back() {
        let mut pipeline = Pipeline::new();
        pipeline.register(Box::new(Sneaky));

        let mut ctx = ctx();
        let mut component = ComponentDefinition::new("Button");
        pipeline.run_pre_generate(&mut component, &mut ctx);

        assert!(!component.metadata.uses_class_merge);
        assert_eq!(ctx.warnings[0].code, "plugin:sneaky");
    }

    #[test]
    fn default_pipeline_order() {
        let pipeline = Pipeline::with_defaults();
        assert_eq!(
            pipeline.names(),
            vec!["metadata-consolidation", "structural-repair", "markup-fixups", "reactive-syntax"]
        );
    }
}
