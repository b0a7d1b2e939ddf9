//! Metadata consolidation.
//!
//! The parser records variant configurations and imports once per source
//! unit. This plugin copies what each component actually uses into its own
//! [`ComponentMetadata`](refract_parser::ComponentMetadata) so generators
//! never look past the component they are given.

use refract_parser::parser::CLASS_MERGE_FUNCTIONS;
use refract_parser::{
    ComponentDefinition, IrNode, MetadataField, ParseResult, SharedMetadata, VariantConfig,
};

use crate::context::PluginContext;
use crate::error::PluginError;
use crate::pipeline::Plugin;

/// Merges unit-wide metadata into each component.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataConsolidation;

impl Plugin for MetadataConsolidation {
    fn name(&self) -> &str {
        "metadata-consolidation"
    }

    fn order(&self) -> i32 {
        -100
    }

    fn writes(&self) -> &[MetadataField] {
        &[
            MetadataField::Variant,
            MetadataField::RefForward,
            MetadataField::Imports,
            MetadataField::StateProps,
            MetadataField::ClassMerge,
        ]
    }

    fn post_parse(&self, result: &mut ParseResult, ctx: &mut PluginContext) -> Result<(), PluginError> {
        ctx.shared = result.shared.clone();
        for component in result.components.iter_mut() {
            if component.is_re_export || !ctx.includes(&component.name) {
                continue;
            }
            for message in consolidate(component, &result.shared) {
                ctx.warn("variant-config", message);
            }
        }
        Ok(())
    }

    fn pre_generate(
        &self,
        component: &mut ComponentDefinition,
        ctx: &mut PluginContext,
    ) -> Result<(), PluginError> {
        for message in consolidate(component, &ctx.shared) {
            ctx.warn("variant-config", message);
        }
        Ok(())
    }
}

/// Consolidate one component. Idempotent. Returns messages for default
/// variants that had to be dropped.
pub fn consolidate(component: &mut ComponentDefinition, shared: &SharedMetadata) -> Vec<String> {
    let mut messages = Vec::new();

    if component.metadata.variant.is_none() {
        component.metadata.variant = referenced_variant(component, shared).cloned();
    }
    if let Some(variant) = component.metadata.variant.as_mut() {
        if let Err(unknown) = variant.validate() {
            for axis in &unknown {
                messages.push(format!(
                    "{}: default for unknown axis `{axis}` dropped from {}",
                    component.name, variant.name
                ));
            }
            variant.default_variants.retain(|(axis, _)| !unknown.contains(axis));
        }
    }

    if component.metadata.imports.is_empty() {
        component.metadata.imports = shared.imports.clone();
    }

    component.metadata.uses_class_merge = shared.uses_class_merge && calls_class_merge(&component.root);

    let metadata = &component.metadata;
    for state in &metadata.state_props {
        if let Some(prop) = component.props.iter_mut().find(|p| p.name == state.prop) {
            if prop.data_state_values.is_none() {
                prop.data_state_values = Some(state.labels.clone());
            }
        }
    }

    messages
}

/// The configuration the component's markup calls, else the one whose axes
/// cover the component's variant props.
fn referenced_variant<'a>(
    component: &ComponentDefinition,
    shared: &'a SharedMetadata,
) -> Option<&'a VariantConfig> {
    let mut expressions = Vec::new();
    component.root.walk_elements(&mut |el| {
        expressions.extend(el.bindings.iter().map(|(_, b)| b.expression.clone()));
    });

    let called = shared.variant_configs.iter().find(|config| {
        expressions
            .iter()
            .any(|expr| find_call(expr, &config.name))
    });
    if called.is_some() {
        return called;
    }

    let variant_props: Vec<&str> = component
        .props
        .iter()
        .filter(|p| p.is_variant)
        .map(|p| p.name.as_str())
        .collect();
    if variant_props.is_empty() {
        return None;
    }
    shared
        .variant_configs
        .iter()
        .find(|config| variant_props.iter().all(|p| config.has_axis(p)))
}

/// True when any class binding in the tree calls a merge function.
fn calls_class_merge(root: &IrNode) -> bool {
    let mut found = false;
    root.walk_elements(&mut |el| {
        found |= el
            .bindings
            .iter()
            .any(|(_, b)| CLASS_MERGE_FUNCTIONS.iter().any(|f| find_call(&b.expression, f)));
    });
    found
}

/// `name(` as a free call.
fn find_call(expr: &str, name: &str) -> bool {
    expr.match_indices(name).any(|(start, _)| {
        let preceded = expr[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
        !preceded && expr[start + name.len()..].trim_start().starts_with('(')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refract_parser::{Binding, ElementNode, VariantAxis};

    fn config(name: &str, axes: &[&str]) -> VariantConfig {
        VariantConfig {
            name: name.to_string(),
            base_classes: String::new(),
            variants: axes
                .iter()
                .map(|a| VariantAxis {
                    name: a.to_string(),
                    values: vec![("default".to_string(), "x".to_string())],
                })
                .collect(),
            default_variants: Vec::new(),
            compound_variants: Vec::new(),
        }
    }

    fn component_calling(expr: &str) -> ComponentDefinition {
        let mut component = ComponentDefinition::new("Badge");
        let mut el = ElementNode::new("div");
        el.bindings.push(("class".to_string(), Binding::expression(expr)));
        component.root = IrNode::Element(el);
        component
    }

    #[test]
    fn picks_the_called_configuration() {
        let shared = SharedMetadata {
            variant_configs: vec![config("buttonVariants", &["variant"]), config("badgeVariants", &["variant"])],
            imports: Vec::new(),
            uses_class_merge: true,
        };
        let mut component = component_calling("cn(badgeVariants({ variant }), className)");
        consolidate(&mut component, &shared);

        assert_eq!(
            component.metadata.variant.as_ref().map(|v| v.name.as_str()),
            Some("badgeVariants")
        );
        assert!(component.metadata.uses_class_merge);
    }

    #[test]
    fn class_merge_requires_a_call_in_this_component() {
        let shared = SharedMetadata {
            uses_class_merge: true,
            ..SharedMetadata::default()
        };
        let mut component = component_calling("className");
        consolidate(&mut component, &shared);
        assert!(!component.metadata.uses_class_merge);
    }

    #[test]
    fn drops_unknown_default_variants() {
        let mut bad = config("buttonVariants", &["variant"]);
        bad.default_variants.push(("size".to_string(), "lg".to_string()));
        let shared = SharedMetadata {
            variant_configs: vec![bad],
            ..SharedMetadata::default()
        };
        let mut component = component_calling("buttonVariants({ variant })");
        let messages = consolidate(&mut component, &shared);

        assert_eq!(messages.len(), 1);
        assert!(component.metadata.variant.unwrap().default_variants.is_empty());
    }

    #[test]
    fn free_calls_only() {
        assert!(find_call("cn(a)", "cn"));
        assert!(find_call("x ? cn (a) : b", "cn"));
        assert!(!find_call("utils.cn(a)", "cn"));
        assert!(!find_call("scn(a)", "cn"));
    }
}
