//! Vue 3 `<script setup>` generator.

use refract_parser::{ComponentDefinition, PropDefinition};

use crate::declarations::{self, Declaration, Idiom, PropBinding, TypeMember};
use crate::expr::{rewrite_identifiers, strip_props_prefix};
use crate::imports::{render_import, rewrite_imports, ImportNeeds};
use crate::shared::{
    calls_class_merge, fallback_root, prop_type, variant_declaration, Attr, MarkupSyntax,
    MarkupWriter, Scope,
};
use crate::traits::{GenerateError, GenerateOptions, GeneratedCode, Target, TargetAdapter};

const PROPS_TYPE: &str = "Props";

/// Template ref name used when the forwarded parameter would shadow `ref`.
const ELEMENT_REF: &str = "elementRef";

/// Vue code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct VueAdapter;

impl VueAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Template-side spelling. Props are read through `props.*`; refs are
/// unwrapped by the template compiler so state keeps its bare name.
struct VueSyntax<'s, 'a> {
    scope: &'s Scope<'a>,
}

impl MarkupSyntax for VueSyntax<'_, '_> {
    fn attribute(&self, attr: &Attr) -> String {
        match attr {
            Attr::Static { name, value } => format!("{name}=\"{}\"", value.replace('"', "&quot;")),
            Attr::Expression { name, expression } => {
                format!(":{name}=\"{}\"", attribute_value(expression))
            }
            Attr::Event { event, handler } => format!("@{event}=\"{}\"", attribute_value(handler)),
            Attr::Spread(expr) => format!("v-bind=\"{}\"", attribute_value(expr)),
            Attr::RestSpread => "v-bind=\"$attrs\"".to_string(),
            Attr::Ref(name) => format!("ref=\"{name}\""),
        }
    }

    fn text_expression(&self, expr: &str) -> String {
        format!("{{{{ {expr} }}}}")
    }

    fn text_literal(&self, text: &str) -> String {
        text.replace('<', "&lt;").replace("{{", "{&#123;")
    }

    fn slot(&self) -> String {
        "<slot />".to_string()
    }

    fn conditional(&self, guard: &str, then: &str, otherwise: Option<&str>) -> String {
        let mut out = format!(
            "<template v-if=\"{}\">\n{}\n</template>",
            attribute_value(guard),
            declarations::indent(then, 1)
        );
        if let Some(otherwise) = otherwise {
            out.push_str(&format!(
                "\n<template v-else>\n{}\n</template>",
                declarations::indent(otherwise, 1)
            ));
        }
        out
    }

    fn prop_ref(&self, prop: &PropDefinition) -> String {
        format!("props.{}", prop.name)
    }

    fn resolve(&self, ident: &str) -> Option<String> {
        if ident == "className" {
            return Some("props.class".to_string());
        }
        let prop = self.scope.prop_by_local(ident)?;
        if is_emitted(self.scope, prop) {
            return None;
        }
        Some(format!("props.{}", prop.name))
    }
}

/// Double quotes inside a bound attribute become single quotes, unless the
/// expression already uses single-quoted strings.
fn attribute_value(expr: &str) -> String {
    if expr.contains('\'') {
        expr.replace('"', "&quot;")
    } else {
        expr.replace('"', "'")
    }
}

/// State change handlers are declared as emits rather than props.
fn is_emitted(scope: &Scope, prop: &PropDefinition) -> bool {
    scope
        .states
        .iter()
        .any(|s| s.change_handler.as_deref() == Some(prop.name.as_str()))
}

/// Script-side resolution: props through `props.*`, state through `.value`.
fn script_resolve(scope: &Scope, ident: &str) -> Option<String> {
    if ident == "className" {
        return Some("props.class".to_string());
    }
    let is_ref = scope.component.local_state.iter().any(|s| s.name == ident)
        || scope.ref_local.as_deref() == Some(ident);
    if is_ref {
        return Some(format!("{ident}.value"));
    }
    let prop = scope.prop_by_local(ident)?;
    (!is_emitted(scope, prop)).then(|| format!("props.{}", prop.name))
}

fn script_expression(scope: &Scope, expr: &str) -> String {
    rewrite_identifiers(&strip_props_prefix(expr.trim()), &|ident: &str| {
        script_resolve(scope, ident)
    })
}

impl TargetAdapter for VueAdapter {
    fn target(&self) -> Target {
        Target::Vue
    }

    fn generate(
        &self,
        component: &ComponentDefinition,
        props: &[PropDefinition],
        options: &GenerateOptions,
    ) -> Result<GeneratedCode, GenerateError> {
        if component.is_re_export {
            return Err(GenerateError::ReExport(component.name.clone()));
        }

        let fallback = component.root.is_empty();
        let synthesized;
        let tree = if fallback {
            synthesized = fallback_root(component)
                .ok_or_else(|| GenerateError::NoMarkup(component.name.clone()))?;
            tracing::debug!("Synthesizing root for {} from its forwarded ref", component.name);
            &synthesized
        } else {
            &component.root
        };

        let mut scope = Scope::new(component, props);
        if scope.ref_local.as_deref() == Some("ref") {
            scope.ref_local = Some(ELEMENT_REF.to_string());
        }
        let syntax = VueSyntax { scope: &scope };
        let mut writer = MarkupWriter::new(&syntax, &scope, tree);
        let markup = writer.render(tree);

        let needs = ImportNeeds {
            class_merge: writer.needs_class_merge || calls_class_merge(&markup),
            variants: scope.variant.is_some(),
        };
        let decls = build_declarations(&scope, options, needs);

        if fallback {
            return Ok(GeneratedCode {
                declaration_block: declarations::render(&decls, options.typescript),
                declarations: None,
                markup,
            });
        }
        Ok(GeneratedCode {
            declaration_block: String::new(),
            declarations: Some(decls),
            markup,
        })
    }

    fn assemble(&self, code: &GeneratedCode, options: &GenerateOptions) -> String {
        let script = code.script(options.typescript);
        let template = format!(
            "<template>\n{}\n</template>\n",
            declarations::indent(code.markup.trim_end(), 1)
        );
        if script.trim().is_empty() {
            return template;
        }
        let open = if options.typescript {
            "<script setup lang=\"ts\">"
        } else {
            "<script setup>"
        };
        format!("{open}\n{script}\n</script>\n\n{template}")
    }
}

fn build_declarations(scope: &Scope, options: &GenerateOptions, needs: ImportNeeds) -> Vec<Declaration> {
    let component = scope.component;
    let mut decls = Vec::new();

    decls.extend(
        rewrite_imports(&component.metadata.imports, Target::Vue, options, needs)
            .into_iter()
            .map(Declaration::Import),
    );

    if let Some(variant) = scope.variant {
        decls.push(Declaration::Statement(variant_declaration(variant)));
    }

    let (members, bindings) = props_bindings(scope);
    decls.push(Declaration::PropsType {
        name: PROPS_TYPE.to_string(),
        members,
    });
    decls.push(Declaration::Props {
        idiom: Idiom::Vue,
        bindings,
        rest: None,
        type_name: Some(PROPS_TYPE.to_string()),
    });

    let emits: Vec<(String, String)> = scope
        .states
        .iter()
        .filter(|s| s.change_handler.is_some())
        .map(|s| (format!("update:{}", s.prop), "boolean".to_string()))
        .collect();
    if !emits.is_empty() {
        decls.push(Declaration::Emits(emits));
    }

    for state in &scope.states {
        decls.push(Declaration::Derived {
            idiom: Idiom::Vue,
            name: state.derived.clone(),
            expression: format!("({})", state.label_expression(&format!("props.{}", state.prop))),
        });
    }

    if let (Some(ref_forward), Some(local)) = (&component.metadata.ref_forward, &scope.ref_local) {
        decls.push(Declaration::Ref {
            name: local.clone(),
            element_type: ref_forward.element_type.clone(),
        });
        let exposed = if local == "ref" {
            local.clone()
        } else {
            format!("ref: {local}")
        };
        decls.push(Declaration::Expose(vec![exposed]));
    }

    for local in &component.local_state {
        decls.push(Declaration::State {
            idiom: Idiom::Vue,
            name: local.name.clone(),
            initial: script_expression(scope, &local.initial),
            setter: local.setter.clone(),
        });
    }

    for state in &scope.states {
        let Some(toggle) = &state.toggle else {
            continue;
        };
        let mut body = Vec::new();
        if scope.prop("disabled").is_some() {
            body.push("if (props.disabled) return;".to_string());
        }
        body.push(format!("emit(\"update:{0}\", !props.{0});", state.prop));
        decls.push(Declaration::Function {
            name: toggle.clone(),
            params: String::new(),
            body: body.join("\n"),
        });
    }

    for effect in &component.effects {
        decls.push(Declaration::Effect {
            idiom: Idiom::Vue,
            body: script_expression(scope, &effect.body),
            dependencies: effect.dependencies.as_ref().map(|deps| {
                deps.iter().map(|d| watch_source(scope, d)).collect()
            }),
        });
    }

    let framework = framework_imports(&decls);
    if !framework.is_empty() {
        decls.insert(
            0,
            Declaration::Import(render_import("vue", None, None, &framework, false)),
        );
    }

    decls
}

/// A `watch` source: refs are watched directly, anything else through a
/// getter.
fn watch_source(scope: &Scope, dep: &str) -> String {
    let resolved = script_expression(scope, dep);
    match resolved.strip_suffix(".value") {
        Some(state) if !state.contains('.') => state.to_string(),
        _ => format!("() => {resolved}"),
    }
}

fn props_bindings(scope: &Scope) -> (Vec<TypeMember>, Vec<PropBinding>) {
    let mut members = vec![TypeMember {
        name: "class".to_string(),
        ty: "string".to_string(),
        optional: true,
    }];
    let mut bindings = vec![PropBinding::new("class").ty("string")];

    for prop in scope.props.iter().filter(|p| !is_emitted(scope, p)) {
        let ty = prop_type(prop);
        members.push(TypeMember {
            name: prop.name.clone(),
            ty: ty.clone(),
            optional: prop.optional,
        });

        let is_state = scope.states.iter().any(|s| s.prop == prop.name);
        let default = match (&prop.default_value, is_state) {
            (Some(d), _) => Some(strip_props_prefix(d)),
            (None, true) => Some("false".to_string()),
            (None, false) => None,
        };
        let mut binding = PropBinding::new(prop.name.clone()).ty(ty).default_value(default);
        binding.optional = prop.optional;
        bindings.push(binding);
    }

    (members, bindings)
}

/// Names the script needs from `vue`, in a stable order.
fn framework_imports(decls: &[Declaration]) -> Vec<(String, String)> {
    let mut names: Vec<&str> = Vec::new();
    for decl in decls {
        match decl {
            Declaration::Derived { idiom: Idiom::Vue, .. } => names.push("computed"),
            Declaration::Ref { .. } => names.push("shallowRef"),
            Declaration::State { idiom: Idiom::Vue, .. } => names.push("ref"),
            Declaration::Effect {
                idiom: Idiom::Vue,
                dependencies,
                ..
            } => names.push(match dependencies {
                Some(deps) if deps.is_empty() => "onMounted",
                Some(_) => "watch",
                None => "watchEffect",
            }),
            _ => {}
        }
    }
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .map(|n| (n.to_string(), n.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refract_parser::{Effect, ElementNode, IrNode, LocalState, RefForwardConfig};

    #[test]
    fn quotes_bound_attributes() {
        assert_eq!(attribute_value("cn(\"a\", props.class)"), "cn('a', props.class)");
        assert_eq!(attribute_value("x ? 'a' : \"b\""), "x ? 'a' : &quot;b&quot;");
    }

    #[test]
    fn ref_parameter_does_not_shadow_vue_ref() {
        let mut component = ComponentDefinition::new("Input");
        component.metadata.ref_forward = Some(RefForwardConfig {
            element_type: "HTMLInputElement".to_string(),
            param_name: "ref".to_string(),
        });
        let code = VueAdapter.generate(&component, &[], &GenerateOptions::default()).unwrap();
        assert!(code.declarations.is_none());
        assert!(code
            .declaration_block
            .starts_with("import { shallowRef } from \"vue\";"));
        assert!(code
            .declaration_block
            .contains("const elementRef = shallowRef<HTMLInputElement | null>(null);"));
        assert!(code.declaration_block.contains("defineExpose({ ref: elementRef });"));
        assert_eq!(
            code.markup,
            "<input :class=\"props.class\" ref=\"elementRef\" v-bind=\"$attrs\" />"
        );
    }

    #[test]
    fn local_state_and_effects_use_refs() {
        let mut component = ComponentDefinition::new("Counter");
        component.root = IrNode::Element(ElementNode::new("div"));
        component.local_state.push(LocalState {
            name: "count".to_string(),
            setter: Some("setCount".to_string()),
            initial: "0".to_string(),
        });
        component.effects.push(Effect {
            body: "console.log(count);".to_string(),
            dependencies: Some(vec!["count".to_string()]),
        });
        let code = VueAdapter.generate(&component, &[], &GenerateOptions::default()).unwrap();
        let script = code.script(true);
        assert!(script.starts_with("import { ref, watch } from \"vue\";"));
        assert!(script.contains("const count = ref(0);"));
        assert!(script.contains("watch([count], () => {\n  console.log(count.value);\n}, { immediate: true });"));
    }

    #[test]
    fn assembles_script_setup_and_template() {
        let mut component = ComponentDefinition::new("Box");
        component.root = IrNode::Element(ElementNode::new("div").with_children(vec![IrNode::Slot]));
        let adapter = VueAdapter::new();
        let options = GenerateOptions::default();
        let code = adapter.generate(&component, &[], &options).unwrap();
        let file = adapter.assemble(&code, &options);
        assert!(file.starts_with("<script setup lang=\"ts\">\n"));
        assert!(file.ends_with("</script>\n\n<template>\n  <div><slot /></div>\n</template>\n"));
    }
}
