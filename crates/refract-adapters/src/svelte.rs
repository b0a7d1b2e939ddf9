//! Svelte generator.
//!
//! Emits the legacy idiom (`export let`, `$:`, `on:click`, `<slot />`).
//! Runes output is produced by the reactive-syntax plugin, which rewrites
//! the structured declarations and the markup after generation.

use refract_parser::{ComponentDefinition, PropDefinition};

use crate::declarations::{self, Declaration, Idiom, PropBinding, TypeMember};
use crate::expr::strip_props_prefix;
use crate::imports::{render_import, rewrite_imports, ImportNeeds};
use crate::shared::{
    calls_class_merge, fallback_root, prop_type, variant_declaration, Attr, MarkupSyntax,
    MarkupWriter, Scope,
};
use crate::traits::{GenerateError, GenerateOptions, GeneratedCode, Target, TargetAdapter};

/// Interface name Svelte recognizes for component props.
pub const LEGACY_PROPS_TYPE: &str = "$$Props";

/// Identifier the rest attributes are destructured into under runes.
pub const REST_PROPS: &str = "restProps";

/// Svelte code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvelteAdapter;

impl SvelteAdapter {
    pub fn new() -> Self {
        Self
    }
}

struct SvelteSyntax;

impl MarkupSyntax for SvelteSyntax {
    fn attribute(&self, attr: &Attr) -> String {
        match attr {
            Attr::Static { name, value } => format!("{name}=\"{}\"", value.replace('"', "&quot;")),
            Attr::Expression { name, expression } => format!("{name}={{{expression}}}"),
            Attr::Event { event, handler } => format!("on:{event}={{{handler}}}"),
            Attr::Spread(expr) => format!("{{...{expr}}}"),
            Attr::RestSpread => "{...$$restProps}".to_string(),
            Attr::Ref(name) => format!("bind:this={{{name}}}"),
        }
    }

    fn text_expression(&self, expr: &str) -> String {
        format!("{{{expr}}}")
    }

    fn text_literal(&self, text: &str) -> String {
        text.replace('<', "&lt;")
            .replace('{', "&#123;")
            .replace('}', "&#125;")
    }

    fn slot(&self) -> String {
        "<slot />".to_string()
    }

    fn conditional(&self, guard: &str, then: &str, otherwise: Option<&str>) -> String {
        let mut out = format!("{{#if {guard}}}\n{}", declarations::indent(then, 1));
        if let Some(otherwise) = otherwise {
            out.push_str(&format!("\n{{:else}}\n{}", declarations::indent(otherwise, 1)));
        }
        out.push_str("\n{/if}");
        out
    }

    fn prop_ref(&self, prop: &PropDefinition) -> String {
        prop.local().to_string()
    }

    fn resolve(&self, _ident: &str) -> Option<String> {
        None
    }
}

impl TargetAdapter for SvelteAdapter {
    fn target(&self) -> Target {
        Target::Svelte
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

        let scope = Scope::new(component, props);
        let mut writer = MarkupWriter::new(&SvelteSyntax, &scope, tree);
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
        let markup = code.markup.trim_end();
        if script.trim().is_empty() {
            return format!("{markup}\n");
        }
        let open = if options.typescript {
            "<script lang=\"ts\">"
        } else {
            "<script>"
        };
        format!(
            "{open}\n{}\n</script>\n\n{markup}\n",
            declarations::indent(&script, 1)
        )
    }
}

fn build_declarations(scope: &Scope, options: &GenerateOptions, needs: ImportNeeds) -> Vec<Declaration> {
    let component = scope.component;
    let mut decls = Vec::new();

    let lifecycle = lifecycle_imports(component);
    if !lifecycle.is_empty() {
        decls.push(Declaration::Import(render_import("svelte", None, None, &lifecycle, false)));
    }
    decls.extend(
        rewrite_imports(&component.metadata.imports, Target::Svelte, options, needs)
            .into_iter()
            .map(Declaration::Import),
    );

    if let Some(variant) = scope.variant {
        decls.push(Declaration::Statement(variant_declaration(variant)));
    }

    let (members, bindings) = props_bindings(scope);
    decls.push(Declaration::PropsType {
        name: LEGACY_PROPS_TYPE.to_string(),
        members,
    });
    decls.push(Declaration::Props {
        idiom: Idiom::SvelteLegacy,
        bindings,
        rest: Some(REST_PROPS.to_string()),
        type_name: Some(LEGACY_PROPS_TYPE.to_string()),
    });

    for state in &scope.states {
        decls.push(Declaration::Derived {
            idiom: Idiom::SvelteLegacy,
            name: state.derived.clone(),
            expression: state.label_expression(&state.local),
        });
    }

    for local in &component.local_state {
        decls.push(Declaration::State {
            idiom: Idiom::SvelteLegacy,
            name: local.name.clone(),
            initial: strip_props_prefix(&local.initial),
            setter: local.setter.clone(),
        });
    }

    for state in &scope.states {
        let Some(toggle) = &state.toggle else {
            continue;
        };
        let mut body = Vec::new();
        if let Some(disabled) = scope.prop("disabled") {
            body.push(format!("if ({}) return;", disabled.local()));
        }
        body.push(format!("{0} = !{0};", state.local));
        if let Some(handler) = state.change_handler.as_deref().and_then(|h| scope.prop(h)) {
            body.push(format!("{}?.({});", handler.local(), state.local));
        }
        decls.push(Declaration::Function {
            name: toggle.clone(),
            params: String::new(),
            body: body.join("\n"),
        });
    }

    for effect in &component.effects {
        decls.push(Declaration::Effect {
            idiom: Idiom::SvelteLegacy,
            body: strip_props_prefix(&effect.body),
            dependencies: effect
                .dependencies
                .as_ref()
                .map(|deps| deps.iter().map(|d| strip_props_prefix(d)).collect()),
        });
    }

    decls
}

/// Interface members and prop bindings: the forwarded ref, `class`, then
/// the component's props in declaration order.
fn props_bindings(scope: &Scope) -> (Vec<TypeMember>, Vec<PropBinding>) {
    let mut members = Vec::new();
    let mut bindings = Vec::new();

    if let (Some(ref_forward), Some(local)) = (&scope.component.metadata.ref_forward, &scope.ref_local) {
        let ty = format!("{} | null", ref_forward.element_type);
        members.push(TypeMember {
            name: "ref".to_string(),
            ty: ty.clone(),
            optional: true,
        });
        bindings.push(
            PropBinding::new("ref")
                .local(local.clone())
                .ty(ty)
                .default_value(Some("null".to_string()))
                .bindable(),
        );
    }

    members.push(TypeMember {
        name: "class".to_string(),
        ty: "string".to_string(),
        optional: true,
    });
    bindings.push(PropBinding::new("class").local("className").ty("string"));

    for prop in scope.props {
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
        let mut binding = PropBinding::new(prop.name.clone())
            .local(prop.local())
            .ty(ty)
            .default_value(default);
        binding.optional = prop.optional;
        if is_state {
            binding = binding.bindable();
        }
        bindings.push(binding);
    }

    (members, bindings)
}

fn lifecycle_imports(component: &ComponentDefinition) -> Vec<(String, String)> {
    let mounts = component
        .effects
        .iter()
        .any(|e| e.dependencies.as_ref().is_some_and(Vec::is_empty));
    let updates = component
        .effects
        .iter()
        .any(|e| !e.dependencies.as_ref().is_some_and(Vec::is_empty));

    let mut names = Vec::new();
    if updates {
        names.push(("afterUpdate".to_string(), "afterUpdate".to_string()));
    }
    if mounts {
        names.push(("onMount".to_string(), "onMount".to_string()));
    }
    names
}
