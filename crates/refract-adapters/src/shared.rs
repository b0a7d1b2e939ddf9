//! Decision logic shared by both targets.
//!
//! Which attributes an element receives, in which order and under which
//! conditions is decided here. Each target only supplies a [`MarkupSyntax`]
//! that spells those decisions in its own binding syntax.

use std::ptr;
use std::sync::LazyLock;

use regex::Regex;

use refract_parser::ir::{BindingKind, ElementNode, IrNode, TextNode, CLASS_KEY, REF_KEY};
use refract_parser::state::has_state_selector;
use refract_parser::tables::primitive_tag;
use refract_parser::{Binding, ComponentDefinition, PropDefinition, StateLabels, VariantConfig};

use crate::class_binding::{translate_class, ClassContext};
use crate::declarations::indent;
use crate::expr::{is_identifier, rewrite_identifiers, strip_props_prefix};

/// Class-merge helper emitted by the generators.
pub const MERGE_FN: &str = "cn";

static MERGE_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w.$])cn\s*\(").expect("Invalid merge call regex"));

/// A state prop as seen by the markup and declaration builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBinding {
    pub prop: String,
    /// Identifier the component body uses for the prop.
    pub local: String,
    /// Derived label value, e.g. `checkedState`.
    pub derived: String,
    pub labels: StateLabels,
    pub aria: String,
    pub role: Option<String>,
    pub change_handler: Option<String>,
    /// Synthesized handler name when a change handler exists.
    pub toggle: Option<String>,
}

impl StateBinding {
    /// `checked ? "checked" : "unchecked"` over `value`.
    pub fn label_expression(&self, value: &str) -> String {
        format!(
            "{value} ? \"{}\" : \"{}\"",
            self.labels.on, self.labels.off
        )
    }
}

/// State bindings for every detected state prop present in `props`.
pub fn state_bindings(component: &ComponentDefinition, props: &[PropDefinition]) -> Vec<StateBinding> {
    let mut toggles = 0;
    component
        .metadata
        .state_props
        .iter()
        .filter_map(|state| {
            let prop = props.iter().find(|p| p.name == state.prop)?;
            let toggle = state.change_handler.as_ref().map(|_| {
                toggles += 1;
                if toggles == 1 {
                    "toggle".to_string()
                } else {
                    format!("toggle{}", pascal_case(&state.prop))
                }
            });
            Some(StateBinding {
                prop: state.prop.clone(),
                local: prop.local().to_string(),
                derived: format!("{}State", prop.local()),
                labels: state.labels.clone(),
                aria: state.aria_attribute.clone(),
                role: state.role.clone(),
                change_handler: state.change_handler.clone(),
                toggle,
            })
        })
        .collect()
}

/// Component-level facts the markup writer consults.
pub struct Scope<'a> {
    pub component: &'a ComponentDefinition,
    pub props: &'a [PropDefinition],
    pub states: Vec<StateBinding>,
    pub variant: Option<&'a VariantConfig>,
    /// Script identifier holding the forwarded element.
    pub ref_local: Option<String>,
}

impl<'a> Scope<'a> {
    pub fn new(component: &'a ComponentDefinition, props: &'a [PropDefinition]) -> Self {
        Self {
            component,
            props,
            states: state_bindings(component, props),
            variant: component.metadata.variant.as_ref(),
            ref_local: component
                .metadata
                .ref_forward
                .as_ref()
                .map(|r| r.param_name.clone()),
        }
    }

    pub fn prop(&self, name: &str) -> Option<&'a PropDefinition> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Prop whose local binding is `local`.
    pub fn prop_by_local(&self, local: &str) -> Option<&'a PropDefinition> {
        self.props.iter().find(|p| p.local() == local)
    }

    fn is_known_binding(&self, ident: &str) -> bool {
        self.prop_by_local(ident).is_some()
            || self.component.local_state.iter().any(|s| s.name == ident)
    }
}

/// A target-neutral attribute decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    Static { name: String, value: String },
    Expression { name: String, expression: String },
    /// DOM event name without the `on` prefix, lowercased.
    Event { event: String, handler: String },
    Spread(String),
    /// The component's remaining attributes.
    RestSpread,
    Ref(String),
}

/// Target-specific spelling of markup.
pub trait MarkupSyntax {
    fn attribute(&self, attr: &Attr) -> String;

    /// `{expr}` / `{{ expr }}`.
    fn text_expression(&self, expr: &str) -> String;

    fn text_literal(&self, text: &str) -> String;

    /// Outlet for the component's children.
    fn slot(&self) -> String;

    /// Wrap rendered branches in the target's conditional block.
    fn conditional(&self, guard: &str, then: &str, otherwise: Option<&str>) -> String;

    /// How the markup refers to a prop's value.
    fn prop_ref(&self, prop: &PropDefinition) -> String;

    /// Target form of a bare identifier used in markup expressions.
    fn resolve(&self, ident: &str) -> Option<String>;
}

/// Walks the IR and renders markup through a [`MarkupSyntax`].
pub struct MarkupWriter<'s, 'a> {
    syntax: &'s dyn MarkupSyntax,
    scope: &'s Scope<'a>,
    root: Option<&'s ElementNode>,
    /// Set when a class translation introduced the merge helper.
    pub needs_class_merge: bool,
}

impl<'s, 'a> MarkupWriter<'s, 'a> {
    pub fn new(syntax: &'s dyn MarkupSyntax, scope: &'s Scope<'a>, tree: &'s IrNode) -> Self {
        Self {
            syntax,
            scope,
            root: tree.root_element(),
            needs_class_merge: false,
        }
    }

    pub fn render(&mut self, node: &IrNode) -> String {
        match node {
            IrNode::Element(el) => self.element(el),
            IrNode::Text(TextNode::Literal(text)) => self.syntax.text_literal(text),
            IrNode::Text(TextNode::Expression(expr)) => {
                self.syntax.text_expression(&self.expression(expr))
            }
            IrNode::Fragment { children } => children
                .iter()
                .map(|c| self.render(c))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            IrNode::ConditionalShow(cond) => {
                let guard = self.expression(&cond.guard);
                let then = self.render(&cond.then);
                let otherwise = cond.otherwise.as_ref().map(|o| self.render(o));
                self.syntax.conditional(&guard, &then, otherwise.as_deref())
            }
            IrNode::Slot => self.syntax.slot(),
        }
    }

    fn element(&mut self, el: &ElementNode) -> String {
        let is_root = self.root.is_some_and(|root| ptr::eq(root, el));
        let attrs = self
            .plan_attributes(el, is_root)
            .iter()
            .map(|a| self.syntax.attribute(a))
            .collect::<Vec<_>>();
        let open = if attrs.is_empty() {
            el.tag.clone()
        } else {
            format!("{} {}", el.tag, attrs.join(" "))
        };

        if el.is_void() {
            return format!("<{open} />");
        }
        if el.children().is_empty() {
            return if el.is_primitive() {
                format!("<{open} />")
            } else {
                format!("<{open}></{}>", el.tag)
            };
        }

        let block = el.children().iter().any(|c| {
            matches!(
                c,
                IrNode::Element(_) | IrNode::Fragment { .. } | IrNode::ConditionalShow(_)
            )
        });
        let children: Vec<String> = el
            .children()
            .iter()
            .map(|c| self.render(c))
            .filter(|s| !s.is_empty())
            .collect();

        if block {
            format!(
                "<{open}>\n{}\n</{}>",
                indent(&children.join("\n"), 1),
                el.tag
            )
        } else {
            format!("<{open}>{}</{}>", children.join(""), el.tag)
        }
    }

    /// Attribute order: static attributes, bindings in source order, the
    /// synthesized state set, then spreads.
    pub fn plan_attributes(&mut self, el: &ElementNode, is_root: bool) -> Vec<Attr> {
        let mut attrs = Vec::new();
        let mut spreads = Vec::new();

        for (name, value) in &el.static_attributes {
            attrs.push(Attr::Static {
                name: name.clone(),
                value: value.clone(),
            });
        }

        for (name, binding) in &el.bindings {
            match binding.kind {
                BindingKind::Spread => spreads.push(self.spread(binding)),
                BindingKind::Event => attrs.push(Attr::Event {
                    event: event_name(name),
                    handler: self.expression(&binding.expression),
                }),
                BindingKind::Expression if name == REF_KEY => {
                    attrs.push(Attr::Ref(self.ref_name(&binding.expression)));
                }
                BindingKind::Expression if name == CLASS_KEY => attrs.push(Attr::Expression {
                    name: CLASS_KEY.to_string(),
                    expression: self.class_expression(&binding.expression),
                }),
                BindingKind::Expression => attrs.push(Attr::Expression {
                    name: name.clone(),
                    expression: self.expression(&binding.expression),
                }),
            }
        }

        if is_root {
            self.root_state_attributes(el, &mut attrs);
        } else if let Some(state) = self.scope.states.first() {
            if el.class_text().is_some_and(has_state_selector) {
                attrs.push(Attr::Expression {
                    name: "data-state".to_string(),
                    expression: state.derived.clone(),
                });
            }
        }

        attrs.extend(spreads);
        attrs
    }

    fn root_state_attributes(&self, el: &ElementNode, attrs: &mut Vec<Attr>) {
        let Some(state) = self.scope.states.first() else {
            return;
        };
        let has = |name: &str| {
            el.static_attribute(name).is_some() || el.binding(name).is_some()
        };
        let native = primitive_tag(&el.tag).unwrap_or(&el.tag);

        if native == "button" && !has("type") {
            attrs.push(Attr::Static {
                name: "type".to_string(),
                value: "button".to_string(),
            });
        }
        if let Some(role) = &state.role {
            if !has("role") {
                attrs.push(Attr::Static {
                    name: "role".to_string(),
                    value: role.clone(),
                });
            }
        }
        if let Some(prop) = self.scope.prop(&state.prop) {
            attrs.push(Attr::Expression {
                name: state.aria.clone(),
                expression: self.syntax.prop_ref(prop),
            });
        }
        attrs.push(Attr::Expression {
            name: "data-state".to_string(),
            expression: state.derived.clone(),
        });
        if let Some(disabled) = self.scope.prop("disabled") {
            if !has("disabled") {
                attrs.push(Attr::Expression {
                    name: "disabled".to_string(),
                    expression: self.syntax.prop_ref(disabled),
                });
            }
        }
        if let Some(toggle) = &state.toggle {
            if !has("onClick") {
                attrs.push(Attr::Event {
                    event: "click".to_string(),
                    handler: toggle.clone(),
                });
            }
        }
    }

    fn spread(&self, binding: &Binding) -> Attr {
        let expr = strip_props_prefix(binding.expression.trim());
        if is_identifier(&expr) && !self.scope.is_known_binding(&expr) {
            Attr::RestSpread
        } else {
            Attr::Spread(self.expression(&expr))
        }
    }

    fn ref_name(&self, expr: &str) -> String {
        self.scope
            .ref_local
            .clone()
            .unwrap_or_else(|| expr.trim().to_string())
    }

    fn class_expression(&mut self, expr: &str) -> String {
        let resolve = |ident: &str| self.syntax.resolve(ident);
        let binding = translate_class(
            expr,
            &ClassContext {
                variant_fn: self.scope.variant.map(|v| v.name.as_str()),
                merge_fn: MERGE_FN,
                resolve: &resolve,
            },
        );
        self.needs_class_merge |= binding.needs_class_merge;
        binding.expression
    }

    /// Translate an opaque expression into the target namespace.
    pub fn expression(&self, expr: &str) -> String {
        let stripped = strip_props_prefix(expr.trim());
        rewrite_identifiers(&stripped, &|ident| self.syntax.resolve(ident))
    }
}

/// `onClick` → `click`.
pub fn event_name(attr: &str) -> String {
    attr.strip_prefix("on").unwrap_or(attr).to_ascii_lowercase()
}

/// Root synthesized from the forwarded ref when no markup was extracted.
pub fn fallback_root(component: &ComponentDefinition) -> Option<IrNode> {
    let ref_forward = component.metadata.ref_forward.as_ref()?;

    let class = match &component.metadata.variant {
        Some(variant) => {
            let mut args: Vec<String> = variant
                .variants
                .iter()
                .filter(|axis| component.prop(&axis.name).is_some())
                .map(|axis| axis.name.clone())
                .collect();
            args.push("className".to_string());
            format!("{MERGE_FN}({}({{ {} }}))", variant.name, args.join(", "))
        }
        None => "className".to_string(),
    };

    let mut root = ElementNode::new(ref_forward.native_tag());
    root.bindings.push((CLASS_KEY.to_string(), Binding::expression(class)));
    root.bindings
        .push((REF_KEY.to_string(), Binding::expression(ref_forward.param_name.clone())));
    root.bindings.push((
        refract_parser::ir::SPREAD_KEY.to_string(),
        Binding::spread("props"),
    ));
    Some(IrNode::Element(root.with_children(vec![IrNode::Slot])))
}

/// Serialize a variant configuration as a `cva(...)` declaration.
pub fn variant_declaration(config: &VariantConfig) -> String {
    let mut out = format!("const {} = cva({}, {{\n", config.name, js_string(&config.base_classes));

    out.push_str("  variants: {\n");
    for axis in &config.variants {
        out.push_str(&format!("    {}: {{\n", crate::declarations::property_key(&axis.name)));
        for (value, classes) in &axis.values {
            out.push_str(&format!(
                "      {}: {},\n",
                crate::declarations::property_key(value),
                js_string(classes)
            ));
        }
        out.push_str("    },\n");
    }
    out.push_str("  },\n");

    if !config.default_variants.is_empty() {
        out.push_str("  defaultVariants: {\n");
        for (axis, value) in &config.default_variants {
            out.push_str(&format!(
                "    {}: {},\n",
                crate::declarations::property_key(axis),
                literal_value(value)
            ));
        }
        out.push_str("  },\n");
    }

    if !config.compound_variants.is_empty() {
        out.push_str("  compoundVariants: [\n");
        for compound in &config.compound_variants {
            let mut entries: Vec<String> = compound
                .conditions
                .iter()
                .map(|(axis, value)| {
                    format!("{}: {}", crate::declarations::property_key(axis), literal_value(value))
                })
                .collect();
            entries.push(format!("class: {}", js_string(&compound.classes)));
            out.push_str(&format!("    {{ {} }},\n", entries.join(", ")));
        }
        out.push_str("  ],\n");
    }

    out.push_str("});");
    out
}

/// Quote as a JS string, using a template literal when the text carries
/// `${...}` interpolations.
pub fn js_string(s: &str) -> String {
    if s.contains("${") {
        format!("`{}`", s.replace('`', "\\`"))
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Variant values are strings unless they carry their own literal syntax.
fn literal_value(value: &str) -> String {
    let trimmed = value.trim();
    let is_literal = trimmed.starts_with('[')
        || trimmed == "true"
        || trimmed == "false"
        || trimmed.parse::<f64>().is_ok();
    if is_literal {
        trimmed.to_string()
    } else {
        js_string(trimmed)
    }
}

pub fn pascal_case(s: &str) -> String {
    s.split(['-', '_'])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Type text for a prop. Variant props without a declared type become the
/// union of their allowed values.
pub fn prop_type(prop: &PropDefinition) -> String {
    let ty = prop.ty.trim();
    match &prop.allowed_values {
        Some(values) if (ty.is_empty() || ty == "unknown") && !values.is_empty() => values
            .iter()
            .map(|v| js_string(v))
            .collect::<Vec<_>>()
            .join(" | "),
        _ if ty.is_empty() => "unknown".to_string(),
        _ => ty.to_string(),
    }
}

/// True when `text` calls the class-merge helper.
pub fn calls_class_merge(text: &str) -> bool {
    MERGE_CALL_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refract_parser::{StateProp, VariantAxis};

    #[test]
    fn converts_event_names() {
        assert_eq!(event_name("onClick"), "click");
        assert_eq!(event_name("onMouseEnter"), "mouseenter");
    }

    #[test]
    fn detects_merge_calls() {
        assert!(calls_class_merge("class={cn(\"a\", className)}"));
        assert!(!calls_class_merge("class={icn(a)}"));
    }

    #[test]
    fn variant_prop_types_fall_back_to_allowed_values() {
        let mut prop = PropDefinition::new("size", "unknown");
        prop.allowed_values = Some(vec!["sm".to_string(), "lg".to_string()]);
        assert_eq!(prop_type(&prop), "\"sm\" | \"lg\"");
    }

    #[test]
    fn pascal_cases() {
        assert_eq!(pascal_case("checked"), "Checked");
        assert_eq!(pascal_case("alert-dialog"), "AlertDialog");
    }

    #[test]
    fn quotes_js_strings() {
        assert_eq!(js_string("a \"b\""), "\"a \\\"b\\\"\"");
        assert_eq!(js_string("a ${b}"), "`a ${b}`");
    }

    #[test]
    fn serializes_variant_config() {
        let config = VariantConfig {
            name: "buttonVariants".to_string(),
            base_classes: "inline-flex".to_string(),
            variants: vec![VariantAxis {
                name: "variant".to_string(),
                values: vec![
                    ("default".to_string(), "A".to_string()),
                    ("destructive".to_string(), "B".to_string()),
                ],
            }],
            default_variants: vec![("variant".to_string(), "default".to_string())],
            compound_variants: Vec::new(),
        };
        assert_eq!(
            variant_declaration(&config),
            "const buttonVariants = cva(\"inline-flex\", {\n  variants: {\n    variant: {\n      default: \"A\",\n      destructive: \"B\",\n    },\n  },\n  defaultVariants: {\n    variant: \"default\",\n  },\n});"
        );
    }

    #[test]
    fn state_bindings_name_toggles() {
        let mut component = ComponentDefinition::new("Switch");
        component.metadata.state_props.push(StateProp {
            prop: "checked".to_string(),
            change_handler: Some("onCheckedChange".to_string()),
            labels: StateLabels {
                on: "checked".to_string(),
                off: "unchecked".to_string(),
            },
            aria_attribute: "aria-checked".to_string(),
            role: Some("switch".to_string()),
        });
        let props = vec![PropDefinition::new("checked", "boolean")];

        let states = state_bindings(&component, &props);
        assert_eq!(states[0].derived, "checkedState");
        assert_eq!(states[0].toggle.as_deref(), Some("toggle"));
        assert_eq!(
            states[0].label_expression("checked"),
            "checked ? \"checked\" : \"unchecked\""
        );
    }

    #[test]
    fn fallback_root_uses_ref_element() {
        let mut component = ComponentDefinition::new("Input");
        component.metadata.ref_forward = Some(refract_parser::RefForwardConfig {
            element_type: "HTMLInputElement".to_string(),
            param_name: "ref".to_string(),
        });
        let root = fallback_root(&component).unwrap();
        let el = root.root_element().unwrap();
        assert_eq!(el.tag, "input");
        // Void elements never get the slot child.
        assert!(el.children().is_empty());
        assert_eq!(el.binding("class").unwrap().expression, "className");
    }
}
