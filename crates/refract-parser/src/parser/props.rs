//! Prop extraction.
//!
//! Three tiers are tried in order until one yields props:
//! 1. an interface or type alias named `<Component>Props`,
//! 2. the destructured first parameter of the component,
//! 3. every `*Props` declaration in the file.
//!
//! Destructuring defaults are applied on top of whichever tier won, and
//! variant axes are cross-referenced afterwards.

use std::sync::LazyLock;

use oxc_ast::ast::{
    BindingPattern, BindingPatternKind, Declaration, Statement, TSSignature, TSType,
};
use oxc_span::GetSpan;
use regex::Regex;

use crate::metadata::{is_event_name, PropDefinition, VariantConfig, Warning};
use crate::parser::syntax::{key_name, text, Callback};

/// Names handled specially by every target and never listed as props.
const RESERVED_PROPS: &[&str] = &["className", "class", "children", "ref"];

static VARIANT_PROPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"VariantProps\s*<\s*typeof\s+(\w+)\s*>").expect("Invalid variant props regex")
});

static STRING_UNION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:['"][^'"]*['"]\s*\|\s*)*['"][^'"]*['"]\s*$"#)
        .expect("Invalid string union regex")
});

static STRING_MEMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([^'"]*)['"]"#).expect("Invalid string member regex"));

/// Props declared by one interface or type alias.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropsDeclaration {
    pub name: String,
    pub props: Vec<PropDefinition>,
    /// Variant configs pulled in through `VariantProps<typeof x>`.
    pub variant_refs: Vec<String>,
}

/// A destructured prop: name, local binding and default text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DestructuredProp {
    pub name: String,
    pub local: String,
    pub default: Option<String>,
}

/// Collect `interface XProps {}` and `type XProps = {}` declarations.
pub(crate) fn collect_props_declarations(source: &str, statements: &[Statement]) -> Vec<PropsDeclaration> {
    let mut decls = Vec::new();
    for stmt in statements {
        match stmt {
            Statement::TSInterfaceDeclaration(decl) => {
                decls.push(interface_props(source, decl));
            }
            Statement::TSTypeAliasDeclaration(decl) => {
                decls.push(alias_props(source, decl));
            }
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::TSInterfaceDeclaration(decl)) => {
                    decls.push(interface_props(source, decl));
                }
                Some(Declaration::TSTypeAliasDeclaration(decl)) => {
                    decls.push(alias_props(source, decl));
                }
                _ => {}
            },
            _ => {}
        }
    }
    decls.retain(|d| d.name.ends_with("Props"));
    decls
}

fn interface_props(source: &str, decl: &oxc_ast::ast::TSInterfaceDeclaration) -> PropsDeclaration {
    PropsDeclaration {
        name: decl.id.name.to_string(),
        props: decl
            .body
            .body
            .iter()
            .filter_map(|sig| signature_prop(source, sig))
            .collect(),
        variant_refs: variant_refs(text(source, decl.span)),
    }
}

fn alias_props(source: &str, decl: &oxc_ast::ast::TSTypeAliasDeclaration) -> PropsDeclaration {
    let mut props = Vec::new();
    collect_type_members(source, &decl.type_annotation, &mut props);
    PropsDeclaration {
        name: decl.id.name.to_string(),
        props,
        variant_refs: variant_refs(text(source, decl.span)),
    }
}

fn collect_type_members(source: &str, ty: &TSType, props: &mut Vec<PropDefinition>) {
    match ty {
        TSType::TSTypeLiteral(literal) => {
            props.extend(
                literal
                    .members
                    .iter()
                    .filter_map(|sig| signature_prop(source, sig)),
            );
        }
        TSType::TSIntersectionType(intersection) => {
            for member in &intersection.types {
                collect_type_members(source, member, props);
            }
        }
        _ => {}
    }
}

fn signature_prop(source: &str, sig: &TSSignature) -> Option<PropDefinition> {
    let TSSignature::TSPropertySignature(sig) = sig else {
        return None;
    };
    let name = key_name(&sig.key)?;
    let ty = sig
        .type_annotation
        .as_ref()
        .map(|t| text(source, t.type_annotation.span()).to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut prop = PropDefinition::new(name, ty);
    prop.optional = sig.optional;
    prop.allowed_values = string_union(&prop.ty);
    Some(prop)
}

fn variant_refs(decl_text: &str) -> Vec<String> {
    VARIANT_PROPS_RE
        .captures_iter(decl_text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Members of a `"a" | "b"` union type.
fn string_union(ty: &str) -> Option<Vec<String>> {
    if !STRING_UNION_RE.is_match(ty) {
        return None;
    }
    Some(
        STRING_MEMBER_RE
            .captures_iter(ty)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect(),
    )
}

/// Destructured props of the component's first parameter. The rest element is
/// skipped.
pub(crate) fn destructured_props(source: &str, callback: Callback) -> Vec<DestructuredProp> {
    let Some(param) = callback.params().items.first() else {
        return Vec::new();
    };
    let pattern = match &param.pattern.kind {
        BindingPatternKind::AssignmentPattern(assign) => &assign.left,
        _ => &param.pattern,
    };
    let BindingPatternKind::ObjectPattern(object) = &pattern.kind else {
        return Vec::new();
    };

    object
        .properties
        .iter()
        .filter_map(|prop| {
            let name = key_name(&prop.key)?;
            let (local, default) = binding_local(source, &prop.value);
            Some(DestructuredProp {
                local: local.unwrap_or_else(|| name.clone()),
                name,
                default,
            })
        })
        .collect()
}

fn binding_local(source: &str, pattern: &BindingPattern) -> (Option<String>, Option<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => (Some(id.name.to_string()), None),
        BindingPatternKind::AssignmentPattern(assign) => {
            let (local, _) = binding_local(source, &assign.left);
            (local, Some(text(source, assign.right.span()).to_string()))
        }
        _ => (None, None),
    }
}

/// Resolve the final prop list for one component.
pub(crate) fn resolve_props(
    source: &str,
    component: &str,
    callback: Option<Callback>,
    decls: &[PropsDeclaration],
    variant_configs: &[VariantConfig],
    warnings: &mut Vec<Warning>,
) -> Vec<PropDefinition> {
    let destructured = callback
        .map(|cb| destructured_props(source, cb))
        .unwrap_or_default();

    let own_name = format!("{component}Props");
    let mut variant_refs: Vec<String> = Vec::new();

    let mut props = match decls.iter().find(|d| d.name == own_name) {
        Some(decl) if !decl.props.is_empty() || !decl.variant_refs.is_empty() => {
            variant_refs.extend(decl.variant_refs.iter().cloned());
            decl.props.clone()
        }
        _ => Vec::new(),
    };

    if props.is_empty() && variant_refs.is_empty() {
        props = destructured
            .iter()
            .filter(|d| !RESERVED_PROPS.contains(&d.name.as_str()))
            .map(|d| PropDefinition::new(d.name.clone(), inferred_type(&d.name, d.default.as_deref())))
            .collect();
    }

    if props.is_empty() && variant_refs.is_empty() {
        for decl in decls {
            variant_refs.extend(decl.variant_refs.iter().cloned());
            for prop in &decl.props {
                if !props.iter().any(|p: &PropDefinition| p.name == prop.name) {
                    props.push(prop.clone());
                }
            }
        }
        if !props.is_empty() {
            warnings.push(Warning::new(
                "props",
                format!("{component}: props taken from file-wide declarations"),
            ));
        }
    }

    // Axes referenced through VariantProps<typeof x> become props.
    for config_name in &variant_refs {
        match variant_configs.iter().find(|c| &c.name == config_name) {
            Some(config) => {
                for axis in &config.variants {
                    if !props.iter().any(|p| p.name == axis.name) {
                        props.push(PropDefinition::new(axis.name.clone(), "unknown"));
                    }
                }
            }
            None => warnings.push(Warning::new(
                "props",
                format!("{component}: VariantProps references unknown config `{config_name}`"),
            )),
        }
    }

    props.retain(|p| !RESERVED_PROPS.contains(&p.name.as_str()));

    for prop in &mut props {
        if let Some(d) = destructured.iter().find(|d| d.name == prop.name) {
            if prop.default_value.is_none() {
                prop.default_value = d.default.clone();
            }
            if d.local != d.name {
                prop.local_name = Some(d.local.clone());
            }
        }
        apply_variant(prop, &variant_refs, variant_configs);
        if prop.default_value.is_some() && prop.ty == "unknown" {
            prop.ty = inferred_type(&prop.name, prop.default_value.as_deref());
        }
    }

    if props.is_empty() {
        warnings.push(Warning::new(
            "props",
            format!("{component}: no props found"),
        ));
    }

    props
}

/// Mark `prop` as a variant when it names an axis, preferring configs the
/// component references explicitly.
fn apply_variant(prop: &mut PropDefinition, refs: &[String], configs: &[VariantConfig]) {
    let config = configs
        .iter()
        .filter(|c| refs.contains(&c.name))
        .chain(configs.iter())
        .find(|c| c.has_axis(&prop.name));
    let Some(config) = config else {
        return;
    };
    let Some(axis) = config.axis(&prop.name) else {
        return;
    };

    prop.is_variant = true;
    prop.allowed_values = Some(axis.value_names());
    if prop.default_value.is_none() {
        prop.default_value = config.default_for(&prop.name).map(|v| format!("\"{v}\""));
    }
    if prop.ty == "unknown" || prop.ty.is_empty() {
        prop.ty = axis
            .values
            .iter()
            .map(|(value, _)| format!("\"{value}\""))
            .collect::<Vec<_>>()
            .join(" | ");
    }
}

/// Best-effort type for a prop without a declaration.
fn inferred_type(name: &str, default: Option<&str>) -> String {
    if is_event_name(name) {
        return "(...args: any[]) => void".to_string();
    }
    match default.map(str::trim) {
        Some("true") | Some("false") => "boolean".to_string(),
        Some(d) if d.starts_with('"') || d.starts_with('\'') || d.starts_with('`') => {
            "string".to_string()
        }
        Some(d) if d.parse::<f64>().is_ok() => "number".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_unions() {
        assert_eq!(
            string_union(r#""sm" | "lg""#),
            Some(vec!["sm".to_string(), "lg".to_string()])
        );
        assert_eq!(string_union("boolean"), None);
    }

    #[test]
    fn infers_types_from_defaults() {
        assert_eq!(inferred_type("asChild", Some("false")), "boolean");
        assert_eq!(inferred_type("label", Some("'x'")), "string");
        assert_eq!(inferred_type("max", Some("100")), "number");
        assert_eq!(inferred_type("onCheckedChange", None), "(...args: any[]) => void");
        assert_eq!(inferred_type("value", None), "unknown");
    }

    #[test]
    fn finds_variant_refs() {
        let text = "interface ButtonProps extends A, VariantProps<typeof buttonVariants> {}";
        assert_eq!(variant_refs(text), vec!["buttonVariants".to_string()]);
    }
}
