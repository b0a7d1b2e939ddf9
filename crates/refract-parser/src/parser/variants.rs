//! Extraction of `cva(...)` / `tv(...)` variant configurations.

use oxc_ast::ast::{ArrayExpressionElement, CallExpression, Expression, ObjectExpression};
use oxc_span::GetSpan;

use crate::metadata::{CompoundVariant, VariantAxis, VariantConfig, Warning};
use crate::parser::syntax::{
    callee_name, literal_or_text, object_entries, object_property, string_value, text, unwrap_expr,
};

/// Variant builder functions recognized in source.
const BUILDERS: &[&str] = &["cva", "tv"];

/// Extract a configuration from `const <name> = cva(...)`. Returns `None`
/// when `init` is not a builder call.
pub(crate) fn extract_variant_config(
    source: &str,
    name: &str,
    init: &Expression,
    warnings: &mut Vec<Warning>,
) -> Option<VariantConfig> {
    let Expression::CallExpression(call) = unwrap_expr(init) else {
        return None;
    };
    let builder = callee_name(call)?;
    if !BUILDERS.contains(&builder.as_str()) {
        return None;
    }

    let mut config = VariantConfig {
        name: name.to_string(),
        ..VariantConfig::default()
    };

    let options = if builder == "tv" {
        let options = first_object(call, 0);
        if let Some(base) = options.and_then(|o| object_property(o, "base")) {
            config.base_classes = class_list(source, base);
        }
        options
    } else {
        if let Some(base) = call.arguments.first().and_then(|a| a.as_expression()) {
            config.base_classes = class_list(source, base);
        }
        first_object(call, 1)
    };

    let Some(options) = options else {
        // cva("base") without options is valid and has no axes.
        return Some(config);
    };

    if let Some(Expression::ObjectExpression(variants)) =
        object_property(options, "variants").map(unwrap_expr)
    {
        for (axis, values) in object_entries(variants) {
            let Expression::ObjectExpression(values) = unwrap_expr(values) else {
                warnings.push(Warning::new(
                    "variant-config",
                    format!("{name}: variant axis `{axis}` is not an object literal"),
                ));
                continue;
            };
            config.variants.push(VariantAxis {
                name: axis,
                values: object_entries(values)
                    .into_iter()
                    .map(|(value, classes)| (value, class_list(source, classes)))
                    .collect(),
            });
        }
    } else {
        warnings.push(Warning::new(
            "variant-config",
            format!("{name}: no `variants` object found"),
        ));
    }

    if let Some(Expression::ObjectExpression(defaults)) =
        object_property(options, "defaultVariants").map(unwrap_expr)
    {
        config.default_variants = object_entries(defaults)
            .into_iter()
            .map(|(axis, value)| (axis, literal_or_text(source, value)))
            .collect();
    }

    if let Some(Expression::ArrayExpression(compounds)) =
        object_property(options, "compoundVariants").map(unwrap_expr)
    {
        for element in &compounds.elements {
            if let Some(Expression::ObjectExpression(entry)) =
                element.as_expression().map(unwrap_expr)
            {
                config.compound_variants.push(compound_variant(source, entry));
            }
        }
    }

    if let Err(unknown) = config.validate() {
        for axis in &unknown {
            warnings.push(Warning::new(
                "variant-config",
                format!("{name}: defaultVariants names unknown axis `{axis}`"),
            ));
        }
        config.default_variants.retain(|(k, _)| !unknown.contains(k));
    }

    tracing::debug!(
        "Extracted variant config {} with {} axes",
        config.name,
        config.variants.len()
    );
    Some(config)
}

fn first_object<'b, 'a>(
    call: &'b CallExpression<'a>,
    index: usize,
) -> Option<&'b ObjectExpression<'a>> {
    match call.arguments.get(index)?.as_expression().map(unwrap_expr)? {
        Expression::ObjectExpression(obj) => Some(obj),
        _ => None,
    }
}

fn compound_variant(source: &str, entry: &ObjectExpression) -> CompoundVariant {
    let mut compound = CompoundVariant::default();
    for (key, value) in object_entries(entry) {
        if key == "class" || key == "className" {
            compound.classes = class_list(source, value);
        } else {
            compound.conditions.push((key, literal_or_text(source, value)));
        }
    }
    compound
}

/// Class string from a literal, a template, or an array of literals.
fn class_list(source: &str, expr: &Expression) -> String {
    if let Some(value) = string_value(source, expr) {
        return normalize_whitespace(&value);
    }
    if let Expression::ArrayExpression(array) = unwrap_expr(expr) {
        let parts: Vec<String> = array
            .elements
            .iter()
            .filter_map(ArrayExpressionElement::as_expression)
            .filter_map(|e| string_value(source, e))
            .collect();
        return normalize_whitespace(&parts.join(" "));
    }
    text(source, expr.span()).to_string()
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
