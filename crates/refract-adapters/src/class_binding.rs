//! Class expression translation.
//!
//! `cn(buttonVariants({ variant, size, className }))` becomes
//! `cn(buttonVariants({ variant, size }), className)` with every bare
//! identifier resolved against the target's prop namespace.

use crate::expr::{rewrite_identifiers, strip_props_prefix};

/// Names under which the source passes the consumer's extra classes.
const CLASS_ARGUMENTS: &[&str] = &["className", "class"];

/// Inputs for translating one class expression.
pub struct ClassContext<'a> {
    /// Variant function in scope, e.g. `buttonVariants`.
    pub variant_fn: Option<&'a str>,
    /// Class-merge helper name.
    pub merge_fn: &'a str,
    /// Resolves a bare identifier to its target form. Must map `className`.
    pub resolve: &'a dyn Fn(&str) -> Option<String>,
}

/// A translated class expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBinding {
    pub expression: String,
    /// The merge helper was introduced by the translation itself.
    pub needs_class_merge: bool,
}

pub fn translate_class(expr: &str, ctx: &ClassContext) -> ClassBinding {
    let mut expression = strip_props_prefix(expr.trim());
    let mut needs_class_merge = false;

    if let Some(variant_fn) = ctx.variant_fn {
        if let Some(lifted) = lift_class_argument(&expression, variant_fn, ctx.merge_fn) {
            expression = lifted.expression;
            needs_class_merge = lifted.wrapped;
        }
    }

    ClassBinding {
        expression: rewrite_identifiers(&expression, ctx.resolve),
        needs_class_merge,
    }
}

struct Lifted {
    expression: String,
    wrapped: bool,
}

/// Move a `className` entry of the variant call's argument object out to
/// the merge call. Returns `None` when the expression has no such entry.
fn lift_class_argument(expr: &str, variant_fn: &str, merge_fn: &str) -> Option<Lifted> {
    let call_start = find_call(expr, variant_fn)?;
    let open = call_start + variant_fn.len() + expr[call_start + variant_fn.len()..].find('(')?;
    let close = matching_paren(expr, open)?;

    let args = expr[open + 1..close].trim();
    let object = args.strip_prefix('{')?.strip_suffix('}')?;

    let mut kept = Vec::new();
    let mut lifted = None;
    for entry in split_top_level(object) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match split_key(entry) {
            Some((key, value)) if CLASS_ARGUMENTS.contains(&key) => lifted = Some(value.to_string()),
            None if CLASS_ARGUMENTS.contains(&entry) => lifted = Some(entry.to_string()),
            _ => kept.push(entry.to_string()),
        }
    }
    let lifted = lifted?;

    let call = if kept.is_empty() {
        format!("{variant_fn}()")
    } else {
        format!("{variant_fn}({{ {} }})", kept.join(", "))
    };

    let before = &expr[..call_start];
    let after = &expr[close + 1..];
    if enclosing_call(before).as_deref() == Some(merge_fn) {
        Some(Lifted {
            expression: format!("{before}{call}, {lifted}{after}"),
            wrapped: false,
        })
    } else {
        Some(Lifted {
            expression: format!("{before}{merge_fn}({call}, {lifted}){after}"),
            wrapped: true,
        })
    }
}

/// Byte offset of `name(` as a free call (not a member or longer name).
fn find_call(expr: &str, name: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = expr[from..].find(name) {
        let start = from + pos;
        let preceded = expr[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
        let rest = expr[start + name.len()..].trim_start();
        if !preceded && rest.starts_with('(') {
            return Some(start);
        }
        from = start + name.len();
    }
    None
}

fn matching_paren(expr: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in expr[open..].char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Name of the innermost call whose argument list is still open at the end
/// of `before`.
fn enclosing_call(before: &str) -> Option<String> {
    let mut depth = 0i32;
    for (i, c) in before.char_indices().rev() {
        match c {
            ')' | ']' | '}' => depth += 1,
            '(' | '[' | '{' if depth > 0 => depth -= 1,
            '(' => {
                let name: String = before[..i]
                    .trim_end()
                    .chars()
                    .rev()
                    .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
                    .collect();
                return Some(name.chars().rev().collect());
            }
            '[' | '{' => return None,
            _ => {}
        }
    }
    None
}

/// Split on commas outside brackets and strings.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// `key: value` → (key, value). Spreads and shorthands return `None`.
fn split_key(entry: &str) -> Option<(&str, &str)> {
    if entry.starts_with("...") {
        return None;
    }
    let colon = entry.find(':')?;
    let key = entry[..colon].trim().trim_matches(|c: char| c == '"' || c == '\'');
    let valid = !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    valid.then(|| (key, entry[colon + 1..].trim()))
}
