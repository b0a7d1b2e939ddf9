//! Small helpers over the oxc AST. Expression text is always taken from the
//! source span so that it survives untouched into generated code.

use oxc_ast::ast::{
    ArrowFunctionExpression, BindingPatternKind, CallExpression, Expression, FormalParameters,
    Function, FunctionBody, ObjectExpression, ObjectPropertyKind, PropertyKey, Statement,
};
use oxc_span::{GetSpan, Span};

/// Source text covered by `span`.
pub(crate) fn text(source: &str, span: Span) -> &str {
    span.source_text(source)
}

/// Strip parentheses and TypeScript-only wrappers.
pub(crate) fn unwrap_expr<'b, 'a>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
    match expr {
        Expression::ParenthesizedExpression(inner) => unwrap_expr(&inner.expression),
        Expression::TSAsExpression(inner) => unwrap_expr(&inner.expression),
        Expression::TSSatisfiesExpression(inner) => unwrap_expr(&inner.expression),
        Expression::TSNonNullExpression(inner) => unwrap_expr(&inner.expression),
        other => other,
    }
}

/// Literal value of a string or template literal. Template interpolations
/// are kept verbatim as `${...}`.
pub(crate) fn string_value(source: &str, expr: &Expression) -> Option<String> {
    match unwrap_expr(expr) {
        Expression::StringLiteral(lit) => Some(lit.value.to_string()),
        Expression::TemplateLiteral(tpl) => {
            let raw = text(source, tpl.span);
            Some(raw.trim_start_matches('`').trim_end_matches('`').to_string())
        }
        Expression::BinaryExpression(bin) => {
            // 'a ' + 'b' concatenations
            let op = source.get(bin.left.span().end as usize..bin.right.span().start as usize)?;
            if op.trim() != "+" {
                return None;
            }
            let left = string_value(source, &bin.left)?;
            let right = string_value(source, &bin.right)?;
            Some(format!("{left}{right}"))
        }
        _ => None,
    }
}

/// String value when the expression is a literal, otherwise its source text.
pub(crate) fn literal_or_text(source: &str, expr: &Expression) -> String {
    string_value(source, expr).unwrap_or_else(|| text(source, expr.span()).to_string())
}

/// Static name of a property key (`foo`, `"foo"`).
pub(crate) fn key_name(key: &PropertyKey) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.to_string()),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        PropertyKey::Identifier(id) => Some(id.name.to_string()),
        _ => None,
    }
}

/// Look up a non-computed property of an object literal.
pub(crate) fn object_property<'b, 'a>(
    object: &'b ObjectExpression<'a>,
    name: &str,
) -> Option<&'b Expression<'a>> {
    object.properties.iter().find_map(|prop| match prop {
        ObjectPropertyKind::ObjectProperty(p) if key_name(&p.key).as_deref() == Some(name) => {
            Some(&p.value)
        }
        _ => None,
    })
}

/// `(key, value)` pairs of an object literal, skipping spreads and computed
/// keys.
pub(crate) fn object_entries<'b, 'a>(
    object: &'b ObjectExpression<'a>,
) -> Vec<(String, &'b Expression<'a>)> {
    object
        .properties
        .iter()
        .filter_map(|prop| match prop {
            ObjectPropertyKind::ObjectProperty(p) if !p.computed => {
                key_name(&p.key).map(|k| (k, &p.value))
            }
            _ => None,
        })
        .collect()
}

/// Final member of the callee: `React.forwardRef` → `forwardRef`.
pub(crate) fn callee_name(call: &CallExpression) -> Option<String> {
    match unwrap_expr(&call.callee) {
        Expression::Identifier(id) => Some(id.name.to_string()),
        Expression::StaticMemberExpression(member) => Some(member.property.name.to_string()),
        _ => None,
    }
}

/// Top-level generic arguments written between the callee and `(`, e.g.
/// `forwardRef<HTMLButtonElement, ButtonProps>(...)`.
pub(crate) fn type_arguments(source: &str, call: &CallExpression) -> Vec<String> {
    let start = call.callee.span().end as usize;
    let end = call
        .arguments
        .first()
        .map(|arg| arg.span().start as usize)
        .unwrap_or(call.span.end as usize);
    let between = source.get(start..end).unwrap_or("");

    let Some(open) = between.find('<') else {
        return Vec::new();
    };

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in between[open + 1..].chars() {
        match c {
            '<' | '(' | '{' | '[' => {
                depth += 1;
                current.push(c);
            }
            '>' if depth == 0 => break,
            '>' | ')' | '}' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        args.push(current.trim().to_string());
    }
    args
}

/// A function-like component body.
#[derive(Clone, Copy)]
pub(crate) enum Callback<'b, 'a> {
    Arrow(&'b ArrowFunctionExpression<'a>),
    Function(&'b Function<'a>),
}

impl<'b, 'a> Callback<'b, 'a> {
    /// Wrap a function or arrow expression.
    pub(crate) fn from_expression(expr: &'b Expression<'a>) -> Option<Self> {
        match unwrap_expr(expr) {
            Expression::ArrowFunctionExpression(arrow) => Some(Callback::Arrow(arrow)),
            Expression::FunctionExpression(func) => Some(Callback::Function(func)),
            _ => None,
        }
    }

    pub(crate) fn params(&self) -> &'b FormalParameters<'a> {
        match *self {
            Callback::Arrow(arrow) => &*arrow.params,
            Callback::Function(func) => &*func.params,
        }
    }

    pub(crate) fn body(&self) -> Option<&'b FunctionBody<'a>> {
        match *self {
            Callback::Arrow(arrow) => Some(&*arrow.body),
            Callback::Function(func) => func.body.as_deref(),
        }
    }

    /// Name of the parameter at `index` when it is a plain identifier.
    pub(crate) fn param_name(&self, index: usize) -> Option<String> {
        let param = self.params().items.get(index)?;
        match &param.pattern.kind {
            BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
            BindingPatternKind::AssignmentPattern(assign) => match &assign.left.kind {
                BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
                _ => None,
            },
            _ => None,
        }
    }

    /// The expression the component renders: an expression-bodied arrow, or
    /// the last top-level `return` of a block body.
    pub(crate) fn returned_expression(&self) -> Option<&'b Expression<'a>> {
        let body = self.body()?;
        if let Callback::Arrow(arrow) = *self {
            if arrow.expression {
                return match body.statements.first() {
                    Some(Statement::ExpressionStatement(stmt)) => Some(&stmt.expression),
                    _ => None,
                };
            }
        }
        body.statements.iter().rev().find_map(|stmt| match stmt {
            Statement::ReturnStatement(ret) => ret.argument.as_ref(),
            _ => None,
        })
    }

    pub(crate) fn statements(&self) -> &'b [Statement<'a>] {
        match self.body() {
            Some(body) => &body.statements,
            None => &[],
        }
    }
}

/// Inner text of a `{ ... }` block, trimmed.
pub(crate) fn block_inner(block_text: &str) -> String {
    let trimmed = block_text.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(trimmed);
    dedent(inner.trim_matches('\n'))
}

/// Remove the common leading indentation of non-empty lines.
///
/// Indentation is counted in characters, so any Unicode whitespace counts
/// as one column.
pub(crate) fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    text.lines()
        .map(|l| strip_indent(l, indent))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    match line.char_indices().nth(indent) {
        Some((at, _)) if line[..at].trim().is_empty() => &line[at..],
        _ => line.trim_start(),
    }
}
