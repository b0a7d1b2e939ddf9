//! `useState` / `useEffect` capture from a component body.

use oxc_ast::ast::{ArrayExpressionElement, BindingPatternKind, CallExpression, Expression, Statement};
use oxc_span::GetSpan;

use crate::metadata::{Effect, LocalState};
use crate::parser::syntax::{block_inner, callee_name, text, unwrap_expr, Callback};

const EFFECT_HOOKS: &[&str] = &["useEffect", "useLayoutEffect"];

/// Local state declared as `const [value, setValue] = useState(initial)`.
pub(crate) fn collect_local_state(source: &str, statements: &[Statement]) -> Vec<LocalState> {
    let mut state = Vec::new();
    for stmt in statements {
        let Statement::VariableDeclaration(decl) = stmt else {
            continue;
        };
        for declarator in &decl.declarations {
            let Some(Expression::CallExpression(call)) = declarator.init.as_ref().map(unwrap_expr)
            else {
                continue;
            };
            if callee_name(call).as_deref() != Some("useState") {
                continue;
            }
            let BindingPatternKind::ArrayPattern(pattern) = &declarator.id.kind else {
                continue;
            };
            let name = match pattern.elements.first() {
                Some(Some(element)) => match &element.kind {
                    BindingPatternKind::BindingIdentifier(id) => id.name.to_string(),
                    _ => continue,
                },
                _ => continue,
            };
            let setter = match pattern.elements.get(1) {
                Some(Some(element)) => match &element.kind {
                    BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
                    _ => None,
                },
                _ => None,
            };
            let initial = call
                .arguments
                .first()
                .map(|arg| text(source, arg.span()).to_string())
                .unwrap_or_else(|| "undefined".to_string());

            tracing::debug!("Found local state {} = {}", name, initial);
            state.push(LocalState {
                name,
                setter,
                initial,
            });
        }
    }
    state
}

/// Top-level effect hook calls in the component body.
pub(crate) fn collect_effects(source: &str, statements: &[Statement]) -> Vec<Effect> {
    statements
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ExpressionStatement(expr) => match unwrap_expr(&expr.expression) {
                Expression::CallExpression(call) => effect(source, call),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn effect(source: &str, call: &CallExpression) -> Option<Effect> {
    let name = callee_name(call)?;
    if !EFFECT_HOOKS.contains(&name.as_str()) {
        return None;
    }
    let callback = Callback::from_expression(call.arguments.first()?.as_expression()?)?;
    let body = callback.body()?;
    let body_text = match callback {
        Callback::Arrow(arrow) if arrow.expression => text(source, body.span).trim().to_string(),
        _ => block_inner(text(source, body.span)),
    };

    let dependencies = match call.arguments.get(1).and_then(|a| a.as_expression()).map(unwrap_expr) {
        Some(Expression::ArrayExpression(deps)) => Some(
            deps.elements
                .iter()
                .filter_map(ArrayExpressionElement::as_expression)
                .map(|e| text(source, e.span()).to_string())
                .collect(),
        ),
        _ => None,
    };

    Some(Effect {
        body: body_text,
        dependencies,
    })
}
