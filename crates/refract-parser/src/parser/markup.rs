//! JSX → IR lowering.

use std::collections::HashMap;

use oxc_ast::ast::{
    Expression, JSXAttributeItem, JSXAttributeValue, JSXChild, JSXElement, JSXFragment, Statement,
    BindingPatternKind,
};
use oxc_span::GetSpan;

use crate::ir::{
    Binding, ConditionalNode, ElementNode, IrNode, TextNode, CLASS_KEY, REF_KEY, SPREAD_KEY,
};
use crate::metadata::is_event_name;
use crate::parser::syntax::{string_value, text, unwrap_expr};

/// Lowers the markup of one component.
pub(crate) struct MarkupLowering<'s> {
    source: &'s str,
    /// Local tag aliases such as `const Comp = asChild ? Slot : "button"`.
    tag_aliases: HashMap<String, String>,
}

impl<'s> MarkupLowering<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            source,
            tag_aliases: HashMap::new(),
        }
    }

    /// Record `const Comp = cond ? Primitive : "tag"` aliases found in the
    /// component body.
    pub(crate) fn collect_tag_aliases(&mut self, statements: &[Statement]) {
        for stmt in statements {
            let Statement::VariableDeclaration(decl) = stmt else {
                continue;
            };
            for declarator in &decl.declarations {
                let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
                    continue;
                };
                if !id.name.starts_with(|c: char| c.is_ascii_uppercase()) {
                    continue;
                }
                let Some(init) = &declarator.init else {
                    continue;
                };
                if let Some(tag) = native_alias(self.source, init) {
                    tracing::debug!("Resolved tag alias {} -> {}", id.name, tag);
                    self.tag_aliases.insert(id.name.to_string(), tag);
                }
            }
        }
    }

    /// Lower a returned expression. Returns `None` when it is not markup.
    pub(crate) fn lower_expression(&self, expr: &Expression) -> Option<IrNode> {
        match unwrap_expr(expr) {
            Expression::JSXElement(el) => Some(self.lower_element(el)),
            Expression::JSXFragment(frag) => Some(self.lower_fragment(frag)),
            Expression::LogicalExpression(logical) => {
                if self.operator_between(logical.left.span(), logical.right.span()) != "&&" {
                    return None;
                }
                let then = self.lower_expression(&logical.right)?;
                Some(IrNode::ConditionalShow(ConditionalNode {
                    guard: text(self.source, logical.left.span()).to_string(),
                    then: Box::new(then),
                    otherwise: None,
                }))
            }
            Expression::ConditionalExpression(cond) => {
                let guard = text(self.source, cond.test.span()).to_string();
                match (
                    self.lower_expression(&cond.consequent),
                    self.lower_expression(&cond.alternate),
                ) {
                    (Some(then), otherwise) => Some(IrNode::ConditionalShow(ConditionalNode {
                        guard,
                        then: Box::new(then),
                        otherwise: otherwise.map(Box::new),
                    })),
                    (None, Some(otherwise)) => Some(IrNode::ConditionalShow(ConditionalNode {
                        guard: format!("!({guard})"),
                        then: Box::new(otherwise),
                        otherwise: None,
                    })),
                    (None, None) => None,
                }
            }
            _ => None,
        }
    }

    fn operator_between(&self, left: oxc_span::Span, right: oxc_span::Span) -> &'s str {
        self.source
            .get(left.end as usize..right.start as usize)
            .map(|s| s.trim().trim_matches(|c: char| c == '(' || c == ')').trim())
            .unwrap_or("")
    }

    fn lower_fragment(&self, frag: &JSXFragment) -> IrNode {
        IrNode::Fragment {
            children: self.lower_children(&frag.children),
        }
    }

    fn lower_element(&self, el: &JSXElement) -> IrNode {
        let raw_tag = text(self.source, el.opening_element.name.span());
        let tag = self
            .tag_aliases
            .get(raw_tag)
            .cloned()
            .unwrap_or_else(|| raw_tag.to_string());

        let mut node = ElementNode::new(tag);

        for item in &el.opening_element.attributes {
            match item {
                JSXAttributeItem::Attribute(attr) => {
                    let name = text(self.source, attr.name.span());
                    self.lower_attribute(&mut node, name, attr.value.as_ref());
                }
                JSXAttributeItem::SpreadAttribute(spread) => {
                    let expr = text(self.source, spread.argument.span());
                    node.bindings
                        .push((SPREAD_KEY.to_string(), Binding::spread(expr)));
                }
            }
        }

        node.set_children(self.lower_children(&el.children));
        IrNode::Element(node)
    }

    fn lower_attribute(&self, node: &mut ElementNode, name: &str, value: Option<&JSXAttributeValue>) {
        let key = match name {
            "className" | "class" => CLASS_KEY,
            other => other,
        };

        let Some(value) = value else {
            node.static_attributes.push((key.to_string(), String::new()));
            return;
        };

        match value {
            JSXAttributeValue::StringLiteral(lit) => {
                node.static_attributes
                    .push((key.to_string(), lit.value.to_string()));
            }
            JSXAttributeValue::ExpressionContainer(container) => {
                let Some(expr) = container.expression.as_expression() else {
                    return;
                };
                // `children={...}` is forwarded through the spread binding.
                if key == "children" {
                    return;
                }
                let expr_text = text(self.source, expr.span()).to_string();
                if key == REF_KEY {
                    node.bindings.push((REF_KEY.to_string(), Binding::expression(expr_text)));
                } else if is_event_name(key) {
                    node.bindings.push((key.to_string(), Binding::event(expr_text)));
                } else if let (Expression::StringLiteral(_), Some(literal)) =
                    (unwrap_expr(expr), string_value(self.source, expr))
                {
                    node.static_attributes.push((key.to_string(), literal));
                } else {
                    node.bindings
                        .push((key.to_string(), Binding::expression(expr_text)));
                }
            }
            JSXAttributeValue::Element(inner) => {
                let expr_text = text(self.source, inner.span).to_string();
                node.bindings
                    .push((key.to_string(), Binding::expression(expr_text)));
            }
            JSXAttributeValue::Fragment(inner) => {
                let expr_text = text(self.source, inner.span).to_string();
                node.bindings
                    .push((key.to_string(), Binding::expression(expr_text)));
            }
        }
    }

    fn lower_children(&self, children: &[JSXChild]) -> Vec<IrNode> {
        let mut nodes = Vec::new();
        for child in children {
            match child {
                JSXChild::Text(jsx_text) => {
                    if let Some(cleaned) = clean_jsx_text(&jsx_text.value) {
                        nodes.push(IrNode::Text(TextNode::Literal(cleaned)));
                    }
                }
                JSXChild::Element(el) => nodes.push(self.lower_element(el)),
                JSXChild::Fragment(frag) => nodes.push(self.lower_fragment(frag)),
                JSXChild::ExpressionContainer(container) => {
                    let Some(expr) = container.expression.as_expression() else {
                        continue;
                    };
                    if is_children_reference(expr) {
                        nodes.push(IrNode::Slot);
                    } else if let Some(node) = self.lower_expression(expr) {
                        nodes.push(node);
                    } else {
                        let expr_text = text(self.source, expr.span()).to_string();
                        nodes.push(IrNode::Text(TextNode::Expression(expr_text)));
                    }
                }
                JSXChild::Spread(spread) => {
                    let expr_text = text(self.source, spread.expression.span()).to_string();
                    nodes.push(IrNode::Text(TextNode::Expression(expr_text)));
                }
            }
        }
        nodes
    }
}

/// `children` or `props.children`.
fn is_children_reference(expr: &Expression) -> bool {
    match unwrap_expr(expr) {
        Expression::Identifier(id) => id.name.as_str() == "children",
        Expression::StaticMemberExpression(member) => member.property.name.as_str() == "children",
        _ => false,
    }
}

/// The string-literal branch of `cond ? Primitive : "tag"`.
fn native_alias(source: &str, init: &Expression) -> Option<String> {
    match unwrap_expr(init) {
        Expression::ConditionalExpression(cond) => {
            string_value(source, &cond.alternate).or_else(|| string_value(source, &cond.consequent))
        }
        Expression::LogicalExpression(logical) => string_value(source, &logical.right),
        _ => None,
    }
}

/// Apply JSX whitespace rules: lines are trimmed and whitespace-only runs
/// containing a newline disappear.
fn clean_jsx_text(raw: &str) -> Option<String> {
    if !raw.contains('\n') {
        return if raw.is_empty() { None } else { Some(raw.to_string()) };
    }
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_multiline_text() {
        assert_eq!(clean_jsx_text("\n    \n  "), None);
        assert_eq!(
            clean_jsx_text("\n   Hello\n   world  \n"),
            Some("Hello world".to_string())
        );
        assert_eq!(clean_jsx_text(" inline "), Some(" inline ".to_string()));
    }
}
