//! Framework-agnostic markup tree.
//!
//! The parser lowers JSX into [`IrNode`] values and every target adapter walks
//! the same tree. Attribute maps keep source order so generated markup is
//! stable across runs.

use serde::Serialize;

use crate::tables::is_void_tag;

/// Pseudo-key under which a `ref={...}` attribute is stored.
pub const REF_KEY: &str = "ref";

/// Pseudo-key under which `{...rest}` spread attributes are stored.
pub const SPREAD_KEY: &str = "...spread";

/// Key used for `className` / `class` bindings.
pub const CLASS_KEY: &str = "class";

/// A node in the component markup tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrNode {
    Element(ElementNode),
    Text(TextNode),
    Fragment { children: Vec<IrNode> },
    ConditionalShow(ConditionalNode),
    Slot,
}

impl IrNode {
    /// An empty fragment, used as the root when no markup was found.
    pub fn empty() -> Self {
        IrNode::Fragment {
            children: Vec::new(),
        }
    }

    /// True when the node renders nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            IrNode::Fragment { children } => children.is_empty(),
            IrNode::Text(text) => text.is_blank(),
            _ => false,
        }
    }

    /// The element at the top of the tree, looking through single-child
    /// fragments.
    pub fn root_element(&self) -> Option<&ElementNode> {
        match self {
            IrNode::Element(el) => Some(el),
            IrNode::Fragment { children } => {
                let mut rendered = children.iter().filter(|c| !c.is_empty());
                match (rendered.next(), rendered.next()) {
                    (Some(only), None) => only.root_element(),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Visit every element in depth-first order.
    pub fn walk_elements<'a>(&'a self, f: &mut dyn FnMut(&'a ElementNode)) {
        match self {
            IrNode::Element(el) => {
                f(el);
                for child in &el.children {
                    child.walk_elements(f);
                }
            }
            IrNode::Fragment { children } => {
                for child in children {
                    child.walk_elements(f);
                }
            }
            IrNode::ConditionalShow(cond) => {
                cond.then.walk_elements(f);
                if let Some(otherwise) = &cond.otherwise {
                    otherwise.walk_elements(f);
                }
            }
            IrNode::Text(_) | IrNode::Slot => {}
        }
    }

    /// True if a `Slot` appears anywhere in the tree.
    pub fn contains_slot(&self) -> bool {
        match self {
            IrNode::Slot => true,
            IrNode::Element(el) => el.children.iter().any(IrNode::contains_slot),
            IrNode::Fragment { children } => children.iter().any(IrNode::contains_slot),
            IrNode::ConditionalShow(cond) => {
                cond.then.contains_slot()
                    || cond.otherwise.as_ref().is_some_and(|o| o.contains_slot())
            }
            IrNode::Text(_) => false,
        }
    }
}

/// One markup element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    /// Native tag (`button`), component name (`Check`) or a dotted
    /// wrapped-primitive name (`SwitchPrimitives.Root`).
    pub tag: String,

    /// Literal attributes in source order.
    pub static_attributes: Vec<(String, String)>,

    /// Expression, event and spread bindings in source order.
    pub bindings: Vec<(String, Binding)>,

    children: Vec<IrNode>,
}

impl ElementNode {
    /// Create an element. Children of void tags are dropped.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            static_attributes: Vec::new(),
            bindings: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style child assignment, honoring the void-tag rule.
    pub fn with_children(mut self, children: Vec<IrNode>) -> Self {
        self.set_children(children);
        self
    }

    pub fn set_children(&mut self, children: Vec<IrNode>) {
        if is_void_tag(&self.tag) {
            self.children.clear();
        } else {
            self.children = children;
        }
    }

    pub fn children(&self) -> &[IrNode] {
        &self.children
    }

    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }

    /// True for `Namespace.Member` tags.
    pub fn is_primitive(&self) -> bool {
        self.tag.contains('.')
    }

    pub fn static_attribute(&self, name: &str) -> Option<&str> {
        self.static_attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|(k, _)| k == name).map(|(_, b)| b)
    }

    /// Literal class string or the class binding expression, whichever exists.
    pub fn class_text(&self) -> Option<&str> {
        self.static_attribute(CLASS_KEY)
            .or_else(|| self.binding(CLASS_KEY).map(|b| b.expression.as_str()))
    }

    pub fn has_spread(&self) -> bool {
        self.binding(SPREAD_KEY).is_some()
    }
}

/// A dynamic attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Source text of the expression, without braces.
    pub expression: String,
    pub kind: BindingKind,
}

impl Binding {
    pub fn expression(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            kind: BindingKind::Expression,
        }
    }

    pub fn event(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            kind: BindingKind::Event,
        }
    }

    pub fn spread(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            kind: BindingKind::Spread,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingKind {
    Expression,
    Event,
    Spread,
}

/// Literal text or an interpolated `{expression}` child.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TextNode {
    Literal(String),
    Expression(String),
}

impl TextNode {
    pub fn is_blank(&self) -> bool {
        match self {
            TextNode::Literal(text) => text.trim().is_empty(),
            TextNode::Expression(expr) => expr.trim().is_empty(),
        }
    }
}

/// `guard && markup` or `guard ? markup : markup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalNode {
    pub guard: String,
    pub then: Box<IrNode>,
    pub otherwise: Option<Box<IrNode>>,
}
