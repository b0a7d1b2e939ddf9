//! Structural repair of wrapped-primitive markup.
//!
//! Generators keep dotted primitive names (`SwitchPrimitives.Root`) as tags.
//! This pass maps them to native tags with a stack so every dotted closing
//! tag closes whatever its opening tag became.

use refract_adapters::GeneratedCode;
use refract_parser::tables::primitive_tag;
use refract_parser::ComponentDefinition;

use crate::context::PluginContext;
use crate::error::PluginError;
use crate::markup::{render, tokenize, OpenTag, Token};
use crate::pipeline::Plugin;

#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralRepair;

impl Plugin for StructuralRepair {
    fn name(&self) -> &str {
        "structural-repair"
    }

    fn order(&self) -> i32 {
        50
    }

    fn post_generate(
        &self,
        code: &mut GeneratedCode,
        _component: &ComponentDefinition,
        _ctx: &mut PluginContext,
    ) -> Result<(), PluginError> {
        code.markup = repair_markup(&code.markup);
        Ok(())
    }
}

/// Replace mapped primitive tags with their native tags. Idempotent.
pub fn repair_markup(markup: &str) -> String {
    let mut stack: Vec<String> = Vec::new();
    let mut out = Vec::new();

    for token in tokenize(markup) {
        match token {
            Token::Open(tag) if tag.name.contains('.') => {
                let name = primitive_tag(&tag.name).map_or_else(|| tag.name.clone(), str::to_string);
                if !tag.self_closing {
                    stack.push(name.clone());
                }
                out.push(Token::Open(OpenTag { name, ..tag }));
            }
            Token::Close(name) if name.contains('.') => match stack.pop() {
                Some(opened) => out.push(Token::Close(opened)),
                None => {
                    tracing::debug!("Unbalanced closing tag </{}> passed through", name);
                    out.push(Token::Close(name));
                }
            },
            other => out.push(other),
        }
    }

    if !stack.is_empty() {
        tracing::debug!("Repair finished with {} unclosed primitive tags", stack.len());
    }
    render(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SWITCH: &str = "<SwitchPrimitives.Root class={cn(\"peer\", className)} type=\"button\">\n  \
<SwitchPrimitives.Thumb data-state={checkedState} />\n</SwitchPrimitives.Root>";

    #[test]
    fn maps_primitives_to_native_tags() {
        assert_eq!(
            repair_markup(SWITCH),
            "<button class={cn(\"peer\", className)} type=\"button\">\n  \
<span data-state={checkedState} />\n</button>"
        );
    }

    #[test]
    fn unmapped_primitives_pass_through_with_nesting() {
        let markup = "<Foo.Bar><DialogPrimitive.Close><X /></DialogPrimitive.Close></Foo.Bar>";
        assert_eq!(
            repair_markup(markup),
            "<Foo.Bar><button><X /></button></Foo.Bar>"
        );
    }

    #[test]
    fn closing_with_empty_stack_is_passthrough() {
        assert_eq!(repair_markup("<div></A.B></div>"), "<div></A.B></div>");
    }

    #[test]
    fn repair_is_idempotent() {
        let once = repair_markup(SWITCH);
        assert_eq!(repair_markup(&once), once);

        let nested = "<AccordionPrimitive.Item><AccordionPrimitive.Trigger>x</AccordionPrimitive.Trigger></AccordionPrimitive.Item>";
        let once = repair_markup(nested);
        assert_eq!(repair_markup(&once), once);
    }

    #[test]
    fn open_and_close_counts_balance() {
        let markup = "<TabsPrimitive.List><TabsPrimitive.Trigger>a</TabsPrimitive.Trigger>\
<TabsPrimitive.Trigger>b</TabsPrimitive.Trigger></TabsPrimitive.List>\
<TabsPrimitive.Content><p>c</p></TabsPrimitive.Content>";
        let repaired = repair_markup(markup);

        let mut depth: Vec<String> = Vec::new();
        for token in tokenize(&repaired) {
            match token {
                Token::Open(tag) if !tag.self_closing => depth.push(tag.name),
                Token::Close(name) => assert_eq!(depth.pop().as_deref(), Some(name.as_str())),
                _ => {}
            }
        }
        assert!(depth.is_empty());
        assert_eq!(
            repaired,
            "<div><button>a</button><button>b</button></div><div><p>c</p></div>"
        );
    }
}
