//! Markup fixups applied after structural repair.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use refract_adapters::{GeneratedCode, Target};
use refract_parser::tables::{is_childful_tag, is_void_tag};
use refract_parser::ComponentDefinition;

use crate::context::PluginContext;
use crate::error::PluginError;
use crate::markup::{render, tokenize, OpenTag, Token};
use crate::pipeline::Plugin;

/// Slot outlet in the legacy markup the generators emit.
pub const SLOT_OUTLET: &str = "<slot />";

/// JSX attribute name → HTML attribute name.
const ATTRIBUTE_RENAMES: &[(&str, &str)] = &[
    ("htmlFor", "for"),
    ("tabIndex", "tabindex"),
    ("readOnly", "readonly"),
    ("maxLength", "maxlength"),
    ("minLength", "minlength"),
    ("autoComplete", "autocomplete"),
    ("autoFocus", "autofocus"),
    ("spellCheck", "spellcheck"),
    ("colSpan", "colspan"),
    ("rowSpan", "rowspan"),
];

static CAMEL_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\s)([:@]?)([a-z][A-Za-z]*[A-Z][A-Za-z]*)=").expect("Invalid attribute regex")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupFixups;

impl Plugin for MarkupFixups {
    fn name(&self) -> &str {
        "markup-fixups"
    }

    fn order(&self) -> i32 {
        60
    }

    fn post_generate(
        &self,
        code: &mut GeneratedCode,
        _component: &ComponentDefinition,
        ctx: &mut PluginContext,
    ) -> Result<(), PluginError> {
        code.markup = apply_fixups(&code.markup, ctx.target);
        Ok(())
    }
}

/// Close void elements, expand self-closed native elements, give empty
/// childful elements a slot outlet and rename camelCase attributes.
/// Idempotent.
pub fn apply_fixups(markup: &str, target: Target) -> String {
    let mut out: Vec<Token> = Vec::new();

    for token in tokenize(markup) {
        match token {
            Token::Close(name) if is_void_tag(&name) => {}
            Token::Open(mut tag) if tag.is_native() => {
                tag.attrs = rename_attributes(&tag.attrs, target);
                if is_void_tag(&tag.name) {
                    tag.self_closing = true;
                    out.push(Token::Open(tag));
                } else if tag.self_closing && tag.name != "slot" {
                    let name = tag.name.clone();
                    tag.self_closing = false;
                    out.push(Token::Open(tag));
                    out.push(Token::Close(name));
                } else {
                    out.push(Token::Open(tag));
                }
            }
            other => out.push(other),
        }
    }

    let mut result: Vec<Token> = Vec::with_capacity(out.len());
    for token in out {
        if let Token::Close(name) = &token {
            if is_childful_tag(name) && opened_empty(&result, name) {
                result.push(Token::Text(SLOT_OUTLET.to_string()));
            }
        }
        result.push(token);
    }

    render(&result)
}

/// True when the last token is the matching opening tag, ignoring
/// whitespace-only text.
fn opened_empty(tokens: &[Token], name: &str) -> bool {
    let mut rev = tokens.iter().rev();
    loop {
        match rev.next() {
            Some(Token::Text(text)) if text.trim().is_empty() => continue,
            Some(Token::Open(OpenTag {
                name: open,
                self_closing: false,
                ..
            })) => return open == name,
            _ => return false,
        }
    }
}

/// Rename JSX-only attributes and `onXxx` handlers to the target's form.
fn rename_attributes(attrs: &str, target: Target) -> String {
    CAMEL_ATTR_RE
        .replace_all(attrs, |caps: &Captures| {
            let lead = &caps[1];
            let prefix = &caps[2];
            let name = &caps[3];

            if let Some(event) = name.strip_prefix("on").filter(|e| e.starts_with(char::is_uppercase)) {
                let event = event.to_ascii_lowercase();
                return match target {
                    Target::Svelte => format!("{lead}on:{event}="),
                    Target::Vue => format!("{lead}@{event}="),
                };
            }
            match ATTRIBUTE_RENAMES.iter().find(|(from, _)| *from == name) {
                Some((_, to)) => format!("{lead}{prefix}{to}="),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn void_elements_lose_closing_tags() {
        assert_eq!(
            apply_fixups("<img src=\"a.png\"></img><input>", Target::Svelte),
            "<img src=\"a.png\" /><input />"
        );
    }

    #[test]
    fn void_elements_never_get_a_slot() {
        let fixed = apply_fixups("<input class={className} {...$$restProps} />", Target::Svelte);
        assert_eq!(fixed, "<input class={className} {...$$restProps} />");
    }

    #[test]
    fn expands_self_closed_native_elements() {
        assert_eq!(
            apply_fixups("<span data-state={s} /><Check class=\"h-4\" />", Target::Svelte),
            "<span data-state={s}></span><Check class=\"h-4\" />"
        );
    }

    #[test]
    fn empty_buttons_get_the_slot_outlet() {
        assert_eq!(
            apply_fixups("<button class={x}></button>", Target::Vue),
            "<button class={x}><slot /></button>"
        );
        assert_eq!(
            apply_fixups("<label />", Target::Svelte),
            "<label><slot /></label>"
        );
        assert_eq!(
            apply_fixups("<button>Go</button>", Target::Svelte),
            "<button>Go</button>"
        );
    }

    #[test]
    fn renames_camel_case_attributes() {
        assert_eq!(
            apply_fixups("<label htmlFor=\"x\" onClick={go}>a</label>", Target::Svelte),
            "<label for=\"x\" on:click={go}>a</label>"
        );
        assert_eq!(
            apply_fixups("<input :tabIndex=\"0\" :onKeyDown=\"go\" />", Target::Vue),
            "<input :tabindex=\"0\" @keydown=\"go\" />"
        );
    }

    #[test]
    fn fixups_are_idempotent() {
        let once = apply_fixups("<div><button></button><img></img><p /></div>", Target::Svelte);
        assert_eq!(apply_fixups(&once, Target::Svelte), once);
    }
}
