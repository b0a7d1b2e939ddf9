//! Svelte 5 runes conversion.
//!
//! The Svelte generator writes the legacy idiom. When runes are enabled
//! this plugin rewrites the structured declarations in place; output from
//! the fallback path only has a text block, which is converted line by line.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use refract_adapters::declarations::{Declaration, Idiom, PropBinding, TypeMember};
use refract_adapters::svelte::{LEGACY_PROPS_TYPE, REST_PROPS};
use refract_adapters::GeneratedCode;
use refract_parser::ComponentDefinition;

use crate::context::PluginContext;
use crate::error::PluginError;
use crate::pipeline::Plugin;

const PROPS_TYPE: &str = "Props";
const SNIPPET_IMPORT: &str = "import type { Snippet } from \"svelte\";";
const RENDER_CHILDREN: &str = "{@render children?.()}";

static ON_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)on:(\w+)=").expect("Invalid event directive regex"));

static SLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<slot\s*/>|<slot\s*></slot>").expect("Invalid slot regex"));

static SVELTE_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import \{[^}]*\} from "svelte";$"#).expect("Invalid svelte import regex")
});

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^export \{ ([\w$]+) as ([\w$]+) \};$").expect("Invalid export alias regex")
});

static DERIVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$: ([\w$]+) = (.+);$").expect("Invalid reactive statement regex"));

static LIFECYCLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:onMount|afterUpdate)\(\(\) => \{$").expect("Invalid lifecycle regex")
});

/// Converts legacy Svelte output to runes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReactiveSyntax;

impl Plugin for ReactiveSyntax {
    fn name(&self) -> &str {
        "reactive-syntax"
    }

    fn order(&self) -> i32 {
        70
    }

    fn post_generate(
        &self,
        code: &mut GeneratedCode,
        component: &ComponentDefinition,
        ctx: &mut PluginContext,
    ) -> Result<(), PluginError> {
        if !ctx.svelte_runes() {
            return Ok(());
        }

        let uses_children = SLOT_RE.is_match(&code.markup);
        match code.declarations.as_mut() {
            Some(decls) => convert_declarations(decls, uses_children, ctx.options.typescript),
            None => {
                tracing::debug!("No structured declarations for {}, converting text", component.name);
                let mut bindable = vec!["ref".to_string()];
                bindable.extend(component.metadata.state_props.iter().map(|s| s.prop.clone()));
                code.declaration_block = convert_block(
                    &code.declaration_block,
                    uses_children,
                    &bindable,
                    ctx.options.typescript,
                );
            }
        }
        code.markup = convert_markup(&code.markup);
        Ok(())
    }
}

/// Rewrite a legacy declaration list to runes.
pub fn convert_declarations(decls: &mut Vec<Declaration>, uses_children: bool, typescript: bool) {
    decls.retain(|d| !matches!(d, Declaration::Import(line) if SVELTE_IMPORT_RE.is_match(line)));

    for decl in decls.iter_mut() {
        match decl {
            Declaration::PropsType { name, members } if name == LEGACY_PROPS_TYPE => {
                *name = PROPS_TYPE.to_string();
                if uses_children {
                    members.push(TypeMember {
                        name: "children".to_string(),
                        ty: "Snippet".to_string(),
                        optional: true,
                    });
                }
            }
            Declaration::Props {
                idiom,
                bindings,
                rest,
                type_name,
            } if *idiom == Idiom::SvelteLegacy => {
                *idiom = Idiom::SvelteRunes;
                if uses_children {
                    bindings.push(PropBinding::new("children").ty("Snippet"));
                }
                rest.get_or_insert_with(|| REST_PROPS.to_string());
                if type_name.as_deref() == Some(LEGACY_PROPS_TYPE) {
                    *type_name = Some(PROPS_TYPE.to_string());
                }
            }
            Declaration::Derived { idiom, .. }
            | Declaration::State { idiom, .. }
            | Declaration::Effect { idiom, .. }
                if *idiom == Idiom::SvelteLegacy =>
            {
                *idiom = Idiom::SvelteRunes;
            }
            _ => {}
        }
    }

    if uses_children && typescript {
        decls.insert(0, Declaration::Import(SNIPPET_IMPORT.to_string()));
    }
}

/// `on:click=` → `onclick=`, slot outlets → snippet render, rest props.
pub fn convert_markup(markup: &str) -> String {
    let markup = ON_DIRECTIVE_RE.replace_all(markup, "${1}on${2}=");
    let markup = SLOT_RE.replace_all(&markup, RENDER_CHILDREN);
    markup.replace("$$restProps", REST_PROPS)
}

/// Best-effort conversion of a serialized legacy block.
pub fn convert_block(block: &str, uses_children: bool, bindable: &[String], typescript: bool) -> String {
    let aliases: HashMap<&str, &str> = block
        .lines()
        .filter_map(|line| ALIAS_RE.captures(line))
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect();

    let mut lines: Vec<String> = Vec::new();
    let mut props: Vec<String> = Vec::new();
    let mut props_at: Option<usize> = None;
    let mut in_props_type = false;
    let mut has_props_type = false;

    for line in block.lines() {
        if SVELTE_IMPORT_RE.is_match(line) || ALIAS_RE.is_match(line) {
            continue;
        }
        if line == format!("interface {LEGACY_PROPS_TYPE} {{") {
            in_props_type = true;
            has_props_type = true;
            lines.push(format!("interface {PROPS_TYPE} {{"));
            continue;
        }
        if in_props_type && line == "}" {
            in_props_type = false;
            if uses_children {
                lines.push("  children?: Snippet;".to_string());
            }
            lines.push(line.to_string());
            continue;
        }
        if let Some(rest) = line.strip_prefix("export let ") {
            let (local, _, default) = split_binding(rest);
            props.push(prop_entry(local, local, default, bindable));
            props_at.get_or_insert(lines.len());
            continue;
        }
        if let Some(rest) = line.strip_prefix("let ") {
            let (local, head, init) = split_binding(rest);
            if let Some(name) = aliases.get(local) {
                props.push(prop_entry(name, local, init, bindable));
                props_at.get_or_insert(lines.len());
            } else {
                lines.push(format!("let {head} = $state({});", init.unwrap_or("undefined")));
            }
            continue;
        }
        if let Some(caps) = DERIVED_RE.captures(line) {
            lines.push(format!("const {} = $derived({});", &caps[1], &caps[2]));
            continue;
        }
        if LIFECYCLE_RE.is_match(line) {
            lines.push("$effect(() => {".to_string());
            continue;
        }
        lines.push(line.to_string());
    }

    if uses_children {
        props.push("children".to_string());
    }
    props.push(format!("...{REST_PROPS}"));
    let annotation = if has_props_type && typescript {
        format!(": {PROPS_TYPE}")
    } else {
        String::new()
    };
    let destructure = format!(
        "let {{\n{}\n}}{annotation} = $props();",
        props
            .iter()
            .map(|p| format!("  {p},"))
            .collect::<Vec<_>>()
            .join("\n")
    );
    let at = props_at.unwrap_or(lines.len());
    lines.insert(at, destructure);

    if uses_children && typescript {
        let blank = lines.first().is_some_and(|l| !l.starts_with("import "));
        if blank {
            lines.insert(0, String::new());
        }
        lines.insert(0, SNIPPET_IMPORT.to_string());
    }

    lines.join("\n")
}

/// `name: Type = value;` body → (name, head before ` = `, value).
fn split_binding(rest: &str) -> (&str, &str, Option<&str>) {
    let rest = rest.trim_end().trim_end_matches(';');
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    match rest.rfind(" = ") {
        Some(pos) => (name, &rest[..pos], Some(rest[pos + 3..].trim())),
        None => (name, rest, None),
    }
}

fn prop_entry(name: &str, local: &str, default: Option<&str>, bindable: &[String]) -> String {
    let key = if name == local {
        local.to_string()
    } else {
        format!("{name}: {local}")
    };
    let default = default.filter(|d| *d != "undefined");
    match (default, bindable.iter().any(|b| b == name)) {
        (Some(d), true) => format!("{key} = $bindable({d})"),
        (None, true) => format!("{key} = $bindable()"),
        (Some(d), false) => format!("{key} = {d}"),
        (None, false) => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refract_adapters::declarations::render;

    #[test]
    fn converts_markup_directives() {
        assert_eq!(
            convert_markup("<button on:click={toggle} {...$$restProps}><slot /></button>"),
            "<button onclick={toggle} {...restProps}>{@render children?.()}</button>"
        );
    }

    #[test]
    fn converts_structured_declarations() {
        let mut decls = vec![
            Declaration::Import("import { onMount } from \"svelte\";".to_string()),
            Declaration::PropsType {
                name: LEGACY_PROPS_TYPE.to_string(),
                members: Vec::new(),
            },
            Declaration::Props {
                idiom: Idiom::SvelteLegacy,
                bindings: vec![
                    PropBinding::new("class").local("className").ty("string"),
                    PropBinding::new("checked")
                        .ty("boolean")
                        .default_value(Some("false".to_string()))
                        .bindable(),
                ],
                rest: Some(REST_PROPS.to_string()),
                type_name: Some(LEGACY_PROPS_TYPE.to_string()),
            },
            Declaration::Derived {
                idiom: Idiom::SvelteLegacy,
                name: "checkedState".to_string(),
                expression: "checked ? \"checked\" : \"unchecked\"".to_string(),
            },
        ];
        convert_declarations(&mut decls, true, true);

        assert_eq!(
            render(&decls, true),
            "import type { Snippet } from \"svelte\";\n\n\
interface Props {\n  children?: Snippet;\n}\n\n\
let {\n  class: className,\n  checked = $bindable(false),\n  children,\n  ...restProps,\n}: Props = $props();\n\n\
const checkedState = $derived(checked ? \"checked\" : \"unchecked\");"
        );
    }

    #[test]
    fn converts_text_block() {
        let block = "import { cn } from \"$lib/utils\";\n\n\
interface $$Props {\n  ref?: HTMLInputElement | null;\n  class?: string;\n}\n\n\
export let ref: HTMLInputElement | null = null;\n\
let className: string | undefined = undefined;\n\
export { className as class };\n\n\
onMount(() => {\n  focus();\n});";

        assert_eq!(
            convert_block(block, false, &["ref".to_string()], true),
            "import { cn } from \"$lib/utils\";\n\n\
interface Props {\n  ref?: HTMLInputElement | null;\n  class?: string;\n}\n\n\
let {\n  ref = $bindable(null),\n  class: className,\n  ...restProps,\n}: Props = $props();\n\n\
$effect(() => {\n  focus();\n});"
        );
    }

    #[test]
    fn text_block_local_state_and_function_types() {
        let block = "export let onOpen: ((...args: any[]) => void) | undefined = undefined;\nlet count = 0;";
        assert_eq!(
            convert_block(block, true, &[], false),
            "let {\n  onOpen,\n  children,\n  ...restProps,\n} = $props();\nlet count = $state(0);"
        );
    }
}
