//! Static lookup data: wrapped primitives, DOM element types, void tags and
//! icon packages.

/// Tags that never have children or a closing tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Native tags that normally wrap content; an empty one gets the slot outlet.
pub const CHILDFUL_TAGS: &[&str] = &["button", "a", "label"];

/// Wrapped-primitive name → native tag.
pub const PRIMITIVE_TAGS: &[(&str, &str)] = &[
    ("AccordionPrimitive.Root", "div"),
    ("AccordionPrimitive.Item", "div"),
    ("AccordionPrimitive.Header", "h3"),
    ("AccordionPrimitive.Trigger", "button"),
    ("AccordionPrimitive.Content", "div"),
    ("AlertDialogPrimitive.Overlay", "div"),
    ("AlertDialogPrimitive.Content", "div"),
    ("AlertDialogPrimitive.Title", "h2"),
    ("AlertDialogPrimitive.Description", "p"),
    ("AlertDialogPrimitive.Action", "button"),
    ("AlertDialogPrimitive.Cancel", "button"),
    ("AvatarPrimitive.Root", "span"),
    ("AvatarPrimitive.Image", "img"),
    ("AvatarPrimitive.Fallback", "span"),
    ("CheckboxPrimitive.Root", "button"),
    ("CheckboxPrimitive.Indicator", "span"),
    ("CollapsiblePrimitive.Trigger", "button"),
    ("CollapsiblePrimitive.Content", "div"),
    ("DialogPrimitive.Overlay", "div"),
    ("DialogPrimitive.Content", "div"),
    ("DialogPrimitive.Title", "h2"),
    ("DialogPrimitive.Description", "p"),
    ("DialogPrimitive.Close", "button"),
    ("LabelPrimitive.Root", "label"),
    ("PopoverPrimitive.Content", "div"),
    ("ProgressPrimitive.Root", "div"),
    ("ProgressPrimitive.Indicator", "div"),
    ("RadioGroupPrimitive.Root", "div"),
    ("RadioGroupPrimitive.Item", "button"),
    ("RadioGroupPrimitive.Indicator", "span"),
    ("ScrollAreaPrimitive.Root", "div"),
    ("ScrollAreaPrimitive.Viewport", "div"),
    ("ScrollAreaPrimitive.ScrollAreaScrollbar", "div"),
    ("ScrollAreaPrimitive.ScrollAreaThumb", "div"),
    ("SeparatorPrimitive.Root", "div"),
    ("SliderPrimitive.Root", "span"),
    ("SliderPrimitive.Track", "span"),
    ("SliderPrimitive.Range", "span"),
    ("SliderPrimitive.Thumb", "span"),
    ("SwitchPrimitives.Root", "button"),
    ("SwitchPrimitives.Thumb", "span"),
    ("TabsPrimitive.List", "div"),
    ("TabsPrimitive.Trigger", "button"),
    ("TabsPrimitive.Content", "div"),
    ("TogglePrimitive.Root", "button"),
    ("ToggleGroupPrimitive.Root", "div"),
    ("ToggleGroupPrimitive.Item", "button"),
    ("TooltipPrimitive.Content", "div"),
];

/// Type expression (or its dotted suffix) → DOM interface name.
pub const ELEMENT_TYPES: &[(&str, &str)] = &[
    ("HTMLAnchorElement", "HTMLAnchorElement"),
    ("HTMLButtonElement", "HTMLButtonElement"),
    ("HTMLDivElement", "HTMLDivElement"),
    ("HTMLHeadingElement", "HTMLHeadingElement"),
    ("HTMLImageElement", "HTMLImageElement"),
    ("HTMLInputElement", "HTMLInputElement"),
    ("HTMLLabelElement", "HTMLLabelElement"),
    ("HTMLLIElement", "HTMLLIElement"),
    ("HTMLOListElement", "HTMLOListElement"),
    ("HTMLParagraphElement", "HTMLParagraphElement"),
    ("HTMLSpanElement", "HTMLSpanElement"),
    ("HTMLTableCaptionElement", "HTMLTableCaptionElement"),
    ("HTMLTableCellElement", "HTMLTableCellElement"),
    ("HTMLTableElement", "HTMLTableElement"),
    ("HTMLTableRowElement", "HTMLTableRowElement"),
    ("HTMLTableSectionElement", "HTMLTableSectionElement"),
    ("HTMLTextAreaElement", "HTMLTextAreaElement"),
    ("HTMLUListElement", "HTMLUListElement"),
    ("AvatarPrimitive.Root", "HTMLSpanElement"),
    ("AvatarPrimitive.Image", "HTMLImageElement"),
    ("CheckboxPrimitive.Root", "HTMLButtonElement"),
    ("LabelPrimitive.Root", "HTMLLabelElement"),
    ("ProgressPrimitive.Root", "HTMLDivElement"),
    ("SeparatorPrimitive.Root", "HTMLDivElement"),
    ("SwitchPrimitives.Root", "HTMLButtonElement"),
    ("TogglePrimitive.Root", "HTMLButtonElement"),
    (".Trigger", "HTMLButtonElement"),
    (".Close", "HTMLButtonElement"),
    (".Action", "HTMLButtonElement"),
    (".Cancel", "HTMLButtonElement"),
    (".Item", "HTMLDivElement"),
    (".Content", "HTMLDivElement"),
    (".Overlay", "HTMLDivElement"),
    (".Title", "HTMLHeadingElement"),
    (".Description", "HTMLParagraphElement"),
    (".Indicator", "HTMLSpanElement"),
];

/// Fallback DOM interface when nothing in [`ELEMENT_TYPES`] matches.
pub const GENERIC_ELEMENT_TYPE: &str = "HTMLElement";

/// DOM interface → native tag.
const ELEMENT_TAGS: &[(&str, &str)] = &[
    ("HTMLAnchorElement", "a"),
    ("HTMLButtonElement", "button"),
    ("HTMLDivElement", "div"),
    ("HTMLHeadingElement", "h3"),
    ("HTMLImageElement", "img"),
    ("HTMLInputElement", "input"),
    ("HTMLLabelElement", "label"),
    ("HTMLLIElement", "li"),
    ("HTMLOListElement", "ol"),
    ("HTMLParagraphElement", "p"),
    ("HTMLSpanElement", "span"),
    ("HTMLTableCaptionElement", "caption"),
    ("HTMLTableCellElement", "td"),
    ("HTMLTableElement", "table"),
    ("HTMLTableRowElement", "tr"),
    ("HTMLTableSectionElement", "tbody"),
    ("HTMLTextAreaElement", "textarea"),
    ("HTMLUListElement", "ul"),
];

/// Source icon package → (Svelte package, Vue package).
pub const ICON_PACKAGES: &[(&str, &str, &str)] = &[
    ("lucide-react", "@lucide/svelte", "lucide-vue-next"),
    ("@radix-ui/react-icons", "svelte-radix", "@radix-icons/vue"),
    ("@heroicons/react", "@steeze-ui/heroicons", "@heroicons/vue"),
];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

pub fn is_childful_tag(tag: &str) -> bool {
    CHILDFUL_TAGS.contains(&tag)
}

/// Native tag for a wrapped primitive, exact match only.
pub fn primitive_tag(name: &str) -> Option<&'static str> {
    PRIMITIVE_TAGS
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| *v)
}

/// Normalize a type expression such as `HTMLButtonElement` or
/// `React.ElementRef<typeof SwitchPrimitives.Root>` to a DOM interface name.
///
/// Tries an exact match, then the longest key that is a suffix of the dotted
/// path, then [`GENERIC_ELEMENT_TYPE`].
pub fn normalize_element_type(type_text: &str) -> String {
    let path = dotted_path(type_text);

    if let Some((_, ty)) = ELEMENT_TYPES.iter().find(|(k, _)| *k == path) {
        return (*ty).to_string();
    }

    ELEMENT_TYPES
        .iter()
        .filter(|(k, _)| path.ends_with(*k) && path.len() > k.len())
        .filter(|(k, _)| k.starts_with('.') || path[..path.len() - k.len()].ends_with('.'))
        .max_by_key(|(k, _)| k.len())
        .map(|(_, ty)| (*ty).to_string())
        .unwrap_or_else(|| GENERIC_ELEMENT_TYPE.to_string())
}

/// Native tag rendered for a DOM interface; unknown interfaces render a `div`.
pub fn element_type_tag(element_type: &str) -> &'static str {
    ELEMENT_TAGS
        .iter()
        .find(|(k, _)| *k == element_type)
        .map(|(_, v)| *v)
        .unwrap_or("div")
}

/// Icon package for a target, keyed by the source package path.
pub fn icon_package(source: &str) -> Option<(&'static str, &'static str)> {
    ICON_PACKAGES
        .iter()
        .find(|(k, _, _)| source == *k || source.starts_with(&format!("{k}/")))
        .map(|(_, svelte, vue)| (*svelte, *vue))
}

/// Strip `React.ElementRef<typeof ...>` style wrappers down to the dotted path.
fn dotted_path(type_text: &str) -> &str {
    let mut text = type_text.trim();
    if let (Some(open), true) = (text.find('<'), text.ends_with('>')) {
        text = text[open + 1..text.len() - 1].trim();
    }
    text.strip_prefix("typeof ").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_exact_element_type() {
        assert_eq!(normalize_element_type("HTMLButtonElement"), "HTMLButtonElement");
    }

    #[test]
    fn normalizes_element_ref_wrapper() {
        assert_eq!(
            normalize_element_type("React.ElementRef<typeof SwitchPrimitives.Root>"),
            "HTMLButtonElement"
        );
    }

    #[test]
    fn normalizes_by_suffix() {
        assert_eq!(
            normalize_element_type("React.ElementRef<typeof TabsPrimitive.Trigger>"),
            "HTMLButtonElement"
        );
        assert_eq!(
            normalize_element_type("ElementRef<typeof DialogPrimitive.Title>"),
            "HTMLHeadingElement"
        );
    }

    #[test]
    fn falls_back_to_generic_type() {
        assert_eq!(normalize_element_type("SomethingElse"), GENERIC_ELEMENT_TYPE);
        assert_eq!(element_type_tag(GENERIC_ELEMENT_TYPE), "div");
    }

    #[test]
    fn looks_up_primitives_and_icons() {
        assert_eq!(primitive_tag("SwitchPrimitives.Thumb"), Some("span"));
        assert_eq!(primitive_tag("Switch.Thumb"), None);
        assert_eq!(
            icon_package("lucide-react"),
            Some(("@lucide/svelte", "lucide-vue-next"))
        );
    }

    #[test]
    fn void_tags() {
        assert!(is_void_tag("img"));
        assert!(!is_void_tag("div"));
    }
}
