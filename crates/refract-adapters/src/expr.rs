//! Lightweight rewriting of JavaScript expression text.
//!
//! Expressions arrive from the parser as opaque source text. These helpers
//! rename free identifiers without touching string contents or member
//! accesses, which is all the targets need.

use std::sync::LazyLock;

use regex::Regex;

static PROPS_ACCESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w.$])props\.([A-Za-z_$][\w$]*)").expect("Invalid props access regex")
});

/// `props.variant` → `variant`.
pub fn strip_props_prefix(expr: &str) -> String {
    PROPS_ACCESS_RE.replace_all(expr, "${1}${2}").into_owned()
}

/// Replace free identifiers for which `map` returns a replacement.
///
/// Member names (`a.b`), object keys (`{ key: v }`) and string contents are
/// left alone. A shorthand property `{ key }` is expanded to
/// `{ key: replacement }`.
///
/// Arrow-function parameters are local: nothing inside a parameter list is
/// rewritten, and names bound there are left alone throughout the body.
pub fn rewrite_identifiers(expr: &str, map: &dyn Fn(&str) -> Option<String>) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let scopes = arrow_scopes(&chars);
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' || c == '\'' {
            let end = string_end(&chars, i);
            out.extend(&chars[i..end]);
            i = end;
        } else if c == '`' {
            i = rewrite_template(&chars, i, map, &mut out);
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
                i += 1;
            }
            out.extend(&chars[start..i]);
        } else if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_char(chars[i]) {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            let prev = prev_significant(&chars, start);
            let next = next_significant(&chars, i);

            let is_member = prev == Some('.');
            let is_key = matches!(prev, Some('{') | Some(',')) && next == Some(':');
            let is_param = scopes.iter().any(|scope| scope.binds(&ident, start));

            match map(&ident) {
                Some(replacement) if !is_member && !is_key && !is_param => {
                    let shorthand = matches!(prev, Some('{') | Some(','))
                        && matches!(next, Some(',') | Some('}'))
                        && in_object(&chars, start);
                    if shorthand {
                        out.push_str(&format!("{ident}: {replacement}"));
                    } else {
                        out.push_str(&replacement);
                    }
                }
                _ => out.push_str(&ident),
            }
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

fn rewrite_template(
    chars: &[char],
    start: usize,
    map: &dyn Fn(&str) -> Option<String>,
    out: &mut String,
) -> usize {
    out.push('`');
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                out.extend(&chars[i..(i + 2).min(chars.len())]);
                i += 2;
            }
            '`' => {
                out.push('`');
                return i + 1;
            }
            '$' if chars.get(i + 1) == Some(&'{') => {
                let close = matching_brace(chars, i + 1);
                let inner: String = chars[i + 2..close].iter().collect();
                out.push_str("${");
                out.push_str(&rewrite_identifiers(&inner, map));
                if close < chars.len() {
                    out.push('}');
                }
                i = close + 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    i
}

/// Parameters of one arrow function and the span they are visible in.
#[derive(Debug)]
struct ArrowScope {
    /// Start of the parameter list.
    start: usize,
    /// One past the parameter list.
    params_end: usize,
    /// One past the body.
    end: usize,
    names: Vec<String>,
}

impl ArrowScope {
    fn binds(&self, ident: &str, pos: usize) -> bool {
        pos >= self.start
            && pos < self.end
            && (pos < self.params_end || self.names.iter().any(|n| n == ident))
    }
}

fn arrow_scopes(chars: &[char]) -> Vec<ArrowScope> {
    let mut scopes = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '"' | '\'' | '`' => {
                i = string_end(chars, i);
                continue;
            }
            '=' if chars.get(i + 1) == Some(&'>') => {
                if let Some(scope) = arrow_at(chars, i) {
                    scopes.push(scope);
                }
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    scopes
}

/// The arrow function whose `=>` sits at `arrow`.
fn arrow_at(chars: &[char], arrow: usize) -> Option<ArrowScope> {
    let last = (0..arrow).rev().find(|&k| !chars[k].is_whitespace())?;
    let (start, names) = if chars[last] == ')' {
        let open = open_paren_before(chars, last)?;
        (open, param_names(&chars[open + 1..last]))
    } else if is_ident_char(chars[last]) {
        let mut first = last;
        while first > 0 && is_ident_char(chars[first - 1]) {
            first -= 1;
        }
        (first, vec![chars[first..=last].iter().collect()])
    } else {
        return None;
    };

    Some(ArrowScope {
        start,
        params_end: last + 1,
        end: arrow_body_end(chars, arrow + 2),
        names,
    })
}

fn open_paren_before(chars: &[char], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for k in (0..=close).rev() {
        match chars[k] {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(k);
                }
            }
            _ => {}
        }
    }
    None
}

/// Names bound by a parameter list, skipping type annotations, default
/// values and destructuring keys.
fn param_names(params: &[char]) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0i32;
    let mut skipping = false;
    let mut k = 0;
    while k < params.len() {
        let c = params[k];
        if is_ident_start(c) {
            let start = k;
            while k < params.len() && is_ident_char(params[k]) {
                k += 1;
            }
            let is_key = depth > 0 && next_significant(params, k) == Some(':');
            if !skipping && !is_key {
                names.push(params[start..k].iter().collect());
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                k = string_end(params, k);
                continue;
            }
            '=' if params.get(k + 1) == Some(&'>') => k += 1,
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth == 0 => skipping = false,
            ':' | '=' if depth == 0 => skipping = true,
            _ => {}
        }
        k += 1;
    }
    names
}

/// One past the end of an arrow body starting after `=>` at `from`.
fn arrow_body_end(chars: &[char], from: usize) -> usize {
    let start = next_index(chars, from);
    if chars.get(start) == Some(&'{') {
        return (matching_brace(chars, start) + 1).min(chars.len());
    }

    let mut depth = 0usize;
    let mut k = start;
    while k < chars.len() {
        match chars[k] {
            '"' | '\'' | '`' => {
                k = string_end(chars, k);
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth == 0 => return k,
            ')' | ']' | '}' => depth -= 1,
            ',' | ';' if depth == 0 => return k,
            _ => {}
        }
        k += 1;
    }
    chars.len()
}

/// Index one past the closing quote of the string starting at `start`.
fn string_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// Index of the `}` matching the `{` at `open`, or `chars.len()`.
pub(crate) fn matching_brace(chars: &[char], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '"' | '\'' | '`' => {
                i = string_end(chars, i);
                continue;
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

/// True when the innermost open bracket before `pos` is `{`.
fn in_object(chars: &[char], pos: usize) -> bool {
    let mut depth = 0i32;
    for &c in chars[..pos].iter().rev() {
        match c {
            '}' | ')' | ']' => depth += 1,
            '{' | '(' | '[' if depth > 0 => depth -= 1,
            '{' => return true,
            '(' | '[' => return false,
            _ => {}
        }
    }
    false
}

fn prev_significant(chars: &[char], pos: usize) -> Option<char> {
    chars[..pos].iter().rev().find(|c| !c.is_whitespace()).copied()
}

fn next_index(chars: &[char], pos: usize) -> usize {
    let mut i = pos;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

fn next_significant(chars: &[char], pos: usize) -> Option<char> {
    chars.get(next_index(chars, pos)).copied()
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// True for a bare identifier such as `rest` or `$$restProps`.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_char)
}
