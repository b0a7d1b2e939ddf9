//! Single-pass markup tokenizer shared by the post-generate passes.
//!
//! Only tags are recognized. Attribute text, `{...}` expressions and comments
//! are carried verbatim, with quotes and brace nesting respected so a `>`
//! inside an expression never ends a tag.

/// A markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open(OpenTag),
    Close(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    pub name: String,
    /// Raw attribute text after the name, leading whitespace included.
    pub attrs: String,
    pub self_closing: bool,
}

impl OpenTag {
    /// Lowercase names without a namespace or member dot.
    pub fn is_native(&self) -> bool {
        is_native_name(&self.name)
    }
}

pub fn is_native_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && !name.contains('.')
        && !name.contains(':')
}

pub fn tokenize(markup: &str) -> Vec<Token> {
    let chars: Vec<char> = markup.chars().collect();
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '{' {
            let end = balanced_end(&chars, i);
            text.extend(&chars[i..end]);
            i = end;
            continue;
        }
        if c != '<' {
            text.push(c);
            i += 1;
            continue;
        }

        if starts_with(&chars, i, "<!--") {
            let end = find(&chars, i + 4, "-->").map_or(chars.len(), |p| p + 3);
            text.extend(&chars[i..end]);
            i = end;
            continue;
        }

        let lexed = if chars.get(i + 1) == Some(&'/') {
            close_tag(&chars, i)
        } else if chars.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic()) {
            open_tag(&chars, i)
        } else {
            None
        };

        match lexed {
            Some((token, end)) => {
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                tokens.push(token);
                i = end;
            }
            None => {
                text.push(c);
                i += 1;
            }
        }
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Close(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            Token::Open(tag) => {
                out.push('<');
                out.push_str(&tag.name);
                out.push_str(tag.attrs.trim_end());
                out.push_str(if tag.self_closing { " />" } else { ">" });
            }
        }
    }
    out
}

fn close_tag(chars: &[char], start: usize) -> Option<(Token, usize)> {
    let end = find(chars, start + 2, ">")?;
    let name: String = chars[start + 2..end].iter().collect::<String>().trim().to_string();
    is_tag_name(&name).then(|| (Token::Close(name), end + 1))
}

fn open_tag(chars: &[char], start: usize) -> Option<(Token, usize)> {
    let mut i = start + 1;
    while i < chars.len() && is_name_char(chars[i]) {
        i += 1;
    }
    let name: String = chars[start + 1..i].iter().collect();

    let attrs_start = i;
    let mut depth = 0usize;
    while i < chars.len() {
        match chars[i] {
            '"' | '\'' | '`' if depth > 0 || chars[i] != '`' => {
                i = quoted_end(chars, i);
                continue;
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => {
                let raw: String = chars[attrs_start..i].iter().collect();
                let trimmed = raw.trim_end();
                let (attrs, self_closing) = match trimmed.strip_suffix('/') {
                    Some(attrs) => (attrs.to_string(), true),
                    None => (raw, false),
                };
                return Some((
                    Token::Open(OpenTag {
                        name,
                        attrs,
                        self_closing,
                    }),
                    i + 1,
                ));
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index one past a `{...}` group starting at `open`, or the input length.
fn balanced_end(chars: &[char], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '"' | '\'' | '`' if depth > 0 => {
                i = quoted_end(chars, i);
                continue;
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

fn quoted_end(chars: &[char], start: usize) -> usize {
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

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    pattern
        .chars()
        .enumerate()
        .all(|(k, p)| chars.get(at + k) == Some(&p))
}

fn find(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    (from..chars.len()).find(|&i| starts_with(chars, i, pattern))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')
}

fn is_tag_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) && name.chars().all(is_name_char)
}
