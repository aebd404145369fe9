//! Hand-rolled tokenizer for the user-agent grammar.
//!
//! Real-world user agents are full of broken quoting, stray parentheses
//! and bare fragments, so every branch here degrades to "keep the text
//! somewhere addressable" instead of failing.

use crate::tree::{Comment, CommentEntry, Product, TokenTree};

/// Maximum nesting depth for product sequences embedded in comments.
const MAX_EMBED_DEPTH: usize = 3;

/// Tokenize a raw user-agent string into a [`TokenTree`].
///
/// Pure and total: never fails, the empty string yields an empty tree.
///
/// # Examples
///
/// ```
/// use uascope_token::tokenize;
///
/// let tree = tokenize("Firefox/2.0.0.11 (Windows; en-US)");
/// assert_eq!(tree.products.len(), 1);
/// assert_eq!(tree.products[0].name, "Firefox");
/// assert_eq!(tree.products[0].version.as_deref(), Some("2.0.0.11"));
/// assert_eq!(tree.products[0].comments.len(), 2);
/// ```
pub fn tokenize(raw: &str) -> TokenTree {
    TokenTree {
        products: parse_products(raw, 0),
    }
}

/// The lowercased word set of a raw input, in first-occurrence order.
///
/// A word is a run of alphanumeric characters plus `.`, `_` and `-`, with
/// leading and trailing punctuation stripped. This is the unit the rule
/// store's inverted index is keyed on.
pub fn words(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String, out: &mut Vec<String>| {
        let trimmed = current.trim_matches(|c| matches!(c, '.' | '-' | '_'));
        if !trimmed.is_empty() {
            let word = trimmed.to_lowercase();
            if seen.insert(word.clone()) {
                out.push(word);
            }
        }
        current.clear();
    };

    for c in raw.chars() {
        if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') {
            current.push(c);
        } else {
            flush(&mut current, &mut out);
        }
    }
    flush(&mut current, &mut out);
    out
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }
}

fn parse_products(input: &str, depth: usize) -> Vec<Product> {
    let mut cur = Cursor::new(input);
    let mut products: Vec<Product> = Vec::new();

    loop {
        cur.skip_whitespace();
        let Some(c) = cur.peek() else { break };

        match c {
            '(' => {
                // A comment group with no preceding product on this round
                // attaches to the previous product, or opens an anonymous one.
                let group = read_group(&mut cur);
                let comments = parse_comments(&group, depth);
                match products.last_mut() {
                    Some(last) => last.comments.extend(comments),
                    None => products.push(Product {
                        name: String::new(),
                        version: None,
                        comments,
                    }),
                }
            }
            ')' => {
                // Stray closer, skip it.
                cur.bump();
            }
            _ => {
                let name = read_token(&mut cur);
                let version = if cur.peek() == Some('/') {
                    cur.bump();
                    Some(read_token(&mut cur))
                } else {
                    None
                };

                let mut comments = Vec::new();
                loop {
                    // Only plain spaces may separate a product from its
                    // comment groups.
                    while cur.peek() == Some(' ') {
                        cur.bump();
                    }
                    if cur.peek() == Some('(') {
                        let group = read_group(&mut cur);
                        comments.extend(parse_comments(&group, depth));
                    } else {
                        break;
                    }
                }

                if !name.is_empty() || version.is_some() || !comments.is_empty() {
                    products.push(Product {
                        name,
                        version: version.filter(|v| !v.is_empty()),
                        comments,
                    });
                }
            }
        }
    }

    merge_like_gecko(products)
}

/// Read one name or version token. Stops at whitespace, `/`, `(` and `)`.
/// Double-quoted sections are honored, with the quotes themselves dropped.
fn read_token(cur: &mut Cursor) -> String {
    let mut out = String::new();
    while let Some(c) = cur.peek() {
        match c {
            '"' => {
                cur.bump();
                while let Some(q) = cur.bump() {
                    if q == '"' {
                        break;
                    }
                    out.push(q);
                }
            }
            c if c.is_whitespace() => break,
            '/' | '(' | ')' => break,
            c => {
                out.push(c);
                cur.bump();
            }
        }
    }
    out
}

/// Read one parenthesized group. The cursor sits on `(`; on return it sits
/// after the matching `)`, or at end of input for an unbalanced group.
/// Nested parentheses stay in the returned text.
fn read_group(cur: &mut Cursor) -> String {
    cur.bump(); // opening '('
    let mut out = String::new();
    let mut level = 1usize;
    let mut in_quote = false;

    while let Some(c) = cur.bump() {
        match c {
            '"' => {
                in_quote = !in_quote;
                out.push(c);
            }
            '(' if !in_quote => {
                level += 1;
                out.push(c);
            }
            ')' if !in_quote => {
                level -= 1;
                if level == 0 {
                    break;
                }
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Split a comment group on `;` (outside quotes and nested parentheses) and
/// interpret each entry.
fn parse_comments(group: &str, depth: usize) -> Vec<Comment> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut level = 0usize;
    let mut in_quote = false;

    for c in group.chars() {
        match c {
            '"' => {
                in_quote = !in_quote;
                current.push(c);
            }
            '(' if !in_quote => {
                level += 1;
                current.push(c);
            }
            ')' if !in_quote => {
                level = level.saturating_sub(1);
                current.push(c);
            }
            ';' if !in_quote && level == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .filter_map(|part| {
            let mut text = part.trim();
            if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
                text = &text[1..text.len() - 1];
            }
            if text.is_empty() {
                return None;
            }
            Some(build_comment(text, depth))
        })
        .collect()
}

fn build_comment(text: &str, depth: usize) -> Comment {
    let entry = parse_key_value(text);
    let products = if depth < MAX_EMBED_DEPTH && (text.contains('/') || text.contains('(')) {
        parse_products(text, depth + 1)
    } else {
        Vec::new()
    };
    Comment {
        text: text.to_string(),
        entry,
        products,
    }
}

/// Interpret `key=value` and `key:value` entries. The `:` form only counts
/// when the key is a short alphabetic token and the value does not look like
/// the tail of a URL, so `rv:1.8.1.11` is keyed and `+http://x` is not.
fn parse_key_value(text: &str) -> CommentEntry {
    if let Some(idx) = text.find('=') {
        let key = text[..idx].trim();
        let value = text[idx + 1..].trim();
        if !key.is_empty()
            && key.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        {
            return CommentEntry::KeyValue {
                key: key.to_string(),
                value: value.to_string(),
            };
        }
    }
    if let Some(idx) = text.find(':') {
        let key = text[..idx].trim();
        let value = text[idx + 1..].trim();
        if (1..=10).contains(&key.len())
            && key.chars().all(|c| c.is_ascii_alphabetic())
            && !value.is_empty()
            && !value.starts_with('/')
        {
            return CommentEntry::KeyValue {
                key: key.to_string(),
                value: value.to_string(),
            };
        }
    }
    CommentEntry::Text
}

/// Collapse the `like Gecko` sentinel into a single product so engine rules
/// keyed on a `Gecko` product cannot fire on agents that merely claim
/// Gecko compatibility.
fn merge_like_gecko(products: Vec<Product>) -> Vec<Product> {
    let mut out: Vec<Product> = Vec::with_capacity(products.len());
    let mut iter = products.into_iter().peekable();

    while let Some(p) = iter.next() {
        let is_bare_like = p.name.eq_ignore_ascii_case("like")
            && p.version.is_none()
            && p.comments.is_empty();
        if is_bare_like {
            if let Some(next) = iter.peek() {
                if next.name.eq_ignore_ascii_case("Gecko") {
                    let gecko = iter.next().unwrap();
                    out.push(Product {
                        name: format!("like {}", gecko.name),
                        version: gecko.version,
                        comments: gecko.comments,
                    });
                    continue;
                }
            }
        }
        out.push(p);
    }
    out
}
