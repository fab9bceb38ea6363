//! Flattens report markup into a stream of tagged tokens and then into
//! blocks of loose text and table rows.
//!
//! Only table rows carry structure the parser cares about; every other tag
//! just ends the current text run.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    RowStart,
    RowEnd,
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Text that is not inside any `<tr>`.
    Text(String),
    /// The non-blank text runs of one `<tr>`, in document order.
    Row(Vec<String>),
}

impl Block {
    /// All text runs of the block.
    pub fn texts(&self) -> &[String] {
        match self {
            Block::Text(text) => std::slice::from_ref(text),
            Block::Row(cells) => cells,
        }
    }
}

/// Splits markup into row boundaries and decoded, whitespace-collapsed text.
///
/// A `<` opens a tag only when it is followed by a tag-like name and closed
/// by `>` before any other `<`; anything else (`1.0 < x1`, `x1<=2`) is text.
pub fn tokenize(markup: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = markup;

    while let Some(pos) = rest.find('<') {
        let (before, from_lt) = rest.split_at(pos);
        text.push_str(before);

        if let Some(after) = from_lt.strip_prefix("<!--") {
            flush_text(&mut text, &mut tokens);
            rest = match after.find("-->") {
                Some(end) => &after[end + 3..],
                None => "",
            };
            continue;
        }

        match tag_span(from_lt) {
            Some((len, name, closing)) => {
                flush_text(&mut text, &mut tokens);
                if name == "tr" {
                    tokens.push(if closing { Token::RowEnd } else { Token::RowStart });
                }
                rest = &from_lt[len..];
            }
            None => {
                text.push('<');
                rest = &from_lt[1..];
            }
        }
    }
    text.push_str(rest);
    flush_text(&mut text, &mut tokens);

    tokens
}

/// Groups tokens into blocks. An unterminated row is closed by the next row
/// start or by the end of the stream.
pub fn blocks(tokens: &[Token]) -> Vec<Block> {
    let mut out = Vec::new();
    let mut row: Option<Vec<String>> = None;

    for token in tokens {
        match token {
            Token::RowStart => {
                if let Some(cells) = row.take() {
                    out.push(Block::Row(cells));
                }
                row = Some(Vec::new());
            }
            Token::RowEnd => {
                if let Some(cells) = row.take() {
                    out.push(Block::Row(cells));
                }
            }
            Token::Text(text) => match row.as_mut() {
                Some(cells) => cells.push(text.clone()),
                None => out.push(Block::Text(text.clone())),
            },
        }
    }
    if let Some(cells) = row {
        out.push(Block::Row(cells));
    }

    out
}

/// Returns the byte length of the tag at the start of `s`, its lowercase name
/// and whether it is a closing tag.
fn tag_span(s: &str) -> Option<(usize, String, bool)> {
    let body = &s[1..];
    let end = body.find('>')?;
    if body[..end].contains('<') {
        return None;
    }
    let inner = &body[..end];

    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    if inner.starts_with('!') || inner.starts_with('?') {
        return Some((end + 2, String::new(), closing));
    }

    let name_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = &inner[..name_len];
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let terminator_ok = inner[name_len..]
        .chars()
        .next()
        .map_or(true, |c| c.is_whitespace() || c == '/');
    if !terminator_ok {
        return None;
    }

    Some((end + 2, name.to_ascii_lowercase(), closing))
}

fn flush_text(text: &mut String, tokens: &mut Vec<Token>) {
    let decoded = decode_entities(text);
    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        tokens.push(Token::Text(collapsed));
    }
    text.clear();
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match tail.find(';').filter(|&end| end <= 10) {
            Some(end) => match entity_char(&tail[1..end]) {
                Some(c) => {
                    out.push(c);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "le" => Some('≤'),
        "ge" => Some('≥'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
