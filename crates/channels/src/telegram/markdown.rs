//! MarkdownV2 escaping.
//!
//! Telegram rejects a MarkdownV2 message that contains any reserved
//! character outside an entity, so everything interpolated into a reply
//! goes through [`escape`].

/// Characters MarkdownV2 reserves, plus the escape character itself.
pub const RESERVED: &[char] = &[
    '_', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '*',
    '\\',
];

/// Prefix every reserved character with `\`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// [`escape`] over optional text; `None` becomes the empty string.
pub fn escape_markdown(text: Option<&str>) -> String {
    text.map(escape).unwrap_or_default()
}
