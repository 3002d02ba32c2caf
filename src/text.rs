//! Plain-text normalisation for values coming from editable cells.
//!
//! Content-editable widgets report their value as markup. Only the text is kept:
//! tags are dropped and the handful of entities those widgets emit are decoded.

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Strip markup from an edited value, keeping its text.
///
/// Only `<` followed by a letter, `/` or `!` and closed by a later `>` counts as
/// a tag. Any other `<` is kept, so typed text like `a < b` survives.
pub fn plain_text(input: &str) -> String {
    let mut text = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
        match after.find('>') {
            Some(end) if opens_tag => rest = &after[end + 1..],
            _ => {
                text.push('<');
                rest = after;
            }
        }
    }
    text.push_str(rest);
    // `&amp;` is last so `&amp;lt;` decodes to `&lt;` rather than `<`.
    ENTITIES
        .iter()
        .fold(text, |acc, (entity, replacement)| acc.replace(entity, replacement))
}
