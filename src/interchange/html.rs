/*!
 * Block-level splitting of rich-text fields.
 *
 * A rich-text value is cut into top-level chunks: each top-level block
 * element (`<p>`, `<h2>`, `<ul>`, ...) becomes one chunk, and any non-blank
 * run of inline content between blocks becomes a chunk of its own. Chunks are
 * returned as byte ranges into the original value so the whitespace between
 * them can be kept when translated chunks are spliced back in.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Matches comments and start/end/self-closing tags
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<(/)?([A-Za-z][A-Za-z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/)?>"#)
        .expect("tag pattern is valid")
});

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Error raised when the markup cannot be split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupError(pub String);

/// Split a rich-text value into top-level chunks.
///
/// A value without any top-level block element yields a single chunk covering
/// the whole value. Unbalanced or mismatched tags are an error.
pub fn split_blocks(html: &str) -> Result<Vec<Range<usize>>, MarkupError> {
    let mut chunks = Vec::new();
    let mut open: Vec<(String, usize)> = Vec::new();
    let mut saw_block = false;
    // start of the current top-level run of inline content
    let mut inline_start = 0usize;

    for caps in TAG_REGEX.captures_iter(html) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        let Some(name) = caps.get(2).map(|m| m.as_str().to_lowercase()) else {
            continue; // comment
        };
        let closing = caps.get(1).is_some();
        let self_closing = caps.get(4).is_some();

        if closing {
            let Some((opened, start)) = open.pop() else {
                return Err(MarkupError(format!("unexpected </{}> at byte {}", name, whole.start)));
            };
            if opened != name {
                return Err(MarkupError(format!(
                    "</{}> at byte {} does not close <{}>",
                    name, whole.start, opened
                )));
            }
            if open.is_empty() && is_block(&name) {
                chunks.push(start..whole.end);
                inline_start = whole.end;
            }
            continue;
        }

        if self_closing || is_void(&name) {
            continue;
        }

        if open.is_empty() && is_block(&name) {
            saw_block = true;
            push_inline_run(html, inline_start..whole.start, &mut chunks);
        }
        open.push((name, whole.start));
    }

    if let Some((name, start)) = open.last() {
        return Err(MarkupError(format!("<{}> at byte {} is never closed", name, start)));
    }

    if !saw_block {
        return Ok(vec![0..html.len()]);
    }

    push_inline_run(html, inline_start..html.len(), &mut chunks);
    chunks.sort_by_key(|r| r.start);
    Ok(chunks)
}

/// Record a run of top-level inline content, trimmed, unless it is blank
fn push_inline_run(html: &str, range: Range<usize>, chunks: &mut Vec<Range<usize>>) {
    let text = &html[range.clone()];
    if text.trim().is_empty() {
        return;
    }
    let leading = text.len() - text.trim_start().len();
    let trailing = text.len() - text.trim_end().len();
    chunks.push(range.start + leading..range.end - trailing);
}

/// Replace each chunk of `original` with the matching replacement, keeping
/// everything between chunks as it was
pub fn splice(original: &str, chunks: &[Range<usize>], replacements: &[String]) -> String {
    let mut result = String::with_capacity(original.len());
    let mut cursor = 0;

    for (range, replacement) in chunks.iter().zip(replacements) {
        result.push_str(&original[cursor..range.start]);
        result.push_str(replacement);
        cursor = range.end;
    }
    result.push_str(&original[cursor..]);

    result
}
