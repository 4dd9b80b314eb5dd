//! Paragraph segmentation shared by the resolver and the presenter.
//!
//! Reply bodies are not uniform. A body may carry `<p>` tags, may use the double
//! line break convention, or may be a single run of text. Tags win over breaks.

use serde::{Deserialize, Serialize};

pub const PARAGRAPH_BREAK: &str = "\n\n";

const OPEN_TAG: &str = "<p";
const CLOSE_TAG: &str = "</p>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub index: usize,
    pub html: String,
}

impl Paragraph {
    pub fn to_markup(&self) -> String {
        wrap_paragraph(&self.html)
    }
}

pub fn wrap_paragraph(text: &str) -> String {
    format!("{OPEN_TAG}>{text}{CLOSE_TAG}")
}

pub fn has_paragraph_markup(body: &str) -> bool {
    find_open_tag(body, 0).is_some() || body.contains(PARAGRAPH_BREAK)
}

/// Splits a body into display units. Always yields at least one paragraph.
pub fn segment(body: &str) -> Vec<Paragraph> {
    let pieces: Vec<&str> = if find_open_tag(body, 0).is_some() {
        split_tags(body)
    } else {
        body.split(PARAGRAPH_BREAK).collect()
    };

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, html)| Paragraph {
            index,
            html: html.to_string(),
        })
        .collect()
}

/// Returns `(tag_start, content_start)` for the next `<p>` or `<p attr…>` at or after `from`.
/// `<pre>` and friends are skipped.
fn find_open_tag(body: &str, from: usize) -> Option<(usize, usize)> {
    let mut search = from;
    while let Some(rel) = body.get(search..)?.find(OPEN_TAG) {
        let start = search + rel;
        let after = start + OPEN_TAG.len();
        match body[after..].chars().next() {
            Some('>') => return Some((start, after + 1)),
            Some(c) if c.is_whitespace() => {
                let close = body[after..].find('>')?;
                return Some((start, after + close + 1));
            }
            _ => search = after,
        }
    }
    None
}

fn split_tags(body: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    while let Some((_, content_start)) = find_open_tag(body, cursor) {
        match body[content_start..].find(CLOSE_TAG) {
            Some(rel) => {
                pieces.push(&body[content_start..content_start + rel]);
                cursor = content_start + rel + CLOSE_TAG.len();
            }
            None => {
                // Unterminated final tag runs to the end.
                pieces.push(&body[content_start..]);
                break;
            }
        }
    }

    pieces
}
