//! Text rendering of a playbook
//!
//! Produces the block injected into prompts: one `## SECTION` header per
//! non-empty section, one line per entry.

use crate::document::Document;
use crate::entry::Entry;

/// Default character budget for [`preview`]
pub const DEFAULT_PREVIEW_CHARS: usize = 80;

/// Render one entry as `[id] helpful=H harmful=R :: text`
#[must_use]
pub fn render_entry(entry: &Entry) -> String {
    format!(
        "[{}] helpful={} harmful={} :: {}",
        entry.id, entry.helpful, entry.harmful, entry.text
    )
}

/// Render a document; an all-empty document renders as `""`
#[must_use]
pub fn render(document: &Document) -> String {
    let mut blocks = Vec::new();
    for (section, entries) in document.sections() {
        if entries.is_empty() {
            continue;
        }
        let mut block = format!("## {section}");
        for entry in entries {
            block.push('\n');
            block.push_str(&render_entry(entry));
        }
        blocks.push(block);
    }
    blocks.join("\n\n")
}

/// First `limit` characters of `text`, with `...` appended when cut
///
/// Counts characters rather than bytes, so multi-byte text is never split
/// inside a code point.
#[must_use]
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
