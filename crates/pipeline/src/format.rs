//! Reply formatting.
//!
//! The layout is fixed: one line per scalar field, then `Steps` and
//! `Questions` either as a header followed by `• ` bullets or as a single
//! placeholder line when empty.

use notewire_channels::escape;
use notewire_core::error::NoteError;
use notewire_core::note::StructuredNote;
use serde_json::Value;

/// Shown for an absent or empty value.
pub const PLACEHOLDER: &str = "—";

const BULLET: &str = "• ";

/// Render a validated note. Lines are joined by `\n` with no trailing newline.
pub fn format_note(note: &StructuredNote) -> String {
    let due = note
        .due
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(escape)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let tags = if note.tags.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        note.tags
            .iter()
            .map(|t| escape(t))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![
        format!("Type: {}", escape(note.note_type.as_str())),
        format!("Title: {}", escape(&note.title)),
        format!("Priority: {}", escape(note.priority.as_str())),
        format!("Due: {due}"),
        format!("Tags: {tags}"),
    ];

    push_list(&mut lines, "Steps", &note.action_items);
    push_list(&mut lines, "Questions", &note.questions);

    lines.join("\n")
}

fn push_list(lines: &mut Vec<String>, label: &str, items: &[String]) {
    if items.is_empty() {
        lines.push(format!("{label}: {PLACEHOLDER}"));
        return;
    }

    lines.push(format!("{label}:"));
    lines.extend(items.iter().map(|item| format!("{BULLET}{}", escape(item))));
}

/// Validate an untrusted extraction result, then render it.
///
/// Nothing is rendered unless every field checks out.
pub fn render_reply(value: &Value) -> Result<String, NoteError> {
    let note = StructuredNote::from_value(value)?;
    Ok(format_note(&note))
}
