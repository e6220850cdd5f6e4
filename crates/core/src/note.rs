//! The structured note: the canonical extraction result.
//!
//! The completion service is asked to produce JSON matching [`json_schema`],
//! but that is a request, not a guarantee. [`StructuredNote::from_value`] is
//! the explicit validation step every result goes through before rendering.

use crate::error::NoteError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Every key the schema requires, in schema order.
pub const NOTE_FIELDS: [&str; 8] = [
    "type",
    "title",
    "clean_text",
    "due",
    "priority",
    "tags",
    "action_items",
    "questions",
];

/// What kind of note the text describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Task,
    Reminder,
    Note,
    Other,
}

impl NoteType {
    pub const ALL: [NoteType; 4] = [Self::Task, Self::Reminder, Self::Note, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Reminder => "reminder",
            Self::Note => "note",
            Self::Other => "other",
        }
    }
}

impl FromStr for NoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("expected one of task, reminder, note, other; got {s:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("expected one of low, medium, high; got {s:?}"))
    }
}

/// A validated extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredNote {
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub title: String,
    pub clean_text: String,
    pub due: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub action_items: Vec<String>,
    pub questions: Vec<String>,
}

impl StructuredNote {
    /// Validate an untrusted JSON value field by field.
    ///
    /// Fails on the first key that is absent or does not match its declared
    /// type. `clean_text` is never rendered, so an absent one becomes the
    /// empty string; present, it must still be a string. Keys outside
    /// [`NOTE_FIELDS`] are ignored.
    pub fn from_value(value: &Value) -> Result<Self, NoteError> {
        let obj = value.as_object().ok_or(NoteError::InvalidField {
            field: "note",
            reason: format!("expected an object, got {}", kind(value)),
        })?;

        Ok(Self {
            note_type: enum_field(obj, "type")?,
            title: string_field(obj, "title")?,
            clean_text: match obj.get("clean_text") {
                None => String::new(),
                Some(_) => string_field(obj, "clean_text")?,
            },
            due: nullable_string_field(obj, "due")?,
            priority: enum_field(obj, "priority")?,
            tags: string_list_field(obj, "tags")?,
            action_items: string_list_field(obj, "action_items")?,
            questions: string_list_field(obj, "questions")?,
        })
    }
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, NoteError> {
    obj.get(field).ok_or(NoteError::MissingField(field))
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, NoteError> {
    match required(obj, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(NoteError::InvalidField {
            field,
            reason: format!("expected a string, got {}", kind(other)),
        }),
    }
}

fn nullable_string_field(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, NoteError> {
    match required(obj, field)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(NoteError::InvalidField {
            field,
            reason: format!("expected a string or null, got {}", kind(other)),
        }),
    }
}

fn enum_field<T>(obj: &Map<String, Value>, field: &'static str) -> Result<T, NoteError>
where
    T: FromStr<Err = String>,
{
    string_field(obj, field)?
        .parse()
        .map_err(|reason| NoteError::InvalidField { field, reason })
}

fn string_list_field(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, NoteError> {
    let items = match required(obj, field)? {
        Value::Array(items) => items,
        other => {
            return Err(NoteError::InvalidField {
                field,
                reason: format!("expected an array, got {}", kind(other)),
            });
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(NoteError::InvalidField {
                field,
                reason: format!("item {i}: expected a string, got {}", kind(other)),
            }),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// JSON Schema the completion service is asked to follow.
pub fn json_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": NOTE_FIELDS,
        "properties": {
            "type": {
                "type": "string",
                "enum": NoteType::ALL.map(|t| t.as_str()),
            },
            "title": { "type": "string" },
            "clean_text": { "type": "string" },
            "due": { "type": ["string", "null"] },
            "priority": {
                "type": "string",
                "enum": Priority::ALL.map(|p| p.as_str()),
            },
            "tags": { "type": "array", "items": { "type": "string" } },
            "action_items": { "type": "array", "items": { "type": "string" } },
            "questions": { "type": "array", "items": { "type": "string" } },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "type": "task",
            "title": "Buy milk",
            "clean_text": "Buy milk tomorrow at 5pm",
            "due": "tomorrow 5pm",
            "priority": "medium",
            "tags": ["shopping"],
            "action_items": ["Go to store", "Pay"],
            "questions": [],
        })
    }

    #[test]
    fn accepts_valid_note() {
        let note = StructuredNote::from_value(&valid()).unwrap();
        assert_eq!(note.note_type, NoteType::Task);
        assert_eq!(note.priority, Priority::Medium);
        assert_eq!(note.due.as_deref(), Some("tomorrow 5pm"));
        assert_eq!(note.action_items, vec!["Go to store", "Pay"]);
    }

    #[test]
    fn null_due_is_none() {
        let mut v = valid();
        v["due"] = Value::Null;
        let note = StructuredNote::from_value(&v).unwrap();
        assert!(note.due.is_none());
    }

    #[test]
    fn every_rendered_field_is_required() {
        for field in NOTE_FIELDS.into_iter().filter(|f| *f != "clean_text") {
            let mut v = valid();
            v.as_object_mut().unwrap().remove(field);
            assert_eq!(
                StructuredNote::from_value(&v),
                Err(NoteError::MissingField(field)),
                "field {field} should be required"
            );
        }
    }

    #[test]
    fn clean_text_may_be_absent_but_not_mistyped() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("clean_text");
        assert_eq!(StructuredNote::from_value(&v).unwrap().clean_text, "");

        v["clean_text"] = json!(5);
        assert!(matches!(
            StructuredNote::from_value(&v),
            Err(NoteError::InvalidField { field: "clean_text", .. })
        ));
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let mut v = valid();
        v["priority"] = json!("urgent");
        assert!(matches!(
            StructuredNote::from_value(&v),
            Err(NoteError::InvalidField { field: "priority", .. })
        ));

        let mut v = valid();
        v["type"] = json!("Task");
        assert!(matches!(
            StructuredNote::from_value(&v),
            Err(NoteError::InvalidField { field: "type", .. })
        ));
    }

    #[test]
    fn rejects_mistyped_fields() {
        let mut v = valid();
        v["title"] = json!(42);
        assert!(matches!(
            StructuredNote::from_value(&v),
            Err(NoteError::InvalidField { field: "title", .. })
        ));

        let mut v = valid();
        v["tags"] = Value::Null;
        assert!(matches!(
            StructuredNote::from_value(&v),
            Err(NoteError::InvalidField { field: "tags", .. })
        ));

        let mut v = valid();
        v["questions"] = json!(["ok", 3]);
        let err = StructuredNote::from_value(&v).unwrap_err();
        assert!(err.to_string().contains("item 1"));
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(
            StructuredNote::from_value(&json!(["task"])),
            Err(NoteError::InvalidField { field: "note", .. })
        ));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut v = valid();
        v["confidence"] = json!(0.9);
        assert!(StructuredNote::from_value(&v).is_ok());
    }

    #[test]
    fn schema_requires_all_fields() {
        let schema = json_schema();
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["required"].as_array().unwrap().len(), 8);
        assert_eq!(
            schema["properties"]["type"]["enum"],
            json!(["task", "reminder", "note", "other"])
        );
        assert_eq!(
            schema["properties"]["priority"]["enum"],
            json!(["low", "medium", "high"])
        );
        assert_eq!(schema["properties"]["due"]["type"], json!(["string", "null"]));
    }

    #[test]
    fn serializes_type_key() {
        let note = StructuredNote::from_value(&valid()).unwrap();
        let back = serde_json::to_value(&note).unwrap();
        assert_eq!(back["type"], json!("task"));
        assert_eq!(back["priority"], json!("medium"));
    }
}
