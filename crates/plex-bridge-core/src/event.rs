//! # Plex Webhook Event Model
//!
//! Typed representation of the JSON document Plex sends in the `payload`
//! multipart field, together with the explicit parser that builds it.
//!
//! Parsing policy:
//! - unknown fields are ignored
//! - required fields must be present with the right JSON type
//! - optional fields default to absent; an explicit `null` counts as absent
//!
//! The model serialises back to the Plex wire names so the receipt log shows
//! the same shape the media server sent.

use serde::Serialize;
use serde_json::{Map, Value};

/// Playback started.
pub const MEDIA_PLAY: &str = "media.play";

/// Playback reached the watched threshold.
pub const MEDIA_SCROBBLE: &str = "media.scrobble";

/// New item added to a library section.
pub const LIBRARY_NEW: &str = "library.new";

/// Media type of a single TV episode.
pub const MEDIA_TYPE_EPISODE: &str = "episode";

// ============================================================================
// Model
// ============================================================================

/// Top-level Plex webhook notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookEvent {
    #[serde(rename = "event")]
    pub event_type: String,

    #[serde(rename = "Account")]
    pub account: Account,

    #[serde(rename = "Metadata")]
    pub metadata: Metadata,
}

/// Plex user that triggered the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    #[serde(rename = "title")]
    pub display_name: String,
}

/// Library item the event refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(rename = "librarySectionType")]
    pub library_section_type: String,

    #[serde(rename = "type")]
    pub media_type: String,

    pub title: String,

    /// Show title for episodes
    #[serde(rename = "grandparentTitle")]
    pub series_title: Option<String>,

    #[serde(rename = "parentIndex")]
    pub season_number: Option<i64>,

    #[serde(rename = "index")]
    pub episode_number: Option<i64>,

    /// External identifiers in the order Plex listed them
    #[serde(rename = "Guid")]
    pub external_ids: Option<Vec<ExternalId>>,
}

/// External identifier of the form `<namespace>://<value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalId {
    pub id: String,
}

impl ExternalId {
    /// Return the value after `namespace`, if this identifier belongs to it.
    ///
    /// `namespace` includes the `://` separator, e.g. `"imdb://"`.
    pub fn value_in(&self, namespace: &str) -> Option<&str> {
        self.id.strip_prefix(namespace)
    }
}

impl Metadata {
    /// Whether this item is a TV episode.
    pub fn is_episode(&self) -> bool {
        self.media_type == MEDIA_TYPE_EPISODE
    }

    /// External identifiers, treating an absent list the same as an empty one.
    pub fn external_ids(&self) -> &[ExternalId] {
        self.external_ids.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Reason a payload failed schema validation
///
/// Field paths use the Plex wire names, e.g. `Metadata.title`.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid type for field {field}: expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("Field must not be empty: {field}")]
    EmptyField { field: String },
}

impl SchemaError {
    /// Short reason code for structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Json(_) => "invalid_json",
            Self::MissingField { .. } => "missing_field",
            Self::WrongType { .. } => "wrong_type",
            Self::EmptyField { .. } => "empty_field",
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

impl WebhookEvent {
    /// Parse and validate the text of the `payload` form field.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let root: Value = serde_json::from_str(text)?;
        Self::from_value(&root)
    }

    /// Validate an already-decoded JSON document.
    pub fn from_value(root: &Value) -> Result<Self, SchemaError> {
        let root = as_object(root, "$")?;

        let event_type = required_str(root, "event", "event")?;
        let account = Account::from_value(required(root, "Account", "Account")?)?;
        let metadata = Metadata::from_value(required(root, "Metadata", "Metadata")?)?;

        Ok(Self {
            event_type,
            account,
            metadata,
        })
    }
}

impl Account {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let object = as_object(value, "Account")?;
        Ok(Self {
            display_name: required_str(object, "title", "Account.title")?,
        })
    }
}

impl Metadata {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let object = as_object(value, "Metadata")?;

        let title = required_str(object, "title", "Metadata.title")?;
        if title.is_empty() {
            return Err(SchemaError::EmptyField {
                field: "Metadata.title".to_string(),
            });
        }

        let external_ids = match optional(object, "Guid") {
            None => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(position, item)| ExternalId::from_value(item, position))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => {
                return Err(SchemaError::WrongType {
                    field: "Metadata.Guid".to_string(),
                    expected: "array",
                })
            }
        };

        Ok(Self {
            library_section_type: required_str(
                object,
                "librarySectionType",
                "Metadata.librarySectionType",
            )?,
            media_type: required_str(object, "type", "Metadata.type")?,
            title,
            series_title: optional_str(object, "grandparentTitle", "Metadata.grandparentTitle")?,
            season_number: optional_int(object, "parentIndex", "Metadata.parentIndex")?,
            episode_number: optional_int(object, "index", "Metadata.index")?,
            external_ids,
        })
    }
}

impl ExternalId {
    fn from_value(value: &Value, position: usize) -> Result<Self, SchemaError> {
        let path = format!("Metadata.Guid[{}]", position);
        let object = as_object(value, &path)?;
        Ok(Self {
            id: required_str(object, "id", &format!("{}.id", path))?,
        })
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| SchemaError::WrongType {
        field: path.to_string(),
        expected: "object",
    })
}

/// Look up a key, treating `null` as missing.
fn optional<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, SchemaError> {
    optional(object, key).ok_or_else(|| SchemaError::MissingField {
        field: path.to_string(),
    })
}

fn required_str(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<String, SchemaError> {
    let value = required(object, key, path)?;
    string_value(value, path)
}

fn optional_str(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, SchemaError> {
    optional(object, key)
        .map(|value| string_value(value, path))
        .transpose()
}

fn optional_int(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<i64>, SchemaError> {
    optional(object, key)
        .map(|value| integer_value(value, path))
        .transpose()
}

fn string_value(value: &Value, path: &str) -> Result<String, SchemaError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::WrongType {
            field: path.to_string(),
            expected: "string",
        })
}

/// Integers may arrive as `3` or `3.0`; anything with a fraction is rejected.
fn integer_value(value: &Value, path: &str) -> Result<i64, SchemaError> {
    if let Some(number) = value.as_i64() {
        return Ok(number);
    }

    match value.as_f64() {
        Some(number) if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
            Ok(number as i64)
        }
        _ => Err(SchemaError::WrongType {
            field: path.to_string(),
            expected: "integer",
        }),
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
