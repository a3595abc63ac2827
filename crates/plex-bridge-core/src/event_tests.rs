//! Tests for Plex payload schema validation.

use super::*;
use serde_json::json;

fn movie_payload() -> Value {
    json!({
        "event": "media.play",
        "user": true,
        "owner": true,
        "Account": { "id": 1, "title": "Sergey", "thumb": "https://plex.tv/users/1/avatar" },
        "Server": { "title": "living-room" },
        "Metadata": {
            "librarySectionType": "movie",
            "ratingKey": "1234",
            "type": "movie",
            "title": "Inception",
            "year": 2010,
            "Guid": [
                { "id": "imdb://tt1375666" },
                { "id": "tmdb://27205" }
            ]
        }
    })
}

// ============================================================================
// Successful parsing
// ============================================================================

#[test]
fn test_parses_movie_and_ignores_unknown_fields() {
    let event = WebhookEvent::from_value(&movie_payload()).unwrap();

    assert_eq!(event.event_type, "media.play");
    assert_eq!(event.account.display_name, "Sergey");
    assert_eq!(event.metadata.library_section_type, "movie");
    assert_eq!(event.metadata.media_type, "movie");
    assert_eq!(event.metadata.title, "Inception");
    assert_eq!(event.metadata.series_title, None);
    assert_eq!(event.metadata.season_number, None);
    assert_eq!(event.metadata.episode_number, None);
    assert_eq!(
        event.metadata.external_ids(),
        &[
            ExternalId {
                id: "imdb://tt1375666".to_string()
            },
            ExternalId {
                id: "tmdb://27205".to_string()
            },
        ]
    );
}

#[test]
fn test_parses_episode_fields() {
    let text = r#"{
        "event": "media.scrobble",
        "Account": { "title": "Sergey" },
        "Metadata": {
            "librarySectionType": "show",
            "type": "episode",
            "title": "Más",
            "grandparentTitle": "Breaking Bad",
            "parentIndex": 3,
            "index": 5
        }
    }"#;

    let event = WebhookEvent::from_json(text).unwrap();

    assert!(event.metadata.is_episode());
    assert_eq!(event.metadata.series_title.as_deref(), Some("Breaking Bad"));
    assert_eq!(event.metadata.season_number, Some(3));
    assert_eq!(event.metadata.episode_number, Some(5));
    assert_eq!(event.metadata.external_ids, None);
}

#[test]
fn test_null_optionals_are_absent() {
    let mut payload = movie_payload();
    payload["Metadata"]["grandparentTitle"] = Value::Null;
    payload["Metadata"]["parentIndex"] = Value::Null;
    payload["Metadata"]["Guid"] = Value::Null;

    let event = WebhookEvent::from_value(&payload).unwrap();

    assert_eq!(event.metadata.series_title, None);
    assert_eq!(event.metadata.season_number, None);
    assert_eq!(event.metadata.external_ids, None);
    assert!(event.metadata.external_ids().is_empty());
}

#[test]
fn test_empty_guid_list_is_distinct_from_absent() {
    let mut payload = movie_payload();
    payload["Metadata"]["Guid"] = json!([]);

    let event = WebhookEvent::from_value(&payload).unwrap();

    assert_eq!(event.metadata.external_ids, Some(vec![]));
    assert!(event.metadata.external_ids().is_empty());
}

#[test]
fn test_integral_float_is_accepted_for_index() {
    let mut payload = movie_payload();
    payload["Metadata"]["index"] = json!(7.0);

    let event = WebhookEvent::from_value(&payload).unwrap();

    assert_eq!(event.metadata.episode_number, Some(7));
}

#[test]
fn test_serializes_back_to_wire_names() {
    let event = WebhookEvent::from_value(&movie_payload()).unwrap();

    let dumped = serde_json::to_value(&event).unwrap();

    assert_eq!(dumped["event"], "media.play");
    assert_eq!(dumped["Account"]["title"], "Sergey");
    assert_eq!(dumped["Metadata"]["type"], "movie");
    assert_eq!(dumped["Metadata"]["Guid"][0]["id"], "imdb://tt1375666");
    assert!(dumped.get("user").is_none());
}

// ============================================================================
// Validation failures
// ============================================================================

#[test]
fn test_invalid_json_is_rejected() {
    let err = WebhookEvent::from_json("{not json").unwrap_err();
    assert!(matches!(err, SchemaError::Json(_)));
    assert_eq!(err.reason(), "invalid_json");
}

#[test]
fn test_non_object_root_is_rejected() {
    let err = WebhookEvent::from_json("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, SchemaError::WrongType { ref field, expected: "object" } if field == "$"));
}

#[test]
fn test_unrelated_document_reports_missing_event() {
    let err = WebhookEvent::from_json(r#"{"bad": "data"}"#).unwrap_err();
    assert!(matches!(err, SchemaError::MissingField { ref field } if field == "event"));
}

#[test]
fn test_each_required_field_is_enforced() {
    let cases = [
        ("/Account", "Account"),
        ("/Account/title", "Account.title"),
        ("/Metadata", "Metadata"),
        ("/Metadata/librarySectionType", "Metadata.librarySectionType"),
        ("/Metadata/type", "Metadata.type"),
        ("/Metadata/title", "Metadata.title"),
    ];

    for (pointer, expected_field) in cases {
        let mut payload = movie_payload();
        let (parent, key) = pointer.rsplit_once('/').unwrap();
        let container = if parent.is_empty() {
            &mut payload
        } else {
            payload.pointer_mut(parent).unwrap()
        };
        container.as_object_mut().unwrap().remove(key);

        let err = WebhookEvent::from_value(&payload).unwrap_err();
        assert!(
            matches!(err, SchemaError::MissingField { ref field } if field == expected_field),
            "removing {} should report {}, got {:?}",
            pointer,
            expected_field,
            err
        );
    }
}

#[test]
fn test_null_required_field_is_missing() {
    let mut payload = movie_payload();
    payload["event"] = Value::Null;

    let err = WebhookEvent::from_value(&payload).unwrap_err();
    assert!(matches!(err, SchemaError::MissingField { ref field } if field == "event"));
}

#[test]
fn test_wrong_types_are_rejected() {
    let mut payload = movie_payload();
    payload["Account"]["title"] = json!(42);
    let err = WebhookEvent::from_value(&payload).unwrap_err();
    assert!(
        matches!(err, SchemaError::WrongType { ref field, expected: "string" } if field == "Account.title")
    );

    let mut payload = movie_payload();
    payload["Metadata"]["parentIndex"] = json!("three");
    let err = WebhookEvent::from_value(&payload).unwrap_err();
    assert!(
        matches!(err, SchemaError::WrongType { ref field, expected: "integer" } if field == "Metadata.parentIndex")
    );

    let mut payload = movie_payload();
    payload["Metadata"]["index"] = json!(2.5);
    let err = WebhookEvent::from_value(&payload).unwrap_err();
    assert_eq!(err.reason(), "wrong_type");

    let mut payload = movie_payload();
    payload["Metadata"]["Guid"] = json!("imdb://tt1375666");
    let err = WebhookEvent::from_value(&payload).unwrap_err();
    assert!(
        matches!(err, SchemaError::WrongType { ref field, expected: "array" } if field == "Metadata.Guid")
    );
}

#[test]
fn test_guid_entry_without_id_is_rejected() {
    let mut payload = movie_payload();
    payload["Metadata"]["Guid"] = json!([{ "id": "imdb://tt1" }, { "uri": "tmdb://2" }]);

    let err = WebhookEvent::from_value(&payload).unwrap_err();
    assert!(matches!(err, SchemaError::MissingField { ref field } if field == "Metadata.Guid[1].id"));
}

#[test]
fn test_empty_title_is_rejected() {
    let mut payload = movie_payload();
    payload["Metadata"]["title"] = json!("");

    let err = WebhookEvent::from_value(&payload).unwrap_err();
    assert!(matches!(err, SchemaError::EmptyField { ref field } if field == "Metadata.title"));
}

#[test]
fn test_external_id_namespace_lookup() {
    let id = ExternalId {
        id: "imdb://tt0903747".to_string(),
    };
    assert_eq!(id.value_in("imdb://"), Some("tt0903747"));
    assert_eq!(id.value_in("tvdb://"), None);
}
