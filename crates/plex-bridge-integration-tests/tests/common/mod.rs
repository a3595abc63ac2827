//! Common test utilities for plex-bridge integration tests
//!
//! This module provides:
//! - A router wired to a real `DiscordWebhookClient`
//! - Multipart request builders shaped like Plex's webhook posts
//! - Plex payload fixtures

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request},
    Router,
};
use plex_bridge_api::{create_router, AppState, BridgeConfig};
use plex_bridge_core::{DeliveryConfig, DiscordWebhookClient};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

/// Path the mock Discord server listens on
pub const DISCORD_WEBHOOK_PATH: &str = "/api/webhooks/1234/secret-token";

const BOUNDARY: &str = "-----------------------------plex8f2a";

/// Build the bridge router with a Discord client pointed at `webhook_url`.
pub fn bridge_app(webhook_url: &str) -> Router {
    let config = BridgeConfig::new(webhook_url);
    let discord = DiscordWebhookClient::new(
        webhook_url,
        DeliveryConfig::default().with_timeout(Duration::from_millis(500)),
    )
    .expect("Discord client should build");

    create_router(AppState::new(config, Arc::new(discord)))
}

/// Multipart POST to `/` with the given `(field name, content)` parts.
pub fn multipart_request(parts: &[(&str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, content) in parts {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request should build")
}

/// Multipart POST carrying only a `payload` part.
pub fn payload_request(payload: &Value) -> Request<Body> {
    multipart_request(&[("payload", payload.to_string().as_bytes())])
}

/// Movie event as sent by Plex Media Server.
pub fn movie_event(event: &str, title: &str, guids: &[&str]) -> Value {
    json!({
        "event": event,
        "user": true,
        "owner": true,
        "Account": {
            "id": 1,
            "thumb": "https://plex.tv/users/abc/avatar",
            "title": "Sergey"
        },
        "Server": { "title": "nas", "uuid": "54664a3d8acc39983675640ec9ce00b70af9cc36" },
        "Player": { "local": true, "publicAddress": "10.0.0.1", "title": "Living Room", "uuid": "player" },
        "Metadata": {
            "librarySectionType": "movie",
            "ratingKey": "1936545",
            "key": "/library/metadata/1936545",
            "guid": "plex://movie/5d7768ba96b655001fdc0408",
            "type": "movie",
            "title": title,
            "librarySectionTitle": "Movies",
            "Guid": guids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>()
        }
    })
}

/// Episode event as sent by Plex Media Server.
pub fn episode_event(event: &str, show: &str, season: i64, episode: i64, title: &str) -> Value {
    json!({
        "event": event,
        "user": true,
        "owner": true,
        "Account": { "id": 1, "title": "Sergey" },
        "Metadata": {
            "librarySectionType": "show",
            "type": "episode",
            "title": title,
            "grandparentTitle": show,
            "parentTitle": format!("Season {}", season),
            "parentIndex": season,
            "index": episode,
            "Guid": [
                { "id": "imdb://tt1615547" },
                { "id": "tmdb://62161" },
                { "id": "tvdb://2639411" }
            ]
        }
    })
}
