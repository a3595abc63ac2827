//! # Plex Bridge Core
//!
//! Domain logic for relaying Plex media-server webhooks to a Discord channel.
//!
//! The request pipeline is split into small, independently testable steps:
//! - [`event`]: explicit schema validation of the Plex JSON payload
//! - [`filter`]: decides whether an event is forwarded at all
//! - [`message`]: renders the Discord message text
//! - [`delivery`]: posts the message to the Discord incoming webhook
//!
//! Nothing in this crate keeps state between requests.
//!
//! ## Usage
//!
//! ```rust
//! use plex_bridge_core::{event::WebhookEvent, filter, message};
//!
//! let json = r#"{
//!     "event": "media.play",
//!     "Account": { "title": "Sergey" },
//!     "Metadata": { "librarySectionType": "movie", "type": "movie", "title": "Inception" }
//! }"#;
//!
//! let event = WebhookEvent::from_json(json).unwrap();
//! assert!(filter::evaluate(&event).is_forwarded());
//! assert_eq!(message::format_message(&event), "**Sergey** started watching **Inception**");
//! ```

pub mod delivery;
pub mod event;
pub mod filter;
pub mod message;

pub use delivery::{DeliveryConfig, DeliveryError, DiscordWebhookClient, NotificationSink};
pub use event::{Account, ExternalId, Metadata, SchemaError, WebhookEvent};
pub use filter::FilterDecision;
