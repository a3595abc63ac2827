//! # Event Filter
//!
//! Decides whether a validated event is relayed to Discord. Only playback
//! start/finish and library additions for movie and show sections are
//! forwarded; everything else is acknowledged and dropped without error.

use crate::event::{WebhookEvent, LIBRARY_NEW, MEDIA_PLAY, MEDIA_SCROBBLE};

/// Event types that produce a notification
pub const FORWARDED_EVENT_TYPES: [&str; 3] = [MEDIA_PLAY, MEDIA_SCROBBLE, LIBRARY_NEW];

/// Library section types that produce a notification
pub const FORWARDED_LIBRARY_TYPES: [&str; 2] = ["movie", "show"];

/// Outcome of filtering a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// The event should be formatted and delivered
    Forward,

    /// The event type is outside the allow-set
    UnsupportedEventType,

    /// The event type is allowed but the library section is not
    UnsupportedLibraryType,
}

impl FilterDecision {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Classify an event. The event type is checked before the library type.
pub fn evaluate(event: &WebhookEvent) -> FilterDecision {
    if !FORWARDED_EVENT_TYPES.contains(&event.event_type.as_str()) {
        return FilterDecision::UnsupportedEventType;
    }

    if !FORWARDED_LIBRARY_TYPES.contains(&event.metadata.library_section_type.as_str()) {
        return FilterDecision::UnsupportedLibraryType;
    }

    FilterDecision::Forward
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
