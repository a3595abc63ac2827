//! # Message Formatter
//!
//! Renders the Discord message for a forwarded event. Output is Discord
//! markdown: the body line, optionally followed by an IMDb link on its own
//! line.
//!
//! ```text
//! **Sergey** started watching **Breaking Bad — S03E05 Más**
//! https://www.imdb.com/title/tt1615547/
//! ```

use crate::event::{Metadata, WebhookEvent, LIBRARY_NEW, MEDIA_PLAY, MEDIA_SCROBBLE};

/// Namespace prefix of IMDb identifiers in the `Guid` list
pub const IMDB_NAMESPACE: &str = "imdb://";

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";

const SERIES_SEPARATOR: &str = " \u{2014} ";

/// Build the complete message text for an event.
pub fn format_message(event: &WebhookEvent) -> String {
    let verb = verb_for(&event.event_type);
    let title = title_line(&event.metadata);

    let body = if event.event_type == LIBRARY_NEW {
        format!("**{}** {}", title, verb)
    } else {
        format!("**{}** {} **{}**", event.account.display_name, verb, title)
    };

    match imdb_link(&event.metadata) {
        Some(link) => format!("{}\n{}", body, link),
        None => body,
    }
}

/// Phrase describing what happened. Unmapped event types are used verbatim.
pub fn verb_for(event_type: &str) -> &str {
    match event_type {
        MEDIA_PLAY => "started watching",
        MEDIA_SCROBBLE => "finished watching",
        LIBRARY_NEW => "added to library",
        other => other,
    }
}

/// Display title: `Show — S01E02 Episode` for episodes, the plain title otherwise.
///
/// Season and episode segments are dropped independently when Plex omits
/// the corresponding index.
pub fn title_line(metadata: &Metadata) -> String {
    if !metadata.is_episode() {
        return metadata.title.clone();
    }

    let season = metadata
        .season_number
        .map(|number| format!("S{:02}", number))
        .unwrap_or_default();
    let episode = metadata
        .episode_number
        .map(|number| format!("E{:02}", number))
        .unwrap_or_default();
    let show = metadata.series_title.as_deref().unwrap_or_default();

    format!(
        "{}{}{}{} {}",
        show, SERIES_SEPARATOR, season, episode, metadata.title
    )
}

/// IMDb title URL for the first `imdb://` identifier, if any.
pub fn imdb_link(metadata: &Metadata) -> Option<String> {
    metadata
        .external_ids()
        .iter()
        .find_map(|id| id.value_in(IMDB_NAMESPACE))
        .map(|imdb_id| format!("{}{}/", IMDB_TITLE_URL, imdb_id))
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
