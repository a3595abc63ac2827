//! End-to-end tests for the Plex Discord bridge live in `tests/`.
