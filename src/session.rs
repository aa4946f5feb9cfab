//! Editor session: configuration, the event vocabulary and the single-writer session loop.

pub(crate) mod config;
pub(crate) mod editor;
pub(crate) mod events;
