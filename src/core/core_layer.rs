// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "config.rs"]
pub mod config;

#[path = "text/mod.rs"]
pub mod text;

#[path = "lexicon/lexicon_service.rs"]
pub mod lexicon;

#[path = "classifier/classifier_service.rs"]
pub mod classifier;

#[path = "moderation/mod.rs"]
pub mod moderation;
