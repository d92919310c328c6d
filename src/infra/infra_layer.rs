// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "lexicon/file_lexicon_source.rs"]
pub mod lexicon;

#[path = "classifier/json_model_store.rs"]
pub mod classifier;

#[path = "moderation/mod.rs"]
pub mod moderation;
