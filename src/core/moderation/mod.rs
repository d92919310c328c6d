// Core moderation module - classification pipeline, coordinator, and the
// deferred-deletion scheduler.
// Following the same pattern as the lexicon and classifier modules.

pub mod moderation_models;
pub mod moderation_service;
pub mod scheduler;

pub use moderation_models::*;
pub use moderation_service::*;
pub use scheduler::*;
