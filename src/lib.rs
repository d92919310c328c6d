// wordwatch - a content moderation engine for chat platforms.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases, files)
//
// The chat platform itself stays outside this crate. An adapter feeds
// inbound messages to `ModerationService::handle_message`, implements the
// `MessageDeleter` and `AuditSink` ports, and spawns the
// `InfractionSweeper` once the platform reports ready.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;
