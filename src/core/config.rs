// Moderation engine configuration.
//
// One explicitly constructed struct, injected at the composition root.
// There is no process-wide config singleton; every component receives the
// values it needs at construction time.

/// Tunables for classification and deferred deletion.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// How long a flagged message stays up before the sweeper deletes it.
    pub deletion_delay_secs: u64,
    /// How often the sweeper checks for due infractions. Much shorter than
    /// the deletion delay; this is also the retry interval for transient
    /// delete failures.
    pub sweep_interval_secs: u64,
    /// Upper bound on a single delete call to the platform. A call that
    /// exceeds this is treated as a transient failure.
    pub delete_timeout_secs: u64,
    /// Bayesian posterior above which a message is flagged as spam.
    pub spam_threshold: f64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            deletion_delay_secs: 6 * 60 * 60, // 6 hours
            sweep_interval_secs: 60,
            delete_timeout_secs: 10,
            spam_threshold: 0.9,
        }
    }
}
