// Moderation service - classification pipeline and coordinator.
//
// The pipeline runs the three detectors against one message and returns a
// verdict; it is a pure function of its input plus the currently active
// lexicon/classifier snapshots, so it is safe to call from any number of
// concurrent message handlers. The coordinator wires verdicts to the
// durable infraction store and the audit sink; the actual deletion is the
// sweeper's job.
//
// NO platform dependencies here - just pure domain logic.

use super::moderation_models::{
    AuditEvent, DeleteOutcome, InboundMessage, NewInfraction, Verdict, VerdictReason,
};
use super::scheduler::InfractionStore;
use crate::core::classifier::ClassifierModel;
use crate::core::config::ModerationConfig;
use crate::core::lexicon::{LexiconService, LexiconSource};
use crate::core::text::{phonetic_code, Tokenizer};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Audit sink error: {0}")]
    AuditError(String),
}

// ============================================================================
// OUTBOUND PORTS
// ============================================================================

/// Trait for the platform's message deletion endpoint.
#[async_trait]
pub trait MessageDeleter: Send + Sync {
    /// Ask the platform to delete a message. Expected failures come back as
    /// `DeleteOutcome` variants, never as panics or thrown errors.
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> DeleteOutcome;
}

/// Trait for the admin-facing announcement sink.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn announce(&self, event: &AuditEvent) -> Result<(), ModerationError>;
}

// ============================================================================
// CLASSIFICATION PIPELINE
// ============================================================================

/// Runs the three detectors against one message.
pub struct ClassificationPipeline<S: LexiconSource> {
    lexicon: Arc<LexiconService<S>>,
    model: Arc<ClassifierModel>,
    tokenizer: Tokenizer,
    spam_threshold: f64,
}

impl<S: LexiconSource> ClassificationPipeline<S> {
    pub fn new(
        lexicon: Arc<LexiconService<S>>,
        model: Arc<ClassifierModel>,
        spam_threshold: f64,
    ) -> Self {
        Self {
            lexicon,
            model,
            tokenizer: Tokenizer::new(),
            spam_threshold,
        }
    }

    /// Classify a message. First matching detector wins:
    /// stemmed lexicon lookup, then phonetic collision, then the Bayesian
    /// score. Never fails; empty or ambiguous input is simply not flagged.
    pub fn classify(&self, content: &str) -> Verdict {
        // One snapshot for the whole call; a concurrent reload cannot tear it.
        let lexicon = self.lexicon.snapshot();

        let tokens = self.tokenizer.tokenize(content);
        if tokens.is_empty() {
            return Verdict::clean();
        }

        for token in &tokens {
            let stemmed = self.tokenizer.stem(token);
            if lexicon.contains_stem(&stemmed) {
                tracing::debug!(token = %stemmed, "Token found in banned words");
                return Verdict::flagged(VerdictReason::Lexicon);
            }
        }

        for token in &tokens {
            let code = phonetic_code(token);
            if !code.is_empty() && lexicon.phonetic().contains_code(&code) {
                tracing::debug!(token = %token, code = %code, "Token matches banned words phonetically");
                return Verdict::flagged(VerdictReason::Phonetic);
            }
        }

        let score = self.model.score(&tokens);
        if score > self.spam_threshold {
            tracing::debug!(score, "Message classified as inappropriate");
            return Verdict::statistical(score);
        }

        Verdict::clean()
    }
}

// ============================================================================
// MODERATION COORDINATOR
// ============================================================================

/// Wires pipeline verdicts to the infraction store and the audit sink.
pub struct ModerationService<S: LexiconSource, I: InfractionStore> {
    pipeline: ClassificationPipeline<S>,
    store: Arc<I>,
    audit: Option<Arc<dyn AuditSink>>,
    config: ModerationConfig,
}

impl<S: LexiconSource, I: InfractionStore> ModerationService<S, I> {
    pub fn new(
        pipeline: ClassificationPipeline<S>,
        store: Arc<I>,
        audit: Option<Arc<dyn AuditSink>>,
        config: ModerationConfig,
    ) -> Self {
        Self {
            pipeline,
            store,
            audit,
            config,
        }
    }

    /// Classify one inbound message and, when it is flagged, durably record
    /// the deletion obligation before returning.
    ///
    /// Detection and deletion are decoupled on purpose: the deletion runs
    /// later from the sweeper, so a restart resumes queued infractions
    /// instead of re-detecting them.
    pub async fn handle_message(&self, msg: &InboundMessage) -> Result<Verdict, ModerationError> {
        let verdict = self.pipeline.classify(&msg.content);
        if !verdict.is_flagged {
            return Ok(verdict);
        }

        let deletion_time =
            Utc::now() + chrono::Duration::seconds(self.config.deletion_delay_secs as i64);

        let id = self
            .store
            .insert(NewInfraction {
                message_id: msg.message_id,
                channel_id: msg.channel_id,
                author_id: msg.author_id,
                created_at: msg.created_at,
                deletion_time,
                content: msg.content.clone(),
            })
            .await?;

        tracing::info!(
            infraction_id = id,
            message_id = msg.message_id,
            author_id = msg.author_id,
            reason = ?verdict.reason,
            "Recorded infraction"
        );

        let event = AuditEvent {
            message_id: msg.message_id,
            channel_id: msg.channel_id,
            author_id: msg.author_id,
            content: msg.content.clone(),
            verdict: verdict.clone(),
            scheduled_delay_secs: self.config.deletion_delay_secs,
        };

        match &self.audit {
            Some(sink) => {
                if let Err(err) = sink.announce(&event).await {
                    tracing::warn!("Failed to announce infraction: {}", err);
                }
            }
            None => {
                tracing::warn!("No audit sink configured; infraction not announced");
            }
        }

        Ok(verdict)
    }

    /// Classify without side effects (admin preview, tests).
    pub fn classify(&self, content: &str) -> Verdict {
        self.pipeline.classify(content)
    }

    /// Number of infractions still awaiting deletion.
    pub async fn pending_infractions(&self) -> Result<u64, ModerationError> {
        self.store.pending().await
    }
}

// ============================================================================
// TESTS
// ============================================================================
