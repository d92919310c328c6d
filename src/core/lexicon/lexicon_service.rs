// Lexicon store - the banned word set, the exception set, and the derived
// phonetic index.
//
// The active lexicon is one immutable snapshot behind an atomic swap.
// Classification grabs an `Arc` to the snapshot once per call, so a reload
// running concurrently can never expose a half-built index.
//
// NO platform dependencies here - just pure domain logic.

use crate::core::text::{PhoneticIndex, Tokenizer};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Cannot add an empty word")]
    EmptyWord,
}

// ============================================================================
// SOURCE TRAIT (PORT)
// ============================================================================

/// Which of the two word lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordList {
    Banned,
    Exceptions,
}

/// Trait for loading and mutating the lexicon's backing word lists.
///
/// Following the same port pattern as the infraction store.
#[async_trait]
pub trait LexiconSource: Send + Sync {
    /// Load one word list, already lowercased, comments stripped.
    ///
    /// A missing backing source is not an error: implementations log a
    /// warning and return an empty list so the engine degrades instead of
    /// refusing to start.
    async fn load(&self, list: WordList) -> Result<Vec<String>, LexiconError>;

    /// Append a word to the banned list source.
    async fn append_word(&self, word: &str) -> Result<(), LexiconError>;

    /// Remove a word from the banned list source. Returns `true` when the
    /// word was present.
    async fn remove_word(&self, word: &str) -> Result<bool, LexiconError>;
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// One immutable, internally consistent view of the lexicon.
///
/// Readers clone the `Arc` and keep it for the duration of a single
/// classification; they see either the old or the new lexicon, never a mix.
#[derive(Debug, Default)]
pub struct LexiconSnapshot {
    /// Stems of banned words, minus stems of exception words.
    banned_stems: HashSet<String>,
    /// Raw banned words after exception subtraction; feeds the phonetic index.
    banned_words: HashSet<String>,
    exceptions: HashSet<String>,
    phonetic: PhoneticIndex,
}

impl LexiconSnapshot {
    /// Is this stemmed token in the banned set?
    pub fn contains_stem(&self, stem: &str) -> bool {
        self.banned_stems.contains(stem)
    }

    pub fn phonetic(&self) -> &PhoneticIndex {
        &self.phonetic
    }

    pub fn banned_count(&self) -> usize {
        self.banned_words.len()
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Holds the active lexicon snapshot and rebuilds it from the source.
pub struct LexiconService<S: LexiconSource> {
    source: S,
    tokenizer: Tokenizer,
    active: RwLock<Arc<LexiconSnapshot>>,
}

impl<S: LexiconSource> LexiconService<S> {
    /// Create a service with an empty lexicon. Call `reload` to populate it.
    pub fn new(source: S) -> Self {
        Self {
            source,
            tokenizer: Tokenizer::new(),
            active: RwLock::new(Arc::new(LexiconSnapshot::default())),
        }
    }

    /// The currently active snapshot.
    pub fn snapshot(&self) -> Arc<LexiconSnapshot> {
        // A poisoned lock still holds a coherent Arc (the swap itself is a
        // single assignment), so recover instead of propagating a panic.
        match self.active.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Reload both word lists and atomically swap in the rebuilt snapshot.
    pub async fn reload(&self) -> Result<(), LexiconError> {
        let banned = self.source.load(WordList::Banned).await?;
        let exceptions = self.source.load(WordList::Exceptions).await?;
        let snapshot = Arc::new(self.build_snapshot(banned, exceptions));

        tracing::info!(
            banned = snapshot.banned_count(),
            exceptions = snapshot.exception_count(),
            phonetic_codes = snapshot.phonetic().len(),
            "Lexicon reloaded"
        );

        let mut guard = match self.active.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = snapshot;
        Ok(())
    }

    /// Add a word to the banned list source and reload.
    pub async fn add_word(&self, word: &str) -> Result<(), LexiconError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(LexiconError::EmptyWord);
        }
        self.source.append_word(&word).await?;
        tracing::info!(word = %word, "Added banned word");
        self.reload().await
    }

    /// Remove a word from the banned list source and reload. Returns `true`
    /// when the word was present.
    pub async fn remove_word(&self, word: &str) -> Result<bool, LexiconError> {
        let word = word.trim().to_lowercase();
        let removed = self.source.remove_word(&word).await?;
        if removed {
            tracing::info!(word = %word, "Removed banned word");
            self.reload().await?;
        }
        Ok(removed)
    }

    /// Build a fresh snapshot. Exceptions win over banned entries: they are
    /// subtracted both as raw words and as stems, so an exception can never
    /// be flagged through the lexicon even when its stem collides with a
    /// banned stem.
    fn build_snapshot(&self, banned: Vec<String>, exceptions: Vec<String>) -> LexiconSnapshot {
        let exceptions: HashSet<String> = exceptions.into_iter().collect();

        let banned_words: HashSet<String> = banned
            .into_iter()
            .filter(|w| !exceptions.contains(w))
            .collect();

        let exception_stems: HashSet<String> =
            exceptions.iter().map(|w| self.tokenizer.stem(w)).collect();

        let banned_stems: HashSet<String> = banned_words
            .iter()
            .map(|w| self.tokenizer.stem(w))
            .filter(|s| !exception_stems.contains(s))
            .collect();

        let phonetic = PhoneticIndex::build(banned_words.iter().map(String::as_str));

        LexiconSnapshot {
            banned_stems,
            banned_words,
            exceptions,
            phonetic,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
