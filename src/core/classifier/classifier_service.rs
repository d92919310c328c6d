// Naive-Bayes spam classification over token frequency counts.
//
// The model is a snapshot loaded once at startup and read-only afterwards;
// there is no online learning path. Scoring is pure and panic-free for any
// token sequence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// MODEL
// ============================================================================

/// Token frequency counts for the two classes, plus the class totals.
///
/// The serde field names match the persisted snapshot layout
/// (`training_data.json`): two token->count maps and two scalar totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierModel {
    #[serde(default)]
    pub ham_counts: HashMap<String, u64>,
    #[serde(default)]
    pub spam_counts: HashMap<String, u64>,
    #[serde(default)]
    pub total_ham: u64,
    #[serde(default)]
    pub total_spam: u64,
}

impl ClassifierModel {
    /// Posterior probability in [0, 1] that the token sequence is spam.
    ///
    /// Per-token likelihoods are Laplace-smoothed
    /// (`(count + 1) / (total + 2)`) and multiplied per class from a 1.0
    /// seed under the naive independence assumption. The final score is
    /// `spam / (spam + ham)`. When both running products underflow to
    /// exactly zero the message counts as not spam; underflow is never an
    /// error. An empty token sequence scores the seed ratio, 0.5.
    pub fn score(&self, tokens: &[String]) -> f64 {
        let mut spam_likelihood = 1.0_f64;
        let mut ham_likelihood = 1.0_f64;

        let total_spam = self.total_spam as f64;
        let total_ham = self.total_ham as f64;

        for token in tokens {
            let spam_count = self.spam_counts.get(token).copied().unwrap_or(0) as f64;
            let ham_count = self.ham_counts.get(token).copied().unwrap_or(0) as f64;

            spam_likelihood *= (spam_count + 1.0) / (total_spam + 2.0);
            ham_likelihood *= (ham_count + 1.0) / (total_ham + 2.0);
        }

        let denominator = spam_likelihood + ham_likelihood;
        if denominator == 0.0 {
            return 0.0;
        }
        spam_likelihood / denominator
    }

    /// True when no training data has been observed for either class.
    pub fn is_empty(&self) -> bool {
        self.ham_counts.is_empty() && self.spam_counts.is_empty()
    }
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for loading the persisted classifier model snapshot.
#[async_trait]
pub trait ClassifierModelStore: Send + Sync {
    /// Load the model. A missing or malformed snapshot is not an error:
    /// implementations log and return an empty model so the engine starts
    /// with the statistical detector effectively neutral.
    async fn load(&self) -> Result<ClassifierModel, ClassifierError>;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    fn trained_model() -> ClassifierModel {
        let mut model = ClassifierModel::default();
        model.spam_counts.insert("viagra".to_string(), 40);
        model.spam_counts.insert("winner".to_string(), 30);
        model.ham_counts.insert("meeting".to_string(), 50);
        model.ham_counts.insert("lunch".to_string(), 20);
        model.total_spam = 70;
        model.total_ham = 70;
        model
    }

    #[test]
    fn test_empty_token_sequence_scores_half() {
        let model = trained_model();
        assert_eq!(model.score(&[]), 0.5);

        // Both products stay at the seed even with no training data at all.
        assert_eq!(ClassifierModel::default().score(&[]), 0.5);
    }

    #[test]
    fn test_spammy_tokens_score_high() {
        let model = trained_model();
        let score = model.score(&tokens(&["viagra", "winner"]));
        assert!(score > 0.9, "expected spam score, got {score}");
    }

    #[test]
    fn test_hammy_tokens_score_low() {
        let model = trained_model();
        let score = model.score(&tokens(&["meeting", "lunch"]));
        assert!(score < 0.1, "expected ham score, got {score}");
    }

    #[test]
    fn test_unseen_tokens_are_neutral() {
        let model = trained_model();
        // Laplace smoothing gives unseen tokens equal likelihood in both
        // classes when the totals match.
        let score = model.score(&tokens(&["zebra", "quux"]));
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_model_never_flags() {
        let model = ClassifierModel::default();
        let score = model.score(&tokens(&["anything", "at", "all"]));
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_underflow_is_not_spam() {
        // Thousands of tokens drive both products toward zero. Whether or
        // not they reach exact zero, the score must stay a valid non-NaN
        // probability and never panic.
        let model = trained_model();
        let many: Vec<String> = std::iter::repeat("meeting".to_string()).take(50_000).collect();
        let score = model.score(&many);
        assert!(score >= 0.0 && score <= 1.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let model = trained_model();
        let json = serde_json::to_string(&model).unwrap();
        let loaded: ClassifierModel = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.total_spam, 70);
        assert_eq!(loaded.spam_counts.get("viagra"), Some(&40));
    }

    #[test]
    fn test_partial_snapshot_fields_default() {
        let loaded: ClassifierModel =
            serde_json::from_str(r#"{"spam_counts": {"scam": 3}}"#).unwrap();
        assert_eq!(loaded.spam_counts.get("scam"), Some(&3));
        assert!(loaded.ham_counts.is_empty());
        assert_eq!(loaded.total_ham, 0);
    }
}
