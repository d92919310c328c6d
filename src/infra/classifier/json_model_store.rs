// JSON-file implementation of ClassifierModelStore.
//
// The snapshot layout matches the training-data file the engine has always
// shipped with: two token->count maps (`ham_counts`, `spam_counts`) and the
// two class totals. Missing or malformed snapshots degrade to an empty
// model so classification still runs, with the statistical detector
// effectively neutral.

use crate::core::classifier::{ClassifierError, ClassifierModel, ClassifierModelStore};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

pub struct JsonModelStore {
    path: PathBuf,
}

impl JsonModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ClassifierModelStore for JsonModelStore {
    async fn load(&self) -> Result<ClassifierModel, ClassifierError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Training data file not found; starting with empty model"
                );
                return Ok(ClassifierModel::default());
            }
            Err(err) => {
                return Err(ClassifierError::StorageError(format!(
                    "reading {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        match serde_json::from_str::<ClassifierModel>(&contents) {
            Ok(model) => {
                tracing::info!(
                    ham_tokens = model.ham_counts.len(),
                    spam_tokens = model.spam_counts.len(),
                    "Loaded training data for Bayesian filtering"
                );
                Ok(model)
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Malformed training data; starting with empty model"
                );
                Ok(ClassifierModel::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.json");
        std::fs::write(
            &path,
            r#"{
                "ham_counts": {"meeting": 12},
                "spam_counts": {"lottery": 34},
                "total_ham": 12,
                "total_spam": 34
            }"#,
        )
        .unwrap();

        let model = JsonModelStore::new(&path).load().await.unwrap();
        assert_eq!(model.ham_counts.get("meeting"), Some(&12));
        assert_eq!(model.spam_counts.get("lottery"), Some(&34));
        assert_eq!(model.total_spam, 34);
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = JsonModelStore::new(dir.path().join("nope.json"))
            .load()
            .await
            .unwrap();
        assert!(model.is_empty());
        assert_eq!(model.score(&[]), 0.5);
    }

    #[tokio::test]
    async fn test_malformed_file_degrades_to_empty_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let model = JsonModelStore::new(&path).load().await.unwrap();
        assert!(model.is_empty());
    }
}
