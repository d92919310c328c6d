// File-backed lexicon source.
//
// Each word list is a newline-delimited text file: one word per line,
// blank lines and `#`-prefixed comment lines ignored, matching case-folded
// to lowercase. A missing file degrades to an empty list with a warning so
// the engine still starts.

use crate::core::lexicon::{LexiconError, LexiconSource, WordList};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub struct FileLexiconSource {
    banned_path: PathBuf,
    exceptions_path: PathBuf,
}

impl FileLexiconSource {
    pub fn new(banned_path: impl Into<PathBuf>, exceptions_path: impl Into<PathBuf>) -> Self {
        Self {
            banned_path: banned_path.into(),
            exceptions_path: exceptions_path.into(),
        }
    }

    fn path_for(&self, list: WordList) -> &Path {
        match list {
            WordList::Banned => &self.banned_path,
            WordList::Exceptions => &self.exceptions_path,
        }
    }

    fn parse(contents: &str) -> Vec<String> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect()
    }
}

#[async_trait]
impl LexiconSource for FileLexiconSource {
    async fn load(&self, list: WordList) -> Result<Vec<String>, LexiconError> {
        let path = self.path_for(list);
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Word list file not found; using empty list");
                Ok(Vec::new())
            }
            Err(err) => Err(LexiconError::StorageError(format!(
                "reading {}: {}",
                path.display(),
                err
            ))),
        }
    }

    async fn append_word(&self, word: &str) -> Result<(), LexiconError> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.banned_path)
            .await
            .map_err(|e| LexiconError::StorageError(e.to_string()))?;

        file.write_all(format!("{word}\n").as_bytes())
            .await
            .map_err(|e| LexiconError::StorageError(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| LexiconError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn remove_word(&self, word: &str) -> Result<bool, LexiconError> {
        let contents = match fs::read_to_string(&self.banned_path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(LexiconError::StorageError(err.to_string())),
        };

        let mut removed = false;
        // Keep comments and blank lines; drop only matching word lines.
        let kept: Vec<&str> = contents
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    return true;
                }
                if trimmed.eq_ignore_ascii_case(word) {
                    removed = true;
                    return false;
                }
                true
            })
            .collect();

        if !removed {
            return Ok(false);
        }

        let mut rewritten = kept.join("\n");
        if !rewritten.is_empty() {
            rewritten.push('\n');
        }
        fs::write(&self.banned_path, rewritten)
            .await
            .map_err(|e| LexiconError::StorageError(e.to_string()))?;

        Ok(true)
    }
}
