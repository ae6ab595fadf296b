//! Recommendation stores.
//!
//! - [`JsonlRecommendationStore`]: append-only JSON Lines file
//! - [`MemoryRecommendationStore`]: keeps every batch in memory

use crate::error::SourceError;
use crate::traits::RecommendationStore;
use async_trait::async_trait;
use health_data::Recommendation;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Appends one JSON object per recommendation to a file.
pub struct JsonlRecommendationStore {
    path: PathBuf,
    // Serializes appends from concurrent requests.
    write_lock: Mutex<()>,
}

impl JsonlRecommendationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecommendationStore for JsonlRecommendationStore {
    async fn append(&self, batch: &[Recommendation]) -> Result<(), SourceError> {
        let mut buffer = Vec::new();
        for recommendation in batch {
            serde_json::to_writer(&mut buffer, recommendation)?;
            buffer.push(b'\n');
        }

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        debug!(
            "Appended {} recommendations to {}",
            batch.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Keeps every appended recommendation in memory.
#[derive(Default)]
pub struct MemoryRecommendationStore {
    records: RwLock<Vec<Recommendation>>,
}

impl MemoryRecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, in append order.
    pub async fn all(&self) -> Vec<Recommendation> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl RecommendationStore for MemoryRecommendationStore {
    async fn append(&self, batch: &[Recommendation]) -> Result<(), SourceError> {
        self.records.write().await.extend_from_slice(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation(restaurant_id: &str, score: f64) -> Recommendation {
        Recommendation::new(
            Some("user-1".to_string()),
            "a1".to_string(),
            restaurant_id.to_string(),
            score,
            "Good fit".to_string(),
        )
    }

    #[tokio::test]
    async fn test_jsonl_store_appends_batches() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlRecommendationStore::new(dir.path().join("recs.jsonl"));

        store
            .append(&[recommendation("r1", 0.9), recommendation("r2", 0.8)])
            .await
            .unwrap();
        store.append(&[recommendation("r3", 0.7)]).await.unwrap();

        let content = tokio::fs::read_to_string(store.path()).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: Recommendation = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.restaurant_id, "r1");
        assert_eq!(first.user_id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_jsonl_store_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlRecommendationStore::new(dir.path().join("missing/recs.jsonl"));

        let err = store.append(&[recommendation("r1", 0.9)]).await.unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[tokio::test]
    async fn test_memory_store_keeps_order() {
        let store = MemoryRecommendationStore::new();
        store
            .append(&[recommendation("r1", 0.9), recommendation("r2", 0.5)])
            .await
            .unwrap();

        let all = store.all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].restaurant_id, "r1");
        assert_eq!(all[1].restaurant_id, "r2");
    }
}
