//! In-memory vector store using exact cosine search
//!
//! Records live in a `HashMap` behind a `parking_lot::RwLock`, so queries run
//! concurrently and writes are serialized. When a snapshot path is configured
//! the full record set is written as JSON after every write and reloaded on
//! start-up. A write whose snapshot fails is rolled back before the call
//! returns its error.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::{Error, Result};

use super::vector_store::{RecordFilter, VectorMatch, VectorRecord, VectorStoreProvider};

/// Exact-search vector store held in memory
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<HashMap<String, VectorRecord>>,
    snapshot_path: Option<PathBuf>,
    /// Held across mutate + snapshot so snapshots land in write order
    write_lock: Mutex<()>,
}

impl InMemoryVectorStore {
    /// Create an empty, non-persistent store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a JSON snapshot, loading it if present
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            let loaded: Vec<VectorRecord> = serde_json::from_str(&data)?;
            tracing::info!("Loaded {} vectors from {}", loaded.len(), path.display());
            loaded.into_iter().map(|r| (r.id.clone(), r)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            records: RwLock::new(records),
            snapshot_path: Some(path),
            write_lock: Mutex::new(()),
        })
    }

    /// Snapshot location, if persistent
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let data = {
            let records = self.records.read();
            let mut all: Vec<&VectorRecord> = records.values().collect();
            all.sort_by(|a, b| a.id.cmp(&b.id));
            serde_json::to_string(&all)?
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Cosine similarity; 0.0 if either vector has zero magnitude
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn add(&self, records: Vec<VectorRecord>) -> Result<()> {
        if let Some(bad) = records.iter().find(|r| r.embedding.is_empty()) {
            return Err(Error::vector_db(format!("Record {} has no embedding", bad.id)));
        }

        let _guard = self.write_lock.lock().await;
        let replaced: Vec<(String, Option<VectorRecord>)> = {
            let mut store = self.records.write();
            records
                .into_iter()
                .map(|record| {
                    let id = record.id.clone();
                    let previous = store.insert(id.clone(), record);
                    (id, previous)
                })
                .collect()
        };

        if let Err(e) = self.persist().await {
            tracing::warn!("Snapshot write failed, rolling back {} records: {}", replaced.len(), e);
            let mut store = self.records.write();
            // Reverse order so a repeated id ends on its pre-batch value
            for (id, previous) in replaced.into_iter().rev() {
                match previous {
                    Some(record) => {
                        store.insert(id, record);
                    }
                    None => {
                        store.remove(&id);
                    }
                }
            }
            return Err(e);
        }
        Ok(())
    }

    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<VectorMatch>> {
        let records = self.records.read();

        let mut matches: Vec<VectorMatch> = records
            .values()
            .filter(|r| r.embedding.len() == embedding.len())
            .map(|r| VectorMatch {
                id: r.id.clone(),
                document: r.document.clone(),
                metadata: r.metadata.clone(),
                distance: 1.0 - cosine_similarity(&r.embedding, embedding),
            })
            .collect();

        // Ties broken by id so repeated queries return identical order
        matches.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(k);
        Ok(matches)
    }

    async fn get(&self, filter: &RecordFilter) -> Result<Vec<VectorRecord>> {
        let records = self.records.read();
        let mut found: Vec<VectorRecord> = records
            .values()
            .filter(|r| filter.matches(&r.metadata))
            .map(|r| VectorRecord {
                id: r.id.clone(),
                embedding: Vec::new(),
                document: r.document.clone(),
                metadata: r.metadata.clone(),
            })
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn delete(&self, ids: &[String]) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let removed: Vec<VectorRecord> = {
            let mut store = self.records.write();
            ids.iter().filter_map(|id| store.remove(id.as_str())).collect()
        };

        if removed.is_empty() {
            return Ok(0);
        }

        if let Err(e) = self.persist().await {
            tracing::warn!("Snapshot write failed, restoring {} records: {}", removed.len(), e);
            let mut store = self.records.write();
            for record in removed {
                store.insert(record.id.clone(), record);
            }
            return Err(e);
        }
        Ok(removed.len())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
