//! Vector index operations
//!
//! Stores embeddings as BLOBs and computes cosine similarity in Rust.

use super::schema::SqliteStore;
use super::{VectorHit, VectorIndex};
use crate::error::Result;
use crate::record::Record;
use chrono::Utc;
use rusqlite::params;

impl VectorIndex for SqliteStore {
    fn upsert(&self, id: &str, model: &str, embedding: &[f32]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let embedding_bytes = embedding_to_bytes(embedding);

        let conn = self.lock();
        conn.execute(
            "INSERT OR REPLACE INTO embeddings (record_id, model, embedding, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, model, embedding_bytes, now],
        )?;
        Ok(())
    }

    fn nearest(&self, query: &[f32], n: usize) -> Result<Vec<VectorHit>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT record_id, embedding FROM embeddings")?;

        let mut hits = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let embedding_bytes: Vec<u8> = row.get(1)?;
                Ok((id, bytes_to_embedding(&embedding_bytes)))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(id, embedding)| VectorHit {
                score: cosine_similarity(query, &embedding),
                id,
            })
            .collect::<Vec<_>>();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(n);
        Ok(hits)
    }
}

impl SqliteStore {
    /// Records that have no embedding yet (for backfill)
    pub fn records_missing_embedding(&self) -> Result<Vec<Record>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT doc FROM records
             WHERE id NOT IN (SELECT record_id FROM embeddings)
             ORDER BY rowid",
        )?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        drop(stmt);
        drop(conn);

        docs.iter()
            .map(|doc| serde_json::from_str(doc).map_err(Into::into))
            .collect()
    }

    /// Count stored embeddings
    pub fn count_embeddings(&self) -> Result<usize> {
        let conn = self.lock();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Convert f32 embedding to bytes (little-endian)
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes to f32 embedding
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        Record, RecordContent, RecordKind, RecordMetadata, RecordSource, ScraperMetadata,
    };
    use crate::store::RecordStore;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn record(id: &str) -> Record {
        Record {
            id: id.to_string(),
            kind: RecordKind::Article,
            source: RecordSource::default(),
            metadata: RecordMetadata::default(),
            content: RecordContent::default(),
            raw_text: None,
            scraper_metadata: ScraperMetadata::default(),
            assigned_tags: None,
            tags_assigned_at: None,
            coords: None,
        }
    }

    #[test]
    fn test_embedding_roundtrip() {
        let original = vec![1.0f32, 2.0, 3.0, -1.5];
        let bytes = embedding_to_bytes(&original);
        let restored = bytes_to_embedding(&bytes);
        assert_eq!(original, restored);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);
    }

    #[test]
    fn nearest_ranks_by_similarity() {
        let store = store();
        store.upsert("close", "m", &[1.0, 0.0, 0.0]).unwrap();
        store.upsert("far", "m", &[0.0, 1.0, 0.0]).unwrap();
        store.upsert("mid", "m", &[0.7, 0.7, 0.0]).unwrap();

        let hits = store.nearest(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "close");
        assert_eq!(hits[1].id, "mid");
    }

    #[test]
    fn missing_embedding_backfill_listing() {
        let store = store();
        store.insert(&record("r1")).unwrap();
        store.insert(&record("r2")).unwrap();
        store.upsert("r1", "m", &[0.1, 0.2]).unwrap();

        let missing = store.records_missing_embedding().unwrap();
        let ids: Vec<_> = missing.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2"]);
        assert_eq!(store.count_embeddings().unwrap(), 1);
    }
}
