//! Record storage operations

use super::schema::SqliteStore;
use super::{DiscoverPoint, PageResult, RecordStore, UntaggedRecord};
use crate::error::Result;
use crate::record::Record;
use chrono::Utc;
use rusqlite::params;

impl RecordStore for SqliteStore {
    fn insert(&self, record: &Record) -> Result<()> {
        let doc = serde_json::to_string(record)?;
        let created_at = record
            .metadata
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        let updated_at = record
            .metadata
            .updated_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| created_at.clone());
        let assigned_tags = record
            .assigned_tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let tags_assigned_at = record.tags_assigned_at.map(|t| t.to_rfc3339());
        let has_coords = record.coords.is_some() as i64;

        let conn = self.lock();
        conn.execute(
            "INSERT INTO records (id, kind, doc, created_at, updated_at, assigned_tags, tags_assigned_at, has_coords)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.kind.as_str(),
                doc,
                created_at,
                updated_at,
                assigned_tags,
                tags_assigned_at,
                has_coords
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Record>> {
        let conn = self.lock();
        let doc: Option<String> = conn
            .query_row(
                "SELECT doc FROM records WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    fn get_many(&self, ids: &[String]) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(id)? {
                Some(record) => records.push(record),
                None => tracing::debug!("Skipping unresolved record id: {}", id),
            }
        }
        Ok(records)
    }

    fn list(&self, page: usize, page_size: usize, kind: Option<&str>) -> Result<PageResult> {
        let page = page.max(1);
        let skip = (page - 1) * page_size;

        let conn = self.lock();
        let (total_count, docs): (usize, Vec<String>) = match kind {
            Some(kind) => {
                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM records WHERE kind = ?1",
                    params![kind],
                    |row| row.get(0),
                )?;
                let mut stmt = conn.prepare(
                    "SELECT doc FROM records WHERE kind = ?1 ORDER BY rowid LIMIT ?2 OFFSET ?3",
                )?;
                let docs = stmt
                    .query_map(params![kind, page_size as i64, skip as i64], |row| {
                        row.get(0)
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                (total as usize, docs)
            }
            None => {
                let total: i64 =
                    conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
                let mut stmt =
                    conn.prepare("SELECT doc FROM records ORDER BY rowid LIMIT ?1 OFFSET ?2")?;
                let docs = stmt
                    .query_map(params![page_size as i64, skip as i64], |row| row.get(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                (total as usize, docs)
            }
        };
        drop(conn);

        let data = docs
            .iter()
            .map(|doc| serde_json::from_str(doc))
            .collect::<std::result::Result<Vec<Record>, _>>()?;

        let total_pages = total_count.div_ceil(page_size.max(1));

        Ok(PageResult {
            page,
            page_size,
            data,
            total_count,
            total_pages,
        })
    }

    fn fetch_untagged(&self, limit: usize) -> Result<Vec<UntaggedRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id,
                    COALESCE(NULLIF(json_extract(doc, '$.content.article_text'), ''),
                             json_extract(doc, '$.content.description'))
             FROM records
             WHERE assigned_tags IS NULL
             ORDER BY rowid
             LIMIT ?1",
        )?;

        let records = stmt
            .query_map(params![limit as i64], |row| {
                Ok(UntaggedRecord {
                    id: row.get(0)?,
                    content: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::info!("Fetched {} untagged records (limit: {})", records.len(), limit);
        Ok(records)
    }

    fn apply_tags(&self, id: &str, tags: &[String]) -> Result<bool> {
        let tags_json = serde_json::to_string(tags)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.lock();
        let rows = conn.execute(
            "UPDATE records
             SET assigned_tags = ?2,
                 tags_assigned_at = ?3,
                 updated_at = ?3,
                 doc = json_set(doc, '$.assigned_tags', json(?2),
                                     '$.tags_assigned_at', ?3,
                                     '$.metadata.updated_at', ?3)
             WHERE id = ?1 AND (assigned_tags IS NULL OR assigned_tags <> ?2)",
            params![id, tags_json, now],
        )?;

        if rows == 1 {
            return Ok(true);
        }

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM records WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;

        if exists {
            tracing::warn!(
                "Record {} matched but was not modified (tags already set?)",
                id
            );
        } else {
            tracing::warn!("Record {} not found for updating tags", id);
        }
        Ok(false)
    }

    fn discover(&self, limit: usize) -> Result<Vec<DiscoverPoint>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT doc FROM records WHERE has_coords = 1 ORDER BY rowid LIMIT ?1",
        )?;
        let docs = stmt
            .query_map(params![limit as i64], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);

        let mut points = Vec::with_capacity(docs.len());
        for doc in docs {
            let record: Record = serde_json::from_str(&doc)?;
            let Some(coords) = record.coords.clone() else {
                continue;
            };
            points.push(DiscoverPoint {
                id: record.id.clone(),
                coords,
                kind: record.kind.as_str().to_string(),
                name: record.metadata.title.clone(),
                model: record.kind.model_name().map(str::to_string),
            });
        }
        Ok(points)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn ping(&self) -> bool {
        let conn = self.lock();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }
}
