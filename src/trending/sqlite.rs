// src/trending/sqlite.rs
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{NewTrendingEntry, TrendingEntry, TrendingStore};
use crate::error::TrendingError;

pub const TRENDING_TABLE: &str = "trending_searches";

const SQL_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS trending_searches (
  document_id TEXT PRIMARY KEY,
  search_term TEXT NOT NULL UNIQUE,
  hit_count   INTEGER NOT NULL DEFAULT 1,
  movie_id    INTEGER NOT NULL,
  poster_url  TEXT NOT NULL DEFAULT '',
  created_at  INTEGER NOT NULL,
  updated_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_trending_hits ON trending_searches(hit_count DESC);
"#;

const SQL_TOP: &str = r#"
SELECT document_id, search_term, hit_count, movie_id, poster_url
FROM trending_searches
ORDER BY hit_count DESC, created_at ASC
LIMIT ?1
"#;

const SQL_BY_TERM: &str = r#"
SELECT document_id, search_term, hit_count, movie_id, poster_url
FROM trending_searches
WHERE search_term = ?1
"#;

/// Local stand-in for the hosted document store: one row per search term.
pub struct SqliteTrendingStore {
    conn: Connection,
}

impl SqliteTrendingStore {
    pub fn open(path: &Path) -> Result<Self, TrendingError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, TrendingError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, TrendingError> {
        conn.execute_batch(SQL_CREATE)?;
        Ok(Self { conn })
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<TrendingEntry> {
    let movie_id: i64 = row.get(3)?;
    Ok(TrendingEntry {
        document_id: row.get(0)?,
        search_term: row.get(1)?,
        hit_count: row.get(2)?,
        movie_id: movie_id.max(0) as u64,
        poster_url: row.get(4)?,
    })
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// 20 hex chars, shaped like the ids hosted document stores hand out.
fn new_document_id(term: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let digest = format!("{:x}", md5::compute(format!("{term}\u{0}{nanos}").as_bytes()));
    digest[..20].to_string()
}

impl TrendingStore for SqliteTrendingStore {
    fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError> {
        let mut st = self.conn.prepare(SQL_TOP)?;
        let rows = st.query_map([limit as i64], entry_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>, TrendingError> {
        Ok(self
            .conn
            .query_row(SQL_BY_TERM, [term], entry_from_row)
            .optional()?)
    }

    fn create(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, TrendingError> {
        let id = new_document_id(&entry.search_term);
        let now = now_millis();
        self.conn.execute(
            "INSERT INTO trending_searches (document_id, search_term, hit_count, movie_id, poster_url, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?4, ?5, ?5)",
            params![id, entry.search_term, entry.movie_id as i64, entry.poster_url, now],
        )?;
        Ok(TrendingEntry {
            document_id: id,
            search_term: entry.search_term,
            hit_count: 1,
            movie_id: entry.movie_id,
            poster_url: entry.poster_url,
        })
    }

    fn increment(&self, entry: &TrendingEntry) -> Result<(), TrendingError> {
        self.conn.execute(
            "UPDATE trending_searches SET hit_count = ?1, updated_at = ?2 WHERE document_id = ?3",
            params![entry.hit_count + 1, now_millis(), entry.document_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trending::update_search_count;
    use crate::trending::tests::movie;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trending.db");

        {
            let store = SqliteTrendingStore::open(&path).unwrap();
            update_search_count(&store, "Vikram", &movie(3, Some("/v.jpg")), "https://img").unwrap();
            update_search_count(&store, "Vikram", &movie(3, Some("/v.jpg")), "https://img").unwrap();
        }

        let store = SqliteTrendingStore::open(&path).unwrap();
        let hit = store.find_by_term("Vikram").unwrap().unwrap();
        assert_eq!(hit.hit_count, 2);
        assert_eq!(hit.movie_id, 3);
        assert_eq!(hit.poster_url, "https://img/w500/v.jpg");
        assert_eq!(hit.document_id.len(), 20);
    }

    #[test]
    fn lists_by_hit_count_with_limit() {
        let store = SqliteTrendingStore::open_in_memory().unwrap();
        for (term, times) in [("jailer", 2), ("leo", 5), ("master", 1), ("kaithi", 3)] {
            for _ in 0..times {
                update_search_count(&store, term, &movie(1, None), "x").unwrap();
            }
        }
        let top = store.list_top(3).unwrap();
        let view: Vec<(&str, i64)> = top
            .iter()
            .map(|e| (e.search_term.as_str(), e.hit_count))
            .collect();
        assert_eq!(view, vec![("leo", 5), ("kaithi", 3), ("jailer", 2)]);
    }

    #[test]
    fn unknown_term_is_none() {
        let store = SqliteTrendingStore::open_in_memory().unwrap();
        assert!(store.find_by_term("nothing").unwrap().is_none());
        assert!(store.list_top(5).unwrap().is_empty());
    }

    #[test]
    fn increment_is_last_write_wins() {
        let store = SqliteTrendingStore::open_in_memory().unwrap();
        let created = store
            .create(NewTrendingEntry {
                search_term: "leo".into(),
                movie_id: 1,
                poster_url: String::new(),
            })
            .unwrap();
        // two sessions read the same count and both write count + 1
        let stale = created.clone();
        store.increment(&created).unwrap();
        store.increment(&stale).unwrap();
        assert_eq!(store.find_by_term("leo").unwrap().unwrap().hit_count, 2);
    }
}
