// src/trending/appwrite.rs
use std::time::Duration;

use itertools::Itertools;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{NewTrendingEntry, TrendingEntry, TrendingStore};
use crate::config::AppwriteSettings;
use crate::error::TrendingError;

const FIELD_TERM: &str = "searchTerm";
const FIELD_COUNT: &str = "count";
const FIELD_MOVIE: &str = "movie_id";
const FIELD_POSTER: &str = "poster_url";

/// Trending documents in a hosted Appwrite collection, over its REST API.
pub struct AppwriteTrendingStore {
    client: Client,
    endpoint: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm", default)]
    search_term: String,
    #[serde(default)]
    count: i64,
    #[serde(default)]
    movie_id: u64,
    #[serde(default)]
    poster_url: String,
}

impl From<Document> for TrendingEntry {
    fn from(d: Document) -> Self {
        Self {
            document_id: d.id,
            search_term: d.search_term,
            hit_count: d.count,
            movie_id: d.movie_id,
            poster_url: d.poster_url,
        }
    }
}

// ---- query strings (Appwrite >= 1.5 JSON form) ----
pub fn query_equal(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

pub fn query_order_desc(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

pub fn query_limit(limit: usize) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

/// POST body for a new document; the server assigns the id.
fn create_body(entry: &NewTrendingEntry) -> Value {
    json!({
        "documentId": "unique()",
        "data": {
            FIELD_TERM: entry.search_term,
            FIELD_COUNT: 1,
            FIELD_MOVIE: entry.movie_id,
            FIELD_POSTER: entry.poster_url,
        }
    })
}

/// PATCH body: the count we read plus one.
fn increment_body(entry: &TrendingEntry) -> Value {
    json!({ "data": { FIELD_COUNT: entry.hit_count + 1 } })
}

impl AppwriteTrendingStore {
    pub fn from_settings(s: &AppwriteSettings) -> Result<Self, TrendingError> {
        let need = |v: &Option<String>, name: &str| {
            v.clone()
                .filter(|x| !x.trim().is_empty())
                .ok_or_else(|| TrendingError::Config(format!("missing appwrite_{name}")))
        };
        let client = Client::builder()
            .user_agent("reelfind/trending")
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            endpoint: need(&s.endpoint, "endpoint")?,
            project_id: need(&s.project_id, "project_id")?,
            database_id: need(&s.database_id, "database_id")?,
            collection_id: need(&s.collection_id, "collection_id")?,
            api_key: s.api_key.clone(),
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    pub fn list_url(&self, queries: &[String]) -> String {
        let qs = queries
            .iter()
            .enumerate()
            .map(|(i, q)| format!("queries[{i}]={}", urlencoding::encode(q)))
            .join("&");
        if qs.is_empty() {
            self.documents_url()
        } else {
            format!("{}?{}", self.documents_url(), qs)
        }
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        let rb = rb
            .header("X-Appwrite-Project", &self.project_id)
            .header(CONTENT_TYPE, "application/json");
        match &self.api_key {
            Some(key) => rb.header("X-Appwrite-Key", key),
            None => rb,
        }
    }

    fn send_json(&self, rb: RequestBuilder) -> Result<Value, TrendingError> {
        let resp = self.authed(rb).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(TrendingError::Http(format!("HTTP {status}: {body}")));
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn list(&self, queries: &[String]) -> Result<Vec<TrendingEntry>, TrendingError> {
        let value = self.send_json(self.client.get(self.list_url(queries)))?;
        let list: DocumentList = serde_json::from_value(value)?;
        Ok(list.documents.into_iter().map(TrendingEntry::from).collect())
    }
}

impl TrendingStore for AppwriteTrendingStore {
    fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError> {
        self.list(&[query_limit(limit), query_order_desc(FIELD_COUNT)])
    }

    fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>, TrendingError> {
        Ok(self.list(&[query_equal(FIELD_TERM, term)])?.into_iter().next())
    }

    fn create(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, TrendingError> {
        let body = create_body(&entry);
        let value = self.send_json(
            self.client
                .post(self.documents_url())
                .body(body.to_string()),
        )?;
        let doc: Document = serde_json::from_value(value)?;
        Ok(doc.into())
    }

    fn increment(&self, entry: &TrendingEntry) -> Result<(), TrendingError> {
        let body = increment_body(entry);
        let url = format!("{}/{}", self.documents_url(), entry.document_id);
        self.send_json(self.client.patch(url).body(body.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AppwriteSettings {
        AppwriteSettings {
            endpoint: Some("https://cloud.appwrite.io/v1".into()),
            project_id: Some("proj".into()),
            database_id: Some("db1".into()),
            collection_id: Some("metrics".into()),
            api_key: None,
        }
    }

    #[test]
    fn missing_ids_are_config_errors() {
        let mut s = settings();
        s.collection_id = None;
        match AppwriteTrendingStore::from_settings(&s) {
            Err(TrendingError::Config(msg)) => assert!(msg.contains("collection_id")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn query_json_shapes() {
        let parse = |s: String| serde_json::from_str::<Value>(&s).unwrap();
        assert_eq!(
            parse(query_equal("searchTerm", "leo")),
            json!({ "method": "equal", "attribute": "searchTerm", "values": ["leo"] })
        );
        assert_eq!(parse(query_limit(5)), json!({ "method": "limit", "values": [5] }));
        assert_eq!(
            parse(query_order_desc("count")),
            json!({ "method": "orderDesc", "attribute": "count" })
        );
    }

    #[test]
    fn create_body_wraps_fields_in_unique_document() {
        let body = create_body(&NewTrendingEntry {
            search_term: "leo".into(),
            movie_id: 12,
            poster_url: "https://img/w500/leo.jpg".into(),
        });
        assert_eq!(
            body,
            json!({
                "documentId": "unique()",
                "data": {
                    "searchTerm": "leo",
                    "count": 1,
                    "movie_id": 12,
                    "poster_url": "https://img/w500/leo.jpg"
                }
            })
        );
    }

    #[test]
    fn increment_body_patches_count_only() {
        let entry = TrendingEntry {
            document_id: "abc".into(),
            search_term: "leo".into(),
            hit_count: 4,
            movie_id: 12,
            poster_url: String::new(),
        };
        assert_eq!(increment_body(&entry), json!({ "data": { "count": 5 } }));
    }

    #[test]
    fn list_url_indexes_and_encodes_queries() {
        let store = AppwriteTrendingStore::from_settings(&settings()).unwrap();
        let url = store.list_url(&[query_limit(5), query_order_desc("count")]);
        let (path, qs) = url.split_once('?').unwrap();
        assert_eq!(
            path,
            "https://cloud.appwrite.io/v1/databases/db1/collections/metrics/documents"
        );
        let parts: Vec<&str> = qs.split('&').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("queries[0]=%7B"));
        assert!(parts[1].starts_with("queries[1]=%7B"));
        let decoded = urlencoding::decode(parts[0].trim_start_matches("queries[0]=")).unwrap();
        assert_eq!(decoded, query_limit(5));
        assert!(store.list_url(&[]).ends_with("/documents"));
    }

    #[test]
    fn parses_document_list() {
        let body = r#"{ "total": 1, "documents": [
            { "$id": "abc", "searchTerm": "leo", "count": 4, "movie_id": 12,
              "poster_url": "https://img/w500/x.jpg", "$collectionId": "metrics" } ] }"#;
        let list: DocumentList = serde_json::from_str(body).unwrap();
        let entries: Vec<TrendingEntry> = list.documents.into_iter().map(Into::into).collect();
        assert_eq!(entries[0].document_id, "abc");
        assert_eq!(entries[0].hit_count, 4);
        assert_eq!(entries[0].movie_id, 12);
    }
}
