//! # Supabase
//!
//! Hosted Postgres reached over its PostgREST interface.
//!
//! Holds both tables this service touches: `personal_info` (read/insert) and
//! the read-only `MEDLINEPLUS` reference content. The service keeps no state
//! of its own between requests; every handler is one round trip through this
//! client.
//!
//! ## Wire mapping
//!
//! - Reads are `GET {base}/rest/v1/{table}` with `select`, filter and `limit`
//!   query pairs (`column=eq.value`, `column=ilike.%pattern%`).
//! - Inserts are `POST {base}/rest/v1/{table}` with a JSON body and
//!   `Prefer: return=representation`, so the created row comes back in the
//!   response array.
//!
//! Filters are always sent as URL query pairs built from the raw value, never
//! spliced into the path, so the HTTP layer does the escaping.
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::StoreError;

pub const PERSONAL_INFO_TABLE: &str = "personal_info";
pub const TOPICS_TABLE: &str = "MEDLINEPLUS";

#[derive(Clone)]
pub struct Store {
    http: Client,
    base: String,
    key: String,
}

impl Store {
    pub fn new(url: &str, key: &str) -> Self {
        Self {
            http: Client::new(),
            base: format!("{}/rest/v1", url.trim_end_matches('/')),
            key: key.to_string(),
        }
    }

    pub fn table<'a>(&'a self, name: &str) -> Table<'a> {
        Table {
            store: self,
            name: name.to_string(),
        }
    }
}

pub struct Table<'a> {
    store: &'a Store,
    name: String,
}

impl<'a> Table<'a> {
    pub fn select(self, columns: &str) -> Select<'a> {
        Select {
            store: self.store,
            name: self.name,
            columns: columns.to_string(),
            filters: Vec::new(),
            limit: None,
        }
    }

    /// Inserts one record and returns the stored representation.
    pub async fn insert<T, R>(self, record: &T) -> Result<Vec<R>, StoreError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .store
            .http
            .post(format!("{}/{}", self.store.base, self.name))
            .header("apikey", &self.store.key)
            .bearer_auth(&self.store.key)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        read_rows(response).await
    }
}

pub struct Select<'a> {
    store: &'a Store,
    name: String,
    columns: String,
    filters: Vec<(String, String)>,
    limit: Option<u32>,
}

impl Select<'_> {
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive substring match on `column`. The pattern is built
    /// here from the raw substring; a literal `%` in it acts as a wildcard.
    pub fn ilike(mut self, column: &str, substring: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.{}", ilike_pattern(substring))));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let mut query: Vec<(String, String)> = vec![("select".to_string(), self.columns)];
        query.extend(self.filters);
        if let Some(n) = self.limit {
            query.push(("limit".to_string(), n.to_string()));
        }

        let response = self
            .store
            .http
            .get(format!("{}/{}", self.store.base, self.name))
            .header("apikey", &self.store.key)
            .bearer_auth(&self.store.key)
            .query(&query)
            .send()
            .await?;

        read_rows(response).await
    }
}

fn ilike_pattern(substring: &str) -> String {
    format!("%{substring}%")
}

async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StoreError::Query {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ilike_pattern_wraps_substring() {
        assert_eq!(ilike_pattern("cancer"), "%cancer%");
        assert_eq!(ilike_pattern(""), "%%");
    }

    #[test]
    fn select_accumulates_parameterized_filters() {
        let store = Store::new("http://localhost:54321/", "key");
        let select = store
            .table(TOPICS_TABLE)
            .select("topic_id,title")
            .eq("language", "English")
            .ilike("title", "heart attack")
            .limit(5);

        assert_eq!(select.columns, "topic_id,title");
        assert_eq!(
            select.filters,
            vec![
                ("language".to_string(), "eq.English".to_string()),
                ("title".to_string(), "ilike.%heart attack%".to_string()),
            ]
        );
        assert_eq!(select.limit, Some(5));
        assert_eq!(store.base, "http://localhost:54321/rest/v1");
    }
}
