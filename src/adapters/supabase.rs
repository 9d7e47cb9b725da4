//! Supabase REST adapter for the `applications` table. Only an insert is
//! exposed; reads and edits happen through the hosted dashboard.

use crate::adapters::expect_success;
use crate::domain::model::ApplicationRow;
use crate::domain::ports::ApplicationStore;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_TABLE: &str = "applications";

#[derive(Debug, Clone)]
pub struct SupabaseStore {
    http: Client,
    base_url: String,
    api_key: String,
    table: String,
}

#[derive(Deserialize)]
struct InsertedRow {
    id: serde_json::Value,
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: table.into(),
        }
    }
}

#[async_trait]
impl ApplicationStore for SupabaseStore {
    async fn insert_application(&self, row: &ApplicationRow) -> Result<String> {
        let url = format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        );

        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let response = expect_success(response).await?;

        let rows: Vec<InsertedRow> = response.json().await?;
        let inserted = rows.into_iter().next().ok_or_else(|| SyncError::Api {
            status: 200,
            body: "insert returned no representation".to_string(),
        })?;

        // The id column is a UUID string on hosted projects but may be a
        // bigint elsewhere; normalize either to a string.
        Ok(match inserted.id {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        })
    }
}
