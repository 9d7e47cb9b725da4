//! HubSpot contact adapter. The CRM API rejects browser CORS, so every
//! deployment reaches it server-side: either this process directly, or a
//! relay whose address is injected as the base URL.

use crate::adapters::expect_success;
use crate::domain::model::ContactRecord;
use crate::domain::ports::CrmApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

#[derive(Debug, Clone)]
pub struct HubSpotClient {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct ContactBody<'a> {
    properties: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    inputs: Vec<ContactBody<'a>>,
}

#[derive(Deserialize)]
struct ObjectEcho {
    id: String,
}

#[derive(Deserialize)]
struct ResultsEcho {
    #[serde(default)]
    results: Vec<ObjectEcho>,
}

impl HubSpotClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// POST without the success check, for callers that branch on the
    /// status code themselves (property provisioning treats 409 as "already
    /// exists").
    pub(crate) async fn post_raw(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl CrmApi for HubSpotClient {
    async fn create_contact(&self, contact: &ContactRecord) -> Result<String> {
        let response = self
            .http
            .post(self.url("/crm/v3/objects/contacts"))
            .bearer_auth(&self.token)
            .json(&ContactBody {
                properties: &contact.properties,
            })
            .send()
            .await?;
        let response = expect_success(response).await?;
        let echo: ObjectEcho = response.json().await?;
        Ok(echo.id)
    }

    async fn update_contact(&self, contact_id: &str, contact: &ContactRecord) -> Result<()> {
        let response = self
            .http
            .patch(self.url(&format!("/crm/v3/objects/contacts/{}", contact_id)))
            .bearer_auth(&self.token)
            .json(&ContactBody {
                properties: &contact.properties,
            })
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn search_contact_by_phone(&self, phone: &str) -> Result<Option<String>> {
        // OR-combined filter groups: a hit on either number property counts.
        let body = json!({
            "filterGroups": [
                {
                    "filters": [
                        { "propertyName": "faces_mobile", "operator": "EQ", "value": phone }
                    ]
                },
                {
                    "filters": [
                        { "propertyName": "faces_whatsapp", "operator": "EQ", "value": phone }
                    ]
                }
            ]
        });

        let response = self
            .http
            .post(self.url("/crm/v3/objects/contacts/search"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = expect_success(response).await?;
        let echo: ResultsEcho = response.json().await?;
        Ok(echo.results.into_iter().next().map(|object| object.id))
    }

    async fn batch_create(&self, contacts: &[ContactRecord]) -> Result<usize> {
        let body = BatchBody {
            inputs: contacts
                .iter()
                .map(|contact| ContactBody {
                    properties: &contact.properties,
                })
                .collect(),
        };

        let response = self
            .http
            .post(self.url("/crm/v3/objects/contacts/batch/create"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = expect_success(response).await?;
        let echo: ResultsEcho = response.json().await?;
        Ok(echo.results.len())
    }
}
