// Adapters layer: concrete clients for the external systems the core
// talks to through the domain ports.

pub mod hubspot;
pub mod properties;
pub mod supabase;

use crate::utils::error::{Result, SyncError};

/// Map a non-2xx response to a structured API error carrying the raw body,
/// so chunk and upsert failures report exactly what the remote said.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Api {
        status: status.as_u16(),
        body,
    })
}
