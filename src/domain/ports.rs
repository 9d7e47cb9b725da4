use crate::domain::model::{ApplicationRow, ContactRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Contact surface of the CRM consumed by the sync flows.
#[async_trait]
pub trait CrmApi: Send + Sync {
    async fn create_contact(&self, contact: &ContactRecord) -> Result<String>;

    async fn update_contact(&self, contact_id: &str, contact: &ContactRecord) -> Result<()>;

    /// Equality search over the mobile and WhatsApp properties. Returns the
    /// id of the first match, if any.
    async fn search_contact_by_phone(&self, phone: &str) -> Result<Option<String>>;

    /// Bulk-create one chunk of contacts. Returns the number of created
    /// objects echoed back by the CRM.
    async fn batch_create(&self, contacts: &[ContactRecord]) -> Result<usize>;
}

/// Relational store surface: a single insert into the applications table.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert_application(&self, row: &ApplicationRow) -> Result<String>;
}
