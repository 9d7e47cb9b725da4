pub mod clean;
pub mod dedupe;
pub mod import;
pub mod mapper;
pub mod upsert;

pub use crate::domain::model::{
    BatchOutcome, ContactRecord, FormSubmission, ImportSummary, SourceRecord, SyncOutcome,
};
pub use crate::domain::ports::{ApplicationStore, CrmApi};
pub use crate::utils::error::Result;
