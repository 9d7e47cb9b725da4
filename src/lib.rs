pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::hubspot::HubSpotClient;
pub use crate::adapters::supabase::SupabaseStore;
pub use crate::config::SyncConfig;
pub use crate::core::import::ImportPipeline;
pub use crate::utils::error::{Result, SyncError};
