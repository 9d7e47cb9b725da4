pub mod cli;
pub mod toml_config;

pub use cli::{Cli, Command};
pub use toml_config::{HubSpotConfig, SupabaseConfig, SyncConfig};
