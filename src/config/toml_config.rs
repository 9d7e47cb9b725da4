use crate::core::import::{DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE};
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration. API base URLs and credentials are injected here
/// and nowhere else; pointing `hubspot.base_url` at a relay is how a
/// proxied deployment keeps the credential off the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub hubspot: HubSpotConfig,
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSpotConfig {
    #[serde(default = "default_hubspot_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_hubspot_base_url() -> String {
    crate::adapters::hubspot::DEFAULT_BASE_URL.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_batch_delay_ms() -> u64 {
    DEFAULT_BATCH_DELAY_MS
}

fn default_table() -> String {
    crate::adapters::supabase::DEFAULT_TABLE.to_string()
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            base_url: default_hubspot_base_url(),
            access_token: String::new(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

impl SyncConfig {
    /// Load from a TOML file, or fall back to defaults plus the
    /// conventional environment variables when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_env()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| SyncError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values; unset
    /// variables keep the placeholder so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    fn from_env() -> Self {
        Self {
            hubspot: HubSpotConfig {
                access_token: std::env::var("HUBSPOT_ACCESS_TOKEN").unwrap_or_default(),
                ..Default::default()
            },
            supabase: None,
        }
    }

    /// Token presence is only checked by the commands that actually call
    /// the CRM, so a dry run works without credentials.
    pub fn require_token(&self) -> Result<&str> {
        if self.hubspot.access_token.is_empty()
            || self.hubspot.access_token.starts_with("${")
        {
            return Err(SyncError::MissingConfig {
                field: "hubspot.access_token".to_string(),
            });
        }
        Ok(&self.hubspot.access_token)
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validate_url("hubspot.base_url", &self.hubspot.base_url)?;
        validate_range("hubspot.batch_size", self.hubspot.batch_size, 1, 100)?;
        validate_range(
            "hubspot.batch_delay_ms",
            self.hubspot.batch_delay_ms,
            0,
            60_000,
        )?;

        if let Some(supabase) = &self.supabase {
            validate_url("supabase.base_url", &supabase.base_url)?;
            validate_non_empty_string("supabase.table", &supabase.table)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_config() {
        let toml_content = r#"
[hubspot]
base_url = "https://api.hubapi.com"
access_token = "pat-na1-secret"
batch_size = 50
batch_delay_ms = 250

[supabase]
base_url = "https://project.supabase.co"
api_key = "anon-key"
"#;

        let config = SyncConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.hubspot.batch_size, 50);
        assert_eq!(config.hubspot.batch_delay_ms, 250);
        assert_eq!(config.require_token().unwrap(), "pat-na1-secret");
        let supabase = config.supabase.unwrap();
        assert_eq!(supabase.table, "applications");
    }

    #[test]
    fn test_defaults_apply_when_sections_are_omitted() {
        let config = SyncConfig::from_toml_str("").unwrap();
        assert_eq!(config.hubspot.base_url, "https://api.hubapi.com");
        assert_eq!(config.hubspot.batch_size, 100);
        assert_eq!(config.hubspot.batch_delay_ms, 100);
        assert!(config.supabase.is_none());
        assert!(config.require_token().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FACES_SYNC_TEST_TOKEN", "pat-from-env");

        let toml_content = r#"
[hubspot]
access_token = "${FACES_SYNC_TEST_TOKEN}"
"#;

        let config = SyncConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.hubspot.access_token, "pat-from-env");

        std::env::remove_var("FACES_SYNC_TEST_TOKEN");
    }

    #[test]
    fn test_unset_env_var_keeps_placeholder_and_fails_token_check() {
        let toml_content = r#"
[hubspot]
access_token = "${FACES_SYNC_TEST_UNSET_TOKEN}"
"#;

        let config = SyncConfig::from_toml_str(toml_content).unwrap();
        assert!(config.require_token().is_err());
    }

    #[test]
    fn test_config_validation() {
        let bad_url = SyncConfig::from_toml_str(
            r#"
[hubspot]
base_url = "not-a-url"
"#,
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let bad_batch = SyncConfig::from_toml_str(
            r#"
[hubspot]
batch_size = 500
"#,
        )
        .unwrap();
        assert!(bad_batch.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let toml_content = r#"
[hubspot]
access_token = "pat-file"
"#;
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = SyncConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.hubspot.access_token, "pat-file");
    }
}
