use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CREDENTIAL_HEADER: &str = "X-Master-Key";
pub const DEFAULT_CREDENTIAL_ENV: &str = "DASHBOARD_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_credential_header() -> String {
    DEFAULT_CREDENTIAL_HEADER.into()
}

fn default_credential_env() -> String {
    DEFAULT_CREDENTIAL_ENV.into()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Full URL of the document holding `{ record: { customers, transactions } }`.
    pub endpoint: String,
    /// Header carrying the access credential.
    #[serde(default = "default_credential_header")]
    pub credential_header: String,
    /// Environment variable the credential is read from. The secret
    /// itself never lives in the config file.
    #[serde(default = "default_credential_env")]
    pub credential_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint:          String::new(),
            credential_header: default_credential_header(),
            credential_env:    default_credential_env(),
            timeout_secs:      default_timeout_secs(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON config file.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("endpoint must be set");
        }
        if self.credential_header.trim().is_empty() {
            anyhow::bail!("credential_header must not be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be positive");
        }
        Ok(())
    }

    /// Resolve the credential from the environment.
    /// `None` when the variable is unset; some stores are public.
    pub fn credential(&self) -> Option<String> {
        match std::env::var(&self.credential_env) {
            Ok(v) if !v.is_empty() => Some(v),
            _ => {
                log::debug!("{} not set; fetching without credential", self.credential_env);
                None
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn default_test() -> Self {
        Self {
            endpoint:          "http://127.0.0.1:1/b/test".into(),
            credential_header: default_credential_header(),
            credential_env:    "DASHBOARD_TEST_API_KEY".into(),
            timeout_secs:      2,
        }
    }
}
