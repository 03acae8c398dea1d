use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RuntimeConfig
// ---------------------------------------------------------------------------

/// Where and how to reach the agent runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Base URL of a self-hosted runtime. Takes precedence over `arn`.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// ARN of the managed runtime.
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_qualifier")]
    pub qualifier: String,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default = "default_actor_id")]
    pub actor_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_region() -> String {
    "ap-northeast-1".to_string()
}

fn default_qualifier() -> String {
    "DEFAULT".to_string()
}

fn default_actor_id() -> String {
    "web_user".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            arn: None,
            region: default_region(),
            qualifier: default_qualifier(),
            bearer_token: None,
            actor_id: default_actor_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RuntimeConfig {
    /// Configured endpoint, ignoring blank values.
    pub fn endpoint(&self) -> Option<&str> {
        non_blank(self.endpoint.as_deref())
    }

    /// Configured ARN, ignoring blank values.
    pub fn arn(&self) -> Option<&str> {
        non_blank(self.arn.as_deref())
    }

    pub fn bearer_token(&self) -> Option<&str> {
        non_blank(self.bearer_token.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// 0 lets the OS pick a port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    /// `true` when there is somewhere to send invocations.
    pub fn is_configured(&self) -> bool {
        self.runtime.endpoint().is_some() || self.runtime.arn().is_some()
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.runtime.bearer_token().is_some() {
            copy.runtime.bearer_token = Some("***".to_string());
        }
        copy
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let runtime = &self.runtime;

        if !self.is_configured() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no runtime endpoint or ARN configured; every request will get a fallback reply"
                    .to_string(),
            });
        }

        if runtime.endpoint().is_some() && runtime.arn().is_some() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "both runtime.endpoint and runtime.arn are set; runtime.endpoint is used"
                    .to_string(),
            });
        }

        if runtime.arn().is_some() && runtime.region.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "runtime.region is required when runtime.arn is set".to_string(),
            });
        }

        if runtime.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "runtime.timeout_secs must be greater than zero".to_string(),
            });
        }

        if runtime.actor_id.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "runtime.actor_id must not be empty".to_string(),
            });
        }

        if self.server.bind.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "server.bind must not be empty".to_string(),
            });
        }

        warnings
    }
}
