use anyhow::Context;
use clap::Args;
use omikuji_core::config::Config;
use std::path::PathBuf;

/// Config file location plus per-field overrides. Flags win over env vars,
/// which win over the file.
#[derive(Args, Debug, Default, Clone)]
pub struct Settings {
    /// Path to the YAML config file (missing file means defaults)
    #[arg(long, global = true, env = "OMIKUJI_CONFIG", default_value = "omikuji.yaml")]
    pub config: PathBuf,

    /// Base URL of a self-hosted agent runtime
    #[arg(long, global = true, env = "AGENTCORE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// ARN of the hosted agent runtime
    #[arg(long, global = true, env = "AGENTCORE_RUNTIME_ARN")]
    pub runtime_arn: Option<String>,

    /// Region of the hosted agent runtime
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Bearer token sent with every invocation
    #[arg(long, global = true, env = "AGENTCORE_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,
}

impl Settings {
    pub fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        let runtime = &mut config.runtime;
        if let Some(endpoint) = &self.endpoint {
            runtime.endpoint = Some(endpoint.clone());
        }
        if let Some(arn) = &self.runtime_arn {
            runtime.arn = Some(arn.clone());
        }
        if let Some(region) = &self.region {
            runtime.region = region.clone();
        }
        if let Some(token) = &self.bearer_token {
            runtime.bearer_token = Some(token.clone());
        }
    }
}
