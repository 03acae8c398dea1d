use std::sync::Arc;

use agent_runtime::{AgentInvoker, AgentRuntimeError, HttpInvoker, RuntimeTarget};
use omikuji_core::config::{Config, RuntimeConfig};

/// Shared application state passed to all route handlers.
///
/// Read-only after startup; requests never write to it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    invoker: Option<Arc<dyn AgentInvoker>>,
}

impl AppState {
    /// Build the state from config, wiring an HTTP invoker when the runtime
    /// is configured. Unconfigured state is valid: every request falls back.
    pub fn new(config: Config) -> Result<Self, AgentRuntimeError> {
        let invoker = match runtime_target(&config.runtime) {
            Some(target) => {
                let http = HttpInvoker::new(
                    &target,
                    config.runtime.timeout(),
                    config.runtime.bearer_token().map(str::to_string),
                )?;
                tracing::info!(url = %http.url(), "agent runtime configured");
                Some(Arc::new(http) as Arc<dyn AgentInvoker>)
            }
            None => {
                tracing::warn!("agent runtime not configured; serving fallback replies only");
                None
            }
        };
        Ok(Self {
            config: Arc::new(config),
            invoker,
        })
    }

    /// Use a caller-supplied invoker regardless of what the config says.
    pub fn with_invoker(config: Config, invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            config: Arc::new(config),
            invoker: Some(invoker),
        }
    }

    pub fn invoker(&self) -> Option<&Arc<dyn AgentInvoker>> {
        self.invoker.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.invoker.is_some()
    }
}

/// Endpoint wins over ARN when both are set.
pub fn runtime_target(runtime: &RuntimeConfig) -> Option<RuntimeTarget> {
    if let Some(endpoint) = runtime.endpoint() {
        return Some(RuntimeTarget::Endpoint(endpoint.to_string()));
    }
    runtime.arn().map(|arn| RuntimeTarget::Hosted {
        arn: arn.to_string(),
        region: runtime.region.clone(),
        qualifier: runtime.qualifier.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_runtime::StubInvoker;

    #[test]
    fn default_config_is_unconfigured() {
        let state = AppState::new(Config::default()).unwrap();
        assert!(!state.is_configured());
        assert!(state.invoker().is_none());
    }

    #[test]
    fn endpoint_config_builds_http_invoker() {
        let mut config = Config::default();
        config.runtime.endpoint = Some("http://localhost:8080".into());
        let state = AppState::new(config).unwrap();
        assert!(state.is_configured());
    }

    #[test]
    fn invalid_endpoint_is_a_startup_error() {
        let mut config = Config::default();
        config.runtime.endpoint = Some("not a url".into());
        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn with_invoker_is_configured() {
        let state = AppState::with_invoker(Config::default(), Arc::new(StubInvoker::text("hi")));
        assert!(state.is_configured());
    }

    #[test]
    fn endpoint_takes_precedence_over_arn() {
        let mut runtime = RuntimeConfig::default();
        runtime.arn = Some("arn:aws:bedrock-agentcore:ap-northeast-1:1:runtime/a".into());
        assert!(matches!(
            runtime_target(&runtime),
            Some(RuntimeTarget::Hosted { .. })
        ));

        runtime.endpoint = Some("http://localhost:8080".into());
        assert_eq!(
            runtime_target(&runtime),
            Some(RuntimeTarget::Endpoint("http://localhost:8080".into()))
        );

        assert_eq!(runtime_target(&RuntimeConfig::default()), None);
    }
}
