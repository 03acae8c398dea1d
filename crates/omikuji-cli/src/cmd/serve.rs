use anyhow::Result;
use omikuji_core::config::Config;
use omikuji_server::AppState;

pub fn run(mut config: Config, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    for w in config.validate() {
        tracing::warn!("{}", w.message);
    }

    let bind = config.server.bind.clone();
    let port = config.server.port;
    let state = AppState::new(config)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(omikuji_server::serve(state, &bind, port))
}
