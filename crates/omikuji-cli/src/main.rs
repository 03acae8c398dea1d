mod cmd;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "omikuji",
    about = "Draw fortunes and chat about them through an agent runtime",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on; 0 picks a free port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Draw one fortune
    Draw {
        /// Prompt sent to the agent
        #[arg(long)]
        prompt: Option<String>,
        /// Session to draw in (default: a new one)
        #[arg(long)]
        session: Option<String>,
    },

    /// Chat about a fortune; interactive unless --message is given
    Chat {
        /// Session to continue (default: a new one)
        #[arg(long)]
        session: Option<String>,
        /// Send this one message and exit
        #[arg(long, short = 'm')]
        message: Option<String>,
    },

    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cli.settings.load().and_then(|config| match cli.command {
        Commands::Serve { bind, port } => cmd::serve::run(config, bind, port),
        Commands::Draw { prompt, session } => cmd::draw::run(config, prompt, session, cli.json),
        Commands::Chat { session, message } => cmd::chat::run(config, session, message, cli.json),
        Commands::Config { subcommand } => cmd::config::run(config, subcommand, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
