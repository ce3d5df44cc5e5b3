use anyhow::Context;
use clap::{Parser, Subcommand};

use stacks_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "stacks", about = "Library catalog service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port
        #[arg(long)]
        port: Option<u16>,
        /// Skip demo-data seeding regardless of configuration
        #[arg(long)]
        no_seed: bool,
    },
    /// Print the effective configuration and exit
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load STACKS settings")?;

    match cli.command {
        Command::Serve {
            host,
            port,
            no_seed,
        } => {
            stacks_telemetry::init(&settings.telemetry)?;

            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if no_seed {
                settings.catalog.seed = false;
            }

            tracing::info!(env = ?settings.environment, "stacks serve starting");
            stacks_app::run(settings).await
        }
        Command::Config => {
            println!("{settings:#?}");
            Ok(())
        }
    }
}
