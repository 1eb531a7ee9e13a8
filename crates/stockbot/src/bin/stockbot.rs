//! Stock Market Discord Bot
//!
//! # Usage
//!
//! ```bash
//! # Set up environment variables (or put them in .env)
//! export DISCORD_BOT_TOKEN="..."
//! export CLIENT_ID="..."
//! export INDIAN_API_KEY="..."
//!
//! # Run the bot
//! cargo run --bin stockbot -p stockbot
//! ```

use clap::Parser;
use stockbot::{BotConfig, StockBot};
use stockbot_utils::{LogFormat, Vars, init_tracing};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stockbot")]
#[command(about = "Discord bot serving Indian stock market data", long_about = None)]
struct Args {
    /// Keep-alive port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Do not start the keep-alive HTTP listener, wins over --port and PORT
    #[arg(long)]
    no_keepalive: bool,

    /// Skip slash command registration on startup
    #[arg(long)]
    skip_register: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing("warn,stockbot=info", format);

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let mut builder = BotConfig::builder().register_commands(!args.skip_register);
    if args.no_keepalive {
        builder = builder.keepalive_port(None);
    } else if let Some(port) = args.port {
        builder = builder.keepalive_port(Some(port));
    }
    let config = builder.with_vars(&Vars::process())?.build()?;

    info!(
        keepalive_port = ?config.keepalive_port,
        register_commands = config.register_commands,
        "starting stockbot"
    );

    StockBot::new(config)?.run().await?;

    info!("stockbot stopped");
    Ok(())
}
