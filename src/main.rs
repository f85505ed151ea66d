mod config;
mod context;
mod control;
mod error;
mod event;
mod flow;
mod handler;
mod helper;
mod inference;
mod license;
mod logging;
mod mode;
mod plugin;
mod volatile_state;

use serenity::{all::GatewayIntents, Client};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = crate::config::Config::load().await?;
    let token = cfg.discord_token()?;
    let inference = Arc::new(crate::inference::HttpInference::new(cfg.inference.clone()));
    let vstate = crate::volatile_state::VolatileState::new();
    let handler = handler::Handler::new(cfg, vstate, inference);

    // Slash commands and components arrive as interactions regardless of intents; these cover
    // the DMs the bot sends.
    let intents = GatewayIntents::GUILDS | GatewayIntents::DIRECT_MESSAGES;

    Client::builder(&token, intents)
        .event_handler(handler)
        .await?
        .start()
        .await
        .map_err(Into::into)
}
