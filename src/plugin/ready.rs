use crate::{error::StartupSync, event::*, log_error, log_internal, plugin::*};
use anyhow::Result;
use serenity::all::Command;

/// Registers the slash commands once the connection to Discord is ready.
pub struct Ready;

#[serenity::async_trait]
impl Plugin for Ready {
    fn name(&self) -> &'static str {
        "ready"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Ready(_) = event else {
            return Ok(EventHandled::No);
        };

        let commands: Vec<_> = crate::plugin::plugins()
            .iter()
            .flat_map(|plugin| plugin.commands())
            .collect();

        // Not fatal: the bot stays up, but the commands may be missing until the next start.
        match Command::set_global_commands(ctx.http, commands).await {
            Ok(synced) => log_internal!("Synced {} slash command(s)", synced.len()),
            Err(e) => log_error!("{}", StartupSync(e)),
        }

        Ok(EventHandled::Yes)
    }
}
