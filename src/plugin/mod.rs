use crate::{context::Context, event::EventHandled};
use anyhow::Result;
use serenity::all::CreateCommand;

mod converse;
mod debug;
mod license;
mod mode;
mod ready;

#[serenity::async_trait]
pub trait Plugin: Sync + Send {
    /// Plugin name.  Used for debug
    fn name(&self) -> &'static str;
    /// Slash commands this plugin answers to.  Registered with Discord on startup.
    fn commands(&self) -> Vec<CreateCommand> {
        Vec::new()
    }
    /// Potentially handle event.  Returns:
    /// - Ok(EventHandled::Yes) if the event has been handled and no other plugin should attempt to
    ///   handle it
    /// - Ok(EventHandled::No) if another plugin should attempt to handle the event
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context, event: &crate::event::Event) -> Result<EventHandled>;
}

/// Ordered list of available plugins
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        // Core bot operations
        Box::new(debug::Debug),
        Box::new(ready::Ready),
        // License → mode → message cycle
        Box::new(license::Gen),
        Box::new(license::Redeem),
        Box::new(mode::ChooseMode),
        Box::new(mode::SubmitMode),
        Box::new(converse::Compose),
        Box::new(converse::SubmitMessage),
    ]
}
