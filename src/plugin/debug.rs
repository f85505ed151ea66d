use crate::{event::*, log_event, logging::*, plugin::*};
use anyhow::Result;
use serenity::all::Interaction;

/// Prints debug information about event to stdout
pub struct Debug;

#[serenity::async_trait]
impl Plugin for Debug {
    fn name(&self) -> &'static str {
        "debug"
    }

    async fn handle(&self, _ctx: &Context, event: &Event) -> Result<EventHandled> {
        match event {
            Event::Ready(ready) => {
                log_event!(
                    "Connected to {} server(s) as {}",
                    ready.guilds.len(),
                    ready.user.color(),
                );
            }
            Event::Interaction(Interaction::Command(command)) => {
                log_event!(
                    "{}{} /{}",
                    command.user.color(),
                    Glue {}.color(),
                    command.data.name,
                );
            }
            Event::Interaction(Interaction::Component(component)) => {
                log_event!(
                    "{}{} clicked \"{}\"",
                    component.user.color(),
                    Glue {}.color(),
                    component.data.custom_id,
                );
            }
            Event::Interaction(Interaction::Modal(modal)) => {
                log_event!(
                    "{}{} submitted \"{}\"",
                    modal.user.color(),
                    Glue {}.color(),
                    modal.data.custom_id,
                );
            }
            Event::Interaction(_) => log_event!("Unhandled interaction kind"),
        }

        Ok(EventHandled::No)
    }
}
