//! The Serenity crate we're using for the Discord API is designed around callbacks to handle
//! events.  However, this does not mesh well with our plugin framework here.  To resolve this,
//! this module translates the callbacks a distinct Event enum.

use crate::{
    context::Context,
    control::{Control, ControlAction},
    log_error,
};
use serenity::all::{
    CommandInteraction, ComponentInteraction, Interaction, ModalInteraction, Ready,
};

/// A Discord event
pub enum Event {
    Ready(Ready),
    Interaction(Interaction),
}

impl Event {
    // When an event occurs, iterate over all the plugins to see if any can/should handle it.
    pub async fn handle(self, ctx: Context<'_>) {
        for plugin in crate::plugin::plugins() {
            match plugin.handle(&ctx, &self).await {
                Ok(EventHandled::Yes) => return,
                Ok(EventHandled::No) => continue,
                Err(err) => log_error!("Error in plugin {}: {}", plugin.name(), err),
            }
        }
    }

    /// The slash command `name`, if that is what this event is.
    pub fn is_command(&self, name: &str) -> Option<&CommandInteraction> {
        match self {
            Event::Interaction(Interaction::Command(command)) if command.data.name == name => {
                Some(command)
            }
            _ => None,
        }
    }

    /// A click on one of our buttons carrying `action`.
    pub fn is_control(&self, action: ControlAction) -> Option<(&ComponentInteraction, Control)> {
        match self {
            Event::Interaction(Interaction::Component(component)) => {
                Control::parse(&component.data.custom_id)
                    .filter(|control| control.action == action)
                    .map(|control| (component, control))
            }
            _ => None,
        }
    }

    /// A submission of one of our modals carrying `action`.
    pub fn is_modal(&self, action: ControlAction) -> Option<(&ModalInteraction, Control)> {
        match self {
            Event::Interaction(Interaction::Modal(modal)) => Control::parse(&modal.data.custom_id)
                .filter(|control| control.action == action)
                .map(|control| (modal, control)),
            _ => None,
        }
    }
}

pub enum EventHandled {
    Yes,
    No,
}
