use crate::{
    control::ControlAction, error::FlowError, event::*, flow, helper::*, log_internal,
    logging::*, plugin::*,
};
use anyhow::Result;
use serenity::all::{
    CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse,
};

/// "Envoyer un message" button: opens the message form
pub struct Compose;

/// Message form submission: runs the model and posts its answer
pub struct SubmitMessage;

#[serenity::async_trait]
impl Plugin for Compose {
    fn name(&self) -> &'static str {
        "compose"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((component, control)) = event.is_control(ControlAction::Compose) else {
            return Ok(EventHandled::No);
        };

        let user_id = component.user.id;
        let allowed = match authorize_control(&control, &component.user) {
            Ok(()) => flow::selected_mode(ctx.vstate.read().await.modes.as_ref(), user_id),
            Err(err) => Err(err),
        };

        let response = match allowed {
            Ok(_) => message_modal(user_id),
            Err(err) => notice_response(&err),
        };

        component.create_response(ctx.cache_http, response).await?;
        Ok(EventHandled::Yes)
    }
}

#[serenity::async_trait]
impl Plugin for SubmitMessage {
    fn name(&self) -> &'static str {
        "submit_message"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((modal, control)) = event.is_modal(ControlAction::SubmitMessage) else {
            return Ok(EventHandled::No);
        };

        let user = &modal.user;
        let allowed = match authorize_control(&control, user) {
            Ok(()) => flow::selected_mode(ctx.vstate.read().await.modes.as_ref(), user.id),
            Err(err) => Err(err),
        };
        if let Err(err) = allowed {
            modal
                .create_response(ctx.cache_http, notice_response(&err))
                .await?;
            return Ok(EventHandled::Yes);
        }

        // Generation easily outlasts Discord's three second acknowledgement window.
        modal
            .create_response(
                ctx.cache_http,
                CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
            )
            .await?;

        log_internal!("Generating a reply for {}", user.color());
        let reply = flow::converse(
            ctx.vstate,
            ctx.inference.clone(),
            user.id,
            modal.message_input(),
            ctx.cfg.inference.timeout(),
        )
        .await;

        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => {
                let description = match err.downcast_ref::<FlowError>() {
                    Some(flow_err) => flow_err.notice().description,
                    None => "La génération a échoué.",
                };
                modal
                    .edit_response(
                        ctx.cache_http,
                        EditInteractionResponse::new().embed(embed("Réponse de l'IA", description)),
                    )
                    .await?;
                return Err(err);
            }
        };

        log_internal!(
            "Delivering a {} character reply to {}",
            reply.chars().count(),
            user.color()
        );

        let description = if reply.trim().is_empty() {
            "(réponse vide)".to_owned()
        } else {
            reply
        };
        modal
            .edit_response(
                ctx.cache_http,
                EditInteractionResponse::new().embed(embed("Réponse de l'IA", description)),
            )
            .await?;

        modal
            .create_followup(ctx.cache_http, reoffer_mode_followup(user.id))
            .await?;

        Ok(EventHandled::Yes)
    }
}
