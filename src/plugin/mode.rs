use crate::{
    control::ControlAction, error::FlowError, event::*, flow, helper::*, log_internal,
    logging::*, plugin::*,
};
use anyhow::Result;

/// "Choisir mode" button: opens the mode form
pub struct ChooseMode;

/// Mode form submission
pub struct SubmitMode;

#[serenity::async_trait]
impl Plugin for ChooseMode {
    fn name(&self) -> &'static str {
        "choose_mode"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((component, control)) = event.is_control(ControlAction::ChooseMode) else {
            return Ok(EventHandled::No);
        };

        let response = match authorize_control(&control, &component.user) {
            Ok(()) => mode_modal(component.user.id),
            Err(err) => notice_response(&err),
        };

        component.create_response(ctx.cache_http, response).await?;
        Ok(EventHandled::Yes)
    }
}

#[serenity::async_trait]
impl Plugin for SubmitMode {
    fn name(&self) -> &'static str {
        "submit_mode"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((modal, control)) = event.is_modal(ControlAction::SubmitMode) else {
            return Ok(EventHandled::No);
        };

        let user = &modal.user;
        let selected = match authorize_control(&control, user) {
            Ok(()) => {
                let mut vstate = ctx.vstate.write().await;
                let vstate = &mut *vstate;
                flow::select_mode(
                    vstate.licenses.as_ref(),
                    vstate.modes.as_mut(),
                    user.id,
                    modal.mode_input(),
                )
            }
            Err(err) => Err(err),
        };

        let response = match selected {
            Ok(mode) => {
                log_internal!("{} switched to mode {}", user.color(), mode);
                mode_selected_response(user.id, mode)
            }
            Err(err) => {
                if err == FlowError::InvalidMode {
                    log_internal!(
                        "{} entered an unknown mode, keeping {}",
                        user.color(),
                        ctx.vstate.read().await.modes.get_mode(user.id)
                    );
                }
                notice_response(&err)
            }
        };

        modal.create_response(ctx.cache_http, response).await?;
        Ok(EventHandled::Yes)
    }
}
