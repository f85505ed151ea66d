//! Miscellaneous convenience methods

use crate::{
    control::{Control, ControlAction},
    error::FlowError,
    log_internal,
    logging::PrintColor,
    mode::Mode,
};
use serenity::all::{
    ActionRowComponent, ButtonStyle, Colour, CreateActionRow, CreateButton, CreateEmbed,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateModal, InputTextStyle, ModalInteraction, User, UserId,
};

const EMBED_COLOUR: Colour = Colour(0xFF0000);

/// Input field ids within our modals
const MODE_FIELD: &str = "mode";
const MESSAGE_FIELD: &str = "message";

pub fn embed(title: &str, description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(EMBED_COLOUR)
}

/// Private reply describing why a request was refused
pub fn notice_response(err: &FlowError) -> CreateInteractionResponse {
    if err.is_authorization() {
        log_internal!("Refused: {}", err);
    }

    let notice = err.notice();
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed(notice.title, notice.description))
            .ephemeral(true),
    )
}

pub fn ephemeral_text(content: &str) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

/// Check that `caller` is who the control was shown to.
pub fn authorize_control(control: &Control, caller: &User) -> Result<(), FlowError> {
    let authorized = control.authorize(caller.id);
    if authorized.is_err() {
        log_internal!(
            "{} used a control shown to {}",
            caller.color(),
            control.shown_to.color()
        );
    }
    authorized
}

fn button(action: ControlAction, user: UserId, label: &str) -> CreateActionRow {
    let custom_id = Control::new(action, user).custom_id();
    CreateActionRow::Buttons(vec![CreateButton::new(custom_id)
        .label(label)
        .style(ButtonStyle::Danger)])
}

pub fn choose_mode_button(user: UserId) -> CreateActionRow {
    button(ControlAction::ChooseMode, user, "Choisir mode")
}

pub fn compose_button(user: UserId) -> CreateActionRow {
    button(ControlAction::Compose, user, "Envoyer un message")
}

/// Private reply to a successful `/redeem`.  Carries the mode button itself so the user can go on
/// even if DMs from the bot are blocked.
pub fn redeemed_response(user: UserId) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed(
                "Choisissez le mode",
                "Vérification réussie. Choisissez entre 'Censuré' ou 'Sympa'. Les deux sont non \
                 censurés mais avec des expressions différentes.",
            ))
            .components(vec![choose_mode_button(user)])
            .ephemeral(true),
    )
}

pub fn mode_selected_response(user: UserId, mode: Mode) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed(
                "Mode sélectionné",
                format!(
                    "Mode '{}' activé. Cliquez sur le bouton ci-dessous pour envoyer un message \
                     à l'IA.",
                    mode
                ),
            ))
            .components(vec![compose_button(user)])
            .ephemeral(true),
    )
}

/// Sent after each answer so the user can keep going
pub fn reoffer_mode_followup(user: UserId) -> CreateInteractionResponseFollowup {
    CreateInteractionResponseFollowup::new()
        .embed(embed(
            "Choisissez à nouveau le mode",
            "Pour changer ou confirmer, sélectionnez un mode.",
        ))
        .components(vec![choose_mode_button(user)])
}

pub fn mode_modal(user: UserId) -> CreateInteractionResponse {
    let custom_id = Control::new(ControlAction::SubmitMode, user).custom_id();
    let input = CreateInputText::new(InputTextStyle::Short, "Mode (Censuré ou Sympa)", MODE_FIELD)
        .placeholder("Entrez 'Censuré' ou 'Sympa'")
        .required(true);

    CreateInteractionResponse::Modal(
        CreateModal::new(custom_id, "Choisir le mode IA")
            .components(vec![CreateActionRow::InputText(input)]),
    )
}

pub fn message_modal(user: UserId) -> CreateInteractionResponse {
    let custom_id = Control::new(ControlAction::SubmitMessage, user).custom_id();
    let input = CreateInputText::new(InputTextStyle::Paragraph, "Votre message", MESSAGE_FIELD)
        .required(true);

    CreateInteractionResponse::Modal(
        CreateModal::new(custom_id, "Envoyer un message à l'IA")
            .components(vec![CreateActionRow::InputText(input)]),
    )
}

pub trait ModalHelper {
    fn input_value(&self, field: &str) -> Option<&str>;

    fn mode_input(&self) -> &str {
        self.input_value(MODE_FIELD).unwrap_or_default()
    }

    fn message_input(&self) -> &str {
        self.input_value(MESSAGE_FIELD).unwrap_or_default()
    }
}

impl ModalHelper for ModalInteraction {
    fn input_value(&self, field: &str) -> Option<&str> {
        self.data
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .find_map(|component| match component {
                ActionRowComponent::InputText(input) if input.custom_id == field => {
                    input.value.as_deref()
                }
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const U: UserId = UserId::new(100);
    const V: UserId = UserId::new(200);

    /// Every control record found in a serialized builder.  Input fields inside modals have plain
    /// ids and are skipped.
    fn controls(builder: &impl serde::Serialize) -> Vec<Control> {
        fn walk(value: &Value, out: &mut Vec<Control>) {
            match value {
                Value::Object(map) => {
                    if let Some(control) = map
                        .get("custom_id")
                        .and_then(Value::as_str)
                        .and_then(Control::parse)
                    {
                        out.push(control);
                    }
                    map.values().for_each(|v| walk(v, out));
                }
                Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
                _ => {}
            }
        }

        let mut out = Vec::new();
        walk(&serde_json::to_value(builder).unwrap(), &mut out);
        out
    }

    fn assert_single_control(found: Vec<Control>, action: ControlAction) {
        assert_eq!(found, vec![Control::new(action, U)]);
        assert_eq!(found[0].authorize(U), Ok(()));
        assert_eq!(found[0].authorize(V), Err(FlowError::ForeignControl));
    }

    #[test]
    fn buttons_are_bound_to_their_user() {
        assert_single_control(controls(&choose_mode_button(U)), ControlAction::ChooseMode);
        assert_single_control(controls(&compose_button(U)), ControlAction::Compose);
    }

    #[test]
    fn modals_are_bound_to_their_user() {
        assert_single_control(controls(&mode_modal(U)), ControlAction::SubmitMode);
        assert_single_control(controls(&message_modal(U)), ControlAction::SubmitMessage);
    }

    #[test]
    fn redeem_reply_offers_mode_choice() {
        assert_single_control(controls(&redeemed_response(U)), ControlAction::ChooseMode);
    }

    #[test]
    fn mode_confirmation_offers_compose() {
        assert_single_control(
            controls(&mode_selected_response(U, Mode::Friendly)),
            ControlAction::Compose,
        );
    }

    #[test]
    fn answer_is_followed_by_mode_choice() {
        assert_single_control(controls(&reoffer_mode_followup(U)), ControlAction::ChooseMode);
    }
}
