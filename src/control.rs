//! Buttons and modals are presented to one specific user.  Rather than capturing that user in a
//! callback, each control carries an explicit record of who it was shown to, encoded in the
//! Discord custom id, and checked before anything is dispatched.

use crate::error::FlowError;
use serenity::all::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Button opening the mode form
    ChooseMode,
    /// Mode form
    SubmitMode,
    /// Button opening the message form
    Compose,
    /// Message form
    SubmitMessage,
}

impl ControlAction {
    const ALL: [ControlAction; 4] = [
        ControlAction::ChooseMode,
        ControlAction::SubmitMode,
        ControlAction::Compose,
        ControlAction::SubmitMessage,
    ];

    fn tag(self) -> &'static str {
        match self {
            ControlAction::ChooseMode => "choose-mode",
            ControlAction::SubmitMode => "submit-mode",
            ControlAction::Compose => "compose",
            ControlAction::SubmitMessage => "submit-message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub action: ControlAction,
    pub shown_to: UserId,
}

impl Control {
    pub fn new(action: ControlAction, shown_to: UserId) -> Self {
        Self { action, shown_to }
    }

    pub fn custom_id(&self) -> String {
        format!("{}:{}", self.action.tag(), self.shown_to)
    }

    /// `None` for ids this bot did not produce.
    pub fn parse(custom_id: &str) -> Option<Self> {
        let (tag, user) = custom_id.split_once(':')?;
        let action = ControlAction::ALL
            .into_iter()
            .find(|action| action.tag() == tag)?;
        let shown_to = user.parse::<u64>().ok().filter(|id| *id != 0)?;

        Some(Self {
            action,
            shown_to: UserId::new(shown_to),
        })
    }

    pub fn authorize(&self, caller: UserId) -> Result<(), FlowError> {
        if caller == self.shown_to {
            Ok(())
        } else {
            Err(FlowError::ForeignControl)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_id_format() {
        let control = Control::new(ControlAction::Compose, UserId::new(1234));
        assert_eq!(control.custom_id(), "compose:1234");
        assert_eq!(Control::parse("compose:1234"), Some(control));
    }

    #[test]
    fn rejects_foreign_ids() {
        assert_eq!(Control::parse("compose"), None);
        assert_eq!(Control::parse("compose:abc"), None);
        assert_eq!(Control::parse("compose:0"), None);
        assert_eq!(Control::parse("vote:1234"), None);
    }

    #[test]
    fn only_shown_user_is_authorized() {
        let control = Control::new(ControlAction::ChooseMode, UserId::new(10));
        assert_eq!(control.authorize(UserId::new(10)), Ok(()));
        assert_eq!(
            control.authorize(UserId::new(11)),
            Err(FlowError::ForeignControl)
        );
    }
}
