//! Failures a user can run into while walking through the license/mode/message flow.

/// Designed error paths of the interaction flow.  Each one is shown to the requester as a short,
/// private notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("owner-only command invoked by another user")]
    NotOwner,
    #[error("control triggered by a user it was not shown to")]
    ForeignControl,
    #[error("user has not redeemed a license")]
    Unlicensed,
    #[error("unknown license code or code bound to another user")]
    InvalidLicense,
    #[error("mode is not one of the recognized labels")]
    InvalidMode,
    #[error("no mode selected yet")]
    ModeNotSelected,
    #[error("could not deliver the license code by DM")]
    Undelivered,
}

/// Registering the slash commands failed at startup.  Logged only; the bot keeps running.
#[derive(Debug, thiserror::Error)]
#[error("could not register slash commands: {0}")]
pub struct StartupSync(pub serenity::Error);

/// Title and body of the notice shown to the user.
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

impl FlowError {
    /// Whether this is one of the access-control refusals.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            FlowError::NotOwner | FlowError::ForeignControl | FlowError::Unlicensed
        )
    }

    pub fn notice(&self) -> Notice {
        // Keep these generic.  In particular, never tell a user whether a code exists.
        let (title, description) = match self {
            FlowError::NotOwner => ("Accès refusé", "Seul l'owner peut utiliser cette commande."),
            FlowError::ForeignControl => ("Accès refusé", "Ce bouton n'est pas pour vous."),
            FlowError::Unlicensed => (
                "Accès refusé",
                "Aucune licence active. Utilisez /redeem d'abord.",
            ),
            FlowError::InvalidLicense => ("Ai Activation", "Code invalide ou non destiné à vous."),
            FlowError::InvalidMode => (
                "Mode invalide",
                "Mode invalide. Utilisez 'Censuré' ou 'Sympa'.",
            ),
            FlowError::ModeNotSelected => (
                "Mode non sélectionné",
                "Mode non sélectionné. Utilisez /redeem d'abord.",
            ),
            FlowError::Undelivered => (
                "Licence annulée",
                "Impossible d'envoyer le code en DM à l'utilisateur. La licence a été annulée.",
            ),
        };

        Notice { title, description }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_family() {
        assert!(FlowError::NotOwner.is_authorization());
        assert!(FlowError::ForeignControl.is_authorization());
        assert!(FlowError::Unlicensed.is_authorization());
        assert!(!FlowError::InvalidLicense.is_authorization());
        assert!(!FlowError::InvalidMode.is_authorization());
        assert!(!FlowError::ModeNotSelected.is_authorization());
        assert!(!FlowError::Undelivered.is_authorization());
    }

    #[test]
    fn invalid_license_notice_does_not_distinguish_causes() {
        let notice = FlowError::InvalidLicense.notice();
        assert_eq!(notice.description, "Code invalide ou non destiné à vous.");
    }
}
