use crate::{
    event::*, flow, helper::*, license::LicenseCode, log_error, log_internal, logging::*,
    plugin::*,
};
use anyhow::Result;
use serenity::all::{
    CommandOptionType, CreateCommand, CreateCommandOption, CreateMessage, ResolvedValue, User,
};

/// Owner-only: issue a license code to a user and DM it to them
pub struct Gen;

/// Redeem a license code, unlocking mode selection
pub struct Redeem;

#[serenity::async_trait]
impl Plugin for Gen {
    fn name(&self) -> &'static str {
        "gen"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        vec![CreateCommand::new(self.name())
            .description("Génère une licence pour un utilisateur (owner uniquement)")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    "user",
                    "Utilisateur qui recevra la licence",
                )
                .required(true),
            )]
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some(command) = event.is_command(self.name()) else {
            return Ok(EventHandled::No);
        };

        let target = command
            .data
            .options()
            .into_iter()
            .find_map(|option| match option.value {
                ResolvedValue::User(user, _) => Some(user.clone()),
                _ => None,
            });
        let Some(target) = target else {
            command
                .create_response(ctx.cache_http, ephemeral_text("Utilisateur manquant."))
                .await?;
            return Ok(EventHandled::Yes);
        };

        let issued = {
            let mut vstate = ctx.vstate.write().await;
            flow::issue_license(
                vstate.licenses.as_mut(),
                ctx.cfg.owner(),
                command.user.id,
                target.id,
            )
        };

        let code = match issued {
            Ok(code) => code,
            Err(err) => {
                log_internal!(
                    "Refused license issuance to {} requested by {}",
                    target.color(),
                    command.user.color()
                );
                command
                    .create_response(ctx.cache_http, notice_response(&err))
                    .await?;
                return Ok(EventHandled::Yes);
            }
        };

        let delivered = deliver_code(ctx, &target, &code).await;
        if let Err(e) = delivered {
            log_error!("Could not DM a license to {}: {}", target.color(), e);
            let err = {
                let mut vstate = ctx.vstate.write().await;
                flow::revoke_undelivered(vstate.licenses.as_mut(), &code)
            };
            command
                .create_response(ctx.cache_http, notice_response(&err))
                .await?;
            return Ok(EventHandled::Yes);
        }

        log_internal!("Issued a license to {}", target.color());
        command
            .create_response(
                ctx.cache_http,
                ephemeral_text("Licence générée et envoyée en DM à l'utilisateur."),
            )
            .await?;
        Ok(EventHandled::Yes)
    }
}

async fn deliver_code(ctx: &Context<'_>, target: &User, code: &LicenseCode) -> Result<()> {
    target
        .direct_message(
            ctx.cache_http,
            CreateMessage::new().embed(embed(
                "Licence générée",
                format!("Une licence a été générée pour {}.", target.name),
            )),
        )
        .await?;
    target
        .direct_message(
            ctx.cache_http,
            CreateMessage::new().content(format!("Votre code de licence exclusif : {}", code)),
        )
        .await?;
    Ok(())
}

#[serenity::async_trait]
impl Plugin for Redeem {
    fn name(&self) -> &'static str {
        "redeem"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        vec![CreateCommand::new(self.name())
            .description("Activer votre IA avec un code de licence")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "code", "Code de licence")
                    .required(true),
            )]
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some(command) = event.is_command(self.name()) else {
            return Ok(EventHandled::No);
        };

        let code = command
            .data
            .options()
            .into_iter()
            .find_map(|option| match option.value {
                ResolvedValue::String(code) => Some(code.to_owned()),
                _ => None,
            })
            .unwrap_or_default();

        let user = &command.user;
        let redeemed = {
            let mut vstate = ctx.vstate.write().await;
            flow::redeem_license(vstate.licenses.as_mut(), &code, user.id)
        };

        if let Err(err) = redeemed {
            log_internal!("{} failed to redeem a license", user.color());
            command
                .create_response(ctx.cache_http, notice_response(&err))
                .await?;
            return Ok(EventHandled::Yes);
        }

        log_internal!("{} redeemed their license", user.color());

        // Reply before DMing: the reply carries the mode button, so a blocked DM can't strand a
        // code that is already consumed.
        command
            .create_response(ctx.cache_http, redeemed_response(user.id))
            .await?;

        let dm = user
            .direct_message(
                ctx.cache_http,
                CreateMessage::new().embed(embed("IA activée", "IA activée.")),
            )
            .await;
        if let Err(e) = dm {
            log_error!("Could not DM activation notice to {}: {}", user.color(), e);
        }

        Ok(EventHandled::Yes)
    }
}
