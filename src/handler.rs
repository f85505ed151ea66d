use crate::{
    config::Config, context::Context, event::Event, inference::InferenceGateway,
    volatile_state::VolatileState,
};
use serenity::all::{Interaction, Ready};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Discord event handler
pub struct Handler {
    cfg: Config,
    vstate: RwLock<VolatileState>,
    inference: Arc<dyn InferenceGateway>,
}

impl<'a> Handler {
    pub fn new(cfg: Config, vstate: VolatileState, inference: Arc<dyn InferenceGateway>) -> Self {
        Self {
            cfg,
            vstate: RwLock::new(vstate),
            inference,
        }
    }

    fn ctx(&'a self, discord_ctx: &'a serenity::all::Context) -> Context<'a> {
        Context {
            cfg: &self.cfg,
            vstate: &self.vstate,
            inference: &self.inference,
            http: &discord_ctx.http,
            cache_http: discord_ctx,
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        Event::Ready(ready).handle(self.ctx(&discord_ctx)).await;
    }

    async fn interaction_create(&self, discord_ctx: serenity::all::Context, interaction: Interaction) {
        Event::Interaction(interaction)
            .handle(self.ctx(&discord_ctx))
            .await;
    }
}
