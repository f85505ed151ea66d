//! The license → mode → message cycle, independent of Discord.  Plugins translate interactions
//! into these calls and render the outcome.

use crate::{
    error::FlowError,
    inference::{generate_detached, InferenceGateway},
    license::{LicenseCode, LicenseStore},
    mode::{Mode, ModeStore},
    volatile_state::VolatileState,
};
use anyhow::Result;
use serenity::all::UserId;
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;

/// Longest text Discord will render in a message or embed description.
pub const DISPLAY_LIMIT: usize = 2000;

pub fn issue_license(
    licenses: &mut dyn LicenseStore,
    owner: UserId,
    caller: UserId,
    target: UserId,
) -> Result<LicenseCode, FlowError> {
    if caller != owner {
        return Err(FlowError::NotOwner);
    }
    Ok(licenses.issue(target))
}

/// Take back a code that could not be delivered to its user.
pub fn revoke_undelivered(licenses: &mut dyn LicenseStore, code: &LicenseCode) -> FlowError {
    licenses.revoke(code);
    FlowError::Undelivered
}

pub fn redeem_license(
    licenses: &mut dyn LicenseStore,
    code: &str,
    caller: UserId,
) -> Result<(), FlowError> {
    licenses.redeem(code.trim(), caller)
}

pub fn select_mode(
    licenses: &dyn LicenseStore,
    modes: &mut dyn ModeStore,
    user: UserId,
    raw: &str,
) -> Result<Mode, FlowError> {
    if !licenses.is_licensed(user) {
        return Err(FlowError::Unlicensed);
    }
    modes.set_mode(user, raw)
}

/// A message may only be composed once a mode has been picked.
pub fn selected_mode(modes: &dyn ModeStore, user: UserId) -> Result<Mode, FlowError> {
    modes.selected(user).ok_or(FlowError::ModeNotSelected)
}

/// Cut `text` down to what Discord can display.  Counts characters, not bytes.
pub fn truncate_for_display(text: &str) -> &str {
    match text.char_indices().nth(DISPLAY_LIMIT) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Wrap `text` in the user's mode template, run it through the model, and return what should be
/// shown.  Fails with [`FlowError::ModeNotSelected`] before touching the model if the user hasn't
/// picked a mode.
pub async fn converse(
    vstate: &RwLock<VolatileState>,
    inference: Arc<dyn InferenceGateway>,
    user: UserId,
    text: &str,
    limit: Duration,
) -> Result<String> {
    // Don't hold the lock while the model runs
    let mode = selected_mode(vstate.read().await.modes.as_ref(), user)?;
    let prompt = mode.wrap(text);

    let generated = generate_detached(inference, prompt, limit).await?;
    Ok(truncate_for_display(&generated).to_owned())
}
