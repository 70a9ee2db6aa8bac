//! teloxide endpoints: convert the update and hand it to the core.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use banofbot_core::{
    callback::{CallbackOutcome, CallbackRouter},
    messaging::{port::MessagingPort, types::CallbackEvent},
};

use crate::{convert, router::AppState};

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let incoming = convert::incoming_message(&msg);
    state.dispatcher.on_message(&incoming).await;
    Ok(())
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let ev = convert::callback_event(&q);
    route_callback(&state.callbacks, state.messenger.as_ref(), &ev).await;
    Ok(())
}

/// Routed handlers answer the query themselves; make sure the client's
/// spinner stops for everything else.
async fn route_callback(
    callbacks: &CallbackRouter,
    messenger: &dyn MessagingPort,
    ev: &CallbackEvent,
) -> CallbackOutcome {
    let outcome = callbacks.route(ev).await;
    if !matches!(outcome, CallbackOutcome::Routed(_)) {
        if let Err(e) = messenger.answer_callback_query(&ev.id, None).await {
            tracing::debug!(data = ?ev.data, "answerCallbackQuery failed: {e}");
        }
    }
    outcome
}
