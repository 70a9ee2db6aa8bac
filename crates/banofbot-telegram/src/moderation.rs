use std::sync::Arc;

use async_trait::async_trait;

use banofbot_core::{
    messaging::{
        port::MessagingPort,
        types::{CallbackEvent, IncomingMessage},
    },
    ports::ModerationRequests,
    Result,
};

/// Moderation backend that records requests and acknowledges votes.
///
/// Vote counting and ban execution plug in behind `ModerationRequests`; this
/// implementation keeps the bot responsive when none is configured.
pub struct LoggedRequests {
    messenger: Arc<dyn MessagingPort>,
}

impl LoggedRequests {
    pub fn new(messenger: Arc<dyn MessagingPort>) -> Self {
        Self { messenger }
    }
}

#[async_trait]
impl ModerationRequests for LoggedRequests {
    async fn start_request(&self, msg: &IncomingMessage) -> Result<()> {
        let target = msg
            .reply_to_message
            .as_ref()
            .and_then(|r| r.from.as_ref())
            .map(|u| u.id.0);
        tracing::info!(
            chat_id = msg.chat.id.0,
            requester = ?msg.from.as_ref().map(|u| u.id.0),
            ?target,
            "moderation request"
        );
        Ok(())
    }

    async fn vote_query(&self, ev: &CallbackEvent) -> Result<()> {
        tracing::info!(voter = ev.from.id.0, data = ?ev.data, "moderation vote");
        self.messenger.answer_callback_query(&ev.id, None).await
    }
}
