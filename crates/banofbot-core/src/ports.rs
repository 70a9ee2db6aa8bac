//! Hexagonal ports for everything the dispatch core does not own.
//!
//! Telegram, chat persistence, analytics transmission and the vote/ban workflow
//! are implemented in adapter crates (or in `store` / `analytics` for the
//! built-in implementations).

use async_trait::async_trait;

use crate::{
    domain::{Chat, ChatId, ChatRecord, UserId},
    messaging::types::{CallbackEvent, IncomingMessage},
    Result,
};

/// Per-chat settings persistence.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Return the record for `chat`, creating it with defaults on first reference.
    async fn find_chat(&self, chat: &Chat) -> Result<ChatRecord>;

    async fn save_chat(&self, record: &ChatRecord) -> Result<()>;
}

/// Answers whether a user administers a chat.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool>;
}

/// Moderation actions invoked by the dispatcher and the callback router.
#[async_trait]
pub trait ActionHandlers: Send + Sync {
    async fn send_language(&self, chat: &ChatRecord, prompt_for_choice: bool) -> Result<()>;
    async fn send_help(&self, chat: &ChatRecord) -> Result<()>;
    async fn send_limit(&self, chat: &ChatRecord) -> Result<()>;
    async fn toggle_lock(&self, chat: &ChatRecord) -> Result<()>;

    async fn set_language(&self, ev: &CallbackEvent) -> Result<()>;
    async fn set_limit(&self, ev: &CallbackEvent) -> Result<()>;

    async fn start_moderation_request(&self, msg: &IncomingMessage) -> Result<()>;
    async fn vote_query(&self, ev: &CallbackEvent) -> Result<()>;
}

/// The vote-tally / ban-execution workflow.
#[async_trait]
pub trait ModerationRequests: Send + Sync {
    async fn start_request(&self, msg: &IncomingMessage) -> Result<()>;
    async fn vote_query(&self, ev: &CallbackEvent) -> Result<()>;
}

/// Best-effort usage tracking. Implementations must not block or fail the caller.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, msg: &IncomingMessage, label: &str);
}
