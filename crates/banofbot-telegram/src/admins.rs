use async_trait::async_trait;
use teloxide::prelude::*;

use banofbot_core::{
    domain::{ChatId, UserId},
    errors::Error,
    ports::PermissionOracle,
    Result,
};

/// Admin check via `getChatAdministrators`.
#[derive(Clone)]
pub struct TelegramPermissionOracle {
    bot: Bot,
}

impl TelegramPermissionOracle {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl PermissionOracle for TelegramPermissionOracle {
    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool> {
        let admins = self
            .bot
            .get_chat_administrators(teloxide::types::ChatId(chat_id.0))
            .await
            .map_err(|e| Error::Permission(format!("getChatAdministrators: {e}")))?;

        Ok(admins.iter().any(|m| m.user.id.0 as i64 == user_id.0))
    }
}
