//! Language, help, limit and lock handlers.

use std::sync::Arc;

use async_trait::async_trait;

use banofbot_core::{
    domain::{Chat, ChatRecord, MessageRef, UserId},
    messaging::{
        port::MessagingPort,
        types::{CallbackEvent, IncomingMessage, InlineKeyboard},
    },
    ports::{ActionHandlers, ChatStore, ModerationRequests, PermissionOracle},
    Result,
};

/// `(code, label)` pairs offered by the language picker.
pub const LANGUAGES: [(&str, &str); 6] = [
    ("en", "English"),
    ("ru", "Русский"),
    ("pt", "Português"),
    ("es", "Español"),
    ("it", "Italiano"),
    ("uk", "Українська"),
];

/// Votes-needed choices offered by the limit picker.
pub const LIMIT_OPTIONS: [u32; 8] = [2, 3, 5, 7, 10, 15, 20, 30];

const HELP_HTML: &str = "<b>banofbot</b> lets a group vote to ban spammers.\n\n\
Reply to a message with <code>/voteban</code> or <code>@banofbot</code> to start a vote.\n\n\
/language - pick the chat language\n\
/limit - set how many votes a ban needs\n\
/lock - toggle admin-only commands\n\
/help - this message";

fn language_label(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, label)| label)
}

pub struct TelegramActions {
    messenger: Arc<dyn MessagingPort>,
    chats: Arc<dyn ChatStore>,
    admins: Arc<dyn PermissionOracle>,
    moderation: Arc<dyn ModerationRequests>,
}

impl TelegramActions {
    pub fn new(
        messenger: Arc<dyn MessagingPort>,
        chats: Arc<dyn ChatStore>,
        admins: Arc<dyn PermissionOracle>,
        moderation: Arc<dyn ModerationRequests>,
    ) -> Self {
        Self {
            messenger,
            chats,
            admins,
            moderation,
        }
    }

    /// Whether `user` may change settings of `chat`: anyone in one-to-one or
    /// unlocked chats, admins otherwise. With `admins_only`, groups always
    /// require an admin.
    async fn may_configure(
        &self,
        chat: &Chat,
        record: &ChatRecord,
        user: UserId,
        admins_only: bool,
    ) -> Result<bool> {
        if chat.is_one_to_one() || (!admins_only && !record.admin_locked) {
            return Ok(true);
        }
        self.admins.is_admin(record.id, user).await
    }

    /// Replace the menu message with `html` when we know it, else post it.
    async fn confirm(&self, ev: &CallbackEvent, chat: &Chat, html: &str) -> Result<()> {
        match ev.message_id {
            Some(message_id) => {
                self.messenger
                    .edit_html(
                        MessageRef {
                            chat_id: chat.id,
                            message_id,
                        },
                        html,
                    )
                    .await
            }
            None => self.messenger.send_html(chat.id, html).await.map(|_| ()),
        }
    }
}

#[async_trait]
impl ActionHandlers for TelegramActions {
    async fn send_language(&self, chat: &ChatRecord, prompt_for_choice: bool) -> Result<()> {
        if prompt_for_choice {
            let keyboard = InlineKeyboard::tagged(
                "li",
                LANGUAGES
                    .iter()
                    .map(|&(code, label)| (label, code.to_string())),
            );
            self.messenger
                .send_inline_keyboard(chat.id, "Please select the language of this chat.", keyboard)
                .await?;
            return Ok(());
        }

        let label = language_label(&chat.language).unwrap_or("English");
        let html = format!(
            "Hi! This chat speaks <b>{label}</b>. Use /language to change it or /help to see what I can do."
        );
        self.messenger.send_html(chat.id, &html).await?;
        Ok(())
    }

    async fn send_help(&self, chat: &ChatRecord) -> Result<()> {
        self.messenger.send_html(chat.id, HELP_HTML).await?;
        Ok(())
    }

    async fn send_limit(&self, chat: &ChatRecord) -> Result<()> {
        let options = LIMIT_OPTIONS
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>();
        let keyboard = InlineKeyboard::tagged(
            "lti",
            options.iter().map(|n| (n.as_str(), n.clone())),
        );
        let text = format!(
            "A ban currently needs <b>{}</b> votes. How many should it need?",
            chat.vote_limit
        );
        self.messenger
            .send_inline_keyboard(chat.id, &text, keyboard)
            .await?;
        Ok(())
    }

    async fn toggle_lock(&self, chat: &ChatRecord) -> Result<()> {
        let mut record = chat.clone();
        record.admin_locked = !record.admin_locked;
        self.chats.save_chat(&record).await?;
        tracing::info!(chat_id = record.id.0, locked = record.admin_locked, "admin lock toggled");

        let html = if record.admin_locked {
            "🔒 Commands are now limited to admins."
        } else {
            "🔓 Everyone can use commands now."
        };
        self.messenger.send_html(record.id, html).await?;
        Ok(())
    }

    async fn set_language(&self, ev: &CallbackEvent) -> Result<()> {
        let Some(chat) = ev.chat else {
            return self.messenger.answer_callback_query(&ev.id, None).await;
        };
        let payload = ev.payload();
        let Some((code, label)) = payload
            .first()
            .and_then(|code| language_label(code).map(|label| (*code, label)))
        else {
            return self.messenger.answer_callback_query(&ev.id, None).await;
        };

        let mut record = self.chats.find_chat(&chat).await?;
        if !self.may_configure(&chat, &record, ev.from.id, false).await? {
            return self
                .messenger
                .answer_callback_query(&ev.id, Some("Only admins can change the language."))
                .await;
        }

        record.language = code.to_string();
        self.chats.save_chat(&record).await?;
        self.confirm(ev, &chat, &format!("Language set to <b>{label}</b>."))
            .await?;
        self.messenger.answer_callback_query(&ev.id, None).await
    }

    async fn set_limit(&self, ev: &CallbackEvent) -> Result<()> {
        let Some(chat) = ev.chat.filter(|c| !c.is_one_to_one()) else {
            return self.messenger.answer_callback_query(&ev.id, None).await;
        };
        let Some(limit) = ev
            .payload()
            .first()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| LIMIT_OPTIONS.contains(n))
        else {
            return self.messenger.answer_callback_query(&ev.id, None).await;
        };

        let mut record = self.chats.find_chat(&chat).await?;
        if !self.may_configure(&chat, &record, ev.from.id, true).await? {
            return self
                .messenger
                .answer_callback_query(&ev.id, Some("Only admins can change the limit."))
                .await;
        }

        record.vote_limit = limit;
        self.chats.save_chat(&record).await?;
        self.confirm(ev, &chat, &format!("A ban now needs <b>{limit}</b> votes."))
            .await?;
        self.messenger.answer_callback_query(&ev.id, None).await
    }

    async fn start_moderation_request(&self, msg: &IncomingMessage) -> Result<()> {
        self.moderation.start_request(msg).await
    }

    async fn vote_query(&self, ev: &CallbackEvent) -> Result<()> {
        self.moderation.vote_query(ev).await
    }
}
