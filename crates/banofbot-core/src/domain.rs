use serde::{Deserialize, Serialize};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Channel,
    Group,
    Supergroup,
}

/// Raw chat handle as delivered by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub kind: ChatKind,
}

impl Chat {
    pub fn new(id: i64, kind: ChatKind) -> Self {
        Self {
            id: ChatId(id),
            kind,
        }
    }

    /// Private chats and channels have no member roster to moderate, so the
    /// admin lock never applies to them.
    pub fn is_one_to_one(&self) -> bool {
        matches!(self.kind, ChatKind::Private | ChatKind::Channel)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
}

impl User {
    pub fn new(id: i64, username: Option<&str>) -> Self {
        Self {
            id: UserId(id),
            username: username.map(str::to_string),
        }
    }
}

/// Persisted per-chat settings.
///
/// Created by the chat store on first reference and mutated only by the
/// language, limit and lock handlers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: ChatId,
    #[serde(default)]
    pub admin_locked: bool,
    pub language: String,
    pub vote_limit: u32,
}

impl ChatRecord {
    pub fn new(id: ChatId, language: impl Into<String>, vote_limit: u32) -> Self {
        Self {
            id,
            admin_locked: false,
            language: language.into(),
            vote_limit,
        }
    }
}
