use crate::domain::{Chat, MessageId, User};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    BotCommand,
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEntity {
    pub kind: EntityKind,
}

impl MessageEntity {
    pub fn bot_command() -> Self {
        Self {
            kind: EntityKind::BotCommand,
        }
    }
}

/// Incoming chat message, reduced to the fields dispatch looks at.
///
/// Lives for a single dispatch call; nothing in the core retains it.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub entities: Vec<MessageEntity>,
    pub reply_to_message: Option<Box<IncomingMessage>>,
    pub new_chat_participant: Option<User>,
    pub group_chat_created: bool,
}

impl IncomingMessage {
    pub fn new(chat: Chat) -> Self {
        Self {
            chat,
            from: None,
            text: None,
            entities: Vec::new(),
            reply_to_message: None,
            new_chat_participant: None,
            group_chat_created: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_from(mut self, user: User) -> Self {
        self.from = Some(user);
        self
    }

    /// Mark the message as a bot command (`entities[0]` is `bot_command`).
    pub fn as_command(mut self) -> Self {
        self.entities.insert(0, MessageEntity::bot_command());
        self
    }

    pub fn replying_to(mut self, original: IncomingMessage) -> Self {
        self.reply_to_message = Some(Box::new(original));
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True when the first entity marks this message as a bot command.
    pub fn starts_with_bot_command(&self) -> bool {
        self.entities
            .first()
            .is_some_and(|e| e.kind == EntityKind::BotCommand)
    }
}

/// Inline button press.
#[derive(Clone, Debug)]
pub struct CallbackEvent {
    pub id: String,
    pub from: User,
    pub chat: Option<Chat>,
    pub message_id: Option<MessageId>,
    /// `"<tag>~<payload...>"`
    pub data: Option<String>,
}

impl CallbackEvent {
    /// Payload segments after the tag.
    pub fn payload(&self) -> Vec<&str> {
        self.data
            .as_deref()
            .map(|d| d.split('~').skip(1).collect())
            .unwrap_or_default()
    }
}

/// Inline keyboard (buttons) used by the language and limit menus.
#[derive(Clone, Debug)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }

    /// One button per option, with callback data `"<tag>~<value>"`.
    pub fn tagged<'a>(tag: &str, options: impl IntoIterator<Item = (&'a str, String)>) -> Self {
        let buttons = options
            .into_iter()
            .map(|(label, value)| InlineButton {
                label: label.to_string(),
                callback_data: format!("{tag}~{value}"),
            })
            .collect();
        Self { buttons }
    }
}
