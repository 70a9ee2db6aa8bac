//! teloxide types -> core message model.

use teloxide::types::{
    CallbackQuery, Chat as TgChat, Message, MessageEntityKind, MessageKind, User as TgUser,
};

use banofbot_core::{
    domain::{Chat, ChatId, ChatKind, MessageId, User, UserId},
    messaging::types::{CallbackEvent, EntityKind, IncomingMessage, MessageEntity},
};

pub fn chat(c: &TgChat) -> Chat {
    let kind = if c.is_private() {
        ChatKind::Private
    } else if c.is_channel() {
        ChatKind::Channel
    } else if c.is_supergroup() {
        ChatKind::Supergroup
    } else {
        ChatKind::Group
    };
    Chat {
        id: ChatId(c.id.0),
        kind,
    }
}

pub fn user(u: &TgUser) -> User {
    User {
        id: UserId(u.id.0 as i64),
        username: u.username.clone(),
    }
}

fn entity_kind(kind: &MessageEntityKind) -> EntityKind {
    match kind {
        MessageEntityKind::BotCommand => EntityKind::BotCommand,
        other => EntityKind::Other(format!("{other:?}")),
    }
}

pub fn incoming_message(msg: &Message) -> IncomingMessage {
    let entities = msg
        .entities()
        .unwrap_or_default()
        .iter()
        .map(|e| MessageEntity {
            kind: entity_kind(&e.kind),
        })
        .collect();

    IncomingMessage {
        chat: chat(&msg.chat),
        from: msg.from().map(user),
        text: msg.text().map(str::to_string),
        entities,
        reply_to_message: msg
            .reply_to_message()
            .map(|r| Box::new(incoming_message(r))),
        // Bot API `new_chat_participant` is the first of `new_chat_members`.
        new_chat_participant: msg
            .new_chat_members()
            .and_then(|members| members.first())
            .map(user),
        group_chat_created: matches!(msg.kind, MessageKind::GroupChatCreated(_)),
    }
}

pub fn callback_event(q: &CallbackQuery) -> CallbackEvent {
    CallbackEvent {
        id: q.id.clone(),
        from: user(&q.from),
        chat: q.message.as_ref().map(|m| chat(&m.chat)),
        message_id: q.message.as_ref().map(|m| MessageId(m.id.0)),
        data: q.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> Message {
        serde_json::from_value(v).unwrap()
    }

    fn group() -> serde_json::Value {
        json!({ "id": -100, "type": "group", "title": "mods" })
    }

    fn alice() -> serde_json::Value {
        json!({ "id": 1, "is_bot": false, "first_name": "Alice", "username": "alice" })
    }

    #[test]
    fn command_message_keeps_entity_order() {
        let msg = parse(json!({
            "message_id": 10,
            "date": 0,
            "chat": group(),
            "from": alice(),
            "text": "/help@banofbot",
            "entities": [{ "type": "bot_command", "offset": 0, "length": 14 }]
        }));
        let m = incoming_message(&msg);
        assert_eq!(m.chat, Chat::new(-100, ChatKind::Group));
        assert_eq!(m.from, Some(User::new(1, Some("alice"))));
        assert!(m.starts_with_bot_command());
        assert_eq!(m.text(), Some("/help@banofbot"));
    }

    #[test]
    fn new_members_map_to_first_participant() {
        let msg = parse(json!({
            "message_id": 11,
            "date": 0,
            "chat": group(),
            "from": alice(),
            "new_chat_members": [
                { "id": 9, "is_bot": true, "first_name": "Ban", "username": "banofbot" }
            ]
        }));
        let m = incoming_message(&msg);
        assert_eq!(m.new_chat_participant, Some(User::new(9, Some("banofbot"))));
        assert!(!m.group_chat_created);
    }

    #[test]
    fn group_creation_is_flagged() {
        let msg = parse(json!({
            "message_id": 12,
            "date": 0,
            "chat": group(),
            "from": alice(),
            "group_chat_created": true
        }));
        assert!(incoming_message(&msg).group_chat_created);
    }

    #[test]
    fn private_chat_kind() {
        let msg = parse(json!({
            "message_id": 13,
            "date": 0,
            "chat": { "id": 1, "type": "private", "first_name": "Alice" },
            "from": alice(),
            "text": "hi"
        }));
        assert!(incoming_message(&msg).chat.is_one_to_one());
    }
}
