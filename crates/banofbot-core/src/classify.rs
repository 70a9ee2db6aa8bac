use crate::{config::Config, messaging::types::IncomingMessage};

/// What a single message asks the bot to do. Exactly one per message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Full message text of a bot command (`entities[0]` is `bot_command`).
    Command(String),
    /// The bot was added to a chat, or a group was created with it.
    Entry,
    /// A reply carrying a moderation trigger phrase.
    ModerationReply,
    /// Nothing to do.
    Ignored,
}

/// Maps incoming messages to intents. Pure and deterministic.
#[derive(Clone, Debug)]
pub struct Classifier {
    bot_username: String,
    triggers: Vec<String>,
}

impl Classifier {
    pub fn new(bot_username: impl Into<String>, triggers: Vec<String>) -> Self {
        Self {
            bot_username: bot_username.into(),
            triggers,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.bot_username.clone(), cfg.moderation_triggers.clone())
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    /// Rules are checked in order; the first match wins.
    pub fn classify(&self, msg: Option<&IncomingMessage>) -> Intent {
        let Some(msg) = msg else {
            return Intent::Ignored;
        };
        let text = msg.text();

        // Mentions of anyone but us are addressed to someone else.
        if let Some(t) = text {
            if t.contains('@') && !t.contains(self.bot_username.as_str()) {
                return Intent::Ignored;
            }
        }

        if let Some(t) = text {
            if msg.starts_with_bot_command() {
                return Intent::Command(t.to_string());
            }
        }

        let we_joined = msg
            .new_chat_participant
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .is_some_and(|u| u == self.bot_username);
        if we_joined || msg.group_chat_created {
            return Intent::Entry;
        }

        if msg.reply_to_message.is_some() {
            if let Some(t) = text {
                if self.triggers.iter().any(|p| t.contains(p.as_str())) {
                    return Intent::ModerationReply;
                }
            }
        }

        Intent::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chat, ChatKind, User};

    fn classifier() -> Classifier {
        Classifier::from_config(&Config::for_username("banofbot"))
    }

    fn group_msg() -> IncomingMessage {
        IncomingMessage::new(Chat::new(-100, ChatKind::Group)).with_from(User::new(1, Some("alice")))
    }

    #[test]
    fn absent_message_is_ignored() {
        assert_eq!(classifier().classify(None), Intent::Ignored);
    }

    #[test]
    fn mention_of_other_bot_is_ignored_regardless_of_fields() {
        let mut msg = group_msg()
            .with_text("/help@otherbot")
            .as_command()
            .replying_to(group_msg().with_text("spam"));
        msg.group_chat_created = true;
        msg.new_chat_participant = Some(User::new(9, Some("banofbot")));

        assert_eq!(classifier().classify(Some(&msg)), Intent::Ignored);
    }

    #[test]
    fn own_mention_passes_through() {
        let msg = group_msg().with_text("/help@banofbot").as_command();
        assert_eq!(
            classifier().classify(Some(&msg)),
            Intent::Command("/help@banofbot".to_string())
        );
    }

    #[test]
    fn command_requires_leading_bot_command_entity() {
        let msg = group_msg().with_text("/limit");
        assert_eq!(classifier().classify(Some(&msg)), Intent::Ignored);

        let msg = msg.as_command();
        assert_eq!(
            classifier().classify(Some(&msg)),
            Intent::Command("/limit".to_string())
        );
    }

    #[test]
    fn command_entity_without_text_is_not_a_command() {
        let msg = group_msg().as_command();
        assert_eq!(classifier().classify(Some(&msg)), Intent::Ignored);
    }

    #[test]
    fn bot_joining_or_group_creation_is_entry() {
        let mut joined = group_msg();
        joined.new_chat_participant = Some(User::new(9, Some("banofbot")));
        assert_eq!(classifier().classify(Some(&joined)), Intent::Entry);

        let mut someone_else = group_msg();
        someone_else.new_chat_participant = Some(User::new(10, Some("bob")));
        assert_eq!(classifier().classify(Some(&someone_else)), Intent::Ignored);

        let mut created = group_msg();
        created.group_chat_created = true;
        assert_eq!(classifier().classify(Some(&created)), Intent::Entry);
    }

    #[test]
    fn command_wins_over_entry() {
        let mut msg = group_msg().with_text("/start").as_command();
        msg.group_chat_created = true;
        assert_eq!(
            classifier().classify(Some(&msg)),
            Intent::Command("/start".to_string())
        );
    }

    #[test]
    fn reply_with_trigger_is_moderation() {
        let c = classifier();
        for text in ["voteban this user", "Voteban", "/spam", "hey banofbot", "@ban"] {
            let msg = group_msg()
                .with_text(text)
                .replying_to(group_msg().with_text("buy now"));
            assert_eq!(c.classify(Some(&msg)), Intent::ModerationReply, "{text}");
        }
    }

    #[test]
    fn triggers_are_case_sensitive_and_need_a_reply() {
        let c = classifier();
        let msg = group_msg()
            .with_text("VOTEBAN")
            .replying_to(group_msg().with_text("x"));
        assert_eq!(c.classify(Some(&msg)), Intent::Ignored);

        let msg = group_msg().with_text("voteban");
        assert_eq!(c.classify(Some(&msg)), Intent::Ignored);
    }

    #[test]
    fn private_reply_is_classified_like_any_other() {
        let msg = IncomingMessage::new(Chat::new(5, ChatKind::Private))
            .with_text("voteban this user")
            .replying_to(group_msg().with_text("x"));
        assert_eq!(classifier().classify(Some(&msg)), Intent::ModerationReply);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        let msg = group_msg().with_text("/language").as_command();
        assert_eq!(c.classify(Some(&msg)), c.classify(Some(&msg)));
    }
}
