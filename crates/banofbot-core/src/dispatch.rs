use std::sync::Arc;

use crate::{
    analytics::analytics_labels,
    classify::{Classifier, Intent},
    domain::ChatRecord,
    errors::Error,
    messaging::types::IncomingMessage,
    ports::{ActionHandlers, AnalyticsSink, ChatStore, PermissionOracle},
    startup::StartupGate,
    Result,
};

/// Command actions, keyed by the keyword that selects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Announce the chat's default language (`/start`, and on entry).
    Start,
    Help,
    /// Show the language picker.
    Language,
    Limit,
    Lock,
}

/// Keyword table in match priority order.
///
/// Matching is by substring over the whole command text, so `/helplanguage`
/// selects `Help`: the earliest entry wins.
const COMMAND_TABLE: [(&str, Action); 5] = [
    ("start", Action::Start),
    ("help", Action::Help),
    ("language", Action::Language),
    ("limit", Action::Limit),
    ("lock", Action::Lock),
];

impl Action {
    pub fn from_command(text: &str) -> Option<Self> {
        COMMAND_TABLE
            .iter()
            .find(|(kw, _)| text.contains(kw))
            .map(|&(_, action)| action)
    }

    /// Limit and lock only make sense with a member roster.
    pub fn requires_group(self) -> bool {
        matches!(self, Action::Limit | Action::Lock)
    }
}

/// Result of dispatching one message.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Startup grace still running; nothing happened.
    Suppressed,
    Ignored,
    Executed(Action),
    Moderation,
    /// A bot command with no known keyword.
    Unmatched,
    /// Group-only action requested in a one-to-one chat.
    NotApplicable(Action),
    /// Chat is admin-locked and the sender is not an admin.
    Denied,
    Failed(Error),
}

/// Everything the dispatcher talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub chats: Arc<dyn ChatStore>,
    pub admins: Arc<dyn PermissionOracle>,
    pub actions: Arc<dyn ActionHandlers>,
    pub analytics: Arc<dyn AnalyticsSink>,
}

/// Message intake: startup gate, classification, lock policy, action routing
/// and usage tracking.
pub struct Dispatcher {
    gate: StartupGate,
    classifier: Classifier,
    deps: Collaborators,
}

impl Dispatcher {
    pub fn new(gate: StartupGate, classifier: Classifier, deps: Collaborators) -> Self {
        Self {
            gate,
            classifier,
            deps,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Dispatch one message. Never surfaces an error to the sender; failures
    /// come back as `DispatchOutcome::Failed` and are logged here.
    pub async fn on_message(&self, msg: &IncomingMessage) -> DispatchOutcome {
        let chat_id = msg.chat.id.0;
        if !self.gate.is_open() {
            tracing::debug!(chat_id, "startup grace active, dropping message");
            return DispatchOutcome::Suppressed;
        }

        // Tracking must not wait on the store, the oracle or a handler.
        self.track(msg);

        match self.handle(msg).await {
            Ok(outcome) => {
                tracing::debug!(chat_id, ?outcome, "dispatched");
                outcome
            }
            Err(e) => {
                tracing::warn!(chat_id, "dispatch aborted: {e}");
                DispatchOutcome::Failed(e)
            }
        }
    }

    async fn handle(&self, msg: &IncomingMessage) -> Result<DispatchOutcome> {
        match self.classifier.classify(Some(msg)) {
            Intent::Command(text) => self.run_command(msg, &text).await,
            Intent::Entry => {
                let chat = self.deps.chats.find_chat(&msg.chat).await?;
                self.run_action(Action::Start, &chat).await?;
                Ok(DispatchOutcome::Executed(Action::Start))
            }
            Intent::ModerationReply => {
                self.deps.actions.start_moderation_request(msg).await?;
                Ok(DispatchOutcome::Moderation)
            }
            Intent::Ignored => Ok(DispatchOutcome::Ignored),
        }
    }

    async fn run_command(&self, msg: &IncomingMessage, text: &str) -> Result<DispatchOutcome> {
        let chat = self.deps.chats.find_chat(&msg.chat).await?;
        if !self.is_allowed(msg, &chat).await? {
            return Ok(DispatchOutcome::Denied);
        }

        let Some(action) = Action::from_command(text) else {
            return Ok(DispatchOutcome::Unmatched);
        };
        if action.requires_group() && msg.chat.is_one_to_one() {
            return Ok(DispatchOutcome::NotApplicable(action));
        }

        self.run_action(action, &chat).await?;
        Ok(DispatchOutcome::Executed(action))
    }

    /// One-to-one chats and unlocked chats accept commands from anyone; locked
    /// groups only from admins. The oracle is only asked when it matters.
    async fn is_allowed(&self, msg: &IncomingMessage, chat: &ChatRecord) -> Result<bool> {
        if msg.chat.is_one_to_one() || !chat.admin_locked {
            return Ok(true);
        }
        let Some(sender) = &msg.from else {
            return Ok(false);
        };
        self.deps.admins.is_admin(chat.id, sender.id).await
    }

    async fn run_action(&self, action: Action, chat: &ChatRecord) -> Result<()> {
        let actions = &self.deps.actions;
        match action {
            Action::Start => actions.send_language(chat, false).await,
            Action::Help => actions.send_help(chat).await,
            Action::Language => actions.send_language(chat, true).await,
            Action::Limit => actions.send_limit(chat).await,
            Action::Lock => actions.toggle_lock(chat).await,
        }
    }

    fn track(&self, msg: &IncomingMessage) {
        for label in analytics_labels(msg) {
            self.deps.analytics.track(msg, label);
        }
    }
}
