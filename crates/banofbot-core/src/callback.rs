use std::sync::Arc;

use crate::{errors::Error, messaging::types::CallbackEvent, ports::ActionHandlers};

/// Action tag at the front of inline button data (`"<tag>~<payload...>"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackTag {
    Language,
    Vote,
    Limit,
}

impl CallbackTag {
    pub fn parse(data: &str) -> Option<Self> {
        match data.split('~').next()? {
            "li" => Some(Self::Language),
            "vi" => Some(Self::Vote),
            "lti" => Some(Self::Limit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Language => "li",
            Self::Vote => "vi",
            Self::Limit => "lti",
        }
    }
}

#[derive(Debug)]
pub enum CallbackOutcome {
    Routed(CallbackTag),
    Unrecognized,
    Failed(Error),
}

/// Routes button presses to their handler. Entitlement checks are the
/// handlers' job; nothing is filtered here.
pub struct CallbackRouter {
    actions: Arc<dyn ActionHandlers>,
}

impl CallbackRouter {
    pub fn new(actions: Arc<dyn ActionHandlers>) -> Self {
        Self { actions }
    }

    pub async fn route(&self, ev: &CallbackEvent) -> CallbackOutcome {
        let Some(tag) = ev.data.as_deref().and_then(CallbackTag::parse) else {
            tracing::debug!(data = ?ev.data, "unrecognized callback");
            return CallbackOutcome::Unrecognized;
        };

        let res = match tag {
            CallbackTag::Language => self.actions.set_language(ev).await,
            CallbackTag::Vote => self.actions.vote_query(ev).await,
            CallbackTag::Limit => self.actions.set_limit(ev).await,
        };

        match res {
            Ok(()) => CallbackOutcome::Routed(tag),
            Err(e) => {
                tracing::warn!(tag = tag.as_str(), "callback handler failed: {e}");
                CallbackOutcome::Failed(e)
            }
        }
    }
}
