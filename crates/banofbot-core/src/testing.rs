//! Fakes shared by the unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    domain::{Chat, ChatId, ChatRecord, UserId},
    errors::Error,
    messaging::types::{CallbackEvent, IncomingMessage},
    ports::{ActionHandlers, AnalyticsSink, ChatStore, PermissionOracle},
    Result,
};

#[derive(Default)]
pub struct FakeChatStore {
    records: Mutex<HashMap<ChatId, ChatRecord>>,
    fail: bool,
    finds: AtomicUsize,
}

impl FakeChatStore {
    pub fn with_record(record: ChatRecord) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().insert(record.id, record);
        store
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatStore for FakeChatStore {
    async fn find_chat(&self, chat: &Chat) -> Result<ChatRecord> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Store("database unreachable".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        Ok(records
            .entry(chat.id)
            .or_insert_with(|| ChatRecord::new(chat.id, "en", 5))
            .clone())
    }

    async fn save_chat(&self, record: &ChatRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeOracle {
    admins: HashSet<(i64, i64)>,
    fail: bool,
    queries: AtomicUsize,
}

impl FakeOracle {
    pub fn with_admin(chat_id: i64, user_id: i64) -> Self {
        let mut admins = HashSet::new();
        admins.insert((chat_id, user_id));
        Self {
            admins,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionOracle for FakeOracle {
    async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Permission("bot api unreachable".to_string()));
        }
        Ok(self.admins.contains(&(chat_id.0, user_id.0)))
    }
}

/// Records handler invocations as `"name"` / `"name:arg"` strings.
#[derive(Default)]
pub struct RecordingActions {
    calls: Mutex<Vec<String>>,
}

impl RecordingActions {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ActionHandlers for RecordingActions {
    async fn send_language(&self, _chat: &ChatRecord, prompt_for_choice: bool) -> Result<()> {
        self.push(format!("send_language:{prompt_for_choice}"));
        Ok(())
    }

    async fn send_help(&self, _chat: &ChatRecord) -> Result<()> {
        self.push("send_help".to_string());
        Ok(())
    }

    async fn send_limit(&self, _chat: &ChatRecord) -> Result<()> {
        self.push("send_limit".to_string());
        Ok(())
    }

    async fn toggle_lock(&self, _chat: &ChatRecord) -> Result<()> {
        self.push("toggle_lock".to_string());
        Ok(())
    }

    async fn set_language(&self, _ev: &CallbackEvent) -> Result<()> {
        self.push("set_language".to_string());
        Ok(())
    }

    async fn set_limit(&self, _ev: &CallbackEvent) -> Result<()> {
        self.push("set_limit".to_string());
        Ok(())
    }

    async fn start_moderation_request(&self, _msg: &IncomingMessage) -> Result<()> {
        self.push("start_moderation_request".to_string());
        Ok(())
    }

    async fn vote_query(&self, _ev: &CallbackEvent) -> Result<()> {
        self.push("vote_query".to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAnalytics {
    labels: Mutex<Vec<String>>,
}

impl RecordingAnalytics {
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, _msg: &IncomingMessage, label: &str) {
        self.labels.lock().unwrap().push(label.to_string());
    }
}
