use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{Chat, ChatId, ChatRecord},
    errors::Error,
    ports::ChatStore,
    Result,
};

/// Chat settings kept in memory and, when a path is given, mirrored to a JSON
/// file that is rewritten on every save.
pub struct JsonChatStore {
    path: Option<PathBuf>,
    default_language: String,
    default_vote_limit: u32,
    chats: Mutex<HashMap<ChatId, ChatRecord>>,
}

impl JsonChatStore {
    pub fn in_memory(default_language: &str, default_vote_limit: u32) -> Self {
        Self {
            path: None,
            default_language: default_language.to_string(),
            default_vote_limit,
            chats: Mutex::new(HashMap::new()),
        }
    }

    /// Open (or start) the store file at `path`.
    pub fn open(
        path: impl Into<PathBuf>,
        default_language: &str,
        default_vote_limit: u32,
    ) -> Result<Self> {
        let path = path.into();
        let chats = load_store_file(&path)?
            .into_iter()
            .map(|r| (r.id, r))
            .collect::<HashMap<_, _>>();
        tracing::info!(path = %path.display(), chats = chats.len(), "chat store loaded");

        Ok(Self {
            path: Some(path),
            default_language: default_language.to_string(),
            default_vote_limit,
            chats: Mutex::new(chats),
        })
    }

    pub fn from_config(cfg: &crate::config::Config) -> Result<Self> {
        match &cfg.chat_store_file {
            Some(path) => Self::open(path, &cfg.default_language, cfg.default_vote_limit),
            None => Ok(Self::in_memory(&cfg.default_language, cfg.default_vote_limit)),
        }
    }

    async fn persist(&self, chats: &HashMap<ChatId, ChatRecord>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut records = chats.values().cloned().collect::<Vec<_>>();
        records.sort_by_key(|r| r.id.0);
        let txt = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(path, txt)
            .await
            .map_err(|e| Error::Store(format!("write {}: {e}", path.display())))
    }
}

#[async_trait]
impl ChatStore for JsonChatStore {
    async fn find_chat(&self, chat: &Chat) -> Result<ChatRecord> {
        let mut chats = self.chats.lock().await;
        if let Some(record) = chats.get(&chat.id) {
            return Ok(record.clone());
        }

        let record = ChatRecord::new(
            chat.id,
            self.default_language.clone(),
            self.default_vote_limit,
        );
        chats.insert(chat.id, record.clone());
        self.persist(&chats).await?;
        tracing::debug!(chat_id = chat.id.0, "created chat record");
        Ok(record)
    }

    async fn save_chat(&self, record: &ChatRecord) -> Result<()> {
        let mut chats = self.chats.lock().await;
        chats.insert(record.id, record.clone());
        self.persist(&chats).await
    }
}

fn load_store_file(path: &Path) -> Result<Vec<ChatRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let txt = std::fs::read_to_string(path)?;
    if txt.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&txt)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatKind;
    use std::time::Duration;

    fn tmp(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.json"))
    }

    #[tokio::test]
    async fn creates_records_with_defaults() {
        let store = JsonChatStore::in_memory("ru", 7);
        let rec = store.find_chat(&Chat::new(-5, ChatKind::Group)).await.unwrap();
        assert_eq!(rec, ChatRecord::new(ChatId(-5), "ru", 7));
        assert!(!rec.admin_locked);
    }

    #[tokio::test]
    async fn saved_records_survive_reopen() {
        let path = tmp("banofbot-store-test");
        {
            let store = JsonChatStore::open(&path, "en", 5).unwrap();
            let mut rec = store
                .find_chat(&Chat::new(-9, ChatKind::Supergroup))
                .await
                .unwrap();
            rec.admin_locked = true;
            rec.vote_limit = 10;
            store.save_chat(&rec).await.unwrap();
        }

        let store = JsonChatStore::open(&path, "en", 5).unwrap();
        let rec = store
            .find_chat(&Chat::new(-9, ChatKind::Supergroup))
            .await
            .unwrap();
        assert!(rec.admin_locked);
        assert_eq!(rec.vote_limit, 10);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_lock_flag_defaults_to_unlocked() {
        let recs: Vec<ChatRecord> =
            serde_json::from_str(r#"[{"id":1,"language":"en","vote_limit":3}]"#).unwrap();
        assert!(!recs[0].admin_locked);
    }
}
