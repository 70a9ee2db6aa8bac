use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, startup::DEFAULT_STARTUP_GRACE, Result};

pub const DEFAULT_BOT_USERNAME: &str = "banofbot";

/// Typed configuration, read from the environment (and an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// Bot username without the leading `@`; doubles as its mention token.
    pub bot_username: String,

    // Dispatch
    pub startup_grace: Duration,
    pub moderation_triggers: Vec<String>,

    // Chat defaults / persistence
    pub chat_store_file: Option<PathBuf>,
    pub default_language: String,
    pub default_vote_limit: u32,

    // Analytics
    pub analytics_url: Option<String>,
    pub analytics_log_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let bot_username = env_str("BOT_USERNAME")
            .and_then(non_empty)
            .map(|s| s.trim().trim_start_matches('@').to_string())
            .unwrap_or_else(|| DEFAULT_BOT_USERNAME.to_string());

        let mut cfg = Self::for_username(&bot_username);
        cfg.telegram_bot_token = telegram_bot_token;

        if let Some(ms) = env_u64("STARTUP_GRACE_MS") {
            cfg.startup_grace = Duration::from_millis(ms);
        }
        if let Some(triggers) = parse_csv(env_str("MODERATION_TRIGGERS")) {
            cfg.moderation_triggers = triggers;
        }
        cfg.chat_store_file = match env_str("CHAT_STORE_FILE") {
            // An explicitly empty value keeps chats in memory only.
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(PathBuf::from(s.trim())),
            None => cfg.chat_store_file,
        };
        if let Some(lang) = env_str("DEFAULT_LANGUAGE").and_then(non_empty) {
            cfg.default_language = lang.trim().to_string();
        }
        if let Some(limit) = env_u32("DEFAULT_VOTE_LIMIT") {
            cfg.default_vote_limit = limit.max(1);
        }
        cfg.analytics_url = env_str("ANALYTICS_URL").and_then(non_empty);
        cfg.analytics_log_path = env_str("ANALYTICS_LOG_PATH")
            .and_then(non_empty)
            .map(PathBuf::from);

        Ok(cfg)
    }

    /// Defaults for every setting; no environment access.
    pub fn for_username(bot_username: &str) -> Self {
        Self {
            telegram_bot_token: String::new(),
            bot_username: bot_username.to_string(),
            startup_grace: DEFAULT_STARTUP_GRACE,
            moderation_triggers: default_moderation_triggers(bot_username),
            chat_store_file: Some(PathBuf::from("/tmp/banofbot-chats.json")),
            default_language: "en".to_string(),
            default_vote_limit: 5,
            analytics_url: None,
            analytics_log_path: None,
        }
    }
}

/// Phrases that turn a reply into a moderation request. Case-sensitive.
pub fn default_moderation_triggers(bot_username: &str) -> Vec<String> {
    vec![
        bot_username.to_string(),
        "@ban".to_string(),
        "voteban".to_string(),
        "Voteban".to_string(),
        "/spam".to_string(),
    ]
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() || env::var_os(key).is_some() {
            continue;
        }

        let mut val = v.trim().to_string();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

/// Comma-separated list; `None` when unset or empty. Entries are not
/// lowercased since trigger matching is case-sensitive.
fn parse_csv(v: Option<String>) -> Option<Vec<String>> {
    let out = v?
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_literal_trigger_set() {
        let cfg = Config::for_username("banofbot");
        assert_eq!(
            cfg.moderation_triggers,
            vec!["banofbot", "@ban", "voteban", "Voteban", "/spam"]
        );
        assert_eq!(cfg.startup_grace, Duration::from_millis(5000));
        assert_eq!(cfg.default_vote_limit, 5);
    }

    #[test]
    fn csv_keeps_case_and_drops_blanks() {
        assert_eq!(
            parse_csv(Some(" VoteBan, ,/spam ".to_string())),
            Some(vec!["VoteBan".to_string(), "/spam".to_string()])
        );
        assert_eq!(parse_csv(Some(" , ".to_string())), None);
        assert_eq!(parse_csv(None), None);
    }
}
