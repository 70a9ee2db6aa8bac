use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use serde::Serialize;

use crate::{messaging::types::IncomingMessage, ports::AnalyticsSink, Result};

/// Command keywords tracked individually. Matching is by substring, so one
/// message can produce several labels.
pub const TRACKED_COMMANDS: [&str; 4] = ["help", "language", "lock", "limit"];

/// Label used for everything that does not start with a bot command.
pub const MESSAGE_LABEL: &str = "message";

/// Labels to report for `msg`, in tracking order.
pub fn analytics_labels(msg: &IncomingMessage) -> Vec<&'static str> {
    if !msg.starts_with_bot_command() {
        return vec![MESSAGE_LABEL];
    }
    let text = msg.text().unwrap_or_default();
    TRACKED_COMMANDS
        .into_iter()
        .filter(|kw| text.contains(kw))
        .collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct AnalyticsEvent {
    pub timestamp: String,
    pub label: String,
    pub chat_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl AnalyticsEvent {
    pub fn new(msg: &IncomingMessage, label: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            label: label.to_string(),
            chat_id: msg.chat.id.0,
            user_id: msg.from.as_ref().map(|u| u.id.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, _msg: &IncomingMessage, _label: &str) {}
}

/// Appends one JSON line per tracked event.
#[derive(Clone, Debug)]
pub struct JsonlAnalytics {
    path: PathBuf,
}

impl JsonlAnalytics {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

}

fn append_line(path: &Path, event: &AnalyticsEvent) -> Result<()> {
    let line = serde_json::to_string(event)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

fn write_event(path: &Path, event: &AnalyticsEvent) {
    if let Err(e) = append_line(path, event) {
        tracing::debug!(path = %path.display(), "analytics write failed: {e}");
    }
}

impl AnalyticsSink for JsonlAnalytics {
    /// Inside a runtime the write goes to the blocking pool; outside one it
    /// happens inline.
    fn track(&self, msg: &IncomingMessage, label: &str) {
        let event = AnalyticsEvent::new(msg, label);
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                let path = self.path.clone();
                rt.spawn_blocking(move || write_event(&path, &event));
            }
            Err(_) => write_event(&self.path, &event),
        }
    }
}

/// POSTs each event as JSON to a collector endpoint on a detached task.
#[derive(Clone, Debug)]
pub struct HttpAnalytics {
    client: reqwest::Client,
    url: Arc<str>,
}

impl HttpAnalytics {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: Arc::from(url.into()),
        }
    }
}

impl AnalyticsSink for HttpAnalytics {
    fn track(&self, msg: &IncomingMessage, label: &str) {
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let event = AnalyticsEvent::new(msg, label);
        let client = self.client.clone();
        let url = self.url.clone();
        rt.spawn(async move {
            let res = client
                .post(&*url)
                .json(&event)
                .send()
                .await
                .and_then(|r| r.error_for_status());
            if let Err(e) = res {
                tracing::debug!(label = %event.label, "analytics post failed: {e}");
            }
        });
    }
}

/// Fan-out to several sinks.
pub struct MultiAnalytics {
    sinks: Vec<Arc<dyn AnalyticsSink>>,
}

impl MultiAnalytics {
    pub fn new(sinks: Vec<Arc<dyn AnalyticsSink>>) -> Self {
        Self { sinks }
    }
}

impl AnalyticsSink for MultiAnalytics {
    fn track(&self, msg: &IncomingMessage, label: &str) {
        for sink in &self.sinks {
            sink.track(msg, label);
        }
    }
}

/// Build the sink described by the configuration.
pub fn from_config(cfg: &crate::config::Config) -> Arc<dyn AnalyticsSink> {
    let mut sinks: Vec<Arc<dyn AnalyticsSink>> = Vec::new();
    if let Some(path) = &cfg.analytics_log_path {
        sinks.push(Arc::new(JsonlAnalytics::new(path.clone())));
    }
    if let Some(url) = &cfg.analytics_url {
        sinks.push(Arc::new(HttpAnalytics::new(url.clone())));
    }
    match sinks.len() {
        0 => Arc::new(NoopAnalytics),
        1 => sinks.remove(0),
        _ => Arc::new(MultiAnalytics::new(sinks)),
    }
}
