//! Test doubles for the chat surface and paste service

use crate::chat::{ChannelId, ChatSurface, MessageId, Outbound, UserId};
use crate::config::BotConfig;
use crate::context::AppContext;
use crate::error::{ChatError, PasteError};
use crate::paste::PasteService;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum Recorded {
    Send {
        channel: ChannelId,
        id: MessageId,
        message: Outbound,
    },
    Edit {
        channel: ChannelId,
        id: MessageId,
        message: Outbound,
    },
    Ephemeral {
        channel: ChannelId,
        user: UserId,
        message: Outbound,
    },
}

/// Chat surface that keeps everything it was asked to do
pub struct RecordingSurface {
    records: Mutex<Vec<Recorded>>,
    forgotten: Mutex<HashSet<MessageId>>,
    next_id: AtomicU64,
    limit: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            forgotten: Mutex::new(HashSet::new()),
            next_id: AtomicU64::new(1),
            limit: None,
        }
    }

    /// Rejects content longer than `limit` like a real platform would
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Makes later edits of `message` fail as if it was deleted
    pub fn forget(&self, message: MessageId) {
        self.forgotten.lock().unwrap().insert(message);
    }

    pub fn records(&self) -> Vec<Recorded> {
        self.records.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Recorded::Send { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn edits_of(&self, target: MessageId) -> Vec<Outbound> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Recorded::Edit { id, message, .. } if id == target => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn ephemerals(&self) -> Vec<(UserId, Outbound)> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Recorded::Ephemeral { user, message, .. } => Some((user, message)),
                _ => None,
            })
            .collect()
    }

    fn check_length(&self, message: &Outbound) -> Result<(), ChatError> {
        let length = message.content.as_ref().map_or(0, |c| c.chars().count());
        match self.limit {
            Some(limit) if length > limit => Err(ChatError::ContentTooLong { length, limit }),
            _ => Ok(()),
        }
    }

    fn push(&self, record: Recorded) {
        self.records.lock().unwrap().push(record);
    }
}

#[async_trait]
impl ChatSurface for RecordingSurface {
    async fn send(&self, channel: ChannelId, message: Outbound) -> Result<MessageId, ChatError> {
        self.check_length(&message)?;
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.push(Recorded::Send {
            channel,
            id,
            message,
        });
        Ok(id)
    }

    async fn edit(
        &self,
        channel: ChannelId,
        message_id: MessageId,
        message: Outbound,
    ) -> Result<(), ChatError> {
        if self.forgotten.lock().unwrap().contains(&message_id) {
            return Err(ChatError::UnknownMessage(message_id.0));
        }
        self.check_length(&message)?;
        self.push(Recorded::Edit {
            channel,
            id: message_id,
            message,
        });
        Ok(())
    }

    async fn send_ephemeral(
        &self,
        channel: ChannelId,
        user: UserId,
        message: Outbound,
    ) -> Result<(), ChatError> {
        self.check_length(&message)?;
        self.push(Recorded::Ephemeral {
            channel,
            user,
            message,
        });
        Ok(())
    }
}

/// Paste service answering with a fixed URL, or failing
pub struct RecordingPaste {
    url: Option<String>,
    uploads: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingPaste {
    pub fn returning(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().iter().map(|(content, _)| content.clone()).collect()
    }

    pub fn syntaxes(&self) -> Vec<Option<String>> {
        self.uploads.lock().unwrap().iter().map(|(_, syntax)| syntax.clone()).collect()
    }
}

#[async_trait]
impl PasteService for RecordingPaste {
    async fn upload(&self, content: &str, syntax: Option<&str>) -> Result<String, PasteError> {
        self.uploads
            .lock()
            .unwrap()
            .push((content.to_string(), syntax.map(str::to_string)));
        self.url.clone().ok_or(PasteError::Status(500))
    }
}

pub fn test_app(surface: Arc<RecordingSurface>, paste: Arc<RecordingPaste>) -> AppContext {
    test_app_with(BotConfig::default(), surface, paste)
}

pub fn test_app_with(
    config: BotConfig,
    surface: Arc<RecordingSurface>,
    paste: Arc<RecordingPaste>,
) -> AppContext {
    AppContext::with_parts(config, reqwest::Client::new(), surface, paste)
}

/// Yields to spawned tasks until `done` holds or a bounded number of rounds pass
pub async fn settle(done: impl Fn() -> bool) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
}

/// Polls `done` on a short real-time interval, for waits that involve socket I/O
pub async fn eventually(done: impl Fn() -> bool) {
    for _ in 0..250 {
        if done() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
}
