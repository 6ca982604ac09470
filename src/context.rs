use crate::chat::{ChannelId, ChatSurface, MessageId, Outbound, UserId};
use crate::config::BotConfig;
use crate::error::{BotError, ChatError};
use crate::paste::{MystbinClient, PasteService};
use crate::ui::{InteractiveView, SessionRegistry, launch};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Shared collaborators, built once at startup and cloned into every handler
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<BotConfig>,
    pub http: Client,
    pub surface: Arc<dyn ChatSurface>,
    pub paste: Arc<dyn PasteService>,
    pub sessions: SessionRegistry,
}

impl AppContext {
    /// Builds the HTTP client and paste service from `config`
    pub fn new(config: BotConfig, surface: Arc<dyn ChatSurface>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        let paste = Arc::new(MystbinClient::new(http.clone(), config.paste_url.clone()));
        Ok(Self::with_parts(config, http, surface, paste))
    }

    pub fn with_parts(
        config: BotConfig,
        http: Client,
        surface: Arc<dyn ChatSurface>,
        paste: Arc<dyn PasteService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            http,
            surface,
            paste,
            sessions: SessionRegistry::new(),
        }
    }

    /// Sends `message`, moving over-long text content to the paste service
    pub async fn send(&self, channel: ChannelId, message: Outbound) -> Result<MessageId, BotError> {
        let limit = self.config.content_limit;
        let oversized = message
            .content
            .as_ref()
            .is_some_and(|content| content.chars().count() > limit);
        let message = if oversized {
            self.reroute(message).await?
        } else {
            message
        };

        match self.surface.send(channel, message.clone()).await {
            Ok(id) => Ok(id),
            Err(ChatError::ContentTooLong { .. }) if !oversized => {
                let message = self.reroute(message).await?;
                Ok(self.surface.send(channel, message).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn reroute(&self, mut message: Outbound) -> Result<Outbound, BotError> {
        let Some(content) = message.content.take() else {
            return Ok(message);
        };
        let length = content.chars().count();
        let limit = self.config.content_limit;
        ::log::info!(
            "Content of length {} exceeds {}, uploading to paste service",
            length,
            limit
        );

        let (body, syntax) = code_block(&content).unwrap_or((content.as_str(), None));
        let url = self
            .paste
            .upload(body, syntax)
            .await
            .map_err(|source| BotError::RenderOverflow {
                length,
                limit,
                source,
            })?;
        message.content = Some(url);
        Ok(message)
    }
}

/// Body and language tag of content that is one fenced code block
fn code_block(content: &str) -> Option<(&str, Option<&str>)> {
    let inner = content.trim().strip_prefix("```")?.strip_suffix("```")?;
    let (tag, body) = inner.split_once('\n')?;
    let tag = tag.trim();
    Some((body.trim_end_matches('\n'), (!tag.is_empty()).then_some(tag)))
}

/// Context of one command invocation
#[derive(Clone)]
pub struct CommandContext {
    pub app: AppContext,
    pub channel: ChannelId,
    pub author: UserId,
    /// The message that invoked the command
    pub message: MessageId,
}

impl CommandContext {
    pub async fn send(&self, message: Outbound) -> Result<MessageId, BotError> {
        self.app.send(self.channel, message).await
    }

    pub async fn send_text(&self, content: impl Into<String>) -> Result<MessageId, BotError> {
        self.send(Outbound::text(content)).await
    }

    /// Sends `message` as a reply to the invoking message
    pub async fn reply(&self, message: Outbound) -> Result<MessageId, BotError> {
        self.send(message.replying_to(self.message)).await
    }

    /// Opens an interactive view as a reply to the invoking message
    pub async fn launch<V>(&self, view: V, timeout: Option<Duration>) -> Result<MessageId, BotError>
    where
        V: InteractiveView + 'static,
    {
        launch(&self.app, self.channel, Some(self.message), view, timeout).await
    }
}
