//! Terminal stand-in for a chat platform

use crate::chat::{ChannelId, ChatSurface, Component, MessageId, Outbound, UserId};
use crate::error::{BotError, ChatError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prints every outgoing message to stdout
pub struct ConsoleSurface {
    next_id: AtomicU64,
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl ChatSurface for ConsoleSurface {
    async fn send(&self, channel: ChannelId, message: Outbound) -> Result<MessageId, ChatError> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let reply = message
            .reply_to
            .map(|to| format!(" reply to {}", to))
            .unwrap_or_default();
        println!("[#{} message {}{}]\n{}", channel.0, id, reply, render(&message));
        Ok(id)
    }

    async fn edit(
        &self,
        channel: ChannelId,
        message_id: MessageId,
        message: Outbound,
    ) -> Result<(), ChatError> {
        println!("[#{} message {} edited]\n{}", channel.0, message_id, render(&message));
        Ok(())
    }

    async fn send_ephemeral(
        &self,
        channel: ChannelId,
        user: UserId,
        message: Outbound,
    ) -> Result<(), ChatError> {
        println!("[#{} only {} can see this]\n{}", channel.0, user, render(&message));
        Ok(())
    }
}

/// Plain-text rendering of a message body, embed and controls
pub fn render(message: &Outbound) -> String {
    let mut lines = Vec::new();

    if let Some(content) = &message.content {
        lines.push(content.clone());
    }

    if let Some(embed) = &message.embed {
        match (&embed.title, &embed.url) {
            (Some(title), Some(url)) => lines.push(format!("== {} <{}> ==", title, url)),
            (Some(title), None) => lines.push(format!("== {} ==", title)),
            (None, Some(url)) => lines.push(format!("<{}>", url)),
            (None, None) => {}
        }
        if let Some(description) = &embed.description {
            lines.push(description.clone());
        }
        if let Some(image) = &embed.image {
            lines.push(format!("image: {}", image));
        }
        if let Some(thumbnail) = &embed.thumbnail {
            lines.push(format!("thumbnail: {}", thumbnail));
        }
    }

    if let Some(controls) = &message.controls {
        for row in &controls.rows {
            lines.push(row.iter().map(render_component).collect::<Vec<_>>().join(" "));
        }
    }

    lines.join("\n")
}

fn render_component(component: &Component) -> String {
    let marker = if component.is_disabled() { "x" } else { "" };
    match component {
        Component::Button(button) => format!("[{}{} {}]", marker, button.label, button.id),
        Component::Select(menu) => {
            let options = menu
                .options
                .iter()
                .map(|option| format!("\n    {} = {}", option.value, option.label))
                .collect::<String>();
            format!("<{}{} {}>{}", marker, menu.placeholder, menu.id, options)
        }
    }
}

/// One line typed at the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Message {
        author: UserId,
        text: String,
    },
    Interaction {
        user: UserId,
        message: MessageId,
        component_id: String,
        values: Vec<String>,
    },
}

/// Parses `as <id>: <text>` and `:press <message> <component> [value...]`,
/// anything else being a message from `default_user`
pub fn parse_line(line: &str, default_user: UserId) -> Result<Option<ConsoleInput>, BotError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (user, body) = match line.strip_prefix("as ") {
        Some(rest) => {
            let (id, body) = rest
                .split_once(':')
                .ok_or_else(|| BotError::InvalidArgument("expected `as <id>: <text>`".to_string()))?;
            let id = id
                .trim()
                .parse()
                .map_err(|_| BotError::InvalidArgument(format!("invalid user id {}", id.trim())))?;
            (UserId(id), body.trim())
        }
        None => (default_user, line),
    };

    let Some(press) = body.strip_prefix(":press") else {
        return Ok(Some(ConsoleInput::Message {
            author: user,
            text: body.to_string(),
        }));
    };

    let mut parts = press.split_whitespace();
    let message = parts
        .next()
        .ok_or(BotError::MissingArgument("message"))?;
    let message = message
        .parse()
        .map_err(|_| BotError::InvalidArgument(format!("invalid message id {}", message)))?;
    let component_id = parts
        .next()
        .ok_or(BotError::MissingArgument("component"))?
        .to_string();

    Ok(Some(ConsoleInput::Interaction {
        user,
        message: MessageId(message),
        component_id,
        values: parts.map(str::to_string).collect(),
    }))
}
