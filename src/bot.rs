use crate::chat::{ChannelId, InteractionEvent, MessageId, UserId};
use crate::commands::CommandRegistry;
use crate::context::{AppContext, CommandContext};

/// Entry point for platform events: messages become commands, component
/// events are routed to the live session that owns the message.
pub struct Bot {
    app: AppContext,
    commands: CommandRegistry,
}

impl Bot {
    pub fn new(app: AppContext, commands: CommandRegistry) -> Self {
        Self { app, commands }
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub async fn on_message(&self, channel: ChannelId, author: UserId, message: MessageId, text: &str) {
        if self.app.config.bot_user_id == Some(author.0) {
            return;
        }

        let ctx = CommandContext {
            app: self.app.clone(),
            channel,
            author,
            message,
        };
        self.commands.dispatch(&ctx, text).await;
    }

    /// Returns false when the event's message has no live session
    pub async fn on_interaction(&self, event: InteractionEvent) -> bool {
        self.app.sessions.route(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use crate::features::maths::X;
    use crate::testing::{RecordingPaste, RecordingSurface, settle, test_app_with};
    use std::sync::Arc;

    fn bot(surface: Arc<RecordingSurface>) -> Bot {
        let config = BotConfig {
            bot_user_id: Some(99),
            ..BotConfig::default()
        };
        let app = test_app_with(config, surface, Arc::new(RecordingPaste::failing()));
        Bot::new(app, CommandRegistry::standard())
    }

    fn press(user: u64, key: &str) -> InteractionEvent {
        InteractionEvent {
            channel: ChannelId(1),
            message: MessageId(1),
            user: UserId(user),
            component_id: format!("pad:{}", key),
            values: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_own_messages_are_ignored() {
        let surface = Arc::new(RecordingSurface::new());
        let bot = bot(surface.clone());
        bot.on_message(ChannelId(1), UserId(99), MessageId(500), "a!help").await;
        assert!(surface.records().is_empty());
    }

    #[tokio::test]
    async fn test_keypad_session_through_bot() {
        let surface = Arc::new(RecordingSurface::new());
        let bot = bot(surface.clone());
        bot.on_message(ChannelId(1), UserId(4), MessageId(500), "<@99> linears").await;
        assert_eq!(surface.sent().len(), 1);

        for key in ["9", "=", "3", X, "-", "3"] {
            bot.on_interaction(press(4, key)).await;
        }
        settle(|| surface.edits_of(MessageId(1)).len() == 6).await;

        bot.on_interaction(press(5, "7")).await;
        settle(|| surface.ephemerals().len() == 1).await;
        assert_eq!(
            surface.ephemerals()[0].1.content.as_deref(),
            Some("This interaction can only be used by <@4>")
        );

        bot.on_interaction(press(4, "Enter")).await;
        settle(|| surface.edits_of(MessageId(1)).len() == 7).await;
        let solved = surface.edits_of(MessageId(1)).pop().unwrap();
        assert!(solved.embed.unwrap().description.unwrap().contains(&format!("{X} = 4")));

        settle(|| false).await;
        assert!(!bot.on_interaction(press(4, "1")).await);
        assert_eq!(surface.edits_of(MessageId(1)).len(), 7);
    }
}
