mod liveaquaria_tests;

use crate::chat::{ChannelId, MessageId, UserId};
use crate::config::BotConfig;
use crate::context::CommandContext;
use crate::testing::{RecordingPaste, RecordingSurface, test_app_with};
use std::sync::Arc;

pub(crate) fn command_context(config: BotConfig, surface: Arc<RecordingSurface>) -> CommandContext {
    CommandContext {
        app: test_app_with(config, surface, Arc::new(RecordingPaste::failing())),
        channel: ChannelId(3),
        author: UserId(8),
        message: MessageId(100),
    }
}
