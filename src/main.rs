use aquabot::Bot;
use aquabot::chat::{ChannelId, InteractionEvent, MessageId, UserId};
use aquabot::commands::CommandRegistry;
use aquabot::console::{ConsoleInput, ConsoleSurface, parse_line};
use aquabot::context::AppContext;
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};

mod args;
use args::Args;

/// Ids of typed messages start far above the ids the console surface hands out
const INCOMING_ID_BASE: u64 = 1 << 32;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load config: {}", e);
            return;
        }
    };

    let app = match AppContext::new(config, Arc::new(ConsoleSurface::new())) {
        Ok(app) => app,
        Err(e) => {
            ::log::error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let bot = Arc::new(Bot::new(app, CommandRegistry::standard()));
    let channel = ChannelId(args.channel);
    let default_user = UserId(args.user);
    let incoming = AtomicU64::new(INCOMING_ID_BASE);

    ::log::info!(
        "Listening on stdin as user {} in channel {} with prefix {}",
        default_user,
        channel.0,
        bot.app().config.prefix
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                ::log::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let input = match parse_line(&line, default_user) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let bot = bot.clone();
        match input {
            ConsoleInput::Message { author, text } => {
                let message = MessageId(incoming.fetch_add(1, Ordering::SeqCst));
                tokio::spawn(async move {
                    bot.on_message(channel, author, message, &text).await;
                });
            }
            ConsoleInput::Interaction {
                user,
                message,
                component_id,
                values,
            } => {
                let event = InteractionEvent {
                    channel,
                    message,
                    user,
                    component_id,
                    values,
                };
                tokio::spawn(async move {
                    if !bot.on_interaction(event).await {
                        println!("Message {} has no active controls", message);
                    }
                });
            }
        }
    }

    ::log::info!("Input closed, shutting down");
}
