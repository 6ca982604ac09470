//! Command parsing and the static command registry

use crate::chat::UserId;
use crate::config::BotConfig;
use crate::context::CommandContext;
use crate::error::BotError;
use crate::features::fishbase::FishBase;
use crate::features::help::Help;
use crate::features::liveaquaria::LiveAquaria;
use crate::features::maths::LinearCalculator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// A parsed command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Lower-cased command name
    pub name: String,
    /// Positional arguments, double quotes group words
    pub args: Vec<String>,
    /// Everything after the command name, trimmed
    pub rest: String,
}

impl Invocation {
    /// Parses `text` if it starts with one of `prefixes`
    pub fn parse(text: &str, prefixes: &[String]) -> Option<Self> {
        let body = prefixes
            .iter()
            .find_map(|prefix| text.strip_prefix(prefix.as_str()))?
            .trim_start();

        let (name, rest) = match body.find(char::is_whitespace) {
            Some(split) => (&body[..split], body[split..].trim()),
            None => (body, ""),
        };
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_lowercase(),
            args: split_arguments(rest),
            rest: rest.to_string(),
        })
    }

    /// Positional argument `index`, named `name` in the error when missing
    pub fn arg(&self, index: usize, name: &'static str) -> Result<&str, BotError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or(BotError::MissingArgument(name))
    }

    /// The whole remainder as one argument
    pub fn remainder(&self, name: &'static str) -> Result<&str, BotError> {
        if self.rest.is_empty() {
            Err(BotError::MissingArgument(name))
        } else {
            Ok(&self.rest)
        }
    }
}

fn split_arguments(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

/// Prefixes accepted for `config`: mentions of the bot, then the text prefix
pub fn prefixes(config: &BotConfig) -> Vec<String> {
    let mut prefixes = Vec::new();
    if let Some(id) = config.bot_user_id {
        prefixes.push(format!("<@{}>", id));
        prefixes.push(format!("<@!{}>", id));
    }
    prefixes.push(config.prefix.clone());
    prefixes
}

/// A named bot command
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-line description shown by `help`
    fn summary(&self) -> &'static str;

    /// Minimum delay between two uses by the same user
    fn cooldown(&self) -> Option<Duration> {
        None
    }

    async fn run(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<(), BotError>;
}

/// Statically assembled mapping from command names and aliases to handlers
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
    index: HashMap<String, usize>,
    last_used: Mutex<HashMap<(usize, UserId), Instant>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
            last_used: Mutex::new(HashMap::new()),
        }
    }

    /// Every feature command plus `help`
    pub fn standard() -> Self {
        Self::new()
            .register(FishBase)
            .register(LiveAquaria)
            .register(LinearCalculator)
            .with_help()
    }

    /// Adds `command`; a later registration wins on name clashes
    pub fn register(mut self, command: impl Command + 'static) -> Self {
        let position = self.commands.len();
        for key in std::iter::once(command.name()).chain(command.aliases().iter().copied()) {
            if self.index.insert(key.to_lowercase(), position).is_some() {
                ::log::warn!("Command name {} registered twice", key);
            }
        }
        self.commands.push(Arc::new(command));
        self
    }

    /// Registers a `help` command listing everything registered so far
    pub fn with_help(self) -> Self {
        let help = Help::listing(&self.commands);
        self.register(help)
    }

    pub fn commands(&self) -> &[Arc<dyn Command>] {
        &self.commands
    }

    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.lookup(name).map(|(_, command)| command)
    }

    fn lookup(&self, name: &str) -> Option<(usize, &Arc<dyn Command>)> {
        let position = *self.index.get(&name.to_lowercase())?;
        self.commands.get(position).map(|command| (position, command))
    }

    fn check_cooldown(&self, position: usize, user: UserId, cooldown: Duration) -> Result<(), BotError> {
        let now = Instant::now();
        let mut last_used = self.last_used.lock().unwrap_or_else(PoisonError::into_inner);

        // entries whose cooldown already ran out carry no information
        last_used.retain(|&(command_at, _), at| {
            self.commands
                .get(command_at)
                .and_then(|command| command.cooldown())
                .is_some_and(|window| now.duration_since(*at) < window)
        });

        if let Some(previous) = last_used.get(&(position, user)) {
            let elapsed = now.duration_since(*previous);
            if elapsed < cooldown {
                return Err(BotError::OnCooldown {
                    retry_after: cooldown - elapsed,
                });
            }
        }
        last_used.insert((position, user), now);
        Ok(())
    }

    /// Runs the command named by `invocation`
    pub async fn invoke(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<(), BotError> {
        let (position, command) = self
            .lookup(&invocation.name)
            .ok_or_else(|| BotError::UnknownCommand(invocation.name.clone()))?;

        if let Some(cooldown) = command.cooldown() {
            self.check_cooldown(position, ctx.author, cooldown)?;
        }

        ::log::info!(
            "User {} invoked {} with {:?}",
            ctx.author,
            command.name(),
            invocation.rest
        );
        command.run(ctx, invocation).await
    }

    /// Parses and runs `text`.
    ///
    /// Unknown commands are ignored. Any other failure is logged and echoed
    /// back to the channel as plain text.
    pub async fn dispatch(&self, ctx: &CommandContext, text: &str) {
        let Some(invocation) = Invocation::parse(text, &prefixes(&ctx.app.config)) else {
            return;
        };

        match self.invoke(ctx, &invocation).await {
            Ok(()) => {}
            Err(BotError::UnknownCommand(name)) => {
                ::log::debug!("Ignoring unknown command {}", name);
            }
            Err(e) => {
                ::log::warn!("Command {} failed: {}", invocation.name, e);
                if let Err(e) = ctx.send_text(e.to_string()).await {
                    ::log::error!("Failed to report error for {}: {}", invocation.name, e);
                }
            }
        }
    }
}
