use crate::chat::Outbound;
use crate::commands::{Command, Invocation};
use crate::context::CommandContext;
use crate::error::BotError;
use crate::ui::DisplayUnit;
use async_trait::async_trait;
use std::sync::Arc;

struct Listing {
    name: &'static str,
    aliases: &'static [&'static str],
    summary: &'static str,
}

/// `help`: list the registered commands
pub struct Help {
    listings: Vec<Listing>,
}

impl Help {
    pub fn listing(commands: &[Arc<dyn Command>]) -> Self {
        let listings = commands
            .iter()
            .map(|command| Listing {
                name: command.name(),
                aliases: command.aliases(),
                summary: command.summary(),
            })
            .collect();
        Self { listings }
    }

    fn describe(&self, prefix: &str) -> String {
        self.listings
            .iter()
            .map(|listing| {
                if listing.aliases.is_empty() {
                    format!("`{}{}`: {}", prefix, listing.name, listing.summary)
                } else {
                    format!(
                        "`{}{}` ({}): {}",
                        prefix,
                        listing.name,
                        listing.aliases.join(", "),
                        listing.summary
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Command for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn summary(&self) -> &'static str {
        "Show this list"
    }

    async fn run(&self, ctx: &CommandContext, _invocation: &Invocation) -> Result<(), BotError> {
        let unit = DisplayUnit::with_description(self.describe(&ctx.app.config.prefix)).titled("Commands");
        ctx.send(Outbound::embed(unit)).await?;
        Ok(())
    }
}
