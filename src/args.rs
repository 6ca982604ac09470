use aquabot::config::{BotConfig, ConfigError};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aquabot")]
#[command(about = "Aquarium hobby chat bot, driven from the terminal")]
#[command(version)]
pub struct Args {
    /// Path to the JSON config file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// User id that typed lines are sent as
    #[arg(short, long, default_value_t = 1)]
    pub user: u64,

    /// Channel id that typed lines are sent to
    #[arg(long, default_value_t = 1)]
    pub channel: u64,

    /// Command prefix, overriding the config and environment
    #[arg(short, long)]
    pub prefix: Option<String>,
}

impl Args {
    /// Config file (if present), then environment overrides, then `--prefix`
    pub fn load_config(&self) -> Result<BotConfig, ConfigError> {
        let config = if self.config.exists() {
            BotConfig::from_file(&self.config)?
        } else {
            ::log::info!(
                "Config file {} not found, using defaults",
                self.config.display()
            );
            BotConfig::default()
        };

        let mut config = config.with_env_overrides();
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        Ok(config)
    }
}
