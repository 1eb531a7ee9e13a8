//! Discord bot implementation
//!
//! Slash commands are served through poise. Each command hands its
//! interaction to the [`Dispatcher`] behind a [`DiscordResponder`].
//! Command and option descriptions come from [`COMMANDS`] alone and are
//! applied in [`registry`].

use crate::bot::commands::{COMMANDS, spec};
use crate::bot::dispatcher::Dispatcher;
use crate::config::BotConfig;
use crate::error::{Result, StockError};
use crate::interface::Responder;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

/// State shared by every command invocation
pub struct Data {
    pub dispatcher: Dispatcher,
}

pub type Context<'a> = poise::Context<'a, Data, StockError>;
pub type Command = poise::Command<Data, StockError>;

#[poise::command(slash_command)]
pub async fn nseactive(ctx: Context<'_>) -> Result<()> {
    handle(ctx, None).await
}

#[poise::command(slash_command)]
pub async fn bseactive(ctx: Context<'_>) -> Result<()> {
    handle(ctx, None).await
}

#[poise::command(slash_command)]
pub async fn ipoupcoming(ctx: Context<'_>) -> Result<()> {
    handle(ctx, None).await
}

#[poise::command(slash_command)]
pub async fn companyinfo(ctx: Context<'_>, company: String) -> Result<()> {
    handle(ctx, Some(&company)).await
}

#[poise::command(slash_command)]
pub async fn trendingstocks(ctx: Context<'_>) -> Result<()> {
    handle(ctx, None).await
}

async fn handle(ctx: Context<'_>, company: Option<&str>) -> Result<()> {
    let name = ctx.command().name.as_str();
    info!(command = name, user = %ctx.author().name, "received command");

    let responder = DiscordResponder::new(ctx);
    ctx.data().dispatcher.dispatch(name, company, &responder).await;
    Ok(())
}

/// Replies through the interaction of one slash command
pub struct DiscordResponder<'a> {
    ctx: Context<'a>,
}

impl<'a> DiscordResponder<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl<'a> Responder for DiscordResponder<'a> {
    async fn defer(&self) -> Result<()> {
        self.ctx
            .defer()
            .await
            .map_err(|e| StockError::Reply(e.to_string()))
    }

    async fn reply(&self, content: &str) -> Result<()> {
        self.ctx
            .say(content)
            .await
            .map(|_| ())
            .map_err(|e| StockError::Reply(e.to_string()))
    }
}

/// Slash commands with descriptions taken from [`COMMANDS`]
pub fn registry() -> Vec<Command> {
    let mut registry = vec![
        nseactive(),
        bseactive(),
        ipoupcoming(),
        companyinfo(),
        trendingstocks(),
    ];

    for command in &mut registry {
        let Some(declared) = spec(&command.name) else {
            continue;
        };
        command.description = Some(declared.description.to_string());

        if let Some(option) = declared.option {
            for parameter in &mut command.parameters {
                if parameter.name == option.name {
                    parameter.description = Some(option.description.to_string());
                    parameter.required = option.required;
                }
            }
        }
    }

    registry
}

/// Replace the application's global slash commands
async fn register_commands(http: &serenity::Context, commands: &[Command]) -> Result<()> {
    poise::builtins::register_globally(http, commands)
        .await
        .map_err(|e| StockError::Registration(e.to_string()))?;
    info!(count = commands.len(), "registered slash commands");
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, StockError>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!(error = %error, "bot setup failed");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, error = %error, "command failed");
        }
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                warn!(error = %err, "failed to handle framework error");
            }
        }
    }
}

/// Connect to the gateway and serve commands until shutdown
pub async fn run(config: &BotConfig, dispatcher: Dispatcher) -> Result<()> {
    let register = config.register_commands;
    debug!(commands = COMMANDS.len(), register, "starting Discord client");

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: registry(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, guilds = ready.guilds.len(), "connected to Discord");

                if register {
                    // Registration failure leaves the previous command set in place
                    if let Err(err) = register_commands(ctx, &framework.options().commands).await {
                        error!(error = %err, "slash command registration failed");
                    }
                }

                Ok(Data { dispatcher })
            })
        })
        .build();

    let mut client =
        serenity::ClientBuilder::new(&config.discord_token, serenity::GatewayIntents::GUILDS)
            .application_id(serenity::ApplicationId::new(config.application_id))
            .framework(framework)
            .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_declared_commands() {
        let registry = registry();

        let names: Vec<&str> = registry.iter().map(|c| c.name.as_str()).collect();
        let declared: Vec<&str> = COMMANDS.iter().map(|s| s.name).collect();
        assert_eq!(names, declared);

        for (command, declared) in registry.iter().zip(COMMANDS) {
            assert!(command.slash_action.is_some(), "{}", command.name);
            assert_eq!(command.description.as_deref(), Some(declared.description));

            match declared.option {
                Some(option) => {
                    assert_eq!(command.parameters.len(), 1);
                    let parameter = &command.parameters[0];
                    assert_eq!(parameter.name, option.name);
                    assert_eq!(parameter.description.as_deref(), Some(option.description));
                    assert_eq!(parameter.required, option.required);
                }
                None => assert!(command.parameters.is_empty(), "{}", command.name),
            }
        }
    }

    #[test]
    fn test_descriptions_only_come_from_registry() {
        for command in [nseactive(), bseactive(), ipoupcoming(), companyinfo(), trendingstocks()] {
            assert_eq!(command.description, None, "{}", command.name);
            assert!(command.parameters.iter().all(|p| p.description.is_none()));
        }
    }
}
