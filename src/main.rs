//! tmibot - demo bot
//!
//! Loads `tmibot.toml` (or the path given as the first argument), joins the
//! configured channels and answers a handful of commands.

use async_trait::async_trait;
use tmibot::config::validate;
use tmibot::handlers::{Args, CommandHandler, Context, Cog, command_fn};
use tmibot::{Bot, BotError, Config, HandlerResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// `!followers`: how many accounts follow this channel.
struct Followers;

#[async_trait]
impl CommandHandler for Followers {
    async fn call(&self, ctx: &Context<'_>, _args: Args) -> HandlerResult {
        let channel = ctx.channel();
        let followers = channel.followers().await?;
        ctx.reply(format!("#{} has {} followers", channel, followers.len()))
    }
}

/// `!my-role`: the author's highest role in this channel.
struct MyRole;

#[async_trait]
impl CommandHandler for MyRole {
    async fn call(&self, ctx: &Context<'_>, _args: Args) -> HandlerResult {
        let user = ctx.user();
        let role = user.role().await?;
        ctx.reply(format!("@{user} you are a {role}"))
    }
}

/// `!stream [channel]`: title, game and viewers of a live stream.
struct StreamCommand;

#[async_trait]
impl CommandHandler for StreamCommand {
    async fn call(&self, ctx: &Context<'_>, args: Args) -> HandlerResult {
        let channel = match args.get(0) {
            Ok(name) => ctx.create_user(name).channel(),
            Err(_) => ctx.channel(),
        };
        let stream = channel.stream().await?;
        let game = stream.game().await?;
        ctx.reply(format!(
            "{} is playing {} for {} viewers: {}",
            stream, game, stream.viewer_count, stream.title
        ))
    }
}

/// Commands that look things up on the API.
struct Lookups;

impl Cog for Lookups {
    fn name(&self) -> &str {
        "lookups"
    }

    fn setup(&self, bot: &mut Bot) -> Result<(), BotError> {
        bot.command("followers", Followers, &[])
            .command("my-role", MyRole, &["role"])
            .command("stream", StreamCommand, &["live"]);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tmibot.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!("config: {e}");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    let mut bot = Bot::from_config(&config)?;

    bot.command(
        "hello",
        command_fn(|ctx, _| ctx.reply(format!("Hello @{}!", ctx.author()))),
        &["hi"],
    )
    .command(
        "add",
        command_fn(|ctx, args| {
            args.expect_count(2)?;
            let sum = args.parse::<i64>(0)? + args.parse::<i64>(1)?;
            ctx.reply(sum.to_string())
        }),
        &["plus"],
    );
    bot.load_cog(Lookups)?;

    let password = config.bot.password.as_deref().unwrap_or_default();
    bot.connect(&config.bot.username, password).await?;
    for channel in &config.bot.channels {
        bot.join_channel(channel).await?;
    }

    info!(
        username = %config.bot.username,
        prefix = %config.bot.prefix,
        "Starting tmibot"
    );

    let Err(e) = bot.run().await;
    error!(code = e.error_code(), error = %e, "bot stopped");
    Err(e.into())
}
