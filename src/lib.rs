//! # tmibot
//!
//! A chat-bot framework for Twitch chat.
//!
//! A [`Bot`] keeps one connection to the chat server, turns incoming lines
//! into [`ChatMessage`](state::ChatMessage)s and hands them to its event
//! handlers. By default every message that starts with the configured
//! prefix is looked up in the [`CommandRegistry`](handlers::CommandRegistry)
//! and run. Handlers can query the Helix API through the shared
//! [`RestClient`](api::RestClient), which retries rate-limited calls and
//! walks paginated lists.
//!
//! ```ignore
//! use tmibot::{Bot, Config};
//! use tmibot::handlers::command_fn;
//!
//! let config = Config::load("tmibot.toml")?;
//! let mut bot = Bot::from_config(&config)?;
//! bot.command("add", command_fn(|ctx, args| {
//!     let sum = args.parse::<i64>(0)? + args.parse::<i64>(1)?;
//!     ctx.reply(sum.to_string())
//! }), &["plus"]);
//!
//! bot.connect(&config.bot.username, "oauth:...").await?;
//! bot.join_channel("bob").await?;
//! let Err(e) = bot.run().await;
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;

pub use bot::Bot;
pub use config::Config;
pub use error::{BotError, HandlerError, HandlerResult};
