//! The bot engine.
//!
//! [`Bot`] owns the connection, the command registry and the event slots.
//! Setup (connecting, joining, registering) happens through `&mut self`
//! before [`Bot::run`]; once running, messages are handled one at a time
//! and each handler finishes before the next line is read.
//!
//! Handlers reply through a [`ChatSender`]. Queued lines are written to the
//! transport, in order, as soon as the dispatch that produced them returns.
//! Lines queued from other tasks go out while the bot waits for input.

use std::convert::Infallible;
use std::sync::Arc;

use tmi_proto::{
    ClientLine, Inbound, TcpTransport, Transport, TransportReadError, classify,
};
use tokio::sync::mpsc;
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::api::{ReqwestHttp, RestClient};
use crate::config::{BotConfig, Config, ServerConfig};
use crate::error::BotError;
use crate::handlers::{
    ChatSender, Cog, CommandHandler, CommandRegistry, Dispatch, ErrorHandler, EventDispatcher,
    EventHandler, MessageHandler,
};
use crate::network::Connection;
use crate::state::{BotState, Channel, ChannelRef, ChatMessage, Phase};

/// What woke the read loop.
enum Wake {
    Outbound(ClientLine),
    Inbound(Result<String, TransportReadError>),
}

/// A chat bot bound to one account.
pub struct Bot {
    config: BotConfig,
    server: ServerConfig,
    registry: CommandRegistry,
    events: EventDispatcher,
    api: Arc<RestClient>,
    sender: ChatSender,
    outbound: mpsc::UnboundedReceiver<ClientLine>,
    connection: Option<Connection>,
    state: BotState,
}

impl Bot {
    /// Create a disconnected bot with the default server settings.
    pub fn new(config: BotConfig, api: RestClient) -> Self {
        let (sender, outbound) = ChatSender::channel();
        Self {
            config,
            server: ServerConfig::default(),
            registry: CommandRegistry::new(),
            events: EventDispatcher::new(),
            api: Arc::new(api),
            sender,
            outbound,
            connection: None,
            state: BotState::new(),
        }
    }

    /// Create a bot from a loaded configuration, with a reqwest-backed API
    /// client.
    pub fn from_config(config: &Config) -> Result<Self, BotError> {
        let api = RestClient::new(Arc::new(ReqwestHttp::new()), &config.api)?;
        Ok(Self::new(config.bot.clone(), api).with_server(config.server.clone()))
    }

    /// Use a different chat server.
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Joined channels, sorted by name.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelRef> {
        self.state.channels()
    }

    /// A handle for queueing lines from outside a handler, e.g. a spawned
    /// task.
    pub fn sender(&self) -> ChatSender {
        self.sender.clone()
    }

    pub fn api(&self) -> &Arc<RestClient> {
        &self.api
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// A channel handle, joined or not.
    pub fn channel(&self, name: &str) -> Channel {
        Channel::new(ChannelRef::new(name), self.sender.clone(), self.api.clone())
    }

    // ========================================================================
    // Connection lifecycle
    // ========================================================================

    /// Connect to the configured server over TCP and log in.
    pub async fn connect(&mut self, username: &str, password: &str) -> Result<(), BotError> {
        info!(host = %self.server.host, port = self.server.port, "connecting");
        let transport = TcpTransport::connect(&self.server.host, self.server.port).await?;
        self.connect_with(transport, username, password).await
    }

    /// Log in over an already established transport.
    pub async fn connect_with<T>(
        &mut self,
        transport: T,
        username: &str,
        password: &str,
    ) -> Result<(), BotError>
    where
        T: Transport + 'static,
    {
        let mut connection = Connection::new(Box::new(transport), self.server.max_line_len);
        connection.send(&ClientLine::Pass(password.to_string())).await?;
        connection.send(&ClientLine::Nick(username.to_string())).await?;

        self.connection = Some(connection);
        self.state.connected();
        info!(username, "logged in");
        Ok(())
    }

    /// Join a channel and return a handle to it.
    pub async fn join_channel(&mut self, name: &str) -> Result<Channel, BotError> {
        let channel = ChannelRef::new(name);
        let connection = self.connection.as_mut().ok_or(BotError::NotConnected)?;
        connection.send(&ClientLine::Join(channel.name().to_string())).await?;

        if self.state.join(channel.clone())? {
            info!(channel = %channel, "joined channel");
        }
        Ok(Channel::new(channel, self.sender.clone(), self.api.clone()))
    }

    /// Leave a channel.
    pub async fn part_channel(&mut self, name: &str) -> Result<(), BotError> {
        let channel = ChannelRef::new(name);
        let connection = self.connection.as_mut().ok_or(BotError::NotConnected)?;
        connection.send(&ClientLine::Part(channel.name().to_string())).await?;

        if self.state.part(&channel)? {
            info!(channel = %channel, "left channel");
        }
        Ok(())
    }

    /// Send a chat message right away, outside any handler.
    pub async fn send_message(&mut self, channel: &str, text: &str) -> Result<(), BotError> {
        let connection = self.connection.as_mut().ok_or(BotError::NotConnected)?;
        connection.send(&ClientLine::privmsg(channel, text)).await?;
        Ok(())
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a command under `name` and `aliases`. Later registrations
    /// of the same key win.
    pub fn command(
        &mut self,
        name: &str,
        handler: impl CommandHandler + 'static,
        aliases: &[&str],
    ) -> &mut Self {
        self.registry.register(name, Arc::new(handler), aliases);
        debug!(command = name, ?aliases, "registered command");
        self
    }

    /// Replace the `"message"` event handler.
    pub fn on_message(&mut self, handler: impl MessageHandler + 'static) -> &mut Self {
        self.events.set_message_handler(Arc::new(handler));
        self
    }

    /// Replace the `"error"` event handler.
    pub fn on_error(&mut self, handler: impl ErrorHandler + 'static) -> &mut Self {
        self.events.set_error_handler(Arc::new(handler));
        self
    }

    /// Replace an event handler by name. Unknown names are rejected here,
    /// not on first use.
    pub fn set_event(&mut self, event: &str, handler: EventHandler) -> Result<(), BotError> {
        self.events.set_handler(event, handler)
    }

    /// Apply a cog's registrations.
    pub fn load_cog(&mut self, cog: impl Cog) -> Result<(), BotError> {
        cog.setup(self)?;
        info!(cog = cog.name(), "loaded cog");
        Ok(())
    }

    // ========================================================================
    // Read loop
    // ========================================================================

    /// Read until the next chat message.
    ///
    /// Pings are answered, other lines are skipped, and lines that cannot
    /// be decoded are logged and dropped. Lines queued on the
    /// [`ChatSender`] while waiting, for example by a spawned task, are
    /// written as they arrive. Only a transport failure ends the wait.
    pub async fn read_message(&mut self) -> Result<ChatMessage, BotError> {
        loop {
            let connection = self.connection.as_mut().ok_or(BotError::NotConnected)?;

            // Both branches are cancel safe: a read interrupted by an
            // outbound line keeps its buffered bytes.
            let wake = tokio::select! {
                biased;
                Some(line) = self.outbound.recv() => Wake::Outbound(line),
                read = connection.read_line() => Wake::Inbound(read),
            };

            let line = match wake {
                Wake::Outbound(line) => {
                    connection.send(&line).await?;
                    continue;
                }
                Wake::Inbound(Ok(line)) => line,
                Wake::Inbound(Err(TransportReadError::Protocol(e))) => {
                    warn!(error = %e, "dropping unreadable line");
                    continue;
                }
                Wake::Inbound(Err(TransportReadError::Transport(e))) => {
                    warn!(error = %e, "connection lost");
                    self.state.disconnected();
                    self.connection = None;
                    return Err(e.into());
                }
            };

            match classify(&line) {
                Inbound::Chat(chat) => return Ok(ChatMessage::from(chat)),
                Inbound::Ping(token) => {
                    debug!(token, "answering ping");
                    connection.send(&ClientLine::Pong(token.to_string())).await?;
                }
                Inbound::Other(other) => debug!(line = other, "ignoring non-chat line"),
            }
        }
    }

    /// Write every queued outbound line to the transport.
    async fn flush(&mut self) -> Result<(), BotError> {
        let Some(connection) = self.connection.as_mut() else {
            return Ok(());
        };
        while let Ok(line) = self.outbound.try_recv() {
            connection.send(&line).await?;
        }
        Ok(())
    }

    /// Process messages until something fatal happens.
    ///
    /// Failures inside a message handler go to the error handler and the
    /// loop carries on. The loop ends only when the connection fails or the
    /// error handler itself returns an error.
    pub async fn run(&mut self) -> Result<Infallible, BotError> {
        self.state.running()?;
        info!(
            channels = self.state.channels().count(),
            commands = self.registry.len(),
            "bot running"
        );

        loop {
            let message = self.read_message().await?;

            let message_span = span!(
                Level::DEBUG,
                "chat.message",
                author = %message.author(),
                channel = %message.channel(),
            );
            let dispatch = Dispatch::new(
                &self.registry,
                &self.config.prefix,
                &self.sender,
                &self.api,
            );
            let outcome = self
                .events
                .dispatch(&dispatch, &message)
                .instrument(message_span)
                .await;

            // Replies queued before a fatal error still go out.
            self.flush().await?;
            outcome?;
        }
    }
}
