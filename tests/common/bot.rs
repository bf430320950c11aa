//! Scripted bot fixture.

use std::sync::Arc;

use tmi_proto::{MemoryTransport, SentLog};
use tmibot::Bot;
use tmibot::api::{RestClient, ScriptedHttp};
use tmibot::config::{ApiConfig, BotConfig};

/// Build a protocol chat line the way the server sends it.
pub fn chat_line(user: &str, channel: &str, content: &str) -> String {
    format!(":{user}!{user}@{user}.tmi.twitch.tv PRIVMSG #{channel} :{content}\r\n")
}

/// A bot wired to an in-memory transport and a scripted API.
pub struct TestBot {
    pub bot: Bot,
    pub http: Arc<ScriptedHttp>,
    pub sent: SentLog,
    transport: Option<MemoryTransport>,
}

impl TestBot {
    /// A bot with prefix `!` whose transport replays `chunks`, then closes.
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        let http = Arc::new(ScriptedHttp::default());
        let config = ApiConfig {
            client_id: Some("test-client".into()),
            oauth_token: Some("test-token".into()),
            retry_limit: 2,
            backoff_base_ms: 1,
            backoff_max_ms: 2,
            helix_url: "http://helix.test".into(),
            chatters_url: "http://tmi.test/group/user".into(),
        };
        let api = RestClient::new(http.clone(), &config).expect("valid api config");
        let bot = Bot::new(BotConfig::new("therealbot"), api);

        let transport = MemoryTransport::new(chunks);
        let sent = transport.sent();
        Self {
            bot,
            http,
            sent,
            transport: Some(transport),
        }
    }

    /// Log in and join `channels`.
    pub async fn connect(&mut self, channels: &[&str]) {
        let transport = self.transport.take().expect("connect called twice");
        self.bot
            .connect_with(transport, "therealbot", "oauth:secret")
            .await
            .expect("connect");
        for channel in channels {
            self.bot.join_channel(channel).await.expect("join");
        }
    }

    /// Lines sent as chat messages, in order.
    pub fn privmsgs(&self) -> Vec<String> {
        self.sent
            .lines()
            .into_iter()
            .filter(|l| l.starts_with("PRIVMSG "))
            .collect()
    }
}
