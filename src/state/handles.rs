//! Capability handles for channels, users and streams.
//!
//! A handle is a name plus the capabilities it needs: a [`ChatSender`] to
//! talk in chat and a shared [`RestClient`] to look things up. Handles are
//! cheap to clone and hold no reference back to the bot.

use std::fmt;
use std::sync::Arc;

use crate::api::{ApiError, Chatters, RestClient, StreamInfo};
use crate::error::HandlerError;
use crate::handlers::ChatSender;

use super::ChannelRef;

/// Public profile data of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// `partner`, `affiliate`, or empty.
    pub rank: String,
    pub description: String,
}

/// A chat channel the bot can talk in and query.
#[derive(Clone)]
pub struct Channel {
    channel: ChannelRef,
    sender: ChatSender,
    api: Arc<RestClient>,
}

impl Channel {
    pub fn new(channel: ChannelRef, sender: ChatSender, api: Arc<RestClient>) -> Self {
        Self {
            channel,
            sender,
            api,
        }
    }

    pub fn name(&self) -> &str {
        self.channel.name()
    }

    pub fn channel_ref(&self) -> &ChannelRef {
        &self.channel
    }

    /// Send a chat message to this channel.
    pub fn send(&self, text: impl Into<String>) -> Result<(), HandlerError> {
        self.sender.privmsg(self.name(), text)
    }

    /// Everyone currently in chat, most privileged first.
    pub async fn chatters(&self) -> Result<Vec<String>, ApiError> {
        self.api.chatters_no_roles(self.name()).await
    }

    /// Everyone currently in chat, grouped by role.
    pub async fn chatters_with_roles(&self) -> Result<Chatters, ApiError> {
        self.api.chatters(self.name()).await
    }

    pub async fn info(&self) -> Result<ChannelInfo, ApiError> {
        let user = self.api.user_info(self.name()).await?;
        Ok(ChannelInfo {
            rank: user.broadcaster_type,
            description: user.description,
        })
    }

    /// Login names of everyone following this channel.
    pub async fn followers(&self) -> Result<Vec<String>, ApiError> {
        let follows = self.api.following_info(None, Some(self.name())).await?;
        Ok(follows.into_iter().map(|f| f.from_name).collect())
    }

    /// The channel's live stream; [`ApiError::StreamerNotLive`] if offline.
    pub async fn stream(&self) -> Result<Stream, ApiError> {
        let info = self.api.stream_info(self.name()).await?;
        Ok(Stream::new(info, self.api.clone()))
    }
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.channel == other.channel
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel").field("name", &self.name()).finish()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chat user, seen from the channel they were met in.
#[derive(Clone)]
pub struct User {
    name: String,
    origin: Channel,
}

impl User {
    pub fn new(name: impl Into<String>, origin: Channel) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The channel this user handle was created from.
    pub fn origin(&self) -> &Channel {
        &self.origin
    }

    /// The user's own channel.
    pub fn channel(&self) -> Channel {
        Channel::new(
            ChannelRef::new(self.name.as_str()),
            self.origin.sender.clone(),
            self.origin.api.clone(),
        )
    }

    /// Highest role in the origin channel, singular (`moderator`, `viewer`).
    pub async fn role(&self) -> Result<String, ApiError> {
        self.origin.api.user_role(self.origin.name(), &self.name).await
    }

    /// Login names of the channels this user follows.
    pub async fn following(&self) -> Result<Vec<String>, ApiError> {
        let follows = self.origin.api.following_info(Some(&self.name), None).await?;
        Ok(follows.into_iter().map(|f| f.to_name).collect())
    }

    /// Whether this user follows the origin channel.
    pub async fn is_following(&self) -> Result<bool, ApiError> {
        let follows = self
            .origin
            .api
            .following_info(Some(&self.name), Some(self.origin.name()))
            .await?;
        Ok(follows.len() == 1)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("origin", &self.origin.name())
            .finish()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A live stream.
#[derive(Clone)]
pub struct Stream {
    pub name: String,
    pub game_id: String,
    pub title: String,
    pub viewer_count: u64,
    api: Arc<RestClient>,
}

impl Stream {
    fn new(info: StreamInfo, api: Arc<RestClient>) -> Self {
        Self {
            name: info.user_name,
            game_id: info.game_id,
            title: info.title,
            viewer_count: info.viewer_count,
            api,
        }
    }

    /// Name of the game being played.
    pub async fn game(&self) -> Result<String, ApiError> {
        self.api.game_name(&self.game_id).await
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("name", &self.name)
            .field("game_id", &self.game_id)
            .field("title", &self.title)
            .field("viewer_count", &self.viewer_count)
            .finish()
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScriptedHttp;
    use crate::config::ApiConfig;
    use serde_json::json;
    use tmi_proto::ClientLine;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn fixture(http: &Arc<ScriptedHttp>) -> (Channel, UnboundedReceiver<ClientLine>) {
        let config = ApiConfig {
            client_id: Some("cid".into()),
            helix_url: "http://helix".into(),
            chatters_url: "http://tmi".into(),
            ..ApiConfig::default()
        };
        let api = Arc::new(RestClient::new(http.clone(), &config).unwrap());
        let (sender, rx) = ChatSender::channel();
        (Channel::new(ChannelRef::new("bob"), sender, api), rx)
    }

    #[test]
    fn test_channel_send_queues_privmsg() {
        let http = Arc::new(ScriptedHttp::default());
        let (channel, mut rx) = fixture(&http);

        channel.send("hello").unwrap();
        assert_eq!(rx.try_recv().unwrap().to_string(), "PRIVMSG #bob :hello");
    }

    #[test]
    fn test_user_channel_is_own_channel() {
        let http = Arc::new(ScriptedHttp::default());
        let (channel, _rx) = fixture(&http);

        let user = User::new("alice", channel.clone());
        assert_eq!(user.channel().name(), "alice");
        assert_eq!(user.origin(), &channel);
    }

    #[tokio::test]
    async fn test_channel_info_maps_profile() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(
            200,
            json!({"data": [{
                "id": "7", "login": "bob", "display_name": "Bob",
                "broadcaster_type": "partner", "description": "speedruns"
            }]}),
        );
        let (channel, _rx) = fixture(&http);

        let info = channel.info().await.unwrap();
        assert_eq!(info.rank, "partner");
        assert_eq!(info.description, "speedruns");
    }

    #[tokio::test]
    async fn test_stream_game_lookup() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(
            200,
            json!({"data": [{
                "user_id": "7", "user_login": "bob", "user_name": "Bob",
                "game_id": "33214", "title": "any%", "viewer_count": 12
            }]}),
        );
        http.push_json(200, json!({"data": [{"id": "33214", "name": "Fortnite"}]}));
        let (channel, _rx) = fixture(&http);

        let stream = channel.stream().await.unwrap();
        assert_eq!(stream.viewer_count, 12);
        assert_eq!(stream.game().await.unwrap(), "Fortnite");
        assert_eq!(http.urls()[1], "http://helix/games?id=33214");
    }

    #[tokio::test]
    async fn test_is_following_checks_single_relationship() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(
            200,
            json!({"data": [{"id": "1", "login": "alice", "display_name": "alice"}]}),
        );
        http.push_json(200, json!({"data": [{"id": "2", "login": "bob", "display_name": "bob"}]}));
        http.push_json(200, json!({"data": [], "pagination": {}}));
        let (channel, _rx) = fixture(&http);

        let user = User::new("alice", channel);
        assert!(!user.is_following().await.unwrap());
    }
}
